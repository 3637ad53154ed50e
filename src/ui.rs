//! UI surface capability consumed by the language picker and the switcher
//! bubble.
//!
//! Widgets are described declaratively and handed to the host surface, which
//! returns an opaque handle. Press, focus and gesture events flow back into
//! [`crate::picker::PickerSession`] through plain method calls.

use crate::error::UiError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenShape {
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub width: u32,
    pub height: u32,
    pub shape: ScreenShape,
}

impl DeviceInfo {
    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn is_round(&self) -> bool {
        self.shape == ScreenShape::Round
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Up,
    Down,
    Left,
    Right,
}

/// Colors and geometry of the picker list. `None` fields are derived from
/// the zoom factor or the screen shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerStyle {
    pub bg_color: u32,
    pub normal_item_bg_color: u32,
    pub selected_item_bg_color: u32,
    pub item_bg_radius: u32,
    pub normal_text_color: u32,
    pub selected_text_color: u32,
    pub zoom: f32,
    pub normal_text_size: Option<f32>,
    pub selected_text_size: Option<f32>,
    pub item_space: u32,
    pub list_pos_y: Option<u32>,
    pub list_height: Option<u32>,
}

impl Default for PickerStyle {
    fn default() -> Self {
        Self {
            bg_color: 0x000000,
            normal_item_bg_color: 0x333333,
            selected_item_bg_color: 0xff0000,
            item_bg_radius: 10,
            normal_text_color: 0xffffff,
            selected_text_color: 0xffffff,
            zoom: 1.25,
            normal_text_size: None,
            selected_text_size: None,
            item_space: 10,
            list_pos_y: None,
            list_height: None,
        }
    }
}

impl PickerStyle {
    pub fn item_height(&self) -> f32 {
        40.0 * self.zoom
    }

    pub fn normal_text_size(&self) -> f32 {
        self.normal_text_size.unwrap_or(20.0 * self.zoom)
    }

    pub fn selected_text_size(&self) -> f32 {
        self.selected_text_size.unwrap_or(24.0 * self.zoom)
    }

    /// Top of the list: full screen on square displays, inset on round ones.
    pub fn list_pos_y(&self, device: &DeviceInfo) -> u32 {
        self.list_pos_y.unwrap_or(match device.shape {
            ScreenShape::Square => 0,
            ScreenShape::Round => 120,
        })
    }

    pub fn list_height(&self, device: &DeviceInfo) -> u32 {
        self.list_height.unwrap_or(match device.shape {
            ScreenShape::Square => device.height,
            ScreenShape::Round => 300,
        })
    }
}

/// A full-screen scroll list over an opaque background.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerSpec {
    /// Labels in display (rotated) order
    pub items: Vec<String>,

    /// Display slot drawn with the selected item style
    pub highlighted: Option<usize>,

    pub style: PickerStyle,
}

/// An image button with a pressed-state image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub normal_src: String,
    pub pressed_src: String,
}

/// Host UI toolkit.
pub trait UiSurface {
    /// Opaque widget handle. Consumed by [`UiSurface::remove`].
    type Handle: fmt::Debug;

    fn device(&self) -> DeviceInfo;

    /// Pixel width of an image, or `None` if it cannot be read.
    fn image_width(&self, path: &str) -> Option<u32>;

    fn create_picker(&mut self, spec: &PickerSpec) -> Self::Handle;

    fn create_button(&mut self, spec: &ButtonSpec) -> Self::Handle;

    /// Dispose a widget. Disposal is best effort; callers log and move on.
    fn remove(&mut self, handle: Self::Handle) -> Result<(), UiError>;

    /// Start routing directional gestures to the open picker.
    fn register_gesture(&mut self);

    fn unregister_gesture(&mut self);
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    /// Records every widget call so tests can check for leaks.
    #[derive(Debug)]
    pub struct FakeSurface {
        pub device: DeviceInfo,
        pub images: HashMap<String, u32>,
        pub pickers: Vec<PickerSpec>,
        pub buttons: Vec<ButtonSpec>,
        pub live: BTreeSet<usize>,
        pub gesture_listeners: i32,
        pub removals: usize,
        next_handle: usize,
    }

    impl FakeSurface {
        pub fn new(width: u32, height: u32, shape: ScreenShape) -> Self {
            Self {
                device: DeviceInfo {
                    width,
                    height,
                    shape,
                },
                images: HashMap::new(),
                pickers: Vec::new(),
                buttons: Vec::new(),
                live: BTreeSet::new(),
                gesture_listeners: 0,
                removals: 0,
                next_handle: 0,
            }
        }

        pub fn round() -> Self {
            Self::new(480, 480, ScreenShape::Round)
        }

        pub fn square() -> Self {
            Self::new(390, 450, ScreenShape::Square)
        }

        fn allocate(&mut self) -> usize {
            self.next_handle += 1;
            self.live.insert(self.next_handle);
            self.next_handle
        }
    }

    impl UiSurface for FakeSurface {
        type Handle = usize;

        fn device(&self) -> DeviceInfo {
            self.device
        }

        fn image_width(&self, path: &str) -> Option<u32> {
            self.images.get(path).copied()
        }

        fn create_picker(&mut self, spec: &PickerSpec) -> usize {
            self.pickers.push(spec.clone());
            self.allocate()
        }

        fn create_button(&mut self, spec: &ButtonSpec) -> usize {
            self.buttons.push(spec.clone());
            self.allocate()
        }

        fn remove(&mut self, handle: usize) -> Result<(), UiError> {
            if self.live.remove(&handle) {
                self.removals += 1;
                Ok(())
            } else {
                Err(UiError::AlreadyRemoved)
            }
        }

        fn register_gesture(&mut self) {
            self.gesture_listeners += 1;
        }

        fn unregister_gesture(&mut self) {
            self.gesture_listeners -= 1;
        }
    }
}
