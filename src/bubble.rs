//! Language switcher bubble: a corner icon that opens the picker.

use crate::config::Config;
use crate::error::{Result, UiError};
use crate::picker::{PickerEntry, PickerSelection, PickerSession};
use crate::poly::Polyglot;
use crate::storage::Storage;
use crate::ui::{ButtonSpec, DeviceInfo, Gesture, PickerStyle, UiSurface};
use std::str::FromStr;
use tracing::{debug, warn};

/// Icon size used when the icon image cannot be probed.
pub const DEFAULT_ICON_RESOLUTION: u32 = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BubbleLocation {
    #[default]
    TopLeft,
    TopRight,
    BotLeft,
    BotRight,
}

impl FromStr for BubbleLocation {
    type Err = UiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bot-left" => Ok(Self::BotLeft),
            "bot-right" => Ok(Self::BotRight),
            other => Err(UiError::UnknownLocation(other.to_string())),
        }
    }
}

/// Placement of the switcher bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleOptions {
    /// Ignored when both `x` and `y` are set
    pub location: BubbleLocation,
    pub padding_mult: i32,

    /// Defaults to the probed icon resolution
    pub icon_size: Option<u32>,

    /// Defaults to 5% of the smaller screen dimension
    pub padding: Option<i32>,

    pub x: Option<i32>,
    pub y: Option<i32>,
    pub offset_x: i32,
    pub offset_y: i32,

    /// Passed to the picker opened from the bubble
    pub restart_app: bool,
}

impl Default for BubbleOptions {
    fn default() -> Self {
        Self {
            location: BubbleLocation::TopLeft,
            padding_mult: 2,
            icon_size: None,
            padding: None,
            x: None,
            y: None,
            offset_x: 0,
            offset_y: 0,
            restart_app: false,
        }
    }
}

/// Top-left corner of the bubble. On round screens the icon is pulled
/// inward by half its size so it stays inside the visible circle.
pub fn bubble_position(options: &BubbleOptions, device: &DeviceInfo, icon_size: u32) -> (i32, i32) {
    let (x, y) = match (options.x, options.y) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            let padding = options
                .padding
                .unwrap_or_else(|| (device.min_dimension() as f32 * 0.05).round() as i32);
            let inset = (padding * options.padding_mult) as f32;
            let icon = icon_size as f32;
            let half_icon = if device.is_round() { icon / 2.0 } else { 0.0 };
            let width = device.width as f32;
            let height = device.height as f32;

            let left = inset + half_icon;
            let right = width - icon - inset - half_icon;
            let top = inset;
            let bottom = height - icon - inset;

            let (x, y) = match options.location {
                BubbleLocation::TopLeft => (left, top),
                BubbleLocation::TopRight => (right, top),
                BubbleLocation::BotLeft => (left, bottom),
                BubbleLocation::BotRight => (right, bottom),
            };
            // odd icons land on half pixels, rounded once at the end
            (x.round() as i32, y.round() as i32)
        }
    };

    (x + options.offset_x, y + options.offset_y)
}

/// Owns the bubble widget and the picker it opens.
#[derive(Debug)]
pub struct LangSwitcher<H> {
    icon_normal_path: String,
    icon_pressed_path: String,
    icon_resolution: u32,
    picker_style: PickerStyle,
    restart_app: bool,
    bubble: Option<H>,
    picker: Option<PickerSession<H>>,
}

impl<H> LangSwitcher<H> {
    pub fn new<U>(config: &Config, ui: &U) -> Self
    where
        U: UiSurface<Handle = H>,
    {
        let mut switcher = Self {
            icon_normal_path: config.icon_normal_path.clone(),
            icon_pressed_path: config.icon_pressed_path.clone(),
            icon_resolution: DEFAULT_ICON_RESOLUTION,
            picker_style: PickerStyle::default(),
            restart_app: false,
            bubble: None,
            picker: None,
        };
        switcher.probe_icon(ui);
        switcher
    }

    /// Swap the bubble icons. Takes effect the next time the bubble is shown.
    pub fn set_icon_path<U>(&mut self, normal: &str, pressed: &str, ui: &U)
    where
        U: UiSurface<Handle = H>,
    {
        self.icon_normal_path = normal.to_string();
        self.icon_pressed_path = pressed.to_string();
        self.probe_icon(ui);
    }

    fn probe_icon<U>(&mut self, ui: &U)
    where
        U: UiSurface<Handle = H>,
    {
        self.icon_resolution = match ui.image_width(&self.icon_normal_path) {
            Some(width) => width,
            None => {
                warn!(
                    "Failed to get icon resolution for {}, using {}",
                    self.icon_normal_path, DEFAULT_ICON_RESOLUTION
                );
                DEFAULT_ICON_RESOLUTION
            }
        };
    }

    pub fn icon_resolution(&self) -> u32 {
        self.icon_resolution
    }

    pub fn set_picker_style(&mut self, style: PickerStyle) {
        self.picker_style = style;
    }

    pub fn is_bubble_shown(&self) -> bool {
        self.bubble.is_some()
    }

    /// Draw the bubble, replacing one that is already shown.
    pub fn show_poly_bubble<U>(&mut self, ui: &mut U, options: BubbleOptions)
    where
        U: UiSurface<Handle = H>,
    {
        self.hide_poly_bubble(ui);

        let size = options.icon_size.unwrap_or(self.icon_resolution);
        let (x, y) = bubble_position(&options, &ui.device(), size);
        debug!("Showing language bubble at ({}, {}) size {}", x, y, size);

        let handle = ui.create_button(&ButtonSpec {
            x,
            y,
            size,
            normal_src: self.icon_normal_path.clone(),
            pressed_src: self.icon_pressed_path.clone(),
        });
        self.restart_app = options.restart_app;
        self.bubble = Some(handle);
    }

    pub fn hide_poly_bubble<U>(&mut self, ui: &mut U)
    where
        U: UiSurface<Handle = H>,
    {
        if let Some(handle) = self.bubble.take() {
            if let Err(e) = ui.remove(handle) {
                warn!("Failed to remove language bubble: {}", e);
            }
        }
    }

    /// The bubble was tapped.
    pub fn bubble_pressed<S, U>(&mut self, poly: &Polyglot<S>, ui: &mut U)
    where
        S: Storage,
        U: UiSurface<Handle = H>,
    {
        let restart = self.restart_app;
        self.show_lang_picker(poly, ui, restart);
    }

    /// Open the picker, closing one that is already open.
    pub fn show_lang_picker<S, U>(&mut self, poly: &Polyglot<S>, ui: &mut U, restart: bool)
    where
        S: Storage,
        U: UiSurface<Handle = H>,
    {
        self.close_picker(ui);
        self.picker = Some(PickerSession::open(
            poly,
            ui,
            self.picker_style.clone(),
            restart,
        ));
    }

    pub fn picker(&self) -> Option<&PickerSession<H>> {
        self.picker.as_ref()
    }

    pub fn picker_press<S, U>(
        &mut self,
        rotated: usize,
        poly: &mut Polyglot<S>,
        ui: &mut U,
    ) -> Result<Option<PickerSelection>>
    where
        S: Storage,
        U: UiSurface<Handle = H>,
    {
        let Some(picker) = self.picker.as_mut() else {
            return Ok(None);
        };
        let result = picker.press(rotated, poly, ui);
        if !picker.is_open() {
            self.picker = None;
        }
        result
    }

    pub fn picker_focus(&self, rotated: usize) -> Option<(usize, &PickerEntry)> {
        self.picker.as_ref()?.focus(rotated)
    }

    /// # Returns
    /// `true` if an open picker consumed the gesture
    pub fn picker_gesture<U>(&mut self, gesture: Gesture, ui: &mut U) -> bool
    where
        U: UiSurface<Handle = H>,
    {
        let Some(picker) = self.picker.as_mut() else {
            return false;
        };
        let consumed = picker.gesture(gesture, ui);
        if !picker.is_open() {
            self.picker = None;
        }
        consumed
    }

    pub fn close_picker<U>(&mut self, ui: &mut U)
    where
        U: UiSurface<Handle = H>,
    {
        if let Some(mut picker) = self.picker.take() {
            picker.close(ui);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::LanguageSwitch;
    use crate::storage::MemoryStorage;
    use crate::ui::fake::FakeSurface;
    use crate::ui::ScreenShape;

    fn device(shape: ScreenShape) -> DeviceInfo {
        DeviceInfo {
            width: 480,
            height: 480,
            shape,
        }
    }

    fn storage() -> MemoryStorage {
        MemoryStorage::new()
            .with_file("polyglot/translations/en-US.json", r#"{"hello": "Hello"}"#)
            .with_file("polyglot/translations/fr-FR.json", r#"{"hello": "Bonjour"}"#)
    }

    // ==================== Placement Tests ====================

    #[test]
    fn test_location_from_str() {
        assert_eq!("bot-right".parse::<BubbleLocation>().ok(), Some(BubbleLocation::BotRight));
        assert!(matches!(
            "middle".parse::<BubbleLocation>(),
            Err(UiError::UnknownLocation(_))
        ));
    }

    #[test]
    fn test_square_corners() {
        // padding = round(480 * 0.05) = 24, inset = 48
        let square = device(ScreenShape::Square);
        let mut options = BubbleOptions::default();
        assert_eq!(bubble_position(&options, &square, 64), (48, 48));

        options.location = BubbleLocation::BotRight;
        assert_eq!(bubble_position(&options, &square, 64), (368, 368));
    }

    #[test]
    fn test_round_screens_pull_icon_inward() {
        let round = device(ScreenShape::Round);
        let mut options = BubbleOptions::default();
        assert_eq!(bubble_position(&options, &round, 64), (80, 48));

        options.location = BubbleLocation::TopRight;
        assert_eq!(bubble_position(&options, &round, 64), (336, 48));

        options.location = BubbleLocation::BotLeft;
        assert_eq!(bubble_position(&options, &round, 64), (80, 368));
    }

    #[test]
    fn test_round_screens_keep_half_pixel_of_odd_icons() {
        // half of 65 is 32.5: 48 + 32.5 and 480 - 65 - 48 - 32.5
        let round = device(ScreenShape::Round);
        let mut options = BubbleOptions::default();
        assert_eq!(bubble_position(&options, &round, 65), (81, 48));

        options.location = BubbleLocation::TopRight;
        assert_eq!(bubble_position(&options, &round, 65), (335, 48));

        options.location = BubbleLocation::BotRight;
        assert_eq!(bubble_position(&options, &round, 65), (335, 367));
    }

    #[test]
    fn test_manual_position_and_offset() {
        let options = BubbleOptions {
            x: Some(100),
            y: Some(10),
            offset_x: -20,
            offset_y: 5,
            location: BubbleLocation::BotRight,
            ..BubbleOptions::default()
        };
        assert_eq!(
            bubble_position(&options, &device(ScreenShape::Round), 64),
            (80, 15)
        );
    }

    #[test]
    fn test_only_one_manual_coordinate_uses_location() {
        let options = BubbleOptions {
            x: Some(100),
            padding: Some(10),
            padding_mult: 1,
            ..BubbleOptions::default()
        };
        assert_eq!(
            bubble_position(&options, &device(ScreenShape::Square), 64),
            (10, 10)
        );
    }

    // ==================== Switcher Tests ====================

    #[test]
    fn test_icon_resolution_probe() {
        let mut ui = FakeSurface::round();
        let switcher = LangSwitcher::new(&Config::new("1.0.0"), &ui);
        assert_eq!(switcher.icon_resolution(), DEFAULT_ICON_RESOLUTION);

        ui.images.insert("icons/big.png".to_string(), 96);
        let mut switcher = LangSwitcher::new(&Config::new("1.0.0"), &ui);
        switcher.set_icon_path("icons/big.png", "icons/big-press.png", &ui);
        assert_eq!(switcher.icon_resolution(), 96);
    }

    #[test]
    fn test_show_and_hide_bubble() {
        let mut ui = FakeSurface::square();
        let mut switcher = LangSwitcher::new(&Config::new("1.0.0"), &ui);

        switcher.show_poly_bubble(&mut ui, BubbleOptions::default());
        switcher.show_poly_bubble(&mut ui, BubbleOptions::default());
        assert_eq!(ui.buttons.len(), 2);
        assert_eq!(ui.live.len(), 1);
        assert_eq!(ui.buttons[0].normal_src, "raw/polyglot/poly-selector.png");

        switcher.hide_poly_bubble(&mut ui);
        switcher.hide_poly_bubble(&mut ui);
        assert!(ui.live.is_empty());
        assert!(!switcher.is_bubble_shown());
    }

    #[test]
    fn test_bubble_opens_picker_with_restart_flag() {
        let storage = storage();
        let mut poly = Polyglot::new(&storage, Config::new("1.0.0"));
        let mut ui = FakeSurface::round();
        let mut switcher = LangSwitcher::new(&Config::new("1.0.0"), &ui);

        switcher.show_poly_bubble(
            &mut ui,
            BubbleOptions {
                restart_app: true,
                ..BubbleOptions::default()
            },
        );
        switcher.bubble_pressed(&poly, &mut ui);
        assert!(switcher.picker().is_some());
        assert_eq!(ui.gesture_listeners, 1);

        // English, French -> English selected, offset 0
        let (_, entry) = switcher.picker_focus(1).expect("in range");
        assert_eq!(entry.code, "fr-FR");

        let selection = switcher
            .picker_press(1, &mut poly, &mut ui)
            .expect("switch")
            .expect("in range");
        assert_eq!(selection.switch, LanguageSwitch::RestartRequired);
        assert!(switcher.picker().is_none());
        assert_eq!(ui.gesture_listeners, 0);
        // the bubble stays
        assert_eq!(ui.live.len(), 1);
    }

    #[test]
    fn test_reopening_picker_releases_previous() {
        let storage = storage();
        let poly = Polyglot::new(&storage, Config::new("1.0.0"));
        let mut ui = FakeSurface::round();
        let mut switcher = LangSwitcher::new(&Config::new("1.0.0"), &ui);

        switcher.show_lang_picker(&poly, &mut ui, false);
        switcher.show_lang_picker(&poly, &mut ui, false);
        assert_eq!(ui.gesture_listeners, 1);
        assert_eq!(ui.live.len(), 1);

        assert!(switcher.picker_gesture(Gesture::Right, &mut ui));
        assert!(!switcher.picker_gesture(Gesture::Right, &mut ui));
        assert!(ui.live.is_empty());
        assert_eq!(ui.gesture_listeners, 0);
    }
}
