//! Language picker.
//!
//! The supported languages are listed by display name. The list is rotated so
//! that the active language always opens in the third of five visible slots,
//! and every event coming back from the surface is mapped from its display
//! slot to the position in the sorted list before anything acts on it.

use crate::error::Result;
use crate::i18n::LanguageCatalog;
use crate::poly::{LanguageSwitch, Polyglot};
use crate::storage::Storage;
use crate::ui::{Gesture, PickerSpec, PickerStyle, UiSurface};
use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Display slot the active language is rotated into.
pub const FOCUS_SLOT: usize = 2;

/// Number of rows visible at once.
pub const VISIBLE_SLOTS: usize = 5;

/// Bijection between display slots and sorted-list positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationMap {
    len: usize,
    offset: usize,
}

impl RotationMap {
    /// Rotation that puts `selected` at [`FOCUS_SLOT`] (modulo `len` for
    /// lists shorter than the window).
    ///
    /// # Returns
    /// * `None` if the list is empty or `selected` is out of range
    pub fn new(len: usize, selected: usize) -> Option<Self> {
        if selected >= len {
            return None;
        }
        let offset = (selected + len - FOCUS_SLOT % len) % len;
        Some(Self { len, offset })
    }

    pub fn identity(len: usize) -> Self {
        Self { len, offset: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Sorted-list position shown at display slot `rotated`.
    pub fn to_original(&self, rotated: usize) -> Option<usize> {
        (rotated < self.len).then(|| (rotated + self.offset) % self.len)
    }

    /// Display slot of sorted-list position `original`.
    pub fn to_rotated(&self, original: usize) -> Option<usize> {
        (original < self.len).then(|| (original + self.len - self.offset) % self.len)
    }

    /// `items` in display order.
    pub fn rotate<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let offset = self.offset.min(items.len());
        let mut rotated = items[offset..].to_vec();
        rotated.extend_from_slice(&items[..offset]);
        rotated
    }

    /// `index_map()[rotated] == original` for every display slot.
    pub fn index_map(&self) -> Vec<usize> {
        (0..self.len)
            .map(|rotated| (rotated + self.offset) % self.len)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub code: String,
    pub name: String,
}

/// Supported languages sorted by display name. Codes missing from the
/// catalog are listed under their own code.
pub fn sorted_entries(supported: &[String], catalog: &LanguageCatalog) -> Vec<PickerEntry> {
    let mut entries: Vec<PickerEntry> = supported
        .iter()
        .map(|code| PickerEntry {
            code: code.clone(),
            name: catalog.display_name(code).unwrap_or(code).to_string(),
        })
        .collect();

    // stable: equal names keep supported-list order
    entries.sort_by_cached_key(|entry| {
        (
            collation_key(&entry.name),
            entry.name.to_lowercase(),
            entry.name.clone(),
        )
    });
    entries
}

/// Case- and accent-insensitive sort key, so "Čeština" files under C.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// What the user picked and what the switch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerSelection {
    /// Position in the sorted list
    pub index: usize,
    pub code: String,
    pub switch: LanguageSwitch,
}

/// One open picker. Owns the widget handle and the gesture registration
/// until [`PickerSession::close`] releases both.
#[derive(Debug)]
pub struct PickerSession<H> {
    entries: Vec<PickerEntry>,
    rotation: RotationMap,
    restart: bool,
    handle: Option<H>,
}

impl<H> PickerSession<H> {
    /// Draw the picker for the engine's supported languages and start
    /// listening for gestures.
    pub fn open<S, U>(poly: &Polyglot<S>, ui: &mut U, style: PickerStyle, restart: bool) -> Self
    where
        S: Storage,
        U: UiSurface<Handle = H>,
    {
        let entries = sorted_entries(poly.supported_languages(), poly.catalog());
        let selected = entries.iter().position(|entry| entry.code == poly.language());
        let rotation = selected
            .and_then(|index| RotationMap::new(entries.len(), index))
            .unwrap_or_else(|| RotationMap::identity(entries.len()));

        let names: Vec<String> = entries.iter().map(|entry| entry.name.clone()).collect();
        let spec = PickerSpec {
            items: rotation.rotate(&names),
            highlighted: selected.and_then(|index| rotation.to_rotated(index)),
            style,
        };
        debug!(
            "Opening language picker with {} entries, rotation offset {}",
            entries.len(),
            rotation.offset()
        );

        let handle = ui.create_picker(&spec);
        ui.register_gesture();

        Self {
            entries,
            rotation,
            restart,
            handle: Some(handle),
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Entries in sorted order.
    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    pub fn rotation(&self) -> &RotationMap {
        &self.rotation
    }

    /// Handle a press on display slot `rotated`: switch language, then close.
    ///
    /// The picker closes even if the switch fails.
    ///
    /// # Returns
    /// * `Ok(None)` if the picker is already closed or the slot is out of range
    /// * `Ok(Some(selection))` after a switch (or a no-op switch)
    /// * `Err` if the chosen language's table could not be loaded
    pub fn press<S, U>(
        &mut self,
        rotated: usize,
        poly: &mut Polyglot<S>,
        ui: &mut U,
    ) -> Result<Option<PickerSelection>>
    where
        S: Storage,
        U: UiSurface<Handle = H>,
    {
        if !self.is_open() {
            return Ok(None);
        }
        let Some(index) = self.rotation.to_original(rotated) else {
            warn!("Ignoring press on picker slot {} out of range", rotated);
            return Ok(None);
        };

        let code = self.entries[index].code.clone();
        let result = poly.set_language(&code, self.restart);
        self.close(ui);

        Ok(Some(PickerSelection {
            index,
            code,
            switch: result?,
        }))
    }

    /// Map a focus change on display slot `rotated` to the sorted entry.
    pub fn focus(&self, rotated: usize) -> Option<(usize, &PickerEntry)> {
        let index = self.rotation.to_original(rotated)?;
        Some((index, &self.entries[index]))
    }

    /// Handle a directional gesture.
    ///
    /// # Returns
    /// `true` if the gesture was consumed (swipe right closes the picker)
    pub fn gesture<U>(&mut self, gesture: Gesture, ui: &mut U) -> bool
    where
        U: UiSurface<Handle = H>,
    {
        if gesture != Gesture::Right || !self.is_open() {
            return false;
        }
        debug!("Picker dismissed by swipe");
        self.close(ui);
        true
    }

    /// Remove the widgets and the gesture listener. Safe to call repeatedly;
    /// only the first call releases anything.
    pub fn close<U>(&mut self, ui: &mut U)
    where
        U: UiSurface<Handle = H>,
    {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = ui.remove(handle) {
            warn!("Failed to remove language picker: {}", e);
        }
        ui.unregister_gesture();
    }
}

impl<H> Drop for PickerSession<H> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            warn!("Language picker dropped while open; its widgets and gesture listener leak");
        }
    }
}
