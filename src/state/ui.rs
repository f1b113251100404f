//! Editor UI state: erase mode and the global flower size.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use tracing::debug;

use crate::render::DEFAULT_FLOWER_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorUi {
    erasing: bool,
    flower_size: f64,
}

impl Default for EditorUi {
    fn default() -> Self {
        Self::new(DEFAULT_FLOWER_SIZE)
    }
}

impl EditorUi {
    /// Start out of erase mode at `flower_size`, falling back to the
    /// default size when it is unusable.
    #[must_use]
    pub fn new(flower_size: f64) -> Self {
        let mut ui = Self { erasing: false, flower_size: DEFAULT_FLOWER_SIZE };
        ui.set_flower_size(flower_size);
        ui
    }

    #[must_use]
    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    #[must_use]
    pub fn flower_size(&self) -> f64 {
        self.flower_size
    }

    /// Flip erase mode and return the new value.
    pub fn toggle_erasing(&mut self) -> bool {
        self.erasing = !self.erasing;
        self.erasing
    }

    pub fn set_erasing(&mut self, erasing: bool) {
        self.erasing = erasing;
    }

    /// Returns `false` and keeps the old size for non-finite or non-positive
    /// values.
    pub fn set_flower_size(&mut self, size: f64) -> bool {
        if !size.is_finite() || size <= 0.0 {
            debug!(size, "ignoring invalid flower size");
            return false;
        }
        self.flower_size = size;
        true
    }
}
