//! Profile photo field: either the current photo with a delete icon, or a
//! placeholder. Deleting ticks a hidden checkbox submitted with the form;
//! picking a file previews it and unticks it.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoState {
    /// Marked for deletion; the placeholder shows.
    Removed,
    /// A freshly picked file is previewed.
    Previewing,
}

impl PhotoState {
    /// State after the file input changed. Clearing the picker changes nothing.
    #[must_use]
    pub fn after_change(has_file: bool) -> Option<Self> {
        has_file.then_some(Self::Previewing)
    }

    #[must_use]
    pub fn content_visible(self) -> bool {
        matches!(self, Self::Previewing)
    }

    #[must_use]
    pub fn placeholder_visible(self) -> bool {
        !self.content_visible()
    }

    /// Checked state of the delete checkbox.
    #[must_use]
    pub fn delete_checked(self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Whether the file input is emptied.
    #[must_use]
    pub fn clears_field(self) -> bool {
        matches!(self, Self::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_shows_placeholder_and_marks_deletion() {
        let state = PhotoState::Removed;
        assert!(!state.content_visible());
        assert!(state.placeholder_visible());
        assert!(state.delete_checked());
        assert!(state.clears_field());
    }

    #[test]
    fn picking_a_file_previews_it() {
        let state = PhotoState::after_change(true).unwrap();
        assert_eq!(state, PhotoState::Previewing);
        assert!(state.content_visible());
        assert!(!state.placeholder_visible());
        assert!(!state.delete_checked());
        assert!(!state.clears_field());
    }

    #[test]
    fn cancelled_picker_keeps_state() {
        assert_eq!(PhotoState::after_change(false), None);
    }
}
