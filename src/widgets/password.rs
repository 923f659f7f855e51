/// Visibility state of a password input, read from its `type` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordVisibility {
    Hidden,
    Shown,
}

impl PasswordVisibility {
    #[must_use]
    pub fn from_input_type(input_type: &str) -> Self {
        if input_type.eq_ignore_ascii_case("password") {
            Self::Hidden
        } else {
            Self::Shown
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    #[must_use]
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Hidden => "password",
            Self::Shown => "text",
        }
    }

    /// Icon classes to add and to remove for this state.
    #[must_use]
    pub fn icon_classes(self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Self::Hidden => (&["eye"], &["slash"]),
            Self::Shown => (&["eye", "slash"], &[]),
        }
    }
}

/// Keyboard activation of the toggle icon: Enter or Space.
#[must_use]
pub fn toggle_activates(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}
