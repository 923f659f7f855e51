//! The "resend code" button stays disabled for a server-chosen delay.

/// Icon classes while waiting.
pub const WAITING_ICON_CLASSES: [&str; 2] = ["hourglass", "half"];
/// Icon class once the button is usable.
pub const READY_ICON_CLASS: &str = "send";

/// Parses `data-delay` (seconds) into milliseconds.
///
/// Missing, non-numeric, zero or negative delays yield `None`: there is
/// nothing to wait for.
#[must_use]
pub fn resend_delay_ms(delay: Option<&str>) -> Option<u32> {
    let seconds = delay?.trim().parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis > f64::from(u32::MAX) {
        return Some(u32::MAX);
    }
    // range checked above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let millis = millis as u32;
    Some(millis)
}

/// Class changes applied to the resend icon when the delay expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResendIcon;

impl ResendIcon {
    #[must_use]
    pub fn remove() -> &'static [&'static str] {
        &WAITING_ICON_CLASSES
    }

    #[must_use]
    pub fn add() -> &'static str {
        READY_ICON_CLASS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_seconds_to_millis() {
        assert_eq!(resend_delay_ms(Some("30")), Some(30_000));
        assert_eq!(resend_delay_ms(Some(" 1.5 ")), Some(1_500));
    }

    #[test]
    fn absent_or_useless_delays_do_nothing() {
        assert_eq!(resend_delay_ms(None), None);
        assert_eq!(resend_delay_ms(Some("")), None);
        assert_eq!(resend_delay_ms(Some("0")), None);
        assert_eq!(resend_delay_ms(Some("-4")), None);
        assert_eq!(resend_delay_ms(Some("soon")), None);
        assert_eq!(resend_delay_ms(Some("NaN")), None);
    }

    #[test]
    fn icon_swaps_hourglass_for_send() {
        assert_eq!(ResendIcon::remove(), &["hourglass", "half"]);
        assert_eq!(ResendIcon::add(), "send");
    }
}
