//! htmx drops 4xx/5xx responses by default. The server renders its error
//! pages to be shown, so they are swapped in like any other response.

/// Whether a response with this status is swapped in despite the error.
#[must_use]
pub fn forces_error_swap(status: f64) -> bool {
    status >= 400.0
}

#[cfg(test)]
mod tests {
    use super::forces_error_swap;

    #[test]
    fn client_and_server_errors_are_swapped() {
        assert!(forces_error_swap(400.0));
        assert!(forces_error_swap(404.0));
        assert!(forces_error_swap(500.0));
    }

    #[test]
    fn other_statuses_keep_default_handling() {
        assert!(!forces_error_swap(200.0));
        assert!(!forces_error_swap(302.0));
        // network failure
        assert!(!forces_error_swap(0.0));
    }
}
