//! Server reply to a submitted credential.

use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ServerReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerReply {
    /// Redirect target of a successful ceremony, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.redirect
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_with_redirect() {
        let reply: ServerReply =
            serde_json::from_str(r#"{"success": true, "redirect": "/done"}"#).unwrap();
        assert_eq!(reply.redirect_target(), Some("/done"));
    }

    #[test]
    fn failure_never_redirects() {
        let reply: ServerReply = serde_json::from_str(
            r#"{"success": false, "redirect": "/done", "error": "invalid-signature"}"#,
        )
        .unwrap();
        assert_eq!(reply.redirect_target(), None);
        assert_eq!(reply.error.as_deref(), Some("invalid-signature"));
    }

    #[test]
    fn success_without_redirect_has_no_target() {
        let reply: ServerReply = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(reply.redirect_target(), None);

        let reply: ServerReply =
            serde_json::from_str(r#"{"success": true, "redirect": ""}"#).unwrap();
        assert_eq!(reply.redirect_target(), None);
    }

    #[test]
    fn missing_fields_default() {
        let reply: ServerReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply, ServerReply::default());
    }
}
