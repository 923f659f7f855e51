//! Element ids, classes and timeouts with build-time defaults and an optional
//! runtime override. The runtime config is read from
//! `window.WEBAUTHN_BRIDGE_CONFIG` (if present) so templates can rename
//! elements without rebuilding the module. Values are public markup names;
//! do not store secrets here.

use tracing::Level;

/// Name of the global object holding runtime overrides.
pub const RUNTIME_CONFIG_KEY: &str = "WEBAUTHN_BRIDGE_CONFIG";
/// Default request timeout (milliseconds) for the credential submission.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub register_button_id: String,
    pub authenticate_button_id: String,
    pub options_input_id: String,
    pub message_id: String,
    pub error_id: String,
    pub error_message_id: String,
    pub error_class: String,
    pub hidden_class: String,
    pub busy_class: String,
    pub request_timeout_ms: u32,
    /// `tracing` filter directive, e.g. `warn` or `webauthn_bridge=debug`.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            register_button_id: "webauthn-register".to_string(),
            authenticate_button_id: "webauthn-authenticate".to_string(),
            options_input_id: "webauthn-options".to_string(),
            message_id: "webauthn-message".to_string(),
            error_id: "webauthn-error".to_string(),
            error_message_id: "webauthn-error-message".to_string(),
            error_class: "error-message".to_string(),
            hidden_class: "hidden".to_string(),
            busy_class: "loading".to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            log_filter: option_env!("WEBAUTHN_BRIDGE_LOG").unwrap_or("warn").to_string(),
        }
    }
}

impl BridgeConfig {
    /// Loads the defaults and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Most verbose level enabled by the filter, used as the default directive.
    #[must_use]
    pub fn log_level(&self) -> Level {
        self.log_filter
            .split(',')
            .filter_map(|directive| directive.rsplit('=').next())
            .filter_map(parse_log_level)
            .max()
            .unwrap_or(Level::WARN)
    }
}

/// Accepts `error|warn|info|debug|trace` or `0..=4`.
#[must_use]
pub fn parse_log_level(level: &str) -> Option<Level> {
    let level = level.trim();
    if let Ok(parsed) = level.parse::<u8>() {
        return match parsed {
            0 => Some(Level::ERROR),
            1 => Some(Level::WARN),
            2 => Some(Level::INFO),
            3 => Some(Level::DEBUG),
            4 => Some(Level::TRACE),
            _ => None,
        };
    }

    match level.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Default)]
struct RuntimeConfig {
    register_button_id: Option<String>,
    authenticate_button_id: Option<String>,
    options_input_id: Option<String>,
    message_id: Option<String>,
    error_id: Option<String>,
    error_message_id: Option<String>,
    error_class: Option<String>,
    hidden_class: Option<String>,
    busy_class: Option<String>,
    request_timeout_ms: Option<String>,
    log_filter: Option<String>,
}

fn apply_runtime_overrides(config: &mut BridgeConfig, runtime: RuntimeConfig) {
    let overrides = [
        (&mut config.register_button_id, runtime.register_button_id),
        (&mut config.authenticate_button_id, runtime.authenticate_button_id),
        (&mut config.options_input_id, runtime.options_input_id),
        (&mut config.message_id, runtime.message_id),
        (&mut config.error_id, runtime.error_id),
        (&mut config.error_message_id, runtime.error_message_id),
        (&mut config.error_class, runtime.error_class),
        (&mut config.hidden_class, runtime.hidden_class),
        (&mut config.busy_class, runtime.busy_class),
        (&mut config.log_filter, runtime.log_filter),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }

    if let Some(timeout) = runtime
        .request_timeout_ms
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
    {
        config.request_timeout_ms = timeout;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_KEY)).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        register_button_id: read_runtime_value(&object, "register_button_id"),
        authenticate_button_id: read_runtime_value(&object, "authenticate_button_id"),
        options_input_id: read_runtime_value(&object, "options_input_id"),
        message_id: read_runtime_value(&object, "message_id"),
        error_id: read_runtime_value(&object, "error_id"),
        error_message_id: read_runtime_value(&object, "error_message_id"),
        error_class: read_runtime_value(&object, "error_class"),
        hidden_class: read_runtime_value(&object, "hidden_class"),
        busy_class: read_runtime_value(&object, "busy_class"),
        request_timeout_ms: read_runtime_value(&object, "request_timeout_ms"),
        log_filter: read_runtime_value(&object, "log_filter"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

// Numbers are accepted too so `request_timeout_ms: 5000` works unquoted.
#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key)).ok()?;
    let value = value
        .as_string()
        .or_else(|| value.as_f64().map(|number| format!("{number}")))?;
    normalize_runtime_value(&value)
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        apply_runtime_overrides, normalize_runtime_value, parse_log_level, BridgeConfig,
        RuntimeConfig, DEFAULT_TIMEOUT_MS,
    };
    use tracing::Level;

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  passkey-login "),
            Some("passkey-login".to_string())
        );
    }

    #[test]
    fn load_without_runtime_object_uses_defaults() {
        let config = BridgeConfig::load();
        assert_eq!(config.register_button_id, "webauthn-register");
        assert_eq!(config.authenticate_button_id, "webauthn-authenticate");
        assert_eq!(config.options_input_id, "webauthn-options");
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = BridgeConfig::default();
        let runtime = RuntimeConfig {
            register_button_id: normalize_runtime_value(""),
            error_class: normalize_runtime_value("  "),
            request_timeout_ms: normalize_runtime_value(""),
            ..RuntimeConfig::default()
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = BridgeConfig::default();
        let runtime = RuntimeConfig {
            register_button_id: normalize_runtime_value("passkey-add"),
            busy_class: normalize_runtime_value("busy"),
            request_timeout_ms: normalize_runtime_value("2500"),
            log_filter: normalize_runtime_value("debug"),
            ..RuntimeConfig::default()
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.register_button_id, "passkey-add");
        assert_eq!(config.busy_class, "busy");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.authenticate_button_id, "webauthn-authenticate");
    }

    #[test]
    fn invalid_timeouts_are_ignored() {
        let mut config = BridgeConfig::default();
        for value in ["0", "-1", "soon"] {
            let runtime = RuntimeConfig {
                request_timeout_ms: normalize_runtime_value(value),
                ..RuntimeConfig::default()
            };
            apply_runtime_overrides(&mut config, runtime);
        }
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn log_levels_accept_names_and_numbers() {
        assert_eq!(parse_log_level("error"), Some(Level::ERROR));
        assert_eq!(parse_log_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_log_level("2"), Some(Level::INFO));
        assert_eq!(parse_log_level("4"), Some(Level::TRACE));
        assert_eq!(parse_log_level("5"), None);
        assert_eq!(parse_log_level("loud"), None);
    }

    #[test]
    fn log_level_takes_most_verbose_directive() {
        let config = BridgeConfig {
            log_filter: "warn,webauthn_bridge=debug".to_string(),
            ..BridgeConfig::default()
        };
        assert_eq!(config.log_level(), Level::DEBUG);

        let config = BridgeConfig {
            log_filter: "nonsense".to_string(),
            ..BridgeConfig::default()
        };
        assert_eq!(config.log_level(), Level::WARN);
    }
}
