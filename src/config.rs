//! Static gateway configuration.
//!
//! Loaded once at startup and never re-validated per request.

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings of the entry-flow decision core.
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use sso_entry::GatewayConfig;
///
/// let config = GatewayConfig::from_json(r#"{ "enable_flow_on_absent_service": false }"#)
///     .expect("valid config");
///
/// assert!(config.require_service_present());
/// assert_eq!(config.ticket_cookie_name, "CASTGC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Allow the flow to continue when the request names no service.
    pub enable_flow_on_absent_service: bool,
    /// Query parameter that switches the request into the user-info edit flow.
    /// Also used as the flow-scope key of the edit-mode marker.
    pub edit_mode_parameter: String,
    /// Flow-scope key under which the edit flow's originating HTTP method is kept.
    pub edit_mode_method_key: String,
    /// Name of the ticket-granting session cookie.
    pub ticket_cookie_name: String,
    /// Name of the "warn before redirect" cookie.
    pub warn_cookie_name: String,
    /// Request parameters tried, in order, when no explicit extractors are given.
    pub service_parameters: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enable_flow_on_absent_service: true,
            edit_mode_parameter: "userinfo_edit".to_string(),
            edit_mode_method_key: "userinfo_edit_request_method".to_string(),
            ticket_cookie_name: "CASTGC".to_string(),
            warn_cookie_name: "CASPRIVACY".to_string(),
            service_parameters: vec!["service".to_string()],
        }
    }
}

impl GatewayConfig {
    /// Parses a JSON configuration document and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for malformed documents and the
    /// errors of [`validate`](Self::validate) otherwise.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether an absent service aborts the flow.
    ///
    /// This is the inverse of `enable_flow_on_absent_service`.
    pub fn require_service_present(&self) -> bool {
        !self.enable_flow_on_absent_service
    }

    /// Checks that every name the flow relies on is non-blank.
    ///
    /// An empty `service_parameters` list is accepted here; whether the
    /// extractor chain ends up empty is decided when the engine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("edit_mode_parameter", &self.edit_mode_parameter),
            ("edit_mode_method_key", &self.edit_mode_method_key),
            ("ticket_cookie_name", &self.ticket_cookie_name),
            ("warn_cookie_name", &self.warn_cookie_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::BlankSetting(name));
            }
        }
        if self.service_parameters.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::BlankSetting("service_parameters"));
        }
        Ok(())
    }
}
