#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::deck::{DeckFormat, DeckRegistry};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_delay, validate_non_empty_string, validate_range, validate_required_field,
    validate_url, Validate,
};
use std::time::Duration;
use toml_config::{is_unresolved_placeholder, FileConfig};

pub const DEFAULT_ENDPOINT: &str = "https://ankiuser.net/svc/editor/add-or-update";
pub const DEFAULT_ORIGIN: &str = "https://ankiuser.net";
pub const DEFAULT_REFERER: &str = "https://ankiuser.net/add";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DELAY_SECONDS: f64 = 1.0;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Values given on the command line or through the environment.
/// Anything left `None` falls back to the config file, then to the defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cookie: Option<String>,
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub origin: Option<String>,
    pub referer: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub default_delay: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub endpoint: String,
    pub cookie: String,
    pub user_agent: String,
    pub origin: String,
    pub referer: String,
    pub timeout: Duration,
}

impl ConfigProvider for UpstreamSettings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn cookie(&self) -> &str {
        &self.cookie
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn referer(&self) -> &str {
        &self.referer
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }
}

impl Validate for UpstreamSettings {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_url("origin", &self.origin)?;
        validate_url("referer", &self.referer)?;
        validate_non_empty_string("cookie", &self.cookie)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_range("timeout_seconds", self.timeout.as_secs(), 1, 600)?;
        Ok(())
    }
}

impl UpstreamSettings {
    pub fn resolve(overrides: &Overrides, file: &FileConfig) -> Result<Self> {
        let section = &file.ankiweb;
        let cookie = pick(overrides.cookie.clone(), section.cookie.clone());

        Ok(Self {
            endpoint: pick(overrides.endpoint.clone(), section.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            cookie: validate_required_field("cookie (ANKI_COOKIE)", &cookie)?.clone(),
            user_agent: pick(overrides.user_agent.clone(), section.user_agent.clone())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            origin: pick(overrides.origin.clone(), section.origin.clone())
                .unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            referer: pick(overrides.referer.clone(), section.referer.clone())
                .unwrap_or_else(|| DEFAULT_REFERER.to_string()),
            timeout: Duration::from_secs(
                overrides
                    .timeout_seconds
                    .or(section.timeout_seconds)
                    .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ),
        })
    }
}

/// First non-empty value that is not an unresolved `${VAR}` placeholder.
fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty() && !is_unresolved_placeholder(v))
}

/// Everything the REST façade needs, after merging all sources.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub upstream: UpstreamSettings,
    pub host: String,
    pub port: u16,
    pub default_delay: f64,
    pub extra_decks: Vec<DeckFormat>,
}

impl BridgeSettings {
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let upstream = UpstreamSettings::resolve(&overrides, &file)?;

        Ok(Self {
            upstream,
            host: pick(overrides.host, file.server.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            default_delay: overrides
                .default_delay
                .or(file.server.default_delay_seconds)
                .unwrap_or(DEFAULT_DELAY_SECONDS),
            extra_decks: file.deck_formats()?,
        })
    }

    pub fn deck_registry(&self) -> DeckRegistry {
        registry_with(&self.extra_decks)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Built-in decks plus the given extras.
pub fn registry_with(extra_decks: &[DeckFormat]) -> DeckRegistry {
    let mut registry = DeckRegistry::builtin();
    for deck in extra_decks {
        registry.register(deck.clone());
    }
    registry
}

impl Validate for BridgeSettings {
    fn validate(&self) -> Result<()> {
        self.upstream.validate()?;
        validate_non_empty_string("host", &self.host)?;
        validate_range("port", self.port, 1, u16::MAX)?;
        validate_delay("default_delay", self.default_delay)?;

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BridgeError;

    fn with_cookie() -> Overrides {
        Overrides {
            cookie: Some("has_auth=1; ankiweb=token".to_string()),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_defaults_apply() {
        let settings = BridgeSettings::resolve(with_cookie(), None).unwrap();

        assert_eq!(settings.upstream.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.upstream.origin, DEFAULT_ORIGIN);
        assert_eq!(settings.upstream.referer, DEFAULT_REFERER);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.default_delay, DEFAULT_DELAY_SECONDS);
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_cookie_is_an_error() {
        let err = BridgeSettings::resolve(Overrides::default(), None).unwrap_err();
        assert!(matches!(err, BridgeError::MissingConfigError { .. }));
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = FileConfig::from_toml_str(
            r#"
[ankiweb]
cookie = "from_file=1"
endpoint = "http://file.example/add"

[server]
port = 9000
default_delay_seconds = 2.0
"#,
        )
        .unwrap();

        let overrides = Overrides {
            port: Some(9100),
            ..with_cookie()
        };
        let settings = BridgeSettings::resolve(overrides, Some(file)).unwrap();

        assert_eq!(settings.upstream.cookie, "has_auth=1; ankiweb=token");
        assert_eq!(settings.upstream.endpoint, "http://file.example/add");
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.default_delay, 2.0);
    }

    #[test]
    fn test_unresolved_file_cookie_counts_as_missing() {
        let file = FileConfig::from_toml_str(
            "[ankiweb]\ncookie = \"${ANKIWEB_BRIDGE_DEFINITELY_UNSET}\"\n",
        )
        .unwrap();
        let err = BridgeSettings::resolve(Overrides::default(), Some(file)).unwrap_err();
        assert!(matches!(err, BridgeError::MissingConfigError { .. }));
    }

    #[test]
    fn test_registry_includes_file_decks() {
        let file =
            FileConfig::from_toml_str("[[decks]]\nname = \"Spanish\"\ndeck_id = 7\n").unwrap();
        let settings = BridgeSettings::resolve(with_cookie(), Some(file)).unwrap();

        let registry = settings.deck_registry();
        assert!(registry.lookup("spanish").is_some());
        assert!(registry.lookup("default").is_some());
    }

    #[test]
    fn test_negative_delay_fails_validation() {
        let overrides = Overrides {
            default_delay: Some(-1.0),
            ..with_cookie()
        };
        let settings = BridgeSettings::resolve(overrides, None).unwrap();
        assert!(settings.validate().is_err());
    }
}
