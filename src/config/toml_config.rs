use crate::core::deck::{DeckFormat, DEFAULT_NOTETYPE_ID};
use crate::utils::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `bridge.toml` file.
///
/// ```toml
/// [ankiweb]
/// cookie = "${ANKI_COOKIE}"
///
/// [server]
/// port = 8000
/// default_delay_seconds = 1.5
///
/// [[decks]]
/// name = "spanish"
/// deck_id = 1741598597999
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub ankiweb: AnkiWebSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub decks: Vec<DeckEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnkiWebSection {
    pub endpoint: Option<String>,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
    pub origin: Option<String>,
    pub referer: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub default_delay_seconds: Option<f64>,
}

/// Extra deck, given either as the raw captured suffix or by its ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
    pub name: String,
    pub suffix: Option<Vec<u8>>,
    pub deck_id: Option<u64>,
    pub notetype_id: Option<u64>,
}

impl DeckEntry {
    pub fn to_format(&self) -> Result<DeckFormat> {
        if self.name.trim().is_empty() {
            return Err(BridgeError::ConfigValidationError {
                field: "decks.name".to_string(),
                message: "Deck name cannot be empty".to_string(),
            });
        }

        match (&self.suffix, self.deck_id) {
            (Some(suffix), None) if !suffix.is_empty() => {
                Ok(DeckFormat::new(self.name.clone(), suffix.clone()))
            }
            (None, Some(deck_id)) => Ok(DeckFormat::from_ids(
                self.name.clone(),
                self.notetype_id.unwrap_or(DEFAULT_NOTETYPE_ID),
                deck_id,
            )),
            _ => Err(BridgeError::ConfigValidationError {
                field: format!("decks.{}", self.name),
                message: "Set exactly one of `suffix` (non-empty) or `deck_id`".to_string(),
            }),
        }
    }
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BridgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數，例如 ${ANKI_COOKIE}；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BridgeError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn deck_formats(&self) -> Result<Vec<DeckFormat>> {
        self.decks.iter().map(DeckEntry::to_format).collect()
    }
}

/// True for a `${VAR}` placeholder whose variable was not set.
pub fn is_unresolved_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("${") && value.ends_with('}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = FileConfig::from_toml_str(
            r#"
[ankiweb]
endpoint = "http://localhost:9000/svc/editor/add-or-update"
cookie = "has_auth=1"
timeout_seconds = 5

[server]
port = 9100
default_delay_seconds = 0.5

[[decks]]
name = "spanish"
deck_id = 1

[[decks]]
name = "raw"
suffix = [26, 9, 8, 177, 246, 164, 207, 197, 50, 16, 1]
"#,
        )
        .unwrap();

        assert_eq!(config.ankiweb.cookie.as_deref(), Some("has_auth=1"));
        assert_eq!(config.server.port, Some(9100));
        assert_eq!(config.server.default_delay_seconds, Some(0.5));

        let decks = config.deck_formats().unwrap();
        assert_eq!(decks.len(), 2);
        // both spellings describe the builtin default suffix
        assert_eq!(decks[0].suffix(), decks[1].suffix());
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.decks.is_empty());
        assert!(config.ankiweb.endpoint.is_none());
    }

    #[test]
    fn test_deck_entry_needs_exactly_one_source() {
        let both = DeckEntry {
            name: "x".to_string(),
            suffix: Some(vec![1]),
            deck_id: Some(2),
            notetype_id: None,
        };
        assert!(both.to_format().is_err());

        let neither = DeckEntry {
            name: "x".to_string(),
            suffix: None,
            deck_id: None,
            notetype_id: None,
        };
        assert!(neither.to_format().is_err());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("ANKIWEB_BRIDGE_TEST_COOKIE", "has_auth=1; ankiweb=abc");
        let config = FileConfig::from_toml_str(
            r#"
[ankiweb]
cookie = "${ANKIWEB_BRIDGE_TEST_COOKIE}"
origin = "${ANKIWEB_BRIDGE_TEST_UNSET_VAR}"
"#,
        )
        .unwrap();

        assert_eq!(config.ankiweb.cookie.as_deref(), Some("has_auth=1; ankiweb=abc"));
        let origin = config.ankiweb.origin.unwrap();
        assert!(is_unresolved_placeholder(&origin));
    }

    #[test]
    fn test_invalid_toml() {
        let err = FileConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, BridgeError::ConfigValidationError { .. }));
    }
}
