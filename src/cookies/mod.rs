//! Reads AnkiWeb session cookies out of a local browser profile.
//!
//! Firefox keeps plain values in `cookies.sqlite` (`moz_cookies`). Chrome and
//! Edge use a `Cookies` database whose values are usually encrypted with an
//! OS key; those are reported as [`ENCRYPTED_PLACEHOLDER`].

use crate::utils::error::{BridgeError, Result};
use rusqlite::{params, Connection};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ANKI_HOST_PATTERNS: [&str; 2] = ["%ankiweb.net%", "%ankiuser.net%"];
pub const ENCRYPTED_PLACEHOLDER: &str = "<encrypted>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
        };
        f.write_str(name)
    }
}

impl FromStr for Browser {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chrome" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "edge" => Ok(Browser::Edge),
            other => Err(BridgeError::InvalidConfigValueError {
                field: "browser".to_string(),
                value: other.to_string(),
                reason: "Supported browsers: chrome, firefox, edge".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub encrypted: bool,
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

fn env_dir(key: &str) -> Option<PathBuf> {
    std::env::var_os(key).map(PathBuf::from)
}

/// Candidate database locations for the current OS, most likely first.
pub fn candidate_cookie_paths(browser: Browser) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    let chromium_profile = |vendor: &[&str]| -> Option<PathBuf> {
        let base = if cfg!(target_os = "windows") {
            let mut p = env_dir("LOCALAPPDATA")?;
            p.extend(vendor);
            p.push("User Data");
            p
        } else if cfg!(target_os = "macos") {
            let mut p = home_dir()?.join("Library").join("Application Support");
            p.extend(vendor);
            p
        } else {
            let mut p = home_dir()?.join(".config");
            p.push(vendor.join("-").to_lowercase());
            p
        };
        Some(base.join("Default"))
    };

    match browser {
        Browser::Chrome | Browser::Edge => {
            let vendor: &[&str] = if browser == Browser::Chrome {
                &["Google", "Chrome"]
            } else if cfg!(target_os = "macos") {
                &["Microsoft Edge"]
            } else {
                &["Microsoft", "Edge"]
            };
            if let Some(profile) = chromium_profile(vendor) {
                candidates.push(profile.join("Network").join("Cookies"));
                candidates.push(profile.join("Cookies"));
            }
        }
        Browser::Firefox => {
            let profiles = if cfg!(target_os = "windows") {
                env_dir("APPDATA").map(|p| p.join("Mozilla").join("Firefox").join("Profiles"))
            } else if cfg!(target_os = "macos") {
                home_dir().map(|p| {
                    p.join("Library")
                        .join("Application Support")
                        .join("Firefox")
                        .join("Profiles")
                })
            } else {
                home_dir().map(|p| p.join(".mozilla").join("firefox"))
            };
            if let Some(profile) = profiles.as_deref().and_then(find_firefox_profile) {
                candidates.push(profile.join("cookies.sqlite"));
            }
        }
    }

    candidates
}

/// Picks the default Firefox profile folder (`*.default`, then `*default*`).
pub fn find_firefox_profile(profiles_dir: &Path) -> Option<PathBuf> {
    let mut folders: Vec<PathBuf> = std::fs::read_dir(profiles_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let name_of = |p: &PathBuf| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    };

    folders
        .iter()
        .find(|p| name_of(p).ends_with(".default"))
        .or_else(|| folders.iter().find(|p| name_of(p).contains("default")))
        .cloned()
}

pub fn locate_cookie_db(browser: Browser) -> Result<PathBuf> {
    let candidates = candidate_cookie_paths(browser);
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| BridgeError::CookieNotFound {
            browser: browser.to_string(),
            reason: if candidates.is_empty() {
                "could not determine the profile directory".to_string()
            } else {
                format!(
                    "no cookie database at {}",
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(" or ")
                )
            },
        })
}

/// Reads the AnkiWeb cookies from a copy of `db_path`; the browser may hold
/// a lock on the original.
pub fn read_cookie_db(browser: Browser, db_path: &Path) -> Result<Vec<StoredCookie>> {
    let scratch = tempfile::Builder::new()
        .prefix("ankiweb-cookies")
        .tempdir()?;
    let copy = scratch.path().join("cookies.sqlite");
    std::fs::copy(db_path, &copy)?;

    // recent writes may still sit in the write-ahead log
    let mut wal = db_path.as_os_str().to_owned();
    wal.push("-wal");
    let wal = PathBuf::from(wal);
    if wal.is_file() {
        std::fs::copy(&wal, scratch.path().join("cookies.sqlite-wal"))?;
    }

    tracing::debug!("Reading {} cookies from {}", browser, db_path.display());
    let conn = Connection::open(&copy)?;

    let cookies = match browser {
        Browser::Firefox => {
            let mut stmt = conn.prepare(
                "SELECT name, value FROM moz_cookies WHERE host LIKE ?1 OR host LIKE ?2",
            )?;
            let rows = stmt.query_map(params![ANKI_HOST_PATTERNS[0], ANKI_HOST_PATTERNS[1]], |row| {
                Ok(StoredCookie {
                    name: row.get(0)?,
                    value: row.get(1)?,
                    encrypted: false,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        Browser::Chrome | Browser::Edge => {
            let mut stmt = conn.prepare(
                "SELECT name, value, encrypted_value FROM cookies \
                 WHERE host_key LIKE ?1 OR host_key LIKE ?2",
            )?;
            let rows = stmt.query_map(params![ANKI_HOST_PATTERNS[0], ANKI_HOST_PATTERNS[1]], |row| {
                let name: String = row.get(0)?;
                let value: String = row.get(1)?;
                let encrypted_value: Option<Vec<u8>> = row.get(2)?;
                let encrypted = value.is_empty()
                    && encrypted_value.map(|v| !v.is_empty()).unwrap_or(false);
                Ok(StoredCookie {
                    name,
                    value: if encrypted {
                        ENCRYPTED_PLACEHOLDER.to_string()
                    } else {
                        value
                    },
                    encrypted,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };

    Ok(cookies)
}

/// `name=value; name=value`, ready for a `Cookie` header.
pub fn format_cookie_header(cookies: &[StoredCookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Locates (unless `db_path` is given), reads and formats the AnkiWeb cookie.
pub fn extract_anki_cookie(browser: Browser, db_path: Option<&Path>) -> Result<String> {
    let path = match db_path {
        Some(p) => p.to_path_buf(),
        None => locate_cookie_db(browser)?,
    };

    if !path.is_file() {
        return Err(BridgeError::CookieNotFound {
            browser: browser.to_string(),
            reason: format!("no cookie database at {}", path.display()),
        });
    }

    let cookies = read_cookie_db(browser, &path)?;
    if cookies.is_empty() {
        return Err(BridgeError::CookieNotFound {
            browser: browser.to_string(),
            reason: "make sure you're logged into AnkiWeb".to_string(),
        });
    }

    let encrypted = cookies.iter().filter(|c| c.encrypted).count();
    if encrypted > 0 {
        tracing::warn!(
            "⚠️ {} of {} cookies are encrypted by {}; copy their values from the developer tools",
            encrypted,
            cookies.len(),
            browser
        );
    }

    Ok(format_cookie_header(&cookies))
}

/// Writes a single `ANKI_COOKIE="..."` line, the format the server reads from `.env`.
pub fn write_env_file(path: &Path, cookie: &str) -> Result<()> {
    std::fs::write(path, env_line(cookie))?;
    Ok(())
}

pub fn env_line(cookie: &str) -> String {
    format!("ANKI_COOKIE=\"{}\"", cookie)
}
