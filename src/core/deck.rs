//! Deck name → binary suffix table.
//!
//! The suffix is the tail of the captured request body. Its layout is
//! `0x1A <len> 0x08 varint(notetype_id) 0x10 varint(deck_id)`; the built-in
//! entries are kept as raw bytes so they match the captured traffic exactly.

use crate::core::encoding::write_varint;
use std::borrow::Cow;

pub const DEFAULT_DECK: &str = "default";

/// Note type id every captured request carries ("Basic").
pub const DEFAULT_NOTETYPE_ID: u64 = 1_736_675_244_849;

const SUFFIX_TAG: u8 = 0x1A;
const NOTETYPE_TAG: u8 = 0x08;
const DECK_TAG: u8 = 0x10;

pub static BUILTIN_DECKS: &[(&str, &[u8])] = &[
    (DEFAULT_DECK, &[26, 9, 8, 177, 246, 164, 207, 197, 50, 16, 1]),
    ("test", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 200, 136, 203, 146, 205, 50]),
    ("life_tricks", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 178, 197, 246, 250, 215, 50]),
    ("ai_facts", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 162, 192, 203, 248, 209, 50]),
    ("general_facts", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 219, 129, 138, 146, 210, 50]),
    ("it", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 255, 146, 136, 170, 198, 50]),
    ("transformers", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 193, 251, 172, 215, 208, 50]),
    ("universe", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 249, 130, 170, 138, 198, 50]),
    ("words_in_english", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 223, 204, 141, 170, 198, 50]),
    ("words_in_romanian", &[26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 198, 151, 176, 130, 201, 50]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckFormat {
    name: Cow<'static, str>,
    suffix: Cow<'static, [u8]>,
}

impl DeckFormat {
    pub fn new(name: impl Into<String>, suffix: Vec<u8>) -> Self {
        Self {
            name: Cow::Owned(normalize(&name.into())),
            suffix: Cow::Owned(suffix),
        }
    }

    /// Builds the suffix for a deck known only by its ids.
    pub fn from_ids(name: impl Into<String>, notetype_id: u64, deck_id: u64) -> Self {
        let mut body = vec![NOTETYPE_TAG];
        write_varint(&mut body, notetype_id);
        body.push(DECK_TAG);
        write_varint(&mut body, deck_id);

        let mut suffix = vec![SUFFIX_TAG];
        write_varint(&mut suffix, body.len() as u64);
        suffix.extend_from_slice(&body);
        Self::new(name, suffix)
    }

    fn builtin(name: &'static str, suffix: &'static [u8]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            suffix: Cow::Borrowed(suffix),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> &[u8] {
        &self.suffix
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Known decks, in listing order. Always holds a `default` entry.
#[derive(Debug, Clone)]
pub struct DeckRegistry {
    decks: Vec<DeckFormat>,
}

impl Default for DeckRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DeckRegistry {
    pub fn builtin() -> Self {
        let decks = BUILTIN_DECKS
            .iter()
            .map(|&(name, suffix)| DeckFormat::builtin(name, suffix))
            .collect();
        Self { decks }
    }

    /// Adds a deck, replacing any existing entry with the same name.
    pub fn register(&mut self, format: DeckFormat) {
        match self.decks.iter_mut().find(|d| d.name == format.name) {
            Some(existing) => {
                tracing::info!("Replacing suffix for deck '{}'", format.name);
                *existing = format;
            }
            None => {
                tracing::debug!("Registered deck '{}'", format.name);
                self.decks.push(format);
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&DeckFormat> {
        let key = normalize(name);
        self.decks.iter().find(|d| d.name == key)
    }

    pub fn default_deck(&self) -> &DeckFormat {
        // builtin() puts the default first; register() only replaces in place
        &self.decks[0]
    }

    /// Looks a deck up, falling back to the default suffix for unknown names.
    pub fn resolve(&self, name: &str) -> &DeckFormat {
        match self.lookup(name) {
            Some(deck) => deck,
            None => {
                tracing::warn!("⚠️ Unknown deck '{}', using default deck format", name);
                self.default_deck()
            }
        }
    }

    pub fn list_names(&self) -> Vec<String> {
        self.decks.iter().map(|d| d.name.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}
