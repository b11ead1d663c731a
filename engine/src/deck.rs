//! Deck files.
//!
//! ```toml
//! [[item]]
//! id = "hive-1"
//! image = "hives/1.jpg"
//! label = "healthy"
//! caption = "Busy frames, capped brood"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use hivecheck_types::Item;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse deck: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("deck contains no items")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default, rename = "item")]
    items: Vec<Item>,
}

pub fn parse_deck(raw: &str) -> Result<Vec<Item>, DeckError> {
    let deck: DeckFile = toml::from_str(raw)?;
    if deck.items.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(deck.items)
}

pub fn load_deck(path: &Path) -> Result<Vec<Item>, DeckError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_deck(&raw)?;
    tracing::info!(path = %path.display(), items = items.len(), "Deck loaded");
    Ok(items)
}
