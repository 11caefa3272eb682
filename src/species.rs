//! Species lookup tables
//!
//! Maps species directory names to dex numbers and follower form suffixes,
//! and lists the species that need special handling. A table is plain TOML:
//!
//! ```toml
//! mirror_exclusions = ["smeargle"]
//! single_frame_icons = ["egg", "krabby"]
//!
//! [forms]
//! unown_b = "-1"
//!
//! [dex]
//! unown = 201
//! unown_b = 1001
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dex numbers from here on denote alternate forms of an earlier species.
pub const FORM_DEX_THRESHOLD: u32 = 649;

const BUILTIN_TABLE: &str = include_str!("../resources/species.toml");

/// Error while loading or querying a species table
#[derive(Debug, Error)]
pub enum SpeciesError {
    /// Table file could not be read
    #[error("failed to read species table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Table is not valid TOML or has the wrong shape
    #[error("failed to parse species table: {0}")]
    Parse(#[from] toml::de::Error),
    /// Key has no dex number
    #[error("no dex number for species '{0}'")]
    UnknownSpecies(String),
}

/// Static per-species data used to name and special-case outputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesTable {
    #[serde(default)]
    dex: HashMap<String, u32>,
    #[serde(default)]
    forms: HashMap<String, String>,
    #[serde(default)]
    mirror_exclusions: HashSet<String>,
    #[serde(default)]
    single_frame_icons: HashSet<String>,
}

impl SpeciesTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self, SpeciesError> {
        Self::parse(BUILTIN_TABLE)
    }

    /// Parse a table from TOML text.
    pub fn parse(text: &str) -> Result<Self, SpeciesError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SpeciesError> {
        let text = fs::read_to_string(path)
            .map_err(|source| SpeciesError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Dex number of a species.
    pub fn dex(&self, key: &str) -> Result<u32, SpeciesError> {
        self.dex
            .get(key)
            .copied()
            .ok_or_else(|| SpeciesError::UnknownSpecies(key.to_string()))
    }

    /// Dex number used for follower sprites.
    ///
    /// Alternate forms (dex at or above [`FORM_DEX_THRESHOLD`]) share the
    /// number of their base species, found by cutting the key at the first
    /// underscore.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexsprite::species::SpeciesTable;
    ///
    /// let table = SpeciesTable::parse("[dex]\nunown = 201\nunown_b = 1001\n").unwrap();
    /// assert_eq!(table.follower_dex("unown_b").unwrap(), 201);
    /// assert_eq!(table.follower_dex("unown").unwrap(), 201);
    /// ```
    pub fn follower_dex(&self, key: &str) -> Result<u32, SpeciesError> {
        let dex = self.dex(key)?;
        if dex < FORM_DEX_THRESHOLD {
            return Ok(dex);
        }
        let base = key.split('_').next().unwrap_or(key);
        self.dex(base)
    }

    /// Follower file name suffix of a form, empty for regular species.
    pub fn form_suffix(&self, key: &str) -> &str {
        self.forms.get(key).map(String::as_str).unwrap_or("")
    }

    /// Whether the overworld frames of a species skip mirror correction.
    pub fn is_mirror_excluded(&self, key: &str) -> bool {
        self.mirror_exclusions.contains(key)
    }

    /// Whether the icon of a species comes from the first frame.
    pub fn is_single_frame_icon(&self, key: &str) -> bool {
        self.single_frame_icons.contains(key)
    }

    /// Number of species with a dex number.
    pub fn len(&self) -> usize {
        self.dex.len()
    }

    /// Whether the table has no dex entries.
    pub fn is_empty(&self) -> bool {
        self.dex.is_empty()
    }
}
