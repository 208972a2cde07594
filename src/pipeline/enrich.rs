//! TV override loading and merging.
//!
//! Broadcast data from the fixture API is patchy, so a hand-maintained
//! override document corrects it per fixture. Overrides are loaded fresh on
//! every build and applied field-by-field before anything reaches the cache.
//!
//! Override keys must be built exactly like `Fixture::id` /
//! `Fixture::date_key()`; the merger looks entries up through those same
//! accessors, so the key construction lives in one place.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Fixture;

/// Correction fields for a single fixture. All fields are optional so an
/// entry can correct the broadcaster without restating anything else.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OverrideFields {
    /// Broadcaster name
    #[serde(default)]
    pub tv: Option<String>,

    /// Confirmed-broadcast flag
    #[serde(default)]
    pub televised: Option<bool>,
}

impl OverrideFields {
    pub fn is_empty(&self) -> bool {
        self.tv.is_none() && self.televised.is_none()
    }
}

/// Overrides indexed by fixture identity key (id or `"YYYY-MM-DD:home:away"`).
pub type OverrideMap = HashMap<String, OverrideFields>;

/// Load the override document.
///
/// A missing file is not an error and yields an empty map. Malformed
/// entries are skipped individually with a warning; only an unreadable or
/// syntactically broken document fails the load.
pub fn load_overrides(path: &Path) -> Result<OverrideMap> {
    if !path.exists() {
        log::info!("No override file at {}", path.display());
        return Ok(OverrideMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    let document: toml::Value = toml::from_str(&content)?;

    let mut overrides = OverrideMap::new();
    let Some(entries) = document.get("fixtures").and_then(|v| v.as_table()) else {
        log::warn!(
            "Override file {} has no [fixtures] table",
            path.display()
        );
        return Ok(overrides);
    };

    for (key, value) in entries {
        if key.trim().is_empty() {
            log::warn!("Skipping override entry with blank fixture key");
            continue;
        }
        match value.clone().try_into::<OverrideFields>() {
            Ok(fields) if fields.is_empty() => {
                log::warn!("Skipping override for '{key}': no correction fields");
            }
            Ok(fields) => {
                overrides.insert(key.clone(), fields);
            }
            Err(e) => {
                log::warn!("Skipping malformed override for '{key}': {e}");
            }
        }
    }

    log::info!(
        "Loaded {} override(s) from {}",
        overrides.len(),
        path.display()
    );
    Ok(overrides)
}

/// Apply overrides onto freshly fetched fixtures.
///
/// Pure: the input slice is untouched and ordering is preserved. Lookup is
/// by provider id first, then by the date composite key. Override fields
/// win field-by-field; fixtures without a matching entry pass through
/// unchanged.
pub fn apply_overrides(fixtures: &[Fixture], overrides: &OverrideMap) -> Vec<Fixture> {
    fixtures
        .iter()
        .map(|fixture| {
            let entry = overrides
                .get(&fixture.id)
                .or_else(|| fixture.date_key().and_then(|k| overrides.get(&k)));

            let Some(fields) = entry else {
                return fixture.clone();
            };

            let mut merged = fixture.clone();
            if let Some(tv) = &fields.tv {
                merged.tv = Some(tv.clone());
            }
            if let Some(televised) = fields.televised {
                merged.televised = televised;
            }
            log::debug!("Applied TV override for fixture {}", fixture.id);
            merged
        })
        .collect()
}
