use std::collections::{HashMap, HashSet};
use std::fs;

use serde::Deserialize;

use crate::error::{Result, ScrapeError};

/// One registered cosmetic form of a base species.
#[derive(Debug, Clone, Deserialize)]
pub struct FormSpec {
    /// Canonical identity for the expanded record.
    pub name: String,
    /// In-page ability section label used to pick up form-specific abilities.
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct RawForm {
    base: String,
    name: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    excluded: Vec<String>,
    #[serde(default, rename = "form")]
    forms: Vec<RawForm>,
}

/// Process-wide, read-only pipeline configuration: the curated alias table,
/// the cosmetic-form registry, and the non-standalone exclusion list.
/// Loaded once at startup; the pipeline never mutates it.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    aliases: HashMap<String, String>,
    forms: HashMap<String, Vec<FormSpec>>,
    excluded: HashSet<String>,
}

impl PipelineConfig {
    /// Load configuration from a TOML file on disk.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// The configuration compiled into the binary. Used when no override file
    /// is supplied.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(include_str!("../config/pipeline.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut forms: HashMap<String, Vec<FormSpec>> = HashMap::new();
        for form in raw.forms {
            forms.entry(form.base).or_default().push(FormSpec {
                name: form.name,
                label: form.label,
            });
        }
        Ok(Self {
            aliases: raw.aliases,
            forms,
            excluded: raw.excluded.into_iter().collect(),
        })
    }

    /// Exact-match alias lookup on the full raw display name.
    pub fn alias_for(&self, raw_name: &str) -> Option<&str> {
        self.aliases.get(raw_name).map(|s| s.as_str())
    }

    /// Registered cosmetic forms for a base name, in registry order.
    pub fn forms_for(&self, base_name: &str) -> Option<&[FormSpec]> {
        self.forms.get(base_name).map(|f| f.as_slice())
    }

    /// Whether an identity is a battle-transformation-only state that must
    /// not appear as a standalone record.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }
}
