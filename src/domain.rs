use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One row of the national-dex listing page.
///
/// The display name keeps the parenthetical form descriptor exactly as the
/// index shows it (e.g. `"Tatsugiri (Curly Form)"`); canonicalization happens
/// downstream in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexIndexEntry {
    pub image: String,
    pub dex_number: u32,
    pub name: String,
    pub types: Vec<String>,
    pub total: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_atk: u32,
    pub sp_def: u32,
    pub speed: u32,
}

/// A fully assembled output record. One per species identity; form expansion
/// may produce several records sharing a dex number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub image: String,
    pub dex_number: u32,
    /// Canonical, alias-resolved name. Unique across the output collection.
    pub name: String,
    pub types: Vec<String>,
    pub total: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_atk: u32,
    pub sp_def: u32,
    pub speed: u32,
    pub species: String,
    pub height: String,
    pub weight: String,
    pub abilities: Vec<String>,
    pub local_no: String,
    pub moves: BTreeMap<String, MoveEntry>,
    pub gender: Vec<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_at_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_name: Option<String>,
}

/// Merged cross-generation data for one move. The move name is the map key;
/// numeric fields keep whatever the earliest generation reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "type")]
    pub move_type: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    /// Learn level. Only meaningful for level-up moves; null otherwise.
    pub level: Option<u32>,
    /// Generations (1-9) in which the move is obtainable.
    pub generations: BTreeSet<u8>,
}

/// One catalog entry for an obtainable item, merged across the generation
/// indexes. The cleaned item name is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Sprite URL from the newest generation that lists the item.
    pub image: String,
    /// Generations (3-9) whose item index lists the item.
    pub generations: BTreeSet<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

impl Gender {
    /// Resolves a breeding-section gender description into a gender set.
    ///
    /// The set is either a subset of {Male, Female} or the singleton
    /// {Genderless}; a blank or unrecognized description counts as
    /// genderless. Text mentioning only "female" must not also yield Male.
    pub fn parse_set(text: &str) -> Vec<Gender> {
        let lower = text.to_lowercase();
        if lower.contains("genderless") {
            return vec![Gender::Genderless];
        }
        let mut genders = Vec::new();
        if lower.replace("female", "").contains("male") {
            genders.push(Gender::Male);
        }
        if lower.contains("female") {
            genders.push(Gender::Female);
        }
        if genders.is_empty() {
            return vec![Gender::Genderless];
        }
        genders
    }
}

/// A directed forward-evolution relation gathered while parsing the source
/// species' page. Consumed exactly once by the post-assembly linking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionEdge {
    /// Canonical name of the species the edge was parsed from.
    pub source: String,
    /// Target name exactly as written on the source's evolution panel.
    pub target: String,
    pub min_level: Option<u32>,
}
