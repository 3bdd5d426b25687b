use std::collections::BTreeMap;

use tracing::debug;

use crate::config::PipelineConfig;
use crate::domain::{DexIndexEntry, Gender, MoveEntry, SpeciesRecord};
use crate::fetch::SpeciesPage;
use crate::pipeline::forms::ResolvedIdentity;

/// Merges index fields, vitals, the resolved identity, and the move catalog
/// into one output record.
pub struct RecordAssembler<'a> {
    config: &'a PipelineConfig,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Build the final record for one identity, or `None` when the identity
    /// is a battle-only state excluded from standalone output.
    ///
    /// The identity's name is already alias-resolved; nothing downstream
    /// re-canonicalizes it.
    pub fn assemble(
        &self,
        entry: &DexIndexEntry,
        identity: &ResolvedIdentity,
        page: &SpeciesPage,
        moves: &BTreeMap<String, MoveEntry>,
    ) -> Option<SpeciesRecord> {
        if self.config.is_excluded(&entry.name) || self.config.is_excluded(&identity.name) {
            debug!("Excluding non-standalone identity '{}'", entry.name);
            return None;
        }

        Some(SpeciesRecord {
            image: entry.image.clone(),
            dex_number: entry.dex_number,
            name: identity.name.clone(),
            types: entry.types.clone(),
            total: entry.total,
            hp: entry.hp,
            attack: entry.attack,
            defense: entry.defense,
            sp_atk: entry.sp_atk,
            sp_def: entry.sp_def,
            speed: entry.speed,
            species: page.species.clone(),
            height: page.height.clone(),
            weight: page.weight.clone(),
            abilities: identity.abilities.clone(),
            local_no: page.local_no.clone(),
            moves: moves.clone(),
            gender: Gender::parse_set(&page.gender_text),
            evolves_at_level: None,
            form_name: identity.form_name.clone(),
        })
    }
}
