use tracing::warn;

use crate::domain::{EvolutionEdge, SpeciesRecord};
use crate::pipeline::canonicalize::NameCanonicalizer;

/// Attaches evolves-at-level data to target records after the whole
/// collection has been assembled.
pub struct EvolutionLinker;

impl EvolutionLinker {
    /// Consume the pending edges against the complete record collection.
    ///
    /// Must run strictly after assembly: a target's record may be appended
    /// long after the source page was processed. Each edge's target name is
    /// resolved through the canonicalizer so that panel display names match
    /// the records' canonical keys; the first matching record takes the
    /// level. An edge with no matching record is dropped with a warning.
    pub fn link(
        records: &mut [SpeciesRecord],
        edges: Vec<EvolutionEdge>,
        canonicalizer: &NameCanonicalizer<'_>,
    ) {
        for edge in edges {
            let target = canonicalizer.canonical_name(&edge.target);
            match records.iter_mut().find(|record| record.name == target) {
                Some(record) => {
                    record.evolves_at_level = edge.min_level;
                }
                None => warn!(
                    "No assembled record matches evolution target '{}' (from '{}'); dropping edge",
                    edge.target, edge.source
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::collections::BTreeMap;

    fn record(name: &str) -> SpeciesRecord {
        SpeciesRecord {
            image: String::new(),
            dex_number: 1,
            name: name.to_string(),
            types: vec!["Grass".to_string()],
            total: 318,
            hp: 45,
            attack: 49,
            defense: 49,
            sp_atk: 65,
            sp_def: 65,
            speed: 45,
            species: String::new(),
            height: String::new(),
            weight: String::new(),
            abilities: Vec::new(),
            local_no: String::new(),
            moves: BTreeMap::new(),
            gender: Vec::new(),
            evolves_at_level: None,
            form_name: None,
        }
    }

    fn edge(source: &str, target: &str, level: Option<u32>) -> EvolutionEdge {
        EvolutionEdge {
            source: source.to_string(),
            target: target.to_string(),
            min_level: level,
        }
    }

    #[test]
    fn test_link_sets_level_on_existing_target() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = NameCanonicalizer::new(&config);
        let mut records = vec![record("bulbasaur"), record("ivysaur")];

        EvolutionLinker::link(
            &mut records,
            vec![edge("bulbasaur", "Ivysaur", Some(16))],
            &canon,
        );

        assert_eq!(records[1].evolves_at_level, Some(16));
        assert_eq!(records[0].evolves_at_level, None);
    }

    #[test]
    fn test_missing_target_drops_edge_without_panic() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = NameCanonicalizer::new(&config);
        let mut records = vec![record("bulbasaur")];

        EvolutionLinker::link(
            &mut records,
            vec![edge("bulbasaur", "Ivysaur", Some(16))],
            &canon,
        );

        // Source record unaffected, nothing raised.
        assert_eq!(records[0].evolves_at_level, None);
    }

    #[test]
    fn test_levelless_evolution_leaves_level_null() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = NameCanonicalizer::new(&config);
        let mut records = vec![record("eevee"), record("vaporeon")];

        EvolutionLinker::link(&mut records, vec![edge("eevee", "Vaporeon", None)], &canon);

        assert_eq!(records[1].evolves_at_level, None);
    }

    #[test]
    fn test_first_matching_record_takes_the_level() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = NameCanonicalizer::new(&config);
        // Form expansion can duplicate a dex number but never a name; if a
        // duplicate name ever slipped through, only the first match links.
        let mut records = vec![record("ivysaur"), record("ivysaur")];

        EvolutionLinker::link(
            &mut records,
            vec![edge("bulbasaur", "Ivysaur", Some(16))],
            &canon,
        );

        assert_eq!(records[0].evolves_at_level, Some(16));
        assert_eq!(records[1].evolves_at_level, None);
    }
}
