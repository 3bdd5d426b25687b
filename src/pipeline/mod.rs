// Normalization and aggregation pipeline: canonical-name resolution, form
// expansion, cross-generation move merging, post-assembly evolution linking,
// and the cross-generation item catalog.

pub mod assemble;
pub mod canonicalize;
pub mod evolution;
pub mod forms;
pub mod items;
pub mod moves;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::domain::{DexIndexEntry, EvolutionEdge, MoveEntry, SpeciesRecord};
use crate::error::Result;
use crate::fetch::PageFetcher;
use assemble::RecordAssembler;
use canonicalize::NameCanonicalizer;
use evolution::EvolutionLinker;
use forms::FormResolver;
use moves::MoveAggregator;

/// The nine generations of source data, fetched oldest to newest.
pub const GENERATIONS: std::ops::RangeInclusive<u8> = 1..=9;

/// Single-threaded batch pipeline. Species are processed strictly one at a
/// time; the evolution linking pass runs only after every record, including
/// all form expansions, has been appended.
pub struct Pipeline<F: PageFetcher> {
    fetcher: F,
    config: PipelineConfig,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(fetcher: F, config: PipelineConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetch the national-dex index and process every entry.
    pub fn run(&self) -> Result<Vec<SpeciesRecord>> {
        let entries = self.fetcher.fetch_index()?;
        info!("Fetched index with {} entries", entries.len());
        Ok(self.run_entries(&entries))
    }

    /// Process a fixed set of index entries into the final ordered
    /// collection. Fail-soft: a species whose page cannot be fetched is
    /// skipped and the batch continues.
    pub fn run_entries(&self, entries: &[DexIndexEntry]) -> Vec<SpeciesRecord> {
        let canonicalizer = NameCanonicalizer::new(&self.config);
        let form_resolver = FormResolver::new(&self.config);
        let assembler = RecordAssembler::new(&self.config);

        let mut records: Vec<SpeciesRecord> = Vec::with_capacity(entries.len());
        let mut pending_edges: Vec<EvolutionEdge> = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let slug = NameCanonicalizer::fetch_slug(&entry.name);
            let canonical_name = canonicalizer.canonical_name(&entry.name);

            let page = match self.fetcher.fetch_species_page(&slug) {
                Ok(page) => page,
                Err(e) => {
                    warn!("Skipping '{}': {}", entry.name, e);
                    continue;
                }
            };

            let moves = self.aggregate_moves(&slug);

            for target in &page.evolutions {
                pending_edges.push(EvolutionEdge {
                    source: canonical_name.clone(),
                    target: target.target.clone(),
                    min_level: target.min_level,
                });
            }

            for identity in form_resolver.resolve(&entry.name, &canonical_name, &page) {
                if let Some(record) = assembler.assemble(entry, &identity, &page, &moves) {
                    records.push(record);
                }
            }

            debug!(
                "Processed {}/{}: {}",
                index + 1,
                entries.len(),
                entry.name
            );
        }

        EvolutionLinker::link(&mut records, pending_edges, &canonicalizer);
        info!("Assembled {} records", records.len());
        records
    }

    /// Up to nine sequential sub-fetches, one per generation. A missing or
    /// failing generation contributes nothing; it never fails the species.
    fn aggregate_moves(&self, slug: &str) -> BTreeMap<String, MoveEntry> {
        let mut aggregator = MoveAggregator::new();
        for generation in GENERATIONS {
            match self.fetcher.fetch_generation_moves(slug, generation) {
                Ok(Some(tables)) => aggregator.add_generation(generation, &tables),
                Ok(None) => debug!("No generation {} move data for {}", generation, slug),
                Err(e) => debug!("Skipping generation {} for {}: {}", generation, slug, e),
            }
        }
        aggregator.into_catalog()
    }
}
