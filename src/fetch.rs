use crate::domain::DexIndexEntry;
use crate::error::Result;

/// Structured view of one species page. Everything the pipeline needs from a
/// page, already lifted out of the DOM by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct SpeciesPage {
    pub species: String,
    pub height: String,
    pub weight: String,
    /// Ability list from the primary vitals table.
    pub abilities: Vec<String>,
    /// Per-form ability sections, keyed by the in-page tab label
    /// (e.g. "Hisuian Zoroark"), in page order. Empty for single-form pages.
    pub form_abilities: Vec<(String, Vec<String>)>,
    pub local_no: String,
    /// Raw gender description from the breeding section; blank when absent.
    pub gender_text: String,
    /// Ordered forward evolutions as written on this page.
    pub evolutions: Vec<EvolutionTarget>,
}

#[derive(Debug, Clone)]
pub struct EvolutionTarget {
    /// Target display name exactly as the evolution panel shows it.
    pub target: String,
    pub min_level: Option<u32>,
}

/// One move table as laid out on a generation page. Rows keep their raw cell
/// text, positionally aligned with the headers, so the aggregator can locate
/// the level column itself.
#[derive(Debug, Clone, Default)]
pub struct MoveTable {
    pub headers: Vec<String>,
    pub rows: Vec<MoveRow>,
}

#[derive(Debug, Clone)]
pub struct MoveRow {
    pub name: String,
    pub move_type: String,
    pub cells: Vec<String>,
}

/// One row of a generation's item index: display name as the source writes
/// it, plus the sprite URL.
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub name: String,
    pub image: String,
}

/// Collaborator that retrieves and field-extracts source documents. The
/// pipeline is synchronous, so implementations are too.
pub trait PageFetcher {
    /// The national-dex listing, one entry per indexed identity.
    fn fetch_index(&self) -> Result<Vec<DexIndexEntry>>;

    /// A species page by fetch slug. A page without a vitals block is
    /// `ScrapeError::MissingVitals`.
    fn fetch_species_page(&self, slug: &str) -> Result<SpeciesPage>;

    /// Move tables for one generation (1-9). `Ok(None)` means the generation
    /// page does not exist for this species, which is valid "no data".
    fn fetch_generation_moves(&self, slug: &str, generation: u8) -> Result<Option<Vec<MoveTable>>>;
}

/// Collaborator for the item-catalog source, one index listing per
/// generation. Kept separate from `PageFetcher`: the item indexes live on a
/// different site entirely.
pub trait ItemFetcher {
    fn fetch_generation_items(&self, generation: u8) -> Result<Vec<ItemRow>>;
}
