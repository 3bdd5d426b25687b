use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use tracing::{info, warn};

use crate::domain::ItemEntry;
use crate::fetch::{ItemFetcher, ItemRow};

/// Generations with a published item index. Walked newest to oldest so each
/// item keeps its most recent sprite.
pub const ITEM_GENERATIONS: RangeInclusive<u8> = 3..=9;

/// Builds the full item catalog, one fetch per generation. Fail-soft like
/// the species batch: a failing generation contributes nothing.
pub fn build_catalog<F: ItemFetcher>(fetcher: &F) -> BTreeMap<String, ItemEntry> {
    let mut aggregator = ItemAggregator::new();
    for generation in ITEM_GENERATIONS.rev() {
        match fetcher.fetch_generation_items(generation) {
            Ok(rows) => aggregator.add_generation(generation, &rows),
            Err(e) => warn!("Skipping generation {} item index: {}", generation, e),
        }
    }
    let catalog = aggregator.into_catalog();
    info!("Aggregated {} items", catalog.len());
    catalog
}

/// Folds per-generation item listings into one catalog keyed by cleaned item
/// name. Same fold shape as the move catalog: the first sighting fixes the
/// image, later sightings only extend the generation set.
#[derive(Default)]
pub struct ItemAggregator {
    catalog: BTreeMap<String, ItemEntry>,
}

impl ItemAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_generation(&mut self, generation: u8, rows: &[ItemRow]) {
        for row in rows {
            let name = clean_name(&row.name);
            if name.is_empty() {
                continue;
            }
            match self.catalog.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(ItemEntry {
                        image: row.image.clone(),
                        generations: BTreeSet::from([generation]),
                    });
                }
                Entry::Occupied(mut slot) => {
                    slot.get_mut().generations.insert(generation);
                }
            }
        }
    }

    pub fn into_catalog(self) -> BTreeMap<String, ItemEntry> {
        self.catalog
    }
}

/// Item names flattened to ASCII: known accents transliterated, other
/// non-ASCII dropped, surrounding whitespace trimmed. "Poké Ball" and
/// "Poke Ball" across indexes are the same item.
fn clean_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter_map(|ch| match ch {
            'é' | 'É' => Some('e'),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScrapeError};
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeItemFetcher {
        rows: HashMap<u8, Vec<ItemRow>>,
        failing: HashSet<u8>,
    }

    impl ItemFetcher for FakeItemFetcher {
        fn fetch_generation_items(&self, generation: u8) -> Result<Vec<ItemRow>> {
            if self.failing.contains(&generation) {
                return Err(ScrapeError::Page(format!(
                    "generation {} index unavailable",
                    generation
                )));
            }
            Ok(self.rows.get(&generation).cloned().unwrap_or_default())
        }
    }

    fn row(name: &str, image: &str) -> ItemRow {
        ItemRow {
            name: name.to_string(),
            image: image.to_string(),
        }
    }

    #[test]
    fn test_newest_generation_fixes_the_image() {
        let mut fetcher = FakeItemFetcher::default();
        fetcher.rows.insert(9, vec![row("Potion", "img/potion-9.png")]);
        fetcher.rows.insert(3, vec![row("Potion", "img/potion-3.png")]);

        let catalog = build_catalog(&fetcher);

        let potion = &catalog["Potion"];
        assert_eq!(potion.image, "img/potion-9.png");
        assert_eq!(potion.generations, BTreeSet::from([3, 9]));
    }

    #[test]
    fn test_name_is_cleaned_to_ascii() {
        let mut fetcher = FakeItemFetcher::default();
        fetcher
            .rows
            .insert(9, vec![row(" Poké Ball\n", "img/poke-ball.png")]);

        let catalog = build_catalog(&fetcher);

        assert!(catalog.contains_key("Poke Ball"));
        assert!(!catalog.contains_key("Poké Ball"));
    }

    #[test]
    fn test_failing_generation_is_skipped() {
        let mut fetcher = FakeItemFetcher::default();
        fetcher.rows.insert(3, vec![row("Potion", "img/potion.png")]);
        fetcher.failing.insert(5);

        let catalog = build_catalog(&fetcher);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["Potion"].generations, BTreeSet::from([3]));
    }

    #[test]
    fn test_repeat_listing_within_one_generation_is_idempotent() {
        let mut aggregator = ItemAggregator::new();
        aggregator.add_generation(
            4,
            &[row("Potion", "img/a.png"), row("Potion", "img/b.png")],
        );

        let catalog = aggregator.into_catalog();
        assert_eq!(catalog["Potion"].image, "img/a.png");
        assert_eq!(catalog["Potion"].generations, BTreeSet::from([4]));
    }
}
