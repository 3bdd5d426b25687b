use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::MoveEntry;
use crate::fetch::MoveTable;

/// Folds per-generation move tables into one per-species catalog.
///
/// Generations must be fed oldest to newest. The fold is first-write-wins: a
/// move's numeric fields and type are pinned by the earliest generation that
/// lists it, and later generations only extend its generation set. Whether
/// later generations should instead override differing numeric fields is an
/// open product question; the current behavior keeps the earliest values.
#[derive(Debug, Default)]
pub struct MoveAggregator {
    catalog: BTreeMap<String, MoveEntry>,
}

impl MoveAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every table from one generation page into the catalog.
    pub fn add_generation(&mut self, generation: u8, tables: &[MoveTable]) {
        for table in tables {
            self.add_table(generation, table);
        }
    }

    fn add_table(&mut self, generation: u8, table: &MoveTable) {
        // The level column is wherever the header says so; without one,
        // every row in this table is a non-level-up move.
        let level_column = table
            .headers
            .iter()
            .position(|h| h.to_lowercase().contains("lv"));

        for row in &table.rows {
            let level = level_column
                .and_then(|i| row.cells.get(i))
                .and_then(|cell| parse_numeric(cell));
            // Power and accuracy sit in the last two columns of every table
            // layout; non-numeric text (a dash, "∞") means null.
            let cell_count = row.cells.len();
            let power = cell_count
                .checked_sub(2)
                .and_then(|i| row.cells.get(i))
                .and_then(|cell| parse_numeric(cell));
            let accuracy = row.cells.last().and_then(|cell| parse_numeric(cell));

            match self.catalog.entry(row.name.clone()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(MoveEntry {
                        move_type: row.move_type.clone(),
                        power,
                        accuracy,
                        level,
                        generations: BTreeSet::from([generation]),
                    });
                }
                Entry::Occupied(mut occupied) => {
                    occupied.get_mut().generations.insert(generation);
                }
            }
        }
    }

    pub fn into_catalog(self) -> BTreeMap<String, MoveEntry> {
        self.catalog
    }
}

fn parse_numeric(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
