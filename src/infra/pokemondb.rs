use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::DexIndexEntry;
use crate::error::{Result, ScrapeError};
use crate::fetch::{EvolutionTarget, MoveRow, MoveTable, PageFetcher, SpeciesPage};

static LEVEL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// `PageFetcher` over pokemondb.net with a blocking HTTP client.
///
/// All field extraction happens here; the pipeline only ever sees the
/// structured document types.
pub struct PokemonDbFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PokemonDbFetcher {
    pub fn new() -> Self {
        Self::with_base_url("https://pokemondb.net")
    }

    /// Point the fetcher at a different host, e.g. a local mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl PageFetcher for PokemonDbFetcher {
    fn fetch_index(&self) -> Result<Vec<DexIndexEntry>> {
        let url = format!("{}/pokedex/all", self.base_url);
        debug!("Fetching national-dex index from {}", url);
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        parse_index(&Html::parse_document(&body))
    }

    fn fetch_species_page(&self, slug: &str) -> Result<SpeciesPage> {
        let url = format!("{}/pokedex/{}", self.base_url, slug);
        debug!("Fetching species page {}", url);
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        parse_species_page(&Html::parse_document(&body), slug)
    }

    fn fetch_generation_moves(&self, slug: &str, generation: u8) -> Result<Option<Vec<MoveTable>>> {
        let url = format!("{}/pokedex/{}/moves/{}", self.base_url, slug, generation);
        debug!("Fetching move page {}", url);
        let response = self.client.get(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.error_for_status()?.text()?;
        Ok(Some(parse_move_tables(&Html::parse_document(&body))))
    }
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_index(document: &Html) -> Result<Vec<DexIndexEntry>> {
    let table_sel = Selector::parse("table#pokedex").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();
    let img_sel = Selector::parse("img").unwrap();
    let dex_sel = Selector::parse("span.infocard-cell-data").unwrap();
    let name_sel = Selector::parse("a.ent-name").unwrap();
    let form_sel = Selector::parse("small.text-muted").unwrap();
    let link_sel = Selector::parse("a").unwrap();

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::Page("national-dex table not found".to_string()))?;

    let mut entries = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 10 {
            // Header row, or something that is not a dex entry.
            continue;
        }

        let image = cells[0]
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or_default()
            .to_string();
        let dex_number = cells[0]
            .select(&dex_sel)
            .next()
            .and_then(|span| text_of(span).parse().ok());
        let name_element = cells[1].select(&name_sel).next();
        let (Some(dex_number), Some(name_element)) = (dex_number, name_element) else {
            debug!("Skipping malformed index row");
            continue;
        };

        // The index shows form variants as a muted annotation under the
        // shared display name; fold it back into the parenthetical shape.
        let mut name = text_of(name_element);
        if let Some(form) = cells[1].select(&form_sel).next() {
            name = format!("{} ({})", name, text_of(form));
        }

        let types = cells[2].select(&link_sel).map(text_of).collect();
        let stat = |i: usize| text_of(cells[i]).parse().unwrap_or(0);

        entries.push(DexIndexEntry {
            image,
            dex_number,
            name,
            types,
            total: stat(3),
            hp: stat(4),
            attack: stat(5),
            defense: stat(6),
            sp_atk: stat(7),
            sp_def: stat(8),
            speed: stat(9),
        });
    }
    Ok(entries)
}

fn parse_species_page(document: &Html, slug: &str) -> Result<SpeciesPage> {
    let vitals_sel = Selector::parse("table.vitals-table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();
    let td_link_sel = Selector::parse("td a").unwrap();

    let vitals = document
        .select(&vitals_sel)
        .next()
        .ok_or_else(|| ScrapeError::MissingVitals(slug.to_string()))?;

    // Fixed vitals layout: rows 2-6 are species, height, weight, abilities
    // and local numbers.
    let rows: Vec<ElementRef> = vitals.select(&row_sel).collect();
    let row_text = |i: usize| {
        rows.get(i)
            .and_then(|row| row.select(&td_sel).next())
            .map(text_of)
            .unwrap_or_default()
    };
    let abilities = rows
        .get(5)
        .map(|row| {
            row.select(&td_link_sel)
                .map(text_of)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(SpeciesPage {
        species: row_text(2),
        height: row_text(3),
        weight: row_text(4),
        abilities,
        form_abilities: parse_form_abilities(document),
        local_no: row_text(6),
        gender_text: parse_gender_text(document),
        evolutions: parse_evolutions(document),
    })
}

/// Per-form ability sections, one per form tab. Each tab panel carries its
/// own vitals table; the tab label is the key the pipeline matches against.
fn parse_form_abilities(document: &Html) -> Vec<(String, Vec<String>)> {
    let tab_sel = Selector::parse(".sv-tabs-tab-list a.sv-tabs-tab").unwrap();
    let panel_sel = Selector::parse(".sv-tabs-panel").unwrap();
    let vitals_sel = Selector::parse("table.vitals-table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_link_sel = Selector::parse("td a").unwrap();

    let labels: Vec<String> = document.select(&tab_sel).map(text_of).collect();
    let mut sections = Vec::new();
    for (label, panel) in labels.into_iter().zip(document.select(&panel_sel)) {
        let Some(vitals) = panel.select(&vitals_sel).next() else {
            continue;
        };
        for row in vitals.select(&row_sel) {
            let header = row.select(&th_sel).next().map(text_of).unwrap_or_default();
            if header.contains("Abilit") {
                let abilities = row
                    .select(&td_link_sel)
                    .map(text_of)
                    .filter(|t| !t.is_empty())
                    .collect();
                sections.push((label.clone(), abilities));
                break;
            }
        }
    }
    sections
}

fn parse_gender_text(document: &Html) -> String {
    let vitals_sel = Selector::parse("table.vitals-table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    for table in document.select(&vitals_sel) {
        for row in table.select(&row_sel) {
            let header = row.select(&th_sel).next().map(text_of).unwrap_or_default();
            if header == "Gender" {
                return row.select(&td_sel).next().map(text_of).unwrap_or_default();
            }
        }
    }
    String::new()
}

/// Walks the evolution chart in document order, pairing each arrow (which
/// carries the level annotation) with the next entity name after it.
fn parse_evolutions(document: &Html) -> Vec<EvolutionTarget> {
    let list_sel = Selector::parse("div.infocard-list-evo").unwrap();
    let small_sel = Selector::parse("small").unwrap();

    let Some(list) = document.select(&list_sel).next() else {
        return Vec::new();
    };

    let mut evolutions = Vec::new();
    let mut pending_level: Option<Option<u32>> = None;
    for node in list.descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if element.name() == "span" && element.classes().any(|c| c == "infocard-arrow") {
            let element_ref = ElementRef::wrap(node).unwrap();
            let level = element_ref
                .select(&small_sel)
                .next()
                .map(text_of)
                .and_then(|text| LEVEL_DIGITS.find(&text).map(|m| m.as_str().to_string()))
                .and_then(|digits| digits.parse().ok());
            pending_level = Some(level);
        } else if element.name() == "a" && element.classes().any(|c| c == "ent-name") {
            if let Some(min_level) = pending_level.take() {
                let element_ref = ElementRef::wrap(node).unwrap();
                evolutions.push(EvolutionTarget {
                    target: text_of(element_ref),
                    min_level,
                });
            }
        }
    }
    evolutions
}

fn parse_move_tables(document: &Html) -> Vec<MoveTable> {
    let table_sel = Selector::parse("table.data-table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_sel = Selector::parse("td").unwrap();
    let name_sel = Selector::parse("a.ent-name").unwrap();
    let type_sel = Selector::parse("a.type-icon").unwrap();

    let mut tables = Vec::new();
    for table in document.select(&table_sel) {
        let mut row_iter = table.select(&row_sel);
        let headers = row_iter
            .next()
            .map(|header_row| header_row.select(&th_sel).map(text_of).collect())
            .unwrap_or_default();

        let mut rows = Vec::new();
        for row in row_iter {
            let name = row.select(&name_sel).next().map(text_of);
            let move_type = row.select(&type_sel).next().map(text_of);
            let (Some(name), Some(move_type)) = (name, move_type) else {
                continue;
            };
            rows.push(MoveRow {
                name,
                move_type,
                cells: row.select(&td_sel).map(text_of).collect(),
            });
        }
        tables.push(MoveTable { headers, rows });
    }
    tables
}
