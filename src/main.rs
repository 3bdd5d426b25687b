use std::fs::File;
use std::io::BufWriter;

use serde::Serialize;
use tracing::info;

use dex_scraper::config::PipelineConfig;
use dex_scraper::error::ScrapeError;
use dex_scraper::infra::{BulbapediaFetcher, PokemonDbFetcher};
use dex_scraper::logging;
use dex_scraper::pipeline::{items, Pipeline};

const RECORDS_PATH: &str = "pokemon_data.json";
const RECORDS_COMPACT_PATH: &str = "pokemon_data.min.json";
const ITEMS_PATH: &str = "items.json";
const ITEMS_COMPACT_PATH: &str = "items.min.json";
const CONFIG_PATH: &str = "config/pipeline.toml";

/// One batch run: fetch, aggregate, link, write the output artifacts.
/// No arguments; the pipeline tables come from the config file when present,
/// otherwise from the embedded copy.
fn main() -> anyhow::Result<()> {
    let _guard = logging::init_logging();

    // A missing config file falls back to the embedded tables; a present but
    // malformed one is a real error and fails the run.
    let config = match PipelineConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(ScrapeError::Config(_)) => {
            info!("No config file at {}; using embedded tables", CONFIG_PATH);
            PipelineConfig::embedded()?
        }
        Err(e) => return Err(e.into()),
    };

    let pipeline = Pipeline::new(PokemonDbFetcher::new(), config);
    let records = pipeline.run()?;
    write_artifact(RECORDS_PATH, RECORDS_COMPACT_PATH, &records)?;
    info!("Wrote {} records to {}", records.len(), RECORDS_PATH);

    let catalog = items::build_catalog(&BulbapediaFetcher::new());
    write_artifact(ITEMS_PATH, ITEMS_COMPACT_PATH, &catalog)?;
    info!("Wrote {} items to {}", catalog.len(), ITEMS_PATH);

    Ok(())
}

/// Readable artifact plus a compact copy for size-sensitive consumers.
fn write_artifact<T: Serialize>(path: &str, compact_path: &str, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), value)?;
    serde_json::to_writer(BufWriter::new(File::create(compact_path)?), value)?;
    Ok(())
}
