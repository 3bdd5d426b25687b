// Infrastructure implementations of the fetch boundaries.

pub mod bulbapedia;
pub mod pokemondb;

pub use bulbapedia::BulbapediaFetcher;
pub use pokemondb::PokemonDbFetcher;
