pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod logging;
pub mod pipeline;
