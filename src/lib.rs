pub mod assemble;
pub mod cleaners;
pub mod cli;
pub mod data;
pub mod dataset;
pub mod mappings;
pub mod parents;
pub mod pipeline;
pub mod reconcile;
pub mod sink;
pub mod source;
pub mod table;
pub mod transform;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("lca_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Load(args) => pipeline::execute(&args),
        Commands::Preview(args) => pipeline::execute_preview(&args),
    }
}
