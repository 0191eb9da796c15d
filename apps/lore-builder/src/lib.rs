pub mod builder;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::builder::BuildOutcome;
use lore_providers::HttpProviders;

#[derive(Debug, Parser)]
#[command(
	version = lore_cli::VERSION,
	rename_all = "kebab",
	styles = lore_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = lore_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	match builder::build(&config, &HttpProviders).await? {
		BuildOutcome::Skipped => {
			tracing::warn!("Nothing was indexed. Add .txt files to the knowledge base and rerun.");
		},
		BuildOutcome::Built { documents, chunks } => {
			tracing::info!(documents, chunks, dir = %config.index.dir, "Knowledge base build complete.");
		},
	}

	Ok(())
}
