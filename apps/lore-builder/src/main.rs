use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = lore_builder::Args::parse();
	lore_builder::run(args).await
}
