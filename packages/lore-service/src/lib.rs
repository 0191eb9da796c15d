pub mod answer;
pub mod chat;
pub mod prompt;

mod rank;

use std::{path::Path, sync::Arc};

use color_eyre::eyre;

pub use answer::{FALLBACK_REASONING, GenerationOutcome, StructuredAnswer};
pub use chat::{ChatRequest, ChatResponse, ConversationTurn, HistoryEntry, Role};
pub use prompt::CANNOT_ANSWER;

use lore_config::Config;
use lore_index::{Metric, VectorIndex};
pub use lore_providers::{EmbeddingProvider, GenerationProvider, RerankProvider};
use lore_providers::HttpProviders;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
	/// The service has not finished (or has failed) startup.
	NotInitialized,
	/// Any unexpected failure in the per-request chain. Details are logged
	/// at the boundary and never carried to the caller.
	Pipeline,
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotInitialized => write!(f, "Service is not initialized."),
			Self::Pipeline => write!(f, "Internal pipeline failure."),
		}
	}
}

impl std::error::Error for ServiceError {}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		rerank: Arc<dyn RerankProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { embedding, rerank, generation }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(HttpProviders);
		Self { embedding: provider.clone(), rerank: provider.clone(), generation: provider }
	}
}

pub struct LoreService {
	pub cfg: Config,
	pub index: VectorIndex,
	pub providers: Providers,
}

impl std::fmt::Debug for LoreService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoreService").finish_non_exhaustive()
	}
}

impl LoreService {
	/// One-time startup: loads the persisted index and wires the remote
	/// providers. Fatal if no index has been built yet.
	pub fn initialize(cfg: Config) -> color_eyre::Result<Self> {
		Self::initialize_with(cfg, Providers::default())
	}

	pub fn initialize_with(cfg: Config, providers: Providers) -> color_eyre::Result<Self> {
		let dir = Path::new(&cfg.index.dir);

		if !dir.exists() {
			return Err(eyre::eyre!(
				"Vector index directory {dir:?} does not exist. Run lore-builder first to build the knowledge base.",
			));
		}

		let index = VectorIndex::load(dir)?;
		let metric: Metric = cfg.index.metric.parse()?;

		if index.metric() != metric {
			return Err(eyre::eyre!(
				"Persisted index uses the {:?} metric but the config requests {metric:?}.",
				index.metric()
			));
		}
		if index.dimension() != cfg.providers.embedding.dimensions as usize {
			return Err(eyre::eyre!(
				"Persisted index has dimension {} but the embedding model is configured for {}.",
				index.dimension(),
				cfg.providers.embedding.dimensions
			));
		}

		tracing::info!(entries = index.len(), dir = %dir.display(), "Vector index loaded.");

		Ok(Self { cfg, index, providers })
	}
}
