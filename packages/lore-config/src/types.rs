use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub build: Build,
	pub index: Index,
	pub search: Search,
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Build {
	pub knowledge_base_dir: String,
	/// Maximum chunk length, counted in characters.
	pub chunk_size: u32,
	pub chunk_overlap: u32,
	pub embedding_batch_size: u32,
	/// Separators in priority order; the trailing empty string is the
	/// character-level last resort.
	#[serde(default = "default_separators")]
	pub separators: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Index {
	pub dir: String,
	#[serde(default = "default_metric")]
	pub metric: String,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub top_k: u32,
	pub rerank_top_n: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: ProviderConfig,
	pub generation: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

pub(crate) fn default_separators() -> Vec<String> {
	["\n\n", "\n", "。", "！", "？", "，", "、", ""].iter().map(|s| s.to_string()).collect()
}

pub(crate) fn default_metric() -> String {
	"cosine".to_string()
}
