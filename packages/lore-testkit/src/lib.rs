//! Deterministic in-process stand-ins for the three remote model providers,
//! plus a ready-made test config. Nothing here talks to a network.

use std::{
	collections::HashSet,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use color_eyre::{Result, eyre};
use serde_json::{Map, Value};

use lore_config::{
	Build, Config, EmbeddingProviderConfig, Index, LlmProviderConfig, ProviderConfig, Providers,
	Search, Service,
};
use lore_providers::{BoxFuture, EmbeddingProvider, GenerationProvider, RerankProvider};

/// Character-histogram embeddings: deterministic, dimension-exact, and crude
/// on purpose. Tests that depend on which chunk ranks first must steer the
/// outcome through [`StubRerank`] rather than embedding geometry.
pub struct StubEmbedding {
	pub dimensions: usize,
}

impl StubEmbedding {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions }
	}
}

impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		let vectors = texts.iter().map(|text| embed_text(text, self.dimensions)).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Fails every embedding call from `fail_on_call` (one-based) onward.
pub struct FailingEmbedding {
	pub dimensions: usize,
	pub fail_on_call: usize,
	calls: AtomicUsize,
}

impl FailingEmbedding {
	pub fn new(dimensions: usize, fail_on_call: usize) -> Self {
		Self { dimensions, fail_on_call, calls: AtomicUsize::new(0) }
	}
}

impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
		let vectors: Vec<Vec<f32>> =
			texts.iter().map(|text| embed_text(text, self.dimensions)).collect();
		let fail = call >= self.fail_on_call;

		Box::pin(async move {
			if fail {
				return Err(eyre::eyre!("Embedding backend rejected the batch."));
			}

			Ok(vectors)
		})
	}
}

/// Scores each document by how many of its tokens appear in the query.
pub struct StubRerank;

impl RerankProvider for StubRerank {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		let scores = docs.iter().map(|doc| overlap_score(query, doc)).collect();

		Box::pin(async move { Ok(scores) })
	}
}

/// Replays canned generation outputs in order; errors when the script runs
/// dry so a test cannot silently over-call the model.
pub struct ScriptedGeneration {
	replies: Mutex<Vec<String>>,
}

impl ScriptedGeneration {
	pub fn with_reply(reply: impl Into<String>) -> Self {
		Self::with_replies(vec![reply.into()])
	}

	pub fn with_replies(replies: Vec<String>) -> Self {
		Self { replies: Mutex::new(replies) }
	}

	/// A reply in the structured shape the pipeline asks the model for.
	pub fn structured_reply(reasoning: &str, final_answer: &str) -> String {
		serde_json::json!({ "reasoning": reasoning, "final_answer": final_answer }).to_string()
	}
}

impl GenerationProvider for ScriptedGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		let next = {
			let mut replies = self.replies.lock().unwrap_or_else(|err| err.into_inner());

			if replies.is_empty() { None } else { Some(replies.remove(0)) }
		};

		Box::pin(async move {
			next.ok_or_else(|| eyre::eyre!("Scripted generation has no replies left."))
		})
	}
}

/// Always fails, standing in for a generation transport outage.
pub struct FailingGeneration;

impl GenerationProvider for FailingGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Err(eyre::eyre!("Generation backend is unreachable.")) })
	}
}

pub fn embed_text(text: &str, dimensions: usize) -> Vec<f32> {
	let mut vector = vec![0.0_f32; dimensions.max(1)];

	for ch in text.chars() {
		let idx = (ch as usize) % vector.len();
		vector[idx] += 1.0;
	}

	vector
}

pub fn overlap_score(query: &str, doc: &str) -> f32 {
	let query_tokens: HashSet<String> = tokenize(query).collect();

	tokenize(doc).filter(|token| query_tokens.contains(token)).count() as f32
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
	text.split(|ch: char| !ch.is_alphanumeric())
		.filter(|token| !token.is_empty())
		.map(|token| token.to_lowercase())
}

pub fn test_config(knowledge_base_dir: &str, index_dir: &str, dimensions: u32) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		build: Build {
			knowledge_base_dir: knowledge_base_dir.to_string(),
			chunk_size: 200,
			chunk_overlap: 20,
			embedding_batch_size: 4,
			separators: ["\n\n", "\n", ". ", ""].iter().map(|s| s.to_string()).collect(),
		},
		index: Index { dir: index_dir.to_string(), metric: "cosine".to_string() },
		search: Search { top_k: 5, rerank_top_n: 3 },
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			rerank: ProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/rerank".to_string(),
				model: "test-rerank".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			generation: LlmProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-generation".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embeddings_are_deterministic_and_dimension_exact() {
		let a = embed_text("Paris is the capital of France.", 8);
		let b = embed_text("Paris is the capital of France.", 8);

		assert_eq!(a, b);
		assert_eq!(a.len(), 8);
	}

	#[test]
	fn overlap_score_favors_shared_vocabulary() {
		let query = "What is the capital of France?";
		let on_topic = overlap_score(query, "Paris is the capital of France.");
		let off_topic = overlap_score(query, "Rust compiles to native code.");

		assert!(on_topic > off_topic);
	}
}
