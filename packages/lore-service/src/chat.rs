use color_eyre::eyre;

use crate::{LoreService, ServiceError, ServiceResult, answer, prompt, rank};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct ChatRequest {
	pub query: String,
	#[serde(default)]
	pub history: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct HistoryEntry {
	pub role: String,
	pub content: String,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct ChatResponse {
	pub answer: String,
	pub reasoning: String,
	/// The raw context block the answer was grounded in.
	pub sources: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	User,
	Assistant,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}
}

#[derive(Clone, Debug)]
pub struct ConversationTurn {
	pub role: Role,
	pub content: String,
}

impl LoreService {
	/// The per-request pipeline. Every unexpected failure is logged here and
	/// surfaced as an opaque [`ServiceError::Pipeline`].
	pub async fn chat(&self, request: ChatRequest) -> ServiceResult<ChatResponse> {
		match self.run_pipeline(&request).await {
			Ok(response) => Ok(response),
			Err(err) => {
				tracing::error!(error = %err, "Chat pipeline failed.");

				Err(ServiceError::Pipeline)
			},
		}
	}

	async fn run_pipeline(&self, request: &ChatRequest) -> color_eyre::Result<ChatResponse> {
		let turns = conversation_turns(&request.history);
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &[request.query.clone()])
			.await?;
		let Some(query_vector) = embeddings.into_iter().next() else {
			return Err(eyre::eyre!("Embedding provider returned no vector for the query."));
		};
		let candidates = self.index.search(&query_vector, self.cfg.search.top_k as usize)?;
		let reranked = if candidates.is_empty() {
			Vec::new()
		} else {
			let docs: Vec<String> = candidates.iter().map(|hit| hit.text.clone()).collect();
			let scores = self
				.providers
				.rerank
				.rerank(&self.cfg.providers.rerank, &request.query, &docs)
				.await?;

			if scores.len() != candidates.len() {
				return Err(eyre::eyre!(
					"Rerank provider returned {} scores for {} candidates.",
					scores.len(),
					candidates.len()
				));
			}

			rank::select_top(candidates, &scores, self.cfg.search.rerank_top_n as usize)
		};
		let context = prompt::format_context(&reranked);
		let messages = prompt::assemble_messages(&context, &turns, &request.query);
		let raw = self
			.providers
			.generation
			.generate(&self.cfg.providers.generation, &messages)
			.await?;
		let structured = answer::parse_generation(&raw).into_answer();

		Ok(ChatResponse {
			answer: structured.final_answer,
			reasoning: structured.reasoning,
			sources: context,
		})
	}
}

/// Converts raw history entries into typed turns. Entries with a role other
/// than user/assistant are dropped, not rejected.
pub(crate) fn conversation_turns(history: &[HistoryEntry]) -> Vec<ConversationTurn> {
	history
		.iter()
		.filter_map(|entry| {
			let role = match entry.role.as_str() {
				"user" => Role::User,
				"assistant" => Role::Assistant,
				other => {
					tracing::debug!(role = other, "Dropping history entry with unrecognized role.");

					return None;
				},
			};

			Some(ConversationTurn { role, content: entry.content.clone() })
		})
		.collect()
}
