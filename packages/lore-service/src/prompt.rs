use serde_json::Value;

use crate::chat::ConversationTurn;
use lore_index::SearchHit;

/// The exact sentence the model must emit when the context holds nothing
/// relevant. Compared literally by clients, so never reworded casually.
pub const CANNOT_ANSWER: &str = "Based on the provided material, I cannot answer this question.";

const FORMAT_INSTRUCTIONS: &str = "\
Respond with a single JSON object containing exactly these two string fields:
{\"reasoning\": \"<how the answer was located in the context>\", \"final_answer\": \"<the concise final answer>\"}";

pub fn system_prompt(context: &str) -> String {
	format!(
		"\
You are an expert assistant that extracts information from text. Your only task is to answer the user's question strictly from the context below.

Core instructions:
1. Extract the answer: locate the passages in the context that answer the question directly.
2. Think step by step: in the `reasoning` field, lay out how you found the answer, which passages you used, and why the others are irrelevant.
3. Give the final answer: in the `final_answer` field, give only the most direct and concise answer, with no extra commentary.
4. Handle the no-answer case: only after reading the full context and being certain that nothing in it answers the question, set `final_answer` to \"{CANNOT_ANSWER}\"
5. Follow the format exactly: your output must be the JSON object described below and nothing else.

{FORMAT_INSTRUCTIONS}

---
Context:
{context}
---"
	)
}

/// Renders reranked hits as labeled source/content blocks, the shape cited
/// back to clients in the `sources` field.
pub fn format_context(hits: &[SearchHit]) -> String {
	hits.iter()
		.map(|hit| format!("Source: {}\nContent: {}", hit.source, hit.text))
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// Assembles the full message list: system instruction (with embedded
/// context), prior turns in original order, then the current question.
pub fn assemble_messages(context: &str, turns: &[ConversationTurn], question: &str) -> Vec<Value> {
	let mut messages = Vec::with_capacity(turns.len() + 2);

	messages.push(serde_json::json!({ "role": "system", "content": system_prompt(context) }));

	for turn in turns {
		messages.push(serde_json::json!({ "role": turn.role.as_str(), "content": turn.content }));
	}

	messages.push(serde_json::json!({ "role": "user", "content": question }));

	messages
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chat::Role;

	fn hit(source: &str, text: &str, rank: u32) -> SearchHit {
		SearchHit {
			source: source.to_string(),
			chunk_index: 0,
			text: text.to_string(),
			distance: 0.1,
			rank,
		}
	}

	#[test]
	fn context_renders_source_and_content_blocks() {
		let hits =
			vec![hit("a.txt", "Paris is the capital of France.", 0), hit("b.txt", "Water boils at 100C.", 1)];
		let context = format_context(&hits);

		assert_eq!(
			context,
			"Source: a.txt\nContent: Paris is the capital of France.\n\nSource: b.txt\nContent: Water boils at 100C."
		);
	}

	#[test]
	fn empty_context_renders_empty() {
		assert_eq!(format_context(&[]), "");
	}

	#[test]
	fn messages_follow_the_fixed_order() {
		let turns = vec![
			ConversationTurn { role: Role::User, content: "Earlier question.".to_string() },
			ConversationTurn { role: Role::Assistant, content: "Earlier answer.".to_string() },
		];
		let messages = assemble_messages("CTX", &turns, "Current question?");

		assert_eq!(messages.len(), 4);
		assert_eq!(messages[0]["role"], "system");
		assert_eq!(messages[1]["role"], "user");
		assert_eq!(messages[1]["content"], "Earlier question.");
		assert_eq!(messages[2]["role"], "assistant");
		assert_eq!(messages[3]["role"], "user");
		assert_eq!(messages[3]["content"], "Current question?");
	}

	#[test]
	fn system_message_embeds_context_schema_and_refusal_sentence() {
		let messages = assemble_messages("THE-CONTEXT-BLOCK", &[], "Q?");
		let system = messages[0]["content"].as_str().unwrap();

		assert!(system.contains("THE-CONTEXT-BLOCK"));
		assert!(system.contains("final_answer"));
		assert!(system.contains("reasoning"));
		assert!(system.contains(CANNOT_ANSWER));
	}
}
