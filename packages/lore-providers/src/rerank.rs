use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Scores `docs` against `query` with the reranking model. The returned
/// vector is aligned with `docs`; documents the model omits score 0.0.
pub async fn rerank(
	cfg: &lore_config::ProviderConfig,
	query: &str,
	docs: &[String],
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "model": cfg.model, "query": query, "documents": docs });
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_rerank_response(json, docs.len())
}

fn parse_rerank_response(json: Value, doc_count: usize) -> Result<Vec<f32>> {
	let results = json
		.get("results")
		.or_else(|| json.get("data"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Rerank response is missing results array."))?;

	let mut scores = vec![0.0_f32; doc_count];

	for item in results {
		let (index, score) = parse_scored_item(item)?;

		if index < doc_count {
			scores[index] = score;
		}
	}

	Ok(scores)
}

fn parse_scored_item(item: &Value) -> Result<(usize, f32)> {
	let index = item
		.get("index")
		.and_then(|v| v.as_u64())
		.ok_or_else(|| eyre::eyre!("Rerank result is missing its document index."))?;
	let score = item
		.get("relevance_score")
		.or_else(|| item.get("score"))
		.and_then(|v| v.as_f64())
		.ok_or_else(|| eyre::eyre!("Rerank result is missing its score."))?;

	Ok((index as usize, score as f32))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn aligns_scores_by_index() {
		let json = serde_json::json!({
			"results": [
				{ "index": 1, "relevance_score": 0.2 },
				{ "index": 0, "relevance_score": 0.9 }
			]
		});
		let scores = parse_rerank_response(json, 2).expect("parse failed");

		assert_eq!(scores, vec![0.9, 0.2]);
	}

	#[test]
	fn missing_entries_score_zero() {
		let json = serde_json::json!({
			"data": [
				{ "index": 2, "score": 0.7 }
			]
		});
		let scores = parse_rerank_response(json, 3).expect("parse failed");

		assert_eq!(scores, vec![0.0, 0.0, 0.7]);
	}

	#[test]
	fn ignores_out_of_range_indexes() {
		let json = serde_json::json!({
			"results": [
				{ "index": 9, "score": 0.8 },
				{ "index": 0, "score": 0.4 }
			]
		});
		let scores = parse_rerank_response(json, 1).expect("parse failed");

		assert_eq!(scores, vec![0.4]);
	}
}
