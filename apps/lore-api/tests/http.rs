use std::{path::Path, sync::Arc};

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use lore_api::{routes, state::AppState};
use lore_chunking::ChunkingConfig;
use lore_index::{IndexRecord, Metric, VectorIndex};
use lore_service::{LoreService, Providers};
use lore_testkit::{
	FailingGeneration, ScriptedGeneration, StubEmbedding, StubRerank, embed_text, test_config,
};

const DIMENSIONS: usize = 8;

fn build_test_index(dir: &Path, docs: &[(&str, &str)]) {
	let chunking = ChunkingConfig {
		chunk_size: 200,
		chunk_overlap: 20,
		separators: ["\n\n", "\n", ". ", ""].iter().map(|s| s.to_string()).collect(),
	};
	let mut index = VectorIndex::new(DIMENSIONS, Metric::Cosine).expect("Failed to create index.");

	for (source, text) in docs {
		let chunks = lore_chunking::split_text(text, &chunking);
		let records: Vec<IndexRecord> = chunks
			.iter()
			.map(|chunk| IndexRecord {
				source: source.to_string(),
				chunk_index: chunk.chunk_index,
				text: chunk.text.clone(),
			})
			.collect();
		let vectors: Vec<Vec<f32>> =
			chunks.iter().map(|chunk| embed_text(&chunk.text, DIMENSIONS)).collect();

		index.append(records, vectors).expect("Failed to append batch.");
	}

	index.save(dir).expect("Failed to persist index.");
}

fn initialized_state(
	index_dir: &Path,
	generation: Arc<dyn lore_service::GenerationProvider>,
) -> AppState {
	let cfg = test_config(
		"unused-kb",
		index_dir.to_str().expect("Index dir must be UTF-8."),
		DIMENSIONS as u32,
	);
	let providers =
		Providers::new(Arc::new(StubEmbedding::new(DIMENSIONS)), Arc::new(StubRerank), generation);
	let service =
		LoreService::initialize_with(cfg, providers).expect("Failed to initialize service.");
	let state = AppState::uninitialized();

	state.install(service).expect("Failed to install service.");

	state
}

fn chat_request(payload: serde_json::Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/v1/chat")
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok() {
	let app = routes::router(AppState::uninitialized());
	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_is_rejected_before_initialization() {
	let app = routes::router(AppState::uninitialized());
	let payload = serde_json::json!({ "query": "What is the capital of France?", "history": [] });
	let response = app.oneshot(chat_request(payload)).await.expect("Failed to call /v1/chat.");

	assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

	let json = response_json(response).await;

	assert_eq!(json["error_code"], "service_not_initialized");
}

#[tokio::test]
async fn chat_answers_from_the_corpus() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let index_dir = dir.path().join("index");

	build_test_index(&index_dir, &[("facts/france.txt", "Paris is the capital of France.")]);

	let generation = Arc::new(ScriptedGeneration::with_reply(ScriptedGeneration::structured_reply(
		"The context names the capital.",
		"Paris",
	)));
	let app = routes::router(initialized_state(&index_dir, generation));
	let payload = serde_json::json!({
		"query": "What is the capital of France?",
		"history": [
			{ "role": "user", "content": "hello" },
			{ "role": "assistant", "content": "hi" },
			{ "role": "auditor", "content": "dropped" }
		]
	});
	let response = app.oneshot(chat_request(payload)).await.expect("Failed to call /v1/chat.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = response_json(response).await;

	assert_eq!(json["answer"], "Paris");
	assert_eq!(json["reasoning"], "The context names the capital.");
	assert!(
		json["sources"]
			.as_str()
			.expect("sources must be a string")
			.contains("Paris is the capital of France.")
	);
}

#[tokio::test]
async fn pipeline_failures_are_opaque_to_the_caller() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let index_dir = dir.path().join("index");

	build_test_index(&index_dir, &[("kb.txt", "Paris is the capital of France.")]);

	let app = routes::router(initialized_state(&index_dir, Arc::new(FailingGeneration)));
	let payload = serde_json::json!({ "query": "What is the capital of France?" });
	let response = app.oneshot(chat_request(payload)).await.expect("Failed to call /v1/chat.");

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let json = response_json(response).await;

	assert_eq!(json["error_code"], "internal_error");
	assert!(!json["message"].as_str().expect("message must be a string").contains("unreachable"));
}
