use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;
use lore_service::{ChatRequest, ChatResponse, ServiceError};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/chat", post(chat))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let Some(service) = state.service() else {
		return Err(ApiError::from(ServiceError::NotInitialized));
	};
	let response = service.chat(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		// Both bodies are deliberately detail-free; anything useful lives in
		// the service logs.
		match err {
			ServiceError::NotInitialized => ApiError::new(
				StatusCode::SERVICE_UNAVAILABLE,
				"service_not_initialized",
				"Service is not initialized.",
			),
			ServiceError::Pipeline => ApiError::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				"internal_error",
				"Internal server error. Check the service logs for details.",
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
