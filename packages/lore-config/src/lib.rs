mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Build, Config, EmbeddingProviderConfig, Index, LlmProviderConfig, ProviderConfig, Providers,
	Search, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.build.chunk_size == 0 {
		return Err(Error::Validation {
			message: "build.chunk_size must be greater than zero.".to_string(),
		});
	}
	if cfg.build.chunk_overlap >= cfg.build.chunk_size {
		return Err(Error::Validation {
			message: "build.chunk_overlap must be less than build.chunk_size.".to_string(),
		});
	}
	if cfg.build.embedding_batch_size == 0 {
		return Err(Error::Validation {
			message: "build.embedding_batch_size must be greater than zero.".to_string(),
		});
	}
	if cfg.build.separators.is_empty() {
		return Err(Error::Validation {
			message: "build.separators must be non-empty.".to_string(),
		});
	}
	if !matches!(cfg.index.metric.as_str(), "cosine" | "euclidean") {
		return Err(Error::Validation {
			message: "index.metric must be one of cosine or euclidean.".to_string(),
		});
	}
	if cfg.search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.rerank_top_n == 0 {
		return Err(Error::Validation {
			message: "search.rerank_top_n must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("rerank", &cfg.providers.rerank.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.index.metric = cfg.index.metric.trim().to_ascii_lowercase();
}
