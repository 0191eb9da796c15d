use std::{fs, path::Path};

use color_eyre::{Result, eyre};
use walkdir::WalkDir;

use lore_chunking::ChunkingConfig;
use lore_config::Config;
use lore_index::{IndexRecord, Metric, VectorIndex};
use lore_providers::EmbeddingProvider;

#[derive(Debug, PartialEq, Eq)]
pub enum BuildOutcome {
	/// Empty or missing knowledge base; nothing was persisted.
	Skipped,
	Built { documents: usize, chunks: usize },
}

struct Document {
	path: String,
	text: String,
}

/// Builds the vector index: load documents, chunk, embed batch by batch,
/// persist once after the last batch. Batches run strictly sequentially to
/// bound peak embedding load; any batch failure aborts the whole build with
/// nothing written.
pub async fn build(cfg: &Config, embedding: &dyn EmbeddingProvider) -> Result<BuildOutcome> {
	let kb_dir = Path::new(&cfg.build.knowledge_base_dir);
	let documents = load_documents(kb_dir)?;

	if documents.is_empty() {
		tracing::warn!(dir = %kb_dir.display(), "Knowledge base directory is empty or missing. Skipping index build.");

		return Ok(BuildOutcome::Skipped);
	}

	tracing::info!(documents = documents.len(), "Documents loaded.");

	let records = chunk_documents(&documents, cfg);

	if records.is_empty() {
		tracing::warn!("Chunking produced no chunks. Skipping index build.");

		return Ok(BuildOutcome::Skipped);
	}

	tracing::info!(chunks = records.len(), "Documents chunked.");

	let metric: Metric = cfg.index.metric.parse()?;
	let dimensions = cfg.providers.embedding.dimensions as usize;
	let mut index = VectorIndex::new(dimensions, metric)?;
	let batch_size = cfg.build.embedding_batch_size as usize;
	let total_batches = records.len().div_ceil(batch_size);

	for (number, batch) in records.chunks(batch_size).enumerate() {
		tracing::info!(batch = number + 1, total = total_batches, "Embedding batch.");

		let texts: Vec<String> = batch.iter().map(|record| record.text.clone()).collect();
		let vectors = embedding.embed(&cfg.providers.embedding, &texts).await?;

		if vectors.len() != batch.len() {
			return Err(eyre::eyre!(
				"Embedding provider returned {} vectors for {} chunks.",
				vectors.len(),
				batch.len()
			));
		}

		index.append(batch.to_vec(), vectors)?;
	}

	let out_dir = Path::new(&cfg.index.dir);

	index.save(out_dir)?;

	tracing::info!(entries = index.len(), dir = %out_dir.display(), "Vector index persisted.");

	Ok(BuildOutcome::Built { documents: documents.len(), chunks: index.len() })
}

fn load_documents(dir: &Path) -> Result<Vec<Document>> {
	if !dir.is_dir() {
		return Ok(Vec::new());
	}

	let mut paths: Vec<_> = WalkDir::new(dir)
		.into_iter()
		.filter_map(|entry| entry.ok())
		.filter(|entry| entry.file_type().is_file())
		.map(|entry| entry.into_path())
		.filter(|path| path.extension().is_some_and(|extension| extension == "txt"))
		.collect();

	// Deterministic document order keeps chunk ordinals and index layout
	// reproducible across builds.
	paths.sort();

	let mut documents = Vec::with_capacity(paths.len());

	for path in paths {
		let text = fs::read_to_string(&path)
			.map_err(|err| eyre::eyre!("Failed to read document {path:?}: {err}."))?;

		documents.push(Document { path: path.display().to_string(), text });
	}

	Ok(documents)
}

fn chunk_documents(documents: &[Document], cfg: &Config) -> Vec<IndexRecord> {
	let chunking = ChunkingConfig {
		chunk_size: cfg.build.chunk_size as usize,
		chunk_overlap: cfg.build.chunk_overlap as usize,
		separators: cfg.build.separators.clone(),
	};
	let mut records = Vec::new();

	for document in documents {
		for chunk in lore_chunking::split_text(&document.text, &chunking) {
			records.push(IndexRecord {
				source: document.path.clone(),
				chunk_index: chunk.chunk_index,
				text: chunk.text,
			});
		}
	}

	records
}
