pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Index dimension must be greater than zero.")]
	ZeroDimension,
	#[error("Vector dimension {got} does not match index dimension {expected}.")]
	DimensionMismatch { expected: usize, got: usize },
	#[error("Record and vector counts differ: {records} records, {vectors} vectors.")]
	CountMismatch { records: usize, vectors: usize },
	#[error("Unknown distance metric {value:?}.")]
	UnknownMetric { value: String },
	#[error("No persisted index at {path:?}.")]
	Missing { path: std::path::PathBuf },
	#[error("Unsupported index format version {found}; this build reads version {expected}.")]
	UnsupportedVersion { found: u32, expected: u32 },
	#[error("Failed to read index file at {path:?}.")]
	Read { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to write index file at {path:?}.")]
	Write { path: std::path::PathBuf, source: std::io::Error },
	#[error(transparent)]
	Serde(#[from] serde_json::Error),
}
