mod error;
mod metric;

pub use error::{Error, Result};
pub use metric::Metric;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub const INDEX_FILE: &str = "index.json";

const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
	pub source: String,
	pub chunk_index: u32,
	pub text: String,
}

#[derive(Clone, Debug)]
pub struct SearchHit {
	pub source: String,
	pub chunk_index: u32,
	pub text: String,
	pub distance: f32,
	/// Zero-based retrieval rank, most similar first.
	pub rank: u32,
}

/// Flat exact nearest-neighbor index. Built by appending batches, persisted
/// once, then read-only for the rest of its life.
#[derive(Debug)]
pub struct VectorIndex {
	metric: Metric,
	dimension: usize,
	records: Vec<IndexRecord>,
	vectors: Vec<Vec<f32>>,
}

#[derive(Serialize, Deserialize)]
struct OnDiskIndex {
	version: u32,
	metric: Metric,
	dimension: usize,
	records: Vec<IndexRecord>,
	vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
	pub fn new(dimension: usize, metric: Metric) -> Result<Self> {
		if dimension == 0 {
			return Err(Error::ZeroDimension);
		}

		Ok(Self { metric, dimension, records: Vec::new(), vectors: Vec::new() })
	}

	pub fn metric(&self) -> Metric {
		self.metric
	}

	pub fn dimension(&self) -> usize {
		self.dimension
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn records(&self) -> &[IndexRecord] {
		&self.records
	}

	pub fn append(&mut self, records: Vec<IndexRecord>, vectors: Vec<Vec<f32>>) -> Result<()> {
		if records.len() != vectors.len() {
			return Err(Error::CountMismatch { records: records.len(), vectors: vectors.len() });
		}

		for vector in &vectors {
			if vector.len() != self.dimension {
				return Err(Error::DimensionMismatch {
					expected: self.dimension,
					got: vector.len(),
				});
			}
		}

		self.records.extend(records);
		self.vectors.extend(vectors);

		Ok(())
	}

	pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
		if query.len() != self.dimension {
			return Err(Error::DimensionMismatch { expected: self.dimension, got: query.len() });
		}

		let mut scored: Vec<(usize, f32)> = self
			.vectors
			.iter()
			.enumerate()
			.map(|(at, vector)| (at, self.metric.distance(query, vector)))
			.collect();

		scored.sort_by(|(a_at, a_distance), (b_at, b_distance)| {
			a_distance.total_cmp(b_distance).then(a_at.cmp(b_at))
		});
		scored.truncate(k);

		Ok(scored
			.into_iter()
			.enumerate()
			.map(|(rank, (at, distance))| {
				let record = &self.records[at];

				SearchHit {
					source: record.source.clone(),
					chunk_index: record.chunk_index,
					text: record.text.clone(),
					distance,
					rank: rank as u32,
				}
			})
			.collect())
	}

	/// Persists the full index under `dir`, creating the directory if absent.
	/// The file appears atomically: content is written to a temp file first
	/// and renamed into place.
	pub fn save(&self, dir: &Path) -> Result<()> {
		fs::create_dir_all(dir)
			.map_err(|err| Error::Write { path: dir.to_path_buf(), source: err })?;

		let on_disk = OnDiskIndex {
			version: FORMAT_VERSION,
			metric: self.metric,
			dimension: self.dimension,
			records: self.records.clone(),
			vectors: self.vectors.clone(),
		};
		let payload = serde_json::to_vec(&on_disk)?;
		let path = dir.join(INDEX_FILE);
		let staging = dir.join(format!("{INDEX_FILE}.tmp"));

		fs::write(&staging, payload)
			.map_err(|err| Error::Write { path: staging.clone(), source: err })?;
		fs::rename(&staging, &path).map_err(|err| Error::Write { path, source: err })?;

		Ok(())
	}

	pub fn load(dir: &Path) -> Result<Self> {
		let path = dir.join(INDEX_FILE);

		if !path.exists() {
			return Err(Error::Missing { path });
		}

		let raw =
			fs::read_to_string(&path).map_err(|err| Error::Read { path: path.clone(), source: err })?;
		let on_disk: OnDiskIndex = serde_json::from_str(&raw)?;

		if on_disk.version != FORMAT_VERSION {
			return Err(Error::UnsupportedVersion {
				found: on_disk.version,
				expected: FORMAT_VERSION,
			});
		}
		if on_disk.dimension == 0 {
			return Err(Error::ZeroDimension);
		}
		if on_disk.records.len() != on_disk.vectors.len() {
			return Err(Error::CountMismatch {
				records: on_disk.records.len(),
				vectors: on_disk.vectors.len(),
			});
		}

		for vector in &on_disk.vectors {
			if vector.len() != on_disk.dimension {
				return Err(Error::DimensionMismatch {
					expected: on_disk.dimension,
					got: vector.len(),
				});
			}
		}

		Ok(Self {
			metric: on_disk.metric,
			dimension: on_disk.dimension,
			records: on_disk.records,
			vectors: on_disk.vectors,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(source: &str, chunk_index: u32, text: &str) -> IndexRecord {
		IndexRecord { source: source.to_string(), chunk_index, text: text.to_string() }
	}

	fn sample_index() -> VectorIndex {
		let mut index = VectorIndex::new(2, Metric::Euclidean).unwrap();

		index
			.append(
				vec![record("a.txt", 0, "origin"), record("a.txt", 1, "near"), record("b.txt", 0, "far")],
				vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 10.0]],
			)
			.unwrap();

		index
	}

	#[test]
	fn search_orders_hits_by_distance() {
		let index = sample_index();
		let hits = index.search(&[0.1, 0.0], 3).unwrap();

		assert_eq!(hits.len(), 3);
		assert_eq!(hits[0].text, "origin");
		assert_eq!(hits[1].text, "near");
		assert_eq!(hits[2].text, "far");

		for pair in hits.windows(2) {
			assert!(pair[0].distance <= pair[1].distance);
		}
		for (expected, hit) in hits.iter().enumerate() {
			assert_eq!(hit.rank, expected as u32);
		}
	}

	#[test]
	fn search_never_returns_more_than_k() {
		let index = sample_index();

		assert_eq!(index.search(&[0.0, 0.0], 2).unwrap().len(), 2);
		assert_eq!(index.search(&[0.0, 0.0], 0).unwrap().len(), 0);
	}

	#[test]
	fn search_returns_everything_when_k_exceeds_len() {
		let index = sample_index();

		assert_eq!(index.search(&[0.0, 0.0], 50).unwrap().len(), 3);
	}

	#[test]
	fn search_rejects_a_mismatched_query_dimension() {
		let index = sample_index();

		assert!(matches!(
			index.search(&[0.0, 0.0, 0.0], 1),
			Err(Error::DimensionMismatch { expected: 2, got: 3 })
		));
	}

	#[test]
	fn append_rejects_mismatched_vector_dimensions() {
		let mut index = VectorIndex::new(2, Metric::Cosine).unwrap();
		let result = index.append(vec![record("a.txt", 0, "x")], vec![vec![1.0, 2.0, 3.0]]);

		assert!(matches!(result, Err(Error::DimensionMismatch { expected: 2, got: 3 })));
		assert!(index.is_empty());
	}

	#[test]
	fn append_rejects_mismatched_counts() {
		let mut index = VectorIndex::new(2, Metric::Cosine).unwrap();
		let result = index.append(vec![record("a.txt", 0, "x")], Vec::new());

		assert!(matches!(result, Err(Error::CountMismatch { records: 1, vectors: 0 })));
	}

	#[test]
	fn zero_dimension_is_rejected() {
		assert!(matches!(VectorIndex::new(0, Metric::Cosine), Err(Error::ZeroDimension)));
	}
}
