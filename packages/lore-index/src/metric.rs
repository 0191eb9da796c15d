use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
	Cosine,
	Euclidean,
}

impl Metric {
	pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
		match self {
			Self::Cosine => cosine_distance(a, b),
			Self::Euclidean => euclidean_distance(a, b),
		}
	}
}

impl std::str::FromStr for Metric {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"cosine" => Ok(Self::Cosine),
			"euclidean" => Ok(Self::Euclidean),
			other => Err(Error::UnknownMetric { value: other.to_string() }),
		}
	}
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
	let mag_a = magnitude(a);
	let mag_b = magnitude(b);

	// A zero-magnitude vector has no direction; treat it as maximally distant.
	if mag_a == 0.0 || mag_b == 0.0 {
		return 1.0;
	}

	1.0 - dot / (mag_a * mag_b)
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

fn magnitude(v: &[f32]) -> f32 {
	v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cosine_distance_is_zero_for_parallel_vectors() {
		let distance = Metric::Cosine.distance(&[1.0, 2.0], &[2.0, 4.0]);

		assert!(distance.abs() < 1e-6);
	}

	#[test]
	fn cosine_distance_is_one_for_orthogonal_vectors() {
		let distance = Metric::Cosine.distance(&[1.0, 0.0], &[0.0, 1.0]);

		assert!((distance - 1.0).abs() < 1e-6);
	}

	#[test]
	fn cosine_distance_handles_zero_vectors() {
		assert_eq!(Metric::Cosine.distance(&[0.0, 0.0], &[1.0, 1.0]), 1.0);
	}

	#[test]
	fn euclidean_distance_matches_the_textbook_value() {
		let distance = Metric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);

		assert!((distance - 5.0).abs() < 1e-6);
	}

	#[test]
	fn parses_metric_names() {
		assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
		assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
		assert!("dot".parse::<Metric>().is_err());
	}
}
