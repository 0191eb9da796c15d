#[derive(Clone, Debug)]
pub struct ChunkingConfig {
	pub chunk_size: usize,
	pub chunk_overlap: usize,
	/// Separators in priority order. An empty string hard-splits at the
	/// character level and guarantees every piece fits the budget.
	pub separators: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
	pub chunk_index: u32,
	pub text: String,
}

pub fn split_text(text: &str, cfg: &ChunkingConfig) -> Vec<Chunk> {
	let budget = cfg.chunk_size.saturating_sub(cfg.chunk_overlap).max(1);
	let pieces = split_pieces(text, &cfg.separators, budget);

	merge_pieces(&pieces, cfg)
		.into_iter()
		.enumerate()
		.map(|(index, text)| Chunk { chunk_index: index as u32, text })
		.collect()
}

fn split_pieces(text: &str, separators: &[String], budget: usize) -> Vec<String> {
	if text.is_empty() {
		return Vec::new();
	}
	if char_len(text) <= budget {
		return vec![text.to_string()];
	}

	// Out of separators: the piece is atomic and may exceed the budget.
	let Some((separator, rest)) = separators.split_first() else {
		return vec![text.to_string()];
	};

	if separator.is_empty() {
		return hard_split(text, budget);
	}

	let mut pieces = Vec::new();

	for part in split_keeping_separator(text, separator) {
		if char_len(&part) <= budget {
			pieces.push(part);
		} else {
			pieces.extend(split_pieces(&part, rest, budget));
		}
	}

	pieces
}

fn merge_pieces(pieces: &[String], cfg: &ChunkingConfig) -> Vec<String> {
	let mut chunks = Vec::new();
	let mut current = String::new();
	let mut current_len = 0_usize;
	// Characters at the head of `current` carried over from the previous chunk.
	let mut carried = 0_usize;

	for piece in pieces {
		let piece_len = char_len(piece);

		if current_len > carried && current_len + piece_len > cfg.chunk_size {
			chunks.push(current.clone());

			let tail = overlap_tail(&current, cfg.chunk_overlap);

			carried = char_len(&tail);
			current = tail;
			current_len = carried;
		}

		current.push_str(piece);

		current_len += piece_len;
	}

	if current_len > carried {
		chunks.push(current);
	}

	chunks
}

fn overlap_tail(text: &str, overlap: usize) -> String {
	if overlap == 0 {
		return String::new();
	}

	let start = text.char_indices().rev().nth(overlap - 1).map(|(at, _)| at).unwrap_or(0);

	text[start..].to_string()
}

fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
	let mut parts = Vec::new();
	let mut start = 0_usize;

	for (at, _) in text.match_indices(separator) {
		let end = at + separator.len();

		parts.push(text[start..end].to_string());

		start = end;
	}

	if start < text.len() {
		parts.push(text[start..].to_string());
	}

	parts
}

fn hard_split(text: &str, budget: usize) -> Vec<String> {
	let mut pieces = Vec::new();
	let mut current = String::new();
	let mut count = 0_usize;

	for ch in text.chars() {
		current.push(ch);

		count += 1;

		if count == budget {
			pieces.push(std::mem::take(&mut current));

			count = 0;
		}
	}

	if !current.is_empty() {
		pieces.push(current);
	}

	pieces
}

fn char_len(text: &str) -> usize {
	text.chars().count()
}
