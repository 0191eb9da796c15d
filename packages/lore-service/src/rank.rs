use lore_index::SearchHit;

/// Reorders retrieval candidates by descending rerank score and keeps the
/// best `top_n`. Ties keep the original retrieval order. Scores must be
/// aligned with candidates; the result never exceeds `top_n` and is never
/// padded.
pub(crate) fn select_top(candidates: Vec<SearchHit>, scores: &[f32], top_n: usize) -> Vec<SearchHit> {
	let mut scored: Vec<(SearchHit, f32)> =
		candidates.into_iter().zip(scores.iter().copied()).collect();

	scored.sort_by(|(a, a_score), (b, b_score)| {
		b_score.total_cmp(a_score).then(a.rank.cmp(&b.rank))
	});
	scored.truncate(top_n);

	scored.into_iter().map(|(hit, _)| hit).collect()
}
