use crate::Score;

/// Whether a finished session's `score` should replace the stored `best`.
///
/// Any score beats a missing record; otherwise only a strictly greater score does.
pub fn is_new_high_score(score: Score, best: Option<Score>) -> bool {
    best.is_none_or(|best| score > best)
}
