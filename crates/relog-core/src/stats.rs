/// Anything that contributes a numeric score to aggregate statistics.
///
/// For log records the score is the response latency in milliseconds, but the
/// functions below work for any scored entity.
pub trait Score {
    fn score(&self) -> i64;
}

impl Score for i64 {
    fn score(&self) -> i64 {
        *self
    }
}

/// Sum of all scores. Returns 0 for empty input.
pub fn sum<T: Score>(items: &[T]) -> i64 {
    items.iter().map(|item| item.score()).sum()
}

/// Arithmetic mean of the scores.
///
/// Defined as exactly 0.0 for empty input rather than dividing by zero.
pub fn average<T: Score>(items: &[T]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    sum(items) as f64 / items.len() as f64
}

/// The `count` items with the highest scores, in ascending score order
/// (largest last).
///
/// `count == 0` or `count >= items.len()` means no truncation: all items are
/// returned in their original input order. Ties are broken by a stable sort,
/// so items with equal scores keep their input relative order.
pub fn top<T: Score + Clone>(items: &[T], count: usize) -> Vec<T> {
    if items.len() <= count || count == 0 {
        return items.to_vec();
    }
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.score());
    sorted.split_off(sorted.len() - count)
}

/// The `count` items with the lowest scores, in descending score order
/// (smallest last).
///
/// Same truncation and tie-break rules as [`top`]: the sort is stable and
/// `count == 0` or `count >= items.len()` returns the input untouched.
pub fn bottom<T: Score + Clone>(items: &[T], count: usize) -> Vec<T> {
    if items.len() <= count || count == 0 {
        return items.to_vec();
    }
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.score().cmp(&a.score()));
    sorted.split_off(sorted.len() - count)
}
