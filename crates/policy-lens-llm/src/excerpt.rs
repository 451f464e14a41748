//! Bounded contract excerpts sent to the model.

/// Characters of contract text included in an analysis prompt.
pub const DEFAULT_EXCERPT_BUDGET: usize = 3000;

/// First `budget` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
