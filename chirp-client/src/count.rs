use crate::{Filter, Post};

/// Number of comments anywhere under `post` that match `filter` by themselves.
///
/// This walks the descendants as a flat set and ignores propagated
/// visibility: an ancestor displayed only because of a deeper match is not
/// counted.
pub fn count_matches(post: &Post, filter: &Filter) -> usize {
    post.descendants()
        .filter(|c| filter.matches_comment(c))
        .count()
}
