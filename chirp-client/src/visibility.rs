use crate::{api::ThreadId, count_matches, Comment, Filter, Post};

/// Display decision for one comment, mirroring the shape of the comment tree
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentVisibility {
    pub visible: bool,
    pub children: Vec<CommentVisibility>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostView {
    pub id: ThreadId,
    pub visible: bool,

    /// Shown as the post's comment-count badge
    pub match_count: usize,

    pub comments: Vec<CommentVisibility>,
}

/// Result of a filter pass over every loaded post, in display order.
///
/// Nodes are never removed from the tree: the renderer reads the flags here
/// to decide what to show.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct View {
    pub posts: Vec<PostView>,
}

/// A comment is shown if it matches or if anything below it is shown.
///
/// This is an OR-reduction along the path to a match: the depth limit only
/// bounds which nodes may originate a match, so an ancestor deeper than the
/// limit is still displayed when one of its descendants matches.
pub fn comment_visibility(c: &Comment, filter: &Filter) -> CommentVisibility {
    let children = c
        .children
        .iter()
        .map(|child| comment_visibility(child, filter))
        .collect::<Vec<_>>();
    let visible = filter.matches_comment(c) || children.iter().any(|child| child.visible);
    CommentVisibility { visible, children }
}

pub fn post_view(p: &Post, filter: &Filter) -> PostView {
    let comments = p
        .comments
        .iter()
        .map(|c| comment_visibility(c, filter))
        .collect::<Vec<_>>();
    PostView {
        id: p.id.clone(),
        visible: filter.matches_post(p) || comments.iter().any(|c| c.visible),
        match_count: count_matches(p, filter),
        comments,
    }
}

fn all_visible(c: &Comment) -> CommentVisibility {
    CommentVisibility {
        visible: true,
        children: c.children.iter().map(all_visible).collect(),
    }
}

impl View {
    /// Runs the full pass: propagation and counting over every post
    pub fn compute(posts: &[Post], filter: &Filter) -> View {
        let view = View {
            posts: posts.iter().map(|p| post_view(p, filter)).collect(),
        };
        tracing::debug!(
            depth_limit = filter.depth_limit(),
            query = filter.query(),
            visible_posts = view.visible_posts().count(),
            "ran filter pass"
        );
        view
    }

    /// What is displayed right after a load, before any filter pass: every
    /// node shown, badges from the backend's comment totals
    pub fn unfiltered(posts: &[Post]) -> View {
        View {
            posts: posts
                .iter()
                .map(|p| PostView {
                    id: p.id.clone(),
                    visible: true,
                    match_count: p.total_comments,
                    comments: p.comments.iter().map(all_visible).collect(),
                })
                .collect(),
        }
    }

    pub fn visible_posts(&self) -> impl Iterator<Item = &PostView> {
        self.posts.iter().filter(|p| p.visible)
    }
}

impl PostView {
    /// Number of comment nodes rendered visible, which may differ from
    /// `match_count` when ancestors are shown through propagation
    pub fn visible_comments(&self) -> usize {
        fn count(v: &[CommentVisibility]) -> usize {
            v.iter()
                .map(|c| usize::from(c.visible) + count(&c.children))
                .sum()
        }
        count(&self.comments)
    }
}
