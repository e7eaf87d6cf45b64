use crate::api::{self, ThreadId};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    pub id: ThreadId,
    pub author: String,
    pub timestamp: String,

    /// `None` if the backend sent a malformed record
    pub content: Option<String>,

    /// Distance from the owning post, `None` if the backend sent a malformed
    /// record
    pub depth: Option<u32>,

    /// Replies in display order
    pub children: Vec<Comment>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Post {
    pub id: ThreadId,
    pub author: String,
    pub timestamp: String,
    pub content: Option<String>,
    pub likes: Vec<String>,

    /// Comment count as sent by the backend, shown until the first filter pass
    pub total_comments: usize,

    /// Top-level comments in display order
    pub comments: Vec<Comment>,
}

impl From<api::Tweet> for Comment {
    fn from(t: api::Tweet) -> Comment {
        Comment {
            id: t.hash_id,
            author: t.author,
            timestamp: t.tweet_time,
            content: t.content,
            depth: t.depth,
            children: t.comments.into_iter().map(Comment::from).collect(),
        }
    }
}

impl From<api::Tweet> for Post {
    fn from(t: api::Tweet) -> Post {
        let comments = t
            .comments
            .into_iter()
            .map(Comment::from)
            .collect::<Vec<_>>();
        let mut post = Post {
            id: t.hash_id,
            author: t.author,
            timestamp: t.tweet_time,
            content: t.content,
            likes: t.likes,
            total_comments: 0,
            comments,
        };
        post.total_comments = t
            .total_comments
            .unwrap_or_else(|| post.descendants().count());
        post
    }
}

impl Post {
    /// Every comment under this post, at any nesting level, in pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.comments.iter().rev().collect(),
        }
    }
}

/// Flat walk over a comment forest.
///
/// Uses an explicit stack so that arbitrarily deep threads are walked
/// without recursion.
pub struct Descendants<'a> {
    stack: Vec<&'a Comment>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Comment;

    fn next(&mut self) -> Option<&'a Comment> {
        let c = self.stack.pop()?;
        self.stack.extend(c.children.iter().rev());
        Some(c)
    }
}
