use crate::{Comment, Post};

/// Upper bound of the depth slider
pub const MAX_DEPTH: u32 = 5;

/// The two live filter inputs: which depths may originate a match, and which
/// text they must contain
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    depth_limit: u32,

    // stored lowercased
    query: String,
}

impl Filter {
    pub fn new(depth_limit: u32, query: &str) -> Filter {
        Filter {
            depth_limit: depth_limit.min(MAX_DEPTH),
            query: query.to_lowercase(),
        }
    }

    pub fn depth_limit(&self) -> u32 {
        self.depth_limit
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_depth_limit(&mut self, depth_limit: u32) {
        self.depth_limit = depth_limit.min(MAX_DEPTH);
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_lowercase();
    }

    /// Case-insensitive substring test. Missing content never matches, not
    /// even the empty query.
    fn text_matches(&self, content: Option<&str>) -> bool {
        match content {
            None => false,
            Some(_) if self.query.is_empty() => true,
            Some(text) => text.to_lowercase().contains(&self.query),
        }
    }

    pub fn matches_comment(&self, c: &Comment) -> bool {
        match c.depth {
            Some(d) => d <= self.depth_limit && self.text_matches(c.content.as_deref()),
            None => false,
        }
    }

    /// Posts sit at depth 0 and are always depth-eligible
    pub fn matches_post(&self, p: &Post) -> bool {
        self.text_matches(p.content.as_deref())
    }
}
