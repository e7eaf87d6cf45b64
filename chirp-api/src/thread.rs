use std::collections::HashMap;

use crate::Tweet;

/// Nested tweets, as served to the dashboard
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Forest {
    pub tweets: Vec<Tweet>,
    pub max_depth: u32,
}

/// Attaches flat records to their parents, preserving input order among
/// siblings.
///
/// Records whose parent cannot be found are dropped. Every returned root has
/// its `total_comments` set.
pub fn nest_records(records: Vec<Tweet>) -> Forest {
    let max_depth = records
        .iter()
        .map(|r| r.depth.unwrap_or(0))
        .max()
        .unwrap_or(0);

    let mut index = HashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        index.entry(r.hash_id.clone()).or_insert(i);
    }

    let mut roots = Vec::new();
    let mut children = vec![Vec::new(); records.len()];
    for (i, r) in records.iter().enumerate() {
        match &r.reply_to_hash_id {
            None => roots.push(i),
            Some(parent) => match index.get(parent) {
                Some(&p) => children[p].push(i),
                None => tracing::warn!(
                    hash_id = %r.hash_id,
                    reply_to = %parent,
                    "dropping reply whose parent tweet was not found"
                ),
            },
        }
    }

    let mut slots = records.into_iter().map(Some).collect::<Vec<_>>();
    let tweets = roots
        .into_iter()
        .filter_map(|r| assemble(r, &mut slots, &children))
        .map(|mut t| {
            t.total_comments = Some(count_comments(&t));
            t
        })
        .collect();

    Forest { tweets, max_depth }
}

// Each slot is taken at most once, so reply cycles cannot recurse forever
fn assemble(i: usize, slots: &mut [Option<Tweet>], children: &[Vec<usize>]) -> Option<Tweet> {
    let mut t = slots[i].take()?;
    t.comments = children[i]
        .iter()
        .filter_map(|&c| assemble(c, slots, children))
        .collect();
    Some(t)
}

fn count_comments(t: &Tweet) -> usize {
    t.comments.len() + t.comments.iter().map(count_comments).sum::<usize>()
}
