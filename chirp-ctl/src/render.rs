use std::fmt::Write;

use chirp_client::{
    api::Agent, Comment, CommentVisibility, DepthControl, DepthState, EventList, Post, Session,
    MAX_DEPTH,
};

const INDENT: &str = "    ";

fn text(content: &Option<String>) -> &str {
    content.as_deref().unwrap_or("<no content>")
}

fn comments(out: &mut String, nodes: &[Comment], vis: &[CommentVisibility], level: usize) {
    for (c, v) in nodes.iter().zip(vis) {
        if !v.visible {
            continue;
        }
        let _ = writeln!(
            out,
            "{}└ {} ({}): {}",
            INDENT.repeat(level),
            c.author,
            c.timestamp,
            text(&c.content)
        );
        comments(out, &c.children, &v.children, level + 1);
    }
}

/// Visible posts with their visible comments, indented by nesting level
pub fn threads(session: &Session) -> String {
    let mut out = String::new();
    let posts = session.posts().iter().zip(&session.view().posts);
    for (post, view) in posts.filter(|(_, v)| v.visible) {
        let _ = writeln!(out, "{}", post_header(post, view.match_count));
        comments(&mut out, &post.comments, &view.comments, 1);
    }
    if out.is_empty() {
        out.push_str("nothing to show\n");
    }
    out
}

fn post_header(post: &Post, badge: usize) -> String {
    format!(
        "[{}] {} ({}): {}  💬 {} ♥ {}",
        post.id,
        post.author,
        post.timestamp,
        text(&post.content),
        badge,
        post.likes.len()
    )
}

/// The depth slider: filled up to the working depth, shaded up to the
/// baseline
pub fn slider(depth: &DepthControl) -> String {
    let (working_stop, baseline_stop) = depth.gradient();
    let bar = (1..=MAX_DEPTH)
        .map(|d| f64::from(d) * 100.0 / f64::from(MAX_DEPTH))
        .map(|at| match (at <= working_stop, at <= baseline_stop) {
            (true, _) => '█',
            (false, true) => '▒',
            (false, false) => '░',
        })
        .collect::<String>();
    let working = depth.working_depth();
    let state = match depth.state() {
        DepthState::Settled(_) => String::new(),
        DepthState::PendingConfirmation(d) => {
            format!("  re-simulate up to depth {d}? [y/n]")
        }
        DepthState::Simulating(d) => format!("  simulating up to depth {d}..."),
    };
    format!("depth {working}/{MAX_DEPTH} [{bar}]{state}")
}

pub fn agents(agents: &[Agent]) -> String {
    let mut out = String::new();
    for a in agents {
        let _ = writeln!(
            out,
            "{} {} ({})",
            if a.online { "●" } else { "○" },
            a.name,
            a.occupation
        );
    }
    out
}

pub fn events(events: &EventList, current: Option<usize>) -> String {
    let mut out = String::new();
    for p in events.projects() {
        let marker = if Some(p.index) == current { '>' } else { ' ' };
        let _ = writeln!(out, "{marker}{:>3}. {}", p.index, p.event);
    }
    out
}
