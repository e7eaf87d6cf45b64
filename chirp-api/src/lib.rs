mod backend;
pub use backend::Backend;

mod error;
pub use error::Error;

mod thread;
pub use thread::{nest_records, Forest};

/// Hash-derived identifier of a tweet, unique within one event's data
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn stub() -> ThreadId {
        ThreadId(String::from("ffffffffffffffffffffffffffffffff"))
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A post or comment as exchanged with the backend.
///
/// The same shape is used for flat records (with `reply_to_hash_id` set and
/// `comments` empty) and for nested forests (`comments` filled in).
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Tweet {
    pub hash_id: ThreadId,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub tweet_time: String,

    /// Only searched field. `None` for malformed records
    #[serde(default)]
    pub content: Option<String>,

    /// Simulation round this tweet was produced in. `None` for malformed records
    #[serde(default)]
    pub depth: Option<u32>,

    #[serde(default)]
    pub likes: Vec<String>,

    #[serde(default)]
    pub reply_to_hash_id: Option<ThreadId>,

    /// Replies in chronological order
    #[serde(default)]
    pub comments: Vec<Tweet>,

    /// Number of transitive replies, only set on roots of a nested forest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_comments: Option<usize>,
}

impl Tweet {
    pub fn new(hash_id: ThreadId, author: String, content: String, depth: u32) -> Tweet {
        Tweet {
            hash_id,
            author,
            tweet_time: String::new(),
            content: Some(content),
            depth: Some(depth),
            likes: Vec::new(),
            reply_to_hash_id: None,
            comments: Vec::new(),
            total_comments: None,
        }
    }

    pub fn reply_to(mut self, parent: ThreadId) -> Tweet {
        self.reply_to_hash_id = Some(parent);
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default)]
    pub online: bool,
}

impl Agent {
    pub fn from_new(a: NewAgent) -> Agent {
        Agent {
            name: a.name,
            occupation: a.occupation,
            experience: a.experience,
            character: a.character,
            interest: a.interest,
            // freshly added agents start offline
            online: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewAgent {
    pub name: String,
    pub occupation: String,
    pub experience: String,
    pub character: String,
    pub interest: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AgentUpdate {
    pub name: String,
    pub occupation: String,
    pub experience: String,
    pub character: String,
    pub interest: String,
    pub online: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub author: String,
    pub content: String,
}

/// Everything the dashboard needs to display one event
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EventSnapshot {
    pub tweets: Vec<Tweet>,
    pub agents: Vec<Agent>,
    /// Deepest simulation round materialized so far
    pub max_depth: u32,
}

/// An event selected from the event list.
///
/// The backend addresses projects by the 1-based position of their event in
/// the saved event list.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Project {
    pub index: usize,
    pub event: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct LoadEvent {
    pub event: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct SimulateRequest {
    pub depth: u32,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct DeletePost {
    pub hash_id: ThreadId,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct AgentName {
    pub name: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct ToggleOnline {
    pub name: String,
    pub online: bool,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct EventList {
    pub events: Vec<String>,
}
