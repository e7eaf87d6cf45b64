mod count;
pub use count::count_matches;

mod depth;
pub use depth::{DepthChange, DepthControl, DepthState};

mod error;
pub use error::Error;

mod events;
pub use events::EventList;

mod filter;
pub use filter::{Filter, MAX_DEPTH};

mod session;
pub use session::{Session, SessionOptions};

mod thread;
pub use thread::{Comment, Descendants, Post};

mod visibility;
pub use visibility::{CommentVisibility, PostView, View};

pub mod api {
    pub use chirp_api::*;
}
