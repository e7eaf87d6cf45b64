use async_trait::async_trait;

use crate::{AgentUpdate, Error, EventSnapshot, NewAgent, NewPost, Project, ThreadId};

/// The server that stores simulation results and runs simulations.
///
/// Every method is a single request-response exchange: no retry, no
/// coalescing, no cancellation.
#[async_trait]
pub trait Backend {
    async fn list_events(&mut self) -> Result<Vec<String>, Error>;
    async fn save_events(&mut self, events: Vec<String>) -> Result<(), Error>;

    /// Loads (creating on first access) the data for an event
    async fn load_event(&mut self, event: &str) -> Result<EventSnapshot, Error>;

    /// Materializes the simulation of `project` up to `depth`, then returns
    /// the reloaded event data
    async fn simulate(&mut self, project: &Project, depth: u32) -> Result<EventSnapshot, Error>;

    async fn add_post(&mut self, project: &Project, post: NewPost) -> Result<(), Error>;
    async fn delete_post(&mut self, project: &Project, id: &ThreadId) -> Result<(), Error>;

    async fn add_agent(&mut self, project: &Project, agent: NewAgent) -> Result<(), Error>;
    async fn update_agent(&mut self, project: &Project, agent: AgentUpdate) -> Result<(), Error>;
    async fn delete_agent(&mut self, project: &Project, name: &str) -> Result<(), Error>;
    async fn toggle_agent_online(
        &mut self,
        project: &Project,
        name: &str,
        online: bool,
    ) -> Result<(), Error>;
}
