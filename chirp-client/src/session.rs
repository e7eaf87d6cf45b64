use crate::{
    api::{Agent, AgentUpdate, Backend, EventSnapshot, NewAgent, NewPost, Project, ThreadId},
    DepthChange, DepthControl, Error, Filter, Post, View,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionOptions {
    /// Re-run the filter pass when a pending depth change is cancelled.
    /// When false the view keeps showing the cancelled depth until the next
    /// depth change or search.
    pub refilter_on_cancel: bool,
}

impl Default for SessionOptions {
    fn default() -> SessionOptions {
        SessionOptions {
            refilter_on_cancel: true,
        }
    }
}

/// Everything displayed for the selected event.
///
/// Created by a load, replaced wholesale by every reload, dropped when
/// another event is selected.
#[derive(Clone, Debug)]
pub struct Session {
    project: Project,
    posts: Vec<Post>,
    agents: Vec<Agent>,
    filter: Filter,
    depth: DepthControl,
    view: View,
    options: SessionOptions,
}

impl Session {
    pub async fn load<B: Backend + ?Sized>(
        backend: &mut B,
        project: Project,
        options: SessionOptions,
    ) -> Result<Session, Error> {
        let snapshot = backend.load_event(&project.event).await?;
        Ok(Session::from_snapshot(project, snapshot, options))
    }

    pub fn from_snapshot(
        project: Project,
        snapshot: EventSnapshot,
        options: SessionOptions,
    ) -> Session {
        tracing::info!(
            project = project.index,
            posts = snapshot.tweets.len(),
            agents = snapshot.agents.len(),
            max_depth = snapshot.max_depth,
            "loaded event data"
        );
        let posts = snapshot
            .tweets
            .into_iter()
            .map(Post::from)
            .collect::<Vec<_>>();
        let depth = DepthControl::new(snapshot.max_depth);
        Session {
            project,
            filter: Filter::new(depth.working_depth(), ""),
            view: View::unfiltered(&posts),
            posts,
            agents: snapshot.agents,
            depth,
            options,
        }
    }

    fn replace(&mut self, snapshot: EventSnapshot) {
        *self = Session::from_snapshot(self.project.clone(), snapshot, self.options);
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Follows the event to its new position in the event list. Requests
    /// address the event by position, so this must happen before any other
    /// request once an earlier event is removed.
    pub fn renumber(&mut self, index: usize) {
        tracing::debug!(from = self.project.index, to = index, "event renumbered");
        self.project.index = index;
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn depth(&self) -> &DepthControl {
        &self.depth
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Re-fetches the event data. On failure the current data is kept.
    pub async fn reload<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<(), Error> {
        let snapshot = backend.load_event(&self.project.event).await?;
        self.replace(snapshot);
        Ok(())
    }

    pub fn refilter(&mut self) {
        self.view = View::compute(&self.posts, &self.filter);
    }

    pub fn increase_depth(&mut self) -> Result<DepthChange, Error> {
        let change = self.depth.increase()?;
        self.apply_depth(change);
        Ok(change)
    }

    pub fn decrease_depth(&mut self) -> Result<DepthChange, Error> {
        let change = self.depth.decrease()?;
        self.apply_depth(change);
        Ok(change)
    }

    // The working depth drives the filter even while confirmation is pending
    fn apply_depth(&mut self, change: DepthChange) {
        if let Some(d) = change.new_depth() {
            self.filter.set_depth_limit(d);
            self.refilter();
        }
    }

    pub fn submit_search(&mut self, query: &str) {
        self.filter.set_query(query);
        self.refilter();
    }

    /// Asks the backend to simulate up to the pending depth and swaps in the
    /// result. On failure the tree is kept and the depth goes back to the
    /// last committed value.
    pub async fn confirm_depth<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<(), Error> {
        let depth = self.depth.confirm()?;
        tracing::info!(project = self.project.index, depth, "requesting re-simulation");
        match backend.simulate(&self.project, depth).await {
            Ok(snapshot) => {
                self.replace(snapshot);
                Ok(())
            }
            Err(err) => {
                let reverted = self.depth.simulation_failed();
                tracing::warn!(?err, reverted, "re-simulation failed");
                self.filter.set_depth_limit(reverted);
                self.refilter();
                Err(err.into())
            }
        }
    }

    pub fn cancel_depth(&mut self) -> Result<u32, Error> {
        let reverted = self.depth.cancel()?;
        self.filter.set_depth_limit(reverted);
        if self.options.refilter_on_cancel {
            self.refilter();
        }
        Ok(reverted)
    }

    pub async fn add_post<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        author: &str,
        content: &str,
    ) -> Result<(), Error> {
        if author.trim().is_empty() || content.trim().is_empty() {
            return Err(Error::EmptyPost);
        }
        let post = NewPost {
            author: author.to_string(),
            content: content.to_string(),
        };
        backend.add_post(&self.project, post).await?;
        self.reload(backend).await
    }

    /// Removes the post locally once the backend has deleted it, without a
    /// reload
    pub async fn delete_post<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        id: &ThreadId,
    ) -> Result<(), Error> {
        backend.delete_post(&self.project, id).await?;
        self.posts.retain(|p| p.id != *id);
        self.view.posts.retain(|p| p.id != *id);
        Ok(())
    }

    pub async fn add_agent<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        agent: NewAgent,
    ) -> Result<(), Error> {
        backend.add_agent(&self.project, agent).await?;
        self.reload(backend).await
    }

    pub async fn update_agent<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        agent: AgentUpdate,
    ) -> Result<(), Error> {
        backend.update_agent(&self.project, agent).await?;
        self.reload(backend).await
    }

    pub async fn delete_agent<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        name: &str,
    ) -> Result<(), Error> {
        backend.delete_agent(&self.project, name).await?;
        self.reload(backend).await
    }

    pub async fn toggle_agent_online<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        name: &str,
        online: bool,
    ) -> Result<(), Error> {
        backend.toggle_agent_online(&self.project, name, online).await?;
        self.reload(backend).await
    }
}
