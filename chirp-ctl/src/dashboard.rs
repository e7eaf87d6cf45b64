use anyhow::Context;
use chirp_client::{
    api::{AgentUpdate, Backend, Error, NewAgent},
    DepthChange, EventList, Session, SessionOptions,
};

use crate::{
    command::{AgentField, Command, HELP},
    render,
};

/// The interactive dashboard: the event list plus the session of the event
/// being viewed
pub struct Dashboard<B> {
    backend: B,
    events: EventList,
    session: Option<Session>,
    options: SessionOptions,
}

const NO_SESSION: &str = "no event is open, use `open <n>`";

fn screen(session: &Session) -> String {
    format!(
        "{}\n{}",
        render::slider(session.depth()),
        render::threads(session)
    )
}

impl<B: Backend> Dashboard<B> {
    /// Starts with the server's event list. A server that cannot list its
    /// events still gets a dashboard, with an empty list to add events to.
    pub async fn new(mut backend: B, options: SessionOptions) -> anyhow::Result<Dashboard<B>> {
        let events = match EventList::load(&mut backend).await {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(?err, "failed listing events, starting with an empty list");
                EventList::default()
            }
        };
        Ok(Dashboard {
            backend,
            events,
            session: None,
            options,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    async fn open(&mut self, index: usize) -> anyhow::Result<String> {
        let project = self.events.select(index)?;
        tracing::info!(index, event = %project.event, "opening event");
        let session = Session::load(&mut self.backend, project, self.options).await?;
        let out = format!("# {}\n{}", session.project().event, screen(&session));
        self.session = Some(session);
        Ok(out)
    }

    /// Runs one command, returning what to print
    pub async fn execute(&mut self, cmd: Command) -> anyhow::Result<String> {
        match cmd {
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
            Command::ListEvents => Ok(render::events(
                &self.events,
                self.session.as_ref().map(|s| s.project().index),
            )),
            Command::AddEvent(text) => match self.events.add(&mut self.backend, &text).await? {
                Some(p) => Ok(format!("added event {}", p.index)),
                None => Ok(String::from("empty event ignored")),
            },
            Command::RemoveEvent(index) => {
                let removed = self.events.remove(&mut self.backend, index).await?;
                let current = self.session.as_ref().map(|s| s.project().index);
                let mut out = format!("removed {removed:?}");
                match current {
                    Some(c) if c == index => self.session = None,
                    // later events moved up by one
                    Some(c) if c > index => {
                        self.session.as_mut().context(NO_SESSION)?.renumber(c - 1);
                        out.push_str(&format!(", current event is now number {}", c - 1));
                    }
                    _ => (),
                }
                Ok(out)
            }
            Command::Open(index) => self.open(index).await,
            cmd => self.execute_in_session(cmd).await,
        }
    }

    async fn execute_in_session(&mut self, cmd: Command) -> anyhow::Result<String> {
        let session = self.session.as_mut().context(NO_SESSION)?;
        let backend = &mut self.backend;
        match cmd {
            Command::IncreaseDepth | Command::DecreaseDepth => {
                let change = match cmd {
                    Command::IncreaseDepth => session.increase_depth()?,
                    _ => session.decrease_depth()?,
                };
                match change {
                    DepthChange::Unchanged => Ok(format!(
                        "already at depth {}",
                        session.depth().working_depth()
                    )),
                    _ => Ok(screen(session)),
                }
            }
            Command::Confirm => {
                session.confirm_depth(backend).await?;
                Ok(screen(session))
            }
            Command::Cancel => {
                let depth = session.cancel_depth()?;
                Ok(format!("back to depth {depth}\n{}", screen(session)))
            }
            Command::Search(query) => {
                session.submit_search(&query);
                Ok(screen(session))
            }
            Command::Show => Ok(screen(session)),
            Command::Reload => {
                session.reload(backend).await?;
                Ok(screen(session))
            }
            Command::AddPost { author, content } => {
                session.add_post(backend, &author, &content).await?;
                Ok(screen(session))
            }
            Command::DeletePost(id) => {
                session.delete_post(backend, &id).await?;
                Ok(format!("deleted post {id}"))
            }
            Command::ListAgents => Ok(render::agents(session.agents())),
            Command::AddAgent { name, occupation } => {
                let agent = NewAgent {
                    name,
                    occupation,
                    experience: String::new(),
                    character: String::new(),
                    interest: String::new(),
                };
                session.add_agent(backend, agent).await?;
                Ok(render::agents(session.agents()))
            }
            Command::SetAgent { name, field, value } => {
                let a = session
                    .agents()
                    .iter()
                    .find(|a| a.name == name)
                    .ok_or_else(|| Error::UnknownAgent(name.clone()))?;
                let mut update = AgentUpdate {
                    name: a.name.clone(),
                    occupation: a.occupation.clone(),
                    experience: a.experience.clone(),
                    character: a.character.clone(),
                    interest: a.interest.clone(),
                    online: a.online,
                };
                let slot = match field {
                    AgentField::Occupation => &mut update.occupation,
                    AgentField::Experience => &mut update.experience,
                    AgentField::Character => &mut update.character,
                    AgentField::Interest => &mut update.interest,
                };
                *slot = value;
                session.update_agent(backend, update).await?;
                Ok(render::agents(session.agents()))
            }
            Command::DeleteAgent(name) => {
                session.delete_agent(backend, &name).await?;
                Ok(render::agents(session.agents()))
            }
            Command::SetOnline { name, online } => {
                session.toggle_agent_online(backend, &name, online).await?;
                Ok(render::agents(session.agents()))
            }
            Command::Help
            | Command::Quit
            | Command::ListEvents
            | Command::AddEvent(_)
            | Command::RemoveEvent(_)
            | Command::Open(_) => Ok(String::new()),
        }
    }
}
