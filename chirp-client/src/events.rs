use crate::{
    api::{Backend, Project},
    Error,
};

/// The saved list of event descriptions.
///
/// Projects are numbered from 1 in list order, so removing an event renumbers
/// every event after it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EventList {
    events: Vec<String>,
}

impl EventList {
    pub fn new(events: Vec<String>) -> EventList {
        EventList { events }
    }

    pub async fn load<B: Backend + ?Sized>(backend: &mut B) -> Result<EventList, Error> {
        let events = backend.list_events().await?;
        tracing::debug!(events = events.len(), "loaded event list");
        Ok(EventList { events })
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn projects(&self) -> impl Iterator<Item = Project> + '_ {
        self.events.iter().enumerate().map(|(i, e)| Project {
            index: i + 1,
            event: e.clone(),
        })
    }

    pub fn select(&self, index: usize) -> Result<Project, Error> {
        index
            .checked_sub(1)
            .and_then(|i| self.events.get(i))
            .map(|event| Project {
                index,
                event: event.clone(),
            })
            .ok_or(Error::Api(crate::api::Error::UnknownProject(index)))
    }

    pub fn first(&self) -> Option<Project> {
        self.select(1).ok()
    }

    /// Appends an event and saves the list. Blank descriptions are ignored
    /// and return `None`.
    pub async fn add<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        event: &str,
    ) -> Result<Option<Project>, Error> {
        let event = event.trim();
        if event.is_empty() {
            return Ok(None);
        }
        self.events.push(event.to_string());
        if let Err(e) = backend.save_events(self.events.clone()).await {
            self.events.pop();
            return Err(e.into());
        }
        tracing::info!(index = self.events.len(), event, "added event");
        Ok(Some(Project {
            index: self.events.len(),
            event: event.to_string(),
        }))
    }

    /// Removes the event at this 1-based index and saves the list, returning
    /// the removed description
    pub async fn remove<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        index: usize,
    ) -> Result<String, Error> {
        let i = self.select(index)?.index - 1;
        let removed = self.events.remove(i);
        if let Err(e) = backend.save_events(self.events.clone()).await {
            self.events.insert(i, removed);
            return Err(e.into());
        }
        tracing::info!(index, event = %removed, "removed event");
        Ok(removed)
    }
}
