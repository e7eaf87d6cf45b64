use async_trait::async_trait;
use chirp_client::api::{
    AgentName, AgentUpdate, Backend, DeletePost, Error, EventList, EventSnapshot, LoadEvent,
    NewAgent, NewPost, Project, SimulateRequest, ThreadId, ToggleOnline,
};

lazy_static::lazy_static! {
    static ref CLIENT: reqwest::Client = reqwest::Client::new();
}

/// Talks to the simulation server over its JSON API
pub struct HttpBackend {
    host: String,
}

impl HttpBackend {
    pub fn new(host: String) -> HttpBackend {
        HttpBackend {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str, project: Option<&Project>) -> String {
        match project {
            None => format!("{}/api/{}", self.host, path),
            Some(p) => format!("{}/api/{}?project_name={}", self.host, path, p.index),
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        tracing::debug!(%status, "server returned an error");
        Err(Error::from_response_body(&body))
    }

    async fn post<T>(&self, path: &str, project: Option<&Project>, body: &T) -> Result<(), Error>
    where
        T: serde::Serialize + ?Sized,
    {
        self.send(CLIENT.post(self.url(path, project)).json(body)).await?;
        Ok(())
    }

    async fn fetch<R>(&self, req: reqwest::RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| Error::Unknown(format!("failed to parse data from server: {e}")))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_events(&mut self) -> Result<Vec<String>, Error> {
        let list: EventList = self.fetch(CLIENT.get(self.url("events", None))).await?;
        Ok(list.events)
    }

    async fn save_events(&mut self, events: Vec<String>) -> Result<(), Error> {
        self.post("events", None, &EventList { events }).await
    }

    async fn load_event(&mut self, event: &str) -> Result<EventSnapshot, Error> {
        let body = LoadEvent {
            event: event.to_string(),
        };
        self.fetch(CLIENT.post(self.url("event_data", None)).json(&body)).await
    }

    async fn simulate(&mut self, project: &Project, depth: u32) -> Result<EventSnapshot, Error> {
        self.post("simulate", Some(project), &SimulateRequest { depth }).await?;
        self.load_event(&project.event).await
    }

    async fn add_post(&mut self, project: &Project, post: NewPost) -> Result<(), Error> {
        self.post("add_post_to_queue", Some(project), &post).await
    }

    async fn delete_post(&mut self, project: &Project, id: &ThreadId) -> Result<(), Error> {
        let body = DeletePost {
            hash_id: id.clone(),
        };
        self.post("delete_post", Some(project), &body).await
    }

    async fn add_agent(&mut self, project: &Project, agent: NewAgent) -> Result<(), Error> {
        self.post("add_agent", Some(project), &agent).await
    }

    async fn update_agent(&mut self, project: &Project, agent: AgentUpdate) -> Result<(), Error> {
        self.post("update_agent", Some(project), &agent).await
    }

    async fn delete_agent(&mut self, project: &Project, name: &str) -> Result<(), Error> {
        let body = AgentName {
            name: name.to_string(),
        };
        self.post("delete_agent", Some(project), &body).await
    }

    async fn toggle_agent_online(
        &mut self,
        project: &Project,
        name: &str,
        online: bool,
    ) -> Result<(), Error> {
        let body = ToggleOnline {
            name: name.to_string(),
            online,
        };
        self.post("toggle_online_agent", Some(project), &body).await
    }
}
