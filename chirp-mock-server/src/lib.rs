use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chirp_client::{
    api::{
        nest_records, Agent, AgentUpdate, Backend, Error, EventSnapshot, NewAgent, NewPost,
        Project, ThreadId, Tweet,
    },
    MAX_DEPTH,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// In-memory stand-in for the simulation server.
///
/// Tweets are kept as flat records like the real server stores them, and
/// nested on every load.
#[derive(Debug, Default)]
pub struct MockServer {
    events: Vec<String>,
    projects: HashMap<String, ProjectData>,
}

#[derive(Debug)]
struct ProjectData {
    records: Vec<Tweet>,
    agents: Vec<Agent>,

    /// Minutes elapsed on the virtual clock
    clock: i64,
}

/// Serialized state of a mock server, as produced by `generate-test-data`
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Fixture {
    pub events: Vec<String>,

    #[serde(default)]
    pub projects: Vec<FixtureProject>,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct FixtureProject {
    pub event: String,

    /// Flat records, replies pointing to their parent with `reply_to_hash_id`
    pub tweets: Vec<Tweet>,

    pub agents: Vec<Agent>,
}

fn agent(name: &str, occupation: &str, character: &str, interest: &str) -> Agent {
    Agent {
        name: name.to_string(),
        occupation: occupation.to_string(),
        experience: String::new(),
        character: character.to_string(),
        interest: interest.to_string(),
        online: true,
    }
}

/// Roster every new event starts with
pub fn default_agents() -> Vec<Agent> {
    vec![
        agent(
            "Artful_Alan",
            "Writer",
            "Articulate, crafts biting critiques laced with irony and metaphor.",
            "Satirical essays and intellectually charged debates.",
        ),
        agent(
            "Snide_Simon",
            "Software Engineer",
            "Snarky, mocks those who fail to keep up with the latest tech trends.",
            "Developing software and arguing online with a sarcastic edge.",
        ),
        agent(
            "Conspiracy_Craig",
            "Environmental Activist",
            "Intense and stubborn, cites only the evidence that fits his views.",
            "Environmental campaigns and conspiracy theories about climate change.",
        ),
    ]
}

fn clock_start() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 1, 1)?.and_hms_opt(9, 0, 0)
}

fn new_id() -> ThreadId {
    ThreadId(Uuid::new_v4().simple().to_string())
}

impl ProjectData {
    fn new() -> ProjectData {
        ProjectData {
            records: Vec::new(),
            agents: default_agents(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> String {
        self.clock += 1;
        clock_start()
            .map(|t| (t + Duration::minutes(self.clock)).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }

    fn max_depth(&self) -> u32 {
        self.records
            .iter()
            .filter_map(|r| r.depth)
            .max()
            .unwrap_or(0)
    }

    fn snapshot(&self) -> EventSnapshot {
        let forest = nest_records(self.records.clone());
        EventSnapshot {
            tweets: forest.tweets,
            agents: self.agents.clone(),
            max_depth: forest.max_depth,
        }
    }

    /// Adds one reply level: every record at `depth - 1` gets an answer from
    /// the first online agent that did not write it. Returns whether any
    /// reply was written.
    fn grow(&mut self, depth: u32) -> bool {
        let parents = self
            .records
            .iter()
            .filter(|r| r.depth == Some(depth - 1))
            .map(|r| (r.hash_id.clone(), r.author.clone()))
            .collect::<Vec<_>>();
        let mut grown = false;
        for (parent, parent_author) in parents {
            let author = match self
                .agents
                .iter()
                .find(|a| a.online && a.name != parent_author)
            {
                Some(a) => a.name.clone(),
                None => continue,
            };
            let mut reply = Tweet::new(
                new_id(),
                author,
                lipsum::lipsum_words(8),
                depth,
            )
            .reply_to(parent);
            reply.tweet_time = self.tick();
            self.records.push(reply);
            grown = true;
        }
        grown
    }

    fn agent_mut(&mut self, name: &str) -> Result<&mut Agent, Error> {
        self.agents
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::UnknownAgent(name.to_string()))
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    pub fn with_events(events: Vec<String>) -> MockServer {
        MockServer {
            events,
            projects: HashMap::new(),
        }
    }

    pub fn from_fixture(fixture: Fixture) -> MockServer {
        let projects = fixture
            .projects
            .into_iter()
            .map(|p| {
                let data = ProjectData {
                    clock: p.tweets.len() as i64,
                    records: p.tweets,
                    agents: p.agents,
                };
                (p.event, data)
            })
            .collect();
        MockServer {
            events: fixture.events,
            projects,
        }
    }

    /// Seeds an event with flat records, replacing whatever it held
    pub fn test_set_records(&mut self, event: &str, records: Vec<Tweet>) {
        self.projects
            .entry(event.to_string())
            .or_insert_with(ProjectData::new)
            .records = records;
    }

    /// Flat records currently stored for an event
    pub fn test_records(&self, event: &str) -> &[Tweet] {
        self.projects
            .get(event)
            .map(|p| &p.records[..])
            .unwrap_or(&[])
    }

    fn project_mut(&mut self, project: &Project) -> Result<&mut ProjectData, Error> {
        let event = project
            .index
            .checked_sub(1)
            .and_then(|i| self.events.get(i))
            .ok_or(Error::UnknownProject(project.index))?;
        Ok(self
            .projects
            .entry(event.clone())
            .or_insert_with(ProjectData::new))
    }
}

#[async_trait]
impl Backend for MockServer {
    async fn list_events(&mut self) -> Result<Vec<String>, Error> {
        Ok(self.events.clone())
    }

    async fn save_events(&mut self, events: Vec<String>) -> Result<(), Error> {
        self.events = events;
        Ok(())
    }

    async fn load_event(&mut self, event: &str) -> Result<EventSnapshot, Error> {
        if !self.events.iter().any(|e| e == event) {
            return Err(Error::UnknownEvent(event.to_string()));
        }
        let data = self
            .projects
            .entry(event.to_string())
            .or_insert_with(|| {
                tracing::info!(event, "creating data for new event");
                ProjectData::new()
            });
        Ok(data.snapshot())
    }

    async fn simulate(&mut self, project: &Project, depth: u32) -> Result<EventSnapshot, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::InvalidDepth(depth));
        }
        let data = self.project_mut(project)?;
        for level in data.max_depth() + 1..=depth {
            if !data.grow(level) {
                tracing::info!(level, "no reply could be written, stopping simulation");
                break;
            }
        }
        tracing::info!(project = project.index, depth, "simulation completed");
        Ok(data.snapshot())
    }

    async fn add_post(&mut self, project: &Project, post: NewPost) -> Result<(), Error> {
        let data = self.project_mut(project)?;
        let mut tweet = Tweet::new(new_id(), post.author, post.content, 0);
        tweet.tweet_time = data.tick();
        data.records.push(tweet);
        Ok(())
    }

    async fn delete_post(&mut self, project: &Project, id: &ThreadId) -> Result<(), Error> {
        let data = self.project_mut(project)?;
        let is_post = data
            .records
            .iter()
            .any(|r| r.hash_id == *id && r.reply_to_hash_id.is_none());
        if !is_post {
            return Err(Error::UnknownPost(id.clone()));
        }

        // the whole thread goes with the post
        let mut doomed = HashSet::from([id.clone()]);
        loop {
            let before = doomed.len();
            for r in &data.records {
                if r.reply_to_hash_id.as_ref().map_or(false, |p| doomed.contains(p)) {
                    doomed.insert(r.hash_id.clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        data.records.retain(|r| !doomed.contains(&r.hash_id));
        Ok(())
    }

    async fn add_agent(&mut self, project: &Project, agent: NewAgent) -> Result<(), Error> {
        let data = self.project_mut(project)?;
        if data.agents.iter().any(|a| a.name == agent.name) {
            return Err(Error::NameAlreadyUsed(agent.name));
        }
        data.agents.push(Agent::from_new(agent));
        Ok(())
    }

    async fn update_agent(&mut self, project: &Project, update: AgentUpdate) -> Result<(), Error> {
        let a = self.project_mut(project)?.agent_mut(&update.name)?;
        *a = Agent {
            name: update.name,
            occupation: update.occupation,
            experience: update.experience,
            character: update.character,
            interest: update.interest,
            online: update.online,
        };
        Ok(())
    }

    async fn delete_agent(&mut self, project: &Project, name: &str) -> Result<(), Error> {
        let data = self.project_mut(project)?;
        let before = data.agents.len();
        data.agents.retain(|a| a.name != name);
        if data.agents.len() == before {
            return Err(Error::UnknownAgent(name.to_string()));
        }
        Ok(())
    }

    async fn toggle_agent_online(
        &mut self,
        project: &Project,
        name: &str,
        online: bool,
    ) -> Result<(), Error> {
        self.project_mut(project)?.agent_mut(name)?.online = online;
        Ok(())
    }
}

impl From<&MockServer> for Fixture {
    fn from(s: &MockServer) -> Fixture {
        Fixture {
            events: s.events.clone(),
            projects: s
                .events
                .iter()
                .filter_map(|e| {
                    s.projects.get(e).map(|p| FixtureProject {
                        event: e.clone(),
                        tweets: p.records.clone(),
                        agents: p.agents.clone(),
                    })
                })
                .collect(),
        }
    }
}
