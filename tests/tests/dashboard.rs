use chirp_client::{
    api::{self, Backend, NewPost, Project, ThreadId, Tweet},
    DepthChange, DepthState, Error, EventList, Session, SessionOptions,
};
use chirp_mock_server::{Fixture, MockServer};

const EVENT: &str = "a city bans cars";

fn record(id: &str, depth: u32, content: &str, parent: Option<&str>) -> Tweet {
    let t = Tweet::new(
        ThreadId(id.to_string()),
        String::from("Artful_Alan"),
        content.to_string(),
        depth,
    );
    match parent {
        Some(p) => t.reply_to(ThreadId(p.to_string())),
        None => t,
    }
}

// P("hello") -> C1("world") -> C2("hello world"), stored flat
fn hello_server() -> MockServer {
    let mut mock = MockServer::with_events(vec![String::from(EVENT)]);
    mock.test_set_records(
        EVENT,
        vec![
            record("c2", 2, "hello world", Some("c1")),
            record("p", 0, "hello", None),
            record("c1", 1, "world", Some("p")),
        ],
    );
    mock
}

async fn open(mock: &mut MockServer) -> Session {
    let events = EventList::load(mock).await.unwrap();
    let project = events.first().unwrap();
    Session::load(mock, project, SessionOptions::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn deep_match_keeps_its_path_visible() {
    let mut mock = hello_server();
    let mut s = open(&mut mock).await;
    assert_eq!(s.depth().baseline(), 2);
    assert_eq!(s.view().posts[0].match_count, 2);

    s.submit_search("hello");
    let p = &s.view().posts[0];
    assert!(p.visible);
    assert!(p.comments[0].visible);
    assert!(p.comments[0].children[0].visible);
    assert_eq!(p.match_count, 1);

    assert_eq!(s.decrease_depth(), Ok(DepthChange::Applied(1)));
    let p = &s.view().posts[0];
    assert!(p.visible);
    assert!(!p.comments[0].visible);
    assert!(!p.comments[0].children[0].visible);
    assert_eq!(p.match_count, 0);
}

#[tokio::test]
async fn cancelled_escalation_changes_nothing_on_the_server() {
    let mut mock = hello_server();
    mock.test_set_records(
        EVENT,
        vec![
            record("p", 0, "hello", None),
            record("c1", 1, "world", Some("p")),
            record("c2", 2, "hello world", Some("c1")),
            record("c3", 3, "deeper", Some("c2")),
        ],
    );
    let mut s = open(&mut mock).await;
    assert_eq!(s.depth().state(), DepthState::Settled(3));

    assert_eq!(s.increase_depth(), Ok(DepthChange::NeedsConfirmation(4)));
    assert_eq!(s.cancel_depth(), Ok(3));
    assert_eq!(s.depth().state(), DepthState::Settled(3));
    assert_eq!(s.filter().depth_limit(), 3);
    assert_eq!(mock.test_records(EVENT).len(), 4);
}

#[tokio::test]
async fn confirmed_escalation_materializes_deeper_replies() {
    let mut mock = hello_server();
    let mut s = open(&mut mock).await;
    s.increase_depth().unwrap();
    s.increase_depth().unwrap();
    assert_eq!(s.depth().state(), DepthState::PendingConfirmation(4));

    s.confirm_depth(&mut mock).await.unwrap();
    assert_eq!(s.depth().state(), DepthState::Settled(4));
    assert_eq!(s.depth().baseline(), 4);
    assert_eq!(s.posts()[0].total_comments, 4);
    assert_eq!(s.view().posts[0].visible_comments(), 4);

    // deeper replies are new records pointing to the previous level
    let records = mock.test_records(EVENT);
    assert_eq!(records.len(), 5);
    assert!(records
        .iter()
        .filter(|r| r.depth == Some(4))
        .all(|r| r.reply_to_hash_id.is_some()));
}

#[tokio::test]
async fn failed_simulation_reverts_the_depth() {
    let mut mock = hello_server();
    let mut s = open(&mut mock).await;
    s.increase_depth().unwrap();

    // the project disappears from under the session
    mock.save_events(Vec::new()).await.unwrap();
    let res = s.confirm_depth(&mut mock).await;
    assert_eq!(res, Err(Error::Api(api::Error::UnknownProject(1))));
    assert_eq!(s.depth().state(), DepthState::Settled(2));
    assert_eq!(s.posts().len(), 1);
}

#[tokio::test]
async fn posts_and_agents_round_trip_through_the_server() {
    let mut mock = hello_server();
    let mut s = open(&mut mock).await;

    s.add_post(&mut mock, "Snide_Simon", "hello again").await.unwrap();
    assert_eq!(s.posts().len(), 2);
    assert_eq!(s.posts()[1].author, "Snide_Simon");

    let id = s.posts()[0].id.clone();
    s.delete_post(&mut mock, &id).await.unwrap();
    assert_eq!(s.posts().len(), 1);
    assert_eq!(mock.test_records(EVENT).len(), 1);

    s.toggle_agent_online(&mut mock, "Conspiracy_Craig", false)
        .await
        .unwrap();
    let craig = s.agents().iter().find(|a| a.name == "Conspiracy_Craig");
    assert_eq!(craig.map(|a| a.online), Some(false));

    let err = s.delete_agent(&mut mock, "Nobody").await;
    assert_eq!(
        err,
        Err(Error::Api(api::Error::UnknownAgent(String::from("Nobody"))))
    );
}

#[tokio::test]
async fn event_list_renumbers_projects() {
    let mut mock = MockServer::with_events(vec![String::from("first"), String::from("second")]);
    let mut events = EventList::load(&mut mock).await.unwrap();
    events.add(&mut mock, "third").await.unwrap();
    events.remove(&mut mock, 1).await.unwrap();
    assert_eq!(mock.list_events().await.unwrap(), vec!["second", "third"]);

    let third = events.select(2).unwrap();
    let post = NewPost {
        author: String::from("Artful_Alan"),
        content: String::from("posted to the third event"),
    };
    mock.add_post(&third, post).await.unwrap();
    assert_eq!(mock.test_records("third").len(), 1);
    assert!(mock.test_records("second").is_empty());
}

#[tokio::test]
async fn fixture_survives_serialization() {
    let mut mock = hello_server();
    let project = Project {
        index: 1,
        event: String::from(EVENT),
    };
    mock.simulate(&project, 3).await.unwrap();
    let json = serde_json::to_string(&Fixture::from(&mock)).unwrap();

    let mut restored = MockServer::from_fixture(serde_json::from_str(&json).unwrap());
    let a = mock.load_event(EVENT).await.unwrap();
    let b = restored.load_event(EVENT).await.unwrap();
    assert_eq!(a, b);
}
