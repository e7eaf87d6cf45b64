use chirp_client::{
    api::{ThreadId, Tweet},
    Comment, CommentVisibility, EventList, Filter, Session, SessionOptions,
};
use chirp_mock_server::MockServer;
use futures::executor::block_on;

const EVENT: &str = "generated";

/// Flat records from (parent choice, depth, content matches) triples. A
/// choice of 0 makes a post, anything else replies to an earlier record.
fn records(nodes: &[(u8, u8, bool)]) -> Vec<Tweet> {
    let mut out: Vec<Tweet> = Vec::new();
    for (i, &(choice, depth, hit)) in nodes.iter().take(60).enumerate() {
        let pick = usize::from(choice) % (i + 1);
        let content = if hit { "a NEEDLE here" } else { "hay" };
        let t = Tweet::new(
            ThreadId(format!("t{i}")),
            String::from("Snide_Simon"),
            content.to_string(),
            u32::from(depth % 7),
        );
        out.push(match pick.checked_sub(1) {
            None => t,
            Some(p) => {
                let parent = out[p].hash_id.clone();
                t.reply_to(parent)
            }
        });
    }
    out
}

fn check(comments: &[Comment], vis: &[CommentVisibility], f: &Filter) {
    for (c, v) in comments.iter().zip(vis) {
        let below = v.children.iter().any(|ch| ch.visible);
        assert_eq!(v.visible, f.matches_comment(c) || below);
        check(&c.children, &v.children, f);
    }
}

#[test]
fn loaded_threads_follow_the_propagation_law() {
    bolero::check!()
        .with_type::<(Vec<(u8, u8, bool)>, u8, bool)>()
        .cloned()
        .for_each(|(nodes, limit, searching)| {
            let records = records(&nodes);
            let mut mock = MockServer::with_events(vec![String::from(EVENT)]);
            mock.test_set_records(EVENT, records.clone());

            let mut s = block_on(async {
                let events = EventList::load(&mut mock).await?;
                let project = events.select(1)?;
                Session::load(&mut mock, project, SessionOptions::default()).await
            })
            .unwrap();

            // every record is either a post or reachable from one
            let total = s
                .posts()
                .iter()
                .map(|p| 1 + p.total_comments)
                .sum::<usize>();
            assert_eq!(total, records.len());

            s.submit_search(if searching { "needle" } else { "" });
            while s.filter().depth_limit() > u32::from(limit % 6) {
                s.decrease_depth().unwrap();
            }
            let f = s.filter().clone();
            for (p, v) in s.posts().iter().zip(&s.view().posts) {
                check(&p.comments, &v.comments, &f);
                assert_eq!(
                    v.match_count,
                    p.descendants().filter(|c| f.matches_comment(c)).count()
                );
            }
        });
}
