use chirp_client::{
    api::{ThreadId, Tweet},
    MAX_DEPTH,
};
use chirp_mock_server::{default_agents, Fixture, FixtureProject};
use chrono::{Duration, NaiveDate};
use rand::{seq::SliceRandom, Rng};

const NUM_EVENTS: usize = 4;
const EVENT_WORD_COUNT: usize = 6;

const POSTS_PER_EVENT: usize = 8;
const MAX_REPLIES_PER_TWEET: usize = 3;
const TWEET_WORD_COUNT: usize = 20;

// Some records are left without content or depth, like the simulator
// occasionally writes them
const MALFORMED_ONE_IN: u32 = 50;

fn gen_id() -> ThreadId {
    ThreadId(uuid::Uuid::new_v4().simple().to_string())
}

fn gen_text(rng: &mut impl Rng) -> String {
    let words = rng.gen_range(3..TWEET_WORD_COUNT);
    lipsum::lipsum_words_with_rng(rng, words)
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("invalid start date"))?;
    let agents = default_agents();

    let mut events = Vec::new();
    let mut projects = Vec::new();
    for _ in 0..NUM_EVENTS {
        let event = lipsum::lipsum_title_with_rng(&mut rng)
            .split_whitespace()
            .take(EVENT_WORD_COUNT)
            .collect::<Vec<_>>()
            .join(" ");
        let max_depth = rng.gen_range(1..=MAX_DEPTH);

        let mut tweets = Vec::new();
        let mut minutes = 0;
        let mut gen_tweet = |rng: &mut rand::rngs::ThreadRng, depth: u32, parent: Option<&Tweet>| {
            let author = agents
                .choose(rng)
                .map(|a| a.name.clone())
                .unwrap_or_default();
            let mut t = Tweet::new(gen_id(), author, gen_text(rng), depth);
            t.reply_to_hash_id = parent.map(|p| p.hash_id.clone());
            minutes += rng.gen_range(1..30);
            t.tweet_time = (start + Duration::minutes(minutes))
                .format("%Y-%m-%d %H:%M")
                .to_string();
            t.likes = agents
                .iter()
                .filter(|_| rng.gen_bool(0.2))
                .map(|a| a.name.clone())
                .collect();
            if rng.gen_ratio(1, MALFORMED_ONE_IN) {
                t.content = None;
            }
            if rng.gen_ratio(1, MALFORMED_ONE_IN) {
                t.depth = None;
            }
            t
        };

        let mut level = (0..POSTS_PER_EVENT)
            .map(|_| gen_tweet(&mut rng, 0, None))
            .collect::<Vec<_>>();
        for depth in 1..=max_depth {
            let mut next = Vec::new();
            for parent in &level {
                for _ in 0..rng.gen_range(0..=MAX_REPLIES_PER_TWEET) {
                    next.push(gen_tweet(&mut rng, depth, Some(parent)));
                }
            }
            tweets.append(&mut level);
            level = next;
        }
        tweets.append(&mut level);

        events.push(event.clone());
        projects.push(FixtureProject {
            event,
            tweets,
            agents: agents.clone(),
        });
    }

    let fixture = Fixture { events, projects };
    println!("{}", serde_json::to_string_pretty(&fixture)?);
    Ok(())
}
