use std::path::{Path, PathBuf};

use anyhow::Context;
use chirp_client::{api::Backend, SessionOptions};
use chirp_mock_server::{Fixture, MockServer};
use tokio::io::{AsyncBufReadExt, BufReader};

mod api;
mod command;
mod dashboard;
mod render;

use command::Command;
use dashboard::Dashboard;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base URL of the simulation server
    #[structopt(short, long, env = "CHIRP_HOST")]
    host: Option<String>,

    /// Run offline against an in-memory server seeded from this JSON fixture
    #[structopt(long, parse(from_os_str), conflicts_with = "host")]
    fixture: Option<PathBuf>,

    /// Keep showing the cancelled depth after cancelling a re-simulation,
    /// until the next depth change or search
    #[structopt(long)]
    keep_stale_on_cancel: bool,

    /// Event to open on startup
    #[structopt(short, long, default_value = "1")]
    open: usize,
}

fn load_fixture(path: &Path) -> anyhow::Result<MockServer> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let fixture: Fixture = serde_json::from_str(&data)
        .with_context(|| format!("parsing fixture {}", path.display()))?;
    Ok(MockServer::from_fixture(fixture))
}

async fn run<B: Backend>(backend: B, opt: &Opt) -> anyhow::Result<()> {
    let options = SessionOptions {
        refilter_on_cancel: !opt.keep_stale_on_cancel,
    };
    let mut dashboard = Dashboard::new(backend, options).await?;

    match dashboard.execute(Command::Open(opt.open)).await {
        Ok(out) => println!("{out}"),
        Err(e) => println!("{e:#}\n(type `events` to list events, `help` for commands)"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let cmd = match Command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };
        match dashboard.execute(cmd).await {
            Ok(out) => println!("{out}"),
            Err(e) => {
                tracing::warn!(error = ?e, "command failed");
                println!("error: {e:#}");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    match (&opt.host, &opt.fixture) {
        (_, Some(path)) => run(load_fixture(path)?, &opt).await,
        (Some(host), None) => run(api::HttpBackend::new(host.clone()), &opt).await,
        (None, None) => Err(anyhow::anyhow!(
            "either --host (or CHIRP_HOST) or --fixture is required"
        )),
    }
}
