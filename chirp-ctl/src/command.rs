use anyhow::{anyhow, Context};
use chirp_client::api::ThreadId;

/// One line typed at the dashboard prompt
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    IncreaseDepth,
    DecreaseDepth,
    Confirm,
    Cancel,

    /// Submits a search. An empty query clears the search
    Search(String),

    Show,
    ListEvents,
    AddEvent(String),
    RemoveEvent(usize),
    Open(usize),
    Reload,

    AddPost { author: String, content: String },
    DeletePost(ThreadId),

    ListAgents,
    AddAgent { name: String, occupation: String },
    SetAgent { name: String, field: AgentField, value: String },
    DeleteAgent(String),
    SetOnline { name: String, online: bool },

    Help,
    Quit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AgentField {
    Occupation,
    Experience,
    Character,
    Interest,
}

pub const HELP: &str = "\
+ | -                      change the depth limit
y | n                      confirm or cancel a re-simulation
/<text>                    search comments (a lone / clears the search)
show                       print the visible threads
events                     list events
event add <text>           add an event
event rm <n>               remove event number n
open <n>                   show event number n
reload                     reload the current event
post <author> <text>       add a post
rm-post <id>               delete a post
agents                     list agents
agent add <name> <occupation>
agent set <name> occupation|experience|character|interest <text>
agent rm <name>
agent on|off <name>        toggle an agent online
help | quit";

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn required<'a>(s: &'a str, what: &str) -> anyhow::Result<&'a str> {
    if s.is_empty() {
        Err(anyhow!("missing {what}"))
    } else {
        Ok(s)
    }
}

fn index(s: &str) -> anyhow::Result<usize> {
    s.parse()
        .with_context(|| format!("parsing {s:?} as an event number"))
}

impl Command {
    /// Parses a prompt line, `None` for a blank line
    pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
        // the query is searched as typed, spaces included
        if let Some(query) = line.trim_start().strip_prefix('/') {
            return Ok(Some(Command::Search(query.to_string())));
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = split_word(line);
        let cmd = match word {
            "+" => Command::IncreaseDepth,
            "-" => Command::DecreaseDepth,
            "y" | "yes" | "confirm" => Command::Confirm,
            "n" | "no" | "cancel" => Command::Cancel,
            "search" => Command::Search(rest.to_string()),
            "show" => Command::Show,
            "events" => Command::ListEvents,
            "open" => Command::Open(index(required(rest, "event number")?)?),
            "reload" => Command::Reload,
            "event" => {
                let (sub, arg) = split_word(rest);
                match sub {
                    "add" => Command::AddEvent(required(arg, "event text")?.to_string()),
                    "rm" => Command::RemoveEvent(index(required(arg, "event number")?)?),
                    _ => return Err(anyhow!("unknown event command {sub:?}")),
                }
            }
            "post" => {
                let (author, content) = split_word(rest);
                Command::AddPost {
                    author: author.to_string(),
                    content: content.to_string(),
                }
            }
            "rm-post" => Command::DeletePost(ThreadId(required(rest, "post id")?.to_string())),
            "agents" => Command::ListAgents,
            "agent" => parse_agent(rest)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(anyhow!("unknown command {word:?}, try `help`")),
        };
        Ok(Some(cmd))
    }
}

fn parse_agent(rest: &str) -> anyhow::Result<Command> {
    let (sub, rest) = split_word(rest);
    let (name, rest) = split_word(rest);
    let name = required(name, "agent name")?.to_string();
    Ok(match sub {
        "add" => Command::AddAgent {
            name,
            occupation: rest.to_string(),
        },
        "set" => {
            let (field, value) = split_word(rest);
            let field = match field {
                "occupation" => AgentField::Occupation,
                "experience" => AgentField::Experience,
                "character" => AgentField::Character,
                "interest" => AgentField::Interest,
                _ => return Err(anyhow!("unknown agent field {field:?}")),
            };
            Command::SetAgent {
                name,
                field,
                value: value.to_string(),
            }
        }
        "rm" => Command::DeleteAgent(name),
        "on" => Command::SetOnline { name, online: true },
        "off" => Command::SetOnline {
            name,
            online: false,
        },
        _ => return Err(anyhow!("unknown agent command {sub:?}")),
    })
}
