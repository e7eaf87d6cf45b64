use anyhow::{anyhow, Context};
use serde_json::json;

use crate::ThreadId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown event {0:?}")]
    UnknownEvent(String),

    #[error("Project index {0} is out of range")]
    UnknownProject(usize),

    #[error("Unknown post {0}")]
    UnknownPost(ThreadId),

    #[error("Unknown agent {0:?}")]
    UnknownAgent(String),

    #[error("Name already used {0}")]
    NameAlreadyUsed(String),

    #[error("Invalid simulation depth {0}")]
    InvalidDepth(u32),
}

impl Error {
    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::Network(msg) => json!({
                "message": msg,
                "type": "network",
            }),
            Error::UnknownEvent(e) => json!({
                "message": "unknown event",
                "type": "unknown-event",
                "event": e,
            }),
            Error::UnknownProject(i) => json!({
                "message": "project index out of range",
                "type": "unknown-project",
                "index": i,
            }),
            Error::UnknownPost(id) => json!({
                "message": "unknown post",
                "type": "unknown-post",
                "hash_id": id,
            }),
            Error::UnknownAgent(n) => json!({
                "message": "unknown agent",
                "type": "unknown-agent",
                "name": n,
            }),
            Error::NameAlreadyUsed(n) => json!({
                "message": "name already used",
                "type": "conflict-name",
                "name": n,
            }),
            Error::InvalidDepth(d) => json!({
                "message": "invalid simulation depth",
                "type": "invalid-depth",
                "depth": d,
            }),
        })
        .expect("serializing error")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let string_field = |field: &str| -> anyhow::Result<String> {
            data.get(field)
                .and_then(|v| v.as_str())
                .map(String::from)
                .ok_or_else(|| anyhow!("error contents has no string field {field:?}"))
        };
        let int_field = |field: &str| -> anyhow::Result<u64> {
            data.get(field)
                .and_then(|v| v.as_u64())
                .ok_or_else(|| anyhow!("error contents has no integer field {field:?}"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(string_field("message").unwrap_or_default()),
                "network" => Error::Network(string_field("message").unwrap_or_default()),
                "unknown-event" => Error::UnknownEvent(string_field("event")?),
                "unknown-project" => Error::UnknownProject(
                    usize::try_from(int_field("index")?).context("project index overflow")?,
                ),
                "unknown-post" => Error::UnknownPost(ThreadId(string_field("hash_id")?)),
                "unknown-agent" => Error::UnknownAgent(string_field("name")?),
                "conflict-name" => Error::NameAlreadyUsed(string_field("name")?),
                "invalid-depth" => Error::InvalidDepth(
                    u32::try_from(int_field("depth")?).context("depth overflow")?,
                ),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }

    /// Decodes a failed response body, keeping the raw text when it is not
    /// one of our JSON errors (the backend may answer with plain HTML)
    pub fn from_response_body(body: &[u8]) -> Error {
        match Error::parse(body) {
            Ok(e) => e,
            Err(_) => Error::Unknown(String::from_utf8_lossy(body).into_owned()),
        }
    }
}
