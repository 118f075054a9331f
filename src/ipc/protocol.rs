//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::assistant::Reply;
use crate::events::SessionEvent;
use crate::intent::Intent;
use crate::state::State;

/// Largest accepted message body
pub const MAX_MESSAGE_LEN: usize = 1024 * 1024;

/// Requests from UI to assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Ping to check connectivity
    Ping,

    /// Request current session status
    GetStatus,

    /// Handle a typed command
    Command { text: String },

    /// Run one voice capture and handle the utterance
    Capture,

    /// Save a note whose body was collected by the UI
    SaveNote { body: String },

    /// Read the notes log
    ReadNotes,

    /// Subscribe to session event notifications
    Subscribe,
}

/// Responses from assistant to UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Pong response to ping
    Pong,

    /// Current session status
    Status(AssistantStatus),

    /// Outcome of an interaction
    Reply {
        text: String,
        intent: Option<Intent>,
        listening: bool,
    },

    /// Subscription confirmed
    Subscribed,

    /// Pushed to subscribed clients
    Event { event: SessionEvent },

    /// Error response
    Error { code: String, message: String },
}

impl Response {
    pub fn reply(reply: Reply, state: State) -> Self {
        Response::Reply {
            text: reply.text,
            intent: reply.intent,
            listening: state == State::Listening,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Session status snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantStatus {
    /// Assistant version
    pub version: String,

    /// Listening or paused
    pub state: State,

    /// The next command is taken as a note body
    pub pending_note: bool,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = Request::Command { text: "open youtube".into() };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("command"));
        assert!(json.contains("open youtube"));

        let req: Request =
            serde_json::from_str(r#"{"type":"save_note","body":"buy milk"}"#).unwrap();
        assert_eq!(req, Request::SaveNote { body: "buy milk".into() });
    }

    #[test]
    fn test_reply_serialization() {
        let reply = Reply::new("Hello! How can I help you?", Some(Intent::Greeting));
        let resp = Response::reply(reply, State::Paused);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["type"], "reply");
        assert_eq!(json["intent"]["type"], "greeting");
        assert_eq!(json["listening"], false);
    }

    #[test]
    fn test_event_serialization() {
        let resp = Response::Event { event: SessionEvent::NoteSaved };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["event"]["type"], "note_saved");
    }
}
