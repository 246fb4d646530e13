use serde::{ Serialize, Deserialize };
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One transcript entry. Field names match the persisted and exported record
/// shape `{ "by", "text", "ts" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub by: Sender,
    pub text: String,
    pub ts: i64,
}

impl Message {
    pub fn user(text: impl Into<String>, ts: i64) -> Self {
        Self { by: Sender::User, text: text.into(), ts }
    }

    pub fn bot(text: impl Into<String>, ts: i64) -> Self {
        Self { by: Sender::Bot, text: text.into(), ts }
    }

    pub fn is_user(&self) -> bool {
        self.by == Sender::User
    }
}
