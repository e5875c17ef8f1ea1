//! Control-channel acknowledgements (`"op"` frames) and their validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamError};

/// Operation type of an acknowledgement.
/// Unknown values are kept so validation can report the full record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpKind {
    Ping,
    Pong,
    Auth,
    Subscribe,
    Unknown(String),
}

impl OpKind {
    pub fn as_str(&self) -> &str {
        match self {
            OpKind::Ping => "ping",
            OpKind::Pong => "pong",
            OpKind::Auth => "auth",
            OpKind::Subscribe => "subscribe",
            OpKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for OpKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ping" => OpKind::Ping,
            "pong" => OpKind::Pong,
            "auth" => OpKind::Auth,
            "subscribe" => OpKind::Subscribe,
            _ => OpKind::Unknown(raw),
        }
    }
}

impl From<OpKind> for String {
    fn from(kind: OpKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement of a ping, auth or subscribe request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpEvent {
    pub op: OpKind,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ret_msg: String,
    #[serde(default)]
    pub conn_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_id: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

impl OpEvent {
    /// Checks the acknowledgement against the success criteria of its op type.
    ///
    /// * `ping` (public heartbeat): success and `ret_msg == "pong"`
    /// * `pong` (private heartbeat): always valid, the reply has no success/ret_msg
    /// * `auth`: success and an empty `ret_msg`
    /// * `subscribe`: success only; public channels echo "subscribe", private ones don't
    pub fn validate(&self) -> Result<()> {
        let valid = match &self.op {
            OpKind::Ping => self.success && self.ret_msg == OpKind::Pong.as_str(),
            OpKind::Pong => true,
            OpKind::Auth => self.success && self.ret_msg.is_empty(),
            OpKind::Subscribe => self.success,
            OpKind::Unknown(_) => {
                return Err(StreamError::UnrecognizedOperation {
                    event: Box::new(self.clone()),
                });
            }
        };

        if valid {
            Ok(())
        } else {
            Err(StreamError::OpValidationFailed {
                event: Box::new(self.clone()),
            })
        }
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self.op, OpKind::Ping | OpKind::Pong)
    }
}
