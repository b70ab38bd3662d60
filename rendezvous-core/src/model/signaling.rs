use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::Candidate => "candidate",
        };
        f.write_str(name)
    }
}

/// Destination of a signal as written by the client: either the connection
/// handle of a peer or a participant id of someone sharing a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SignalTarget(pub String);

impl SignalTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_connection(&self) -> Option<ConnectionId> {
        self.0.parse().ok()
    }
}

impl From<ConnectionId> for SignalTarget {
    fn from(id: ConnectionId) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SignalTarget {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for SignalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Negotiation payload as received from the sender. Bodies are opaque and
/// relayed verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundSignal {
    pub to: SignalTarget,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Value>,
}

impl InboundSignal {
    /// Re-addresses the payload as coming from `from`. The sender never gets
    /// to choose this field.
    pub fn relay_from(self, from: ConnectionId) -> OutboundSignal {
        OutboundSignal {
            from,
            kind: self.kind,
            offer: self.offer,
            answer: self.answer,
            candidate: self.candidate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundSignal {
    pub from: ConnectionId,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Value>,
}
