//! Outbound side of a chat channel: what the relay needs to reply and forward.

use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// Lookup by id returned nothing (deleted channel, no access, bad id).
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("send failed: {0}")]
    Send(String),
}

/// Handle to a connected chat channel (lookup, send, gateway latency).
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Channel kind (e.g. "discord").
    fn id(&self) -> &str;

    /// Last measured gateway round trip, if a heartbeat has been acknowledged yet.
    fn latency(&self) -> Option<Duration> {
        None
    }

    /// Resolve `channel_id` and post `text` there.
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError>;
}
