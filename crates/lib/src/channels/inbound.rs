//! Inbound message from a chat channel: handed to the relay for routing and translation.

/// A message posted in some channel, as seen by the relay.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel the message was posted in (origin channel).
    pub channel_id: String,
    /// Name shown in front of the forwarded translation.
    pub author_name: String,
    /// True for any bot account, including this one.
    pub author_is_bot: bool,
    pub text: String,
}
