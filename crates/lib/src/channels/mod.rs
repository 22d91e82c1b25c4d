//! Chat channels the relay listens to and posts into.
//!
//! `InboundMessage` is what a channel hands to the relay; `ChannelHandle` is the
//! outbound seam the relay replies and forwards through. Discord is the only
//! connector.

pub mod discord;
mod inbound;
mod outbound;

pub use discord::{DiscordChannel, DiscordHandler};
pub use inbound::InboundMessage;
pub use outbound::{ChannelError, ChannelHandle};
