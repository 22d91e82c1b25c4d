//! Discord channel: serenity gateway client feeding the relay, and sends via the Discord HTTP API.

use crate::channels::inbound::InboundMessage;
use crate::channels::outbound::{ChannelError, ChannelHandle};
use crate::relay::Relay;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{ChannelId, Client, Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::gateway::ShardManager;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use std::time::Duration;

/// Shard manager in the client's data map, for reading heartbeat latency.
struct ShardManagerKey;

impl TypeMapKey for ShardManagerKey {
    type Value = Arc<ShardManager>;
}

/// Parse a Discord channel snowflake. Zero and non-numeric ids are rejected.
pub fn parse_channel_id(id: &str) -> Result<ChannelId, ChannelError> {
    match id.trim().parse::<u64>() {
        Ok(n) if n != 0 => Ok(ChannelId::new(n)),
        _ => Err(ChannelError::UnknownChannel(id.to_string())),
    }
}

/// 403/404 mean the channel is gone or hidden from the bot; anything else (5xx, rate
/// limits, transport) keeps its cause.
fn lookup_error(channel_id: &str, status: Option<u16>, cause: &str) -> ChannelError {
    match status {
        Some(403) | Some(404) => ChannelError::UnknownChannel(channel_id.to_string()),
        _ => ChannelError::Send(format!("channel lookup {} failed: {}", channel_id, cause)),
    }
}

/// Outbound handle for one event: serenity context plus the shard latency at event time.
pub struct DiscordChannel {
    ctx: Context,
    latency: Option<Duration>,
}

impl DiscordChannel {
    pub fn new(ctx: Context, latency: Option<Duration>) -> Self {
        Self { ctx, latency }
    }

    /// Heartbeat latency of the shard that delivered `ctx`'s event, if measured yet.
    async fn shard_latency(ctx: &Context) -> Option<Duration> {
        let manager = {
            let data = ctx.data.read().await;
            data.get::<ShardManagerKey>().cloned()
        }?;
        let runners = manager.runners.lock().await;
        runners.get(&ctx.shard_id).and_then(|r| r.latency)
    }
}

#[async_trait]
impl ChannelHandle for DiscordChannel {
    fn id(&self) -> &str {
        "discord"
    }

    fn latency(&self) -> Option<Duration> {
        self.latency
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError> {
        let id = parse_channel_id(channel_id)?;
        if let Err(e) = id.to_channel(&self.ctx).await {
            let status = match &e {
                serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()),
                _ => None,
            };
            log::debug!("discord: channel lookup {} failed: {}", channel_id, e);
            return Err(lookup_error(channel_id, status, &e.to_string()));
        }
        id.say(&self.ctx.http, text)
            .await
            .map(|_| ())
            .map_err(|e| ChannelError::Send(e.to_string()))
    }
}

/// Serenity event handler: converts messages and hands them to the relay.
pub struct DiscordHandler {
    relay: Arc<Relay>,
}

impl DiscordHandler {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    /// Gateway intents needed to read message text in guild channels.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    fn inbound(msg: &Message) -> InboundMessage {
        InboundMessage {
            channel_id: msg.channel_id.to_string(),
            author_name: msg.author.display_name().to_string(),
            author_is_bot: msg.author.bot,
            text: msg.content.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!(
            "discord: ready as {} ({} guild(s))",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = Self::inbound(&msg);
        let latency = DiscordChannel::shard_latency(&ctx).await;
        let channel = DiscordChannel::new(ctx, latency);
        let outcome = self.relay.handle(&inbound, &channel).await;
        log::debug!("discord: message {} in {}: {:?}", msg.id, inbound.channel_id, outcome);
    }
}

/// Connect to Discord and relay until the gateway closes or Ctrl+C / SIGTERM.
pub async fn run(token: &str, relay: Arc<Relay>) -> Result<()> {
    for id in [relay.pair().korean(), relay.pair().japanese()] {
        parse_channel_id(id).with_context(|| format!("invalid discord channel id {:?}", id))?;
    }

    let mut client = Client::builder(token, DiscordHandler::intents())
        .event_handler(DiscordHandler::new(relay))
        .await
        .context("building discord client")?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerKey>(client.shard_manager.clone());
    }

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        log::info!("shutdown signal received, closing discord shards");
        shard_manager.shutdown_all().await;
    });

    log::info!("discord: connecting");
    client.start().await.context("discord client exited")?;
    log::info!("discord: stopped");
    Ok(())
}

/// Completes on SIGINT or SIGTERM. A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_channel_id_accepts_snowflakes() {
        assert_eq!(
            parse_channel_id(" 123456789012345678 ").unwrap(),
            ChannelId::new(123456789012345678)
        );
    }

    #[test]
    fn parse_channel_id_rejects_zero_and_text() {
        assert!(parse_channel_id("0").is_err());
        assert!(parse_channel_id("general").is_err());
        assert!(parse_channel_id("").is_err());
    }

    #[test]
    fn lookup_not_found_or_forbidden_is_unknown_channel() {
        assert_eq!(
            lookup_error("42", Some(404), "Unknown Channel"),
            ChannelError::UnknownChannel("42".to_string())
        );
        assert_eq!(
            lookup_error("42", Some(403), "Missing Access"),
            ChannelError::UnknownChannel("42".to_string())
        );
    }

    #[test]
    fn lookup_server_and_transport_errors_keep_their_cause() {
        assert_eq!(
            lookup_error("42", Some(503), "Service Unavailable"),
            ChannelError::Send("channel lookup 42 failed: Service Unavailable".to_string())
        );
        assert_eq!(
            lookup_error("42", Some(429), "rate limited"),
            ChannelError::Send("channel lookup 42 failed: rate limited".to_string())
        );
        assert_eq!(
            lookup_error("42", None, "connection reset"),
            ChannelError::Send("channel lookup 42 failed: connection reset".to_string())
        );
    }

    #[test]
    fn intents_include_message_content() {
        assert!(DiscordHandler::intents().contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(DiscordHandler::intents().contains(GatewayIntents::GUILD_MESSAGES));
    }
}
