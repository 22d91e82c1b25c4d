//! Relay: handle one inbound message (liveness check, routing, translation, forward).
//!
//! Each message is handled independently; nothing is shared between events except the
//! read-only channel pair and translator, so concurrent events need no locking. Forwards
//! from concurrent events may land out of order.

use std::sync::Arc;
use std::time::Duration;

use crate::channels::{discord, ChannelHandle, InboundMessage};
use crate::config::RelaySettings;
use crate::routing::ChannelPair;
use crate::translate::{PapagoClient, Translator};

/// Liveness command; answered in the channel it was posted in.
pub const PING_COMMAND: &str = "!ping";

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// `!ping` answered.
    Pong,
    /// Not a translation candidate (bot author or unrelated channel).
    Ignored,
    Forwarded { channel_id: String },
    TranslationFailed { detail: String },
    DeliveryFailed { channel_id: String, reason: String },
}

/// Routes messages between the paired channels through a translator.
pub struct Relay {
    pair: ChannelPair,
    translator: Arc<dyn Translator>,
    notify_failures: bool,
}

/// `Pong! WS Ping: 42ms`, or `unknown` before the first heartbeat ack.
pub fn pong_text(latency: Option<Duration>) -> String {
    match latency {
        Some(d) => format!("Pong! WS Ping: {}ms", d.as_millis()),
        None => "Pong! WS Ping: unknown".to_string(),
    }
}

/// `{author}: {translated}`.
pub fn forward_text(author_name: &str, translated: &str) -> String {
    format!("{}: {}", author_name, translated)
}

impl Relay {
    pub fn new(pair: ChannelPair, translator: Arc<dyn Translator>, notify_failures: bool) -> Self {
        Self {
            pair,
            translator,
            notify_failures,
        }
    }

    pub fn pair(&self) -> &ChannelPair {
        &self.pair
    }

    /// Handle one message. Never fails: per-message errors are logged and reported in the outcome.
    pub async fn handle(&self, msg: &InboundMessage, channel: &dyn ChannelHandle) -> RelayOutcome {
        if msg.text == PING_COMMAND {
            let reply = pong_text(channel.latency());
            if let Err(e) = channel.send_message(&msg.channel_id, &reply).await {
                log::warn!("relay: {} ping reply to {} failed: {}", channel.id(), msg.channel_id, e);
            }
            return RelayOutcome::Pong;
        }

        let Some(decision) = self.pair.route(msg) else {
            return RelayOutcome::Ignored;
        };

        let translated = match self
            .translator
            .translate(&msg.text, decision.source, decision.target)
            .await
        {
            Ok(t) => t,
            Err(e) => {
                log::warn!(
                    "relay: translation {} -> {} for message in {} failed: {}",
                    decision.source,
                    decision.target,
                    msg.channel_id,
                    e
                );
                if self.notify_failures {
                    let notice = "translation failed; this message was not forwarded.";
                    if let Err(e) = channel.send_message(&msg.channel_id, notice).await {
                        log::debug!("relay: failure notice to {} failed: {}", msg.channel_id, e);
                    }
                }
                return RelayOutcome::TranslationFailed {
                    detail: e.detail(),
                };
            }
        };

        let text = forward_text(&msg.author_name, &translated);
        match channel.send_message(&decision.target_channel, &text).await {
            Ok(()) => {
                log::debug!(
                    "relay: forwarded {} -> {} ({} -> {})",
                    msg.channel_id,
                    decision.target_channel,
                    decision.source,
                    decision.target
                );
                RelayOutcome::Forwarded {
                    channel_id: decision.target_channel,
                }
            }
            Err(e) => {
                log::warn!(
                    "relay: {} forward to {} skipped: {}",
                    channel.id(),
                    decision.target_channel,
                    e
                );
                RelayOutcome::DeliveryFailed {
                    channel_id: decision.target_channel,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Build the Papago client and relay from `settings`, then run the Discord connector until shutdown.
pub async fn run_relay(settings: RelaySettings) -> anyhow::Result<()> {
    let papago = PapagoClient::from_settings(settings.papago);
    log::info!(
        "relay: korean channel {} <-> japanese channel {} via {}",
        settings.channels.korean(),
        settings.channels.japanese(),
        papago.api_url()
    );
    let relay = Arc::new(Relay::new(
        settings.channels,
        Arc::new(papago),
        settings.notify_failures,
    ));
    discord::run(&settings.bot_token, relay).await
}
