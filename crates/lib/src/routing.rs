//! Channel routing: which paired channel a message is forwarded to, and in which direction it is translated.
//!
//! Korean channel -> Japanese channel (ko -> ja), Japanese channel -> Korean channel (ja -> ko).
//! Everything else, and anything written by a bot, is not a translation candidate.

use crate::channels::InboundMessage;
use crate::lang::Language;

/// The two relayed channels. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPair {
    korean: String,
    japanese: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelPairError {
    #[error("{0} channel id is empty")]
    Empty(&'static str),
    #[error("korean and japanese channel ids are identical ({0})")]
    Identical(String),
}

/// Where and how to forward one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub target_channel: String,
    pub source: Language,
    pub target: Language,
}

impl ChannelPair {
    /// Ids are trimmed; both must be non-empty and distinct.
    pub fn new(
        korean: impl Into<String>,
        japanese: impl Into<String>,
    ) -> Result<Self, ChannelPairError> {
        let korean = korean.into().trim().to_string();
        let japanese = japanese.into().trim().to_string();
        if korean.is_empty() {
            return Err(ChannelPairError::Empty("korean"));
        }
        if japanese.is_empty() {
            return Err(ChannelPairError::Empty("japanese"));
        }
        if korean == japanese {
            return Err(ChannelPairError::Identical(korean));
        }
        Ok(Self { korean, japanese })
    }

    pub fn korean(&self) -> &str {
        &self.korean
    }

    pub fn japanese(&self) -> &str {
        &self.japanese
    }

    /// Routing decision for `msg`, or `None` when it must not be translated.
    pub fn route(&self, msg: &InboundMessage) -> Option<RouteDecision> {
        if msg.author_is_bot {
            return None;
        }
        if msg.channel_id == self.korean {
            Some(RouteDecision {
                target_channel: self.japanese.clone(),
                source: Language::Korean,
                target: Language::Japanese,
            })
        } else if msg.channel_id == self.japanese {
            Some(RouteDecision {
                target_channel: self.korean.clone(),
                source: Language::Japanese,
                target: Language::Korean,
            })
        } else {
            None
        }
    }
}
