//! Relay bot core: channel routing, Papago translation, and the Discord connector,
//! used by the `relay` CLI.

pub mod channels;
pub mod config;
pub mod init;
pub mod lang;
pub mod relay;
pub mod routing;
pub mod translate;
