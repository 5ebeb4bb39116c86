//! Notification dispatch for code-review events.
//!
//! Each event goes through the same steps:
//! - **Fetch**: load the pull request the event belongs to
//! - **Resolve**: work out who is involved (`resolver`)
//! - **Filter**: drop the acting user and anyone who opted out (`gate`)
//! - **Dispatch**: send one message per surviving recipient (`handlers`)
//!
//! Filtering and dispatch fan out across recipients concurrently and join
//! fail-fast: one failing collaborator call fails the whole event. The
//! dispatcher itself holds no mutable state, so one instance can handle many
//! events at once.

mod gate;
mod handlers;
mod resolver;


pub use resolver::dedup_users;

use std::sync::Arc;

use crate::collaborators::{ChatService, SettingsStore, Vcs};
use crate::config::HeraldConfig;
use crate::format::{MessageFormatter, PlainTextFormatter};

/// Resolves recipients for code-review events and sends them messages.
pub struct Dispatcher {
    vcs: Arc<dyn Vcs>,
    settings: Arc<dyn SettingsStore>,
    chat: Arc<dyn ChatService>,
    formatter: Arc<dyn MessageFormatter>,
    config: HeraldConfig,
}

impl Dispatcher {
    pub fn new(
        vcs: Arc<dyn Vcs>,
        settings: Arc<dyn SettingsStore>,
        chat: Arc<dyn ChatService>,
    ) -> Self {
        Self {
            vcs,
            settings,
            chat,
            formatter: Arc::new(PlainTextFormatter),
            config: HeraldConfig::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn MessageFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_config(mut self, config: HeraldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }
}
