//! Injected configuration for the thread core.
//!
//! The original surface read CDN and paging settings off an ambient global;
//! here everything is an explicit value handed to whichever component needs
//! it, so embedders (and tests) control every knob.

use std::time::Duration;

use crate::models::AuthorRef;

/// Tunables and URLs for one comment thread.
#[derive(Debug, Clone)]
pub struct ThreadConfig {
    /// Base URL of the comments API, no trailing slash.
    pub base_url: String,
    /// CDN base for user icons, trailing slash included.
    pub cdn_url: String,
    /// CDN base for static assets, trailing slash included.
    pub cdn_assets_url: String,
    /// Page size for backfill loads.
    pub page_size: usize,
    /// Smaller page size used by the history-priming refresh load.
    pub primer_page_size: usize,
    /// Accumulated overscroll (px) below which a backfill fires.
    pub overscroll_threshold: f64,
    /// Quiet window after the last overscroll sample before evaluating.
    pub overscroll_debounce: Duration,
    /// Lockout after a fired backfill so one gesture triggers once.
    pub overscroll_cooldown: Duration,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cdn_url: "/".to_string(),
            cdn_assets_url: "/".to_string(),
            page_size: 12,
            primer_page_size: 5,
            overscroll_threshold: -75.0,
            overscroll_debounce: Duration::from_millis(250),
            overscroll_cooldown: Duration::from_millis(1000),
        }
    }
}

impl ThreadConfig {
    /// Avatar URL for the given actor, falling back to the anonymous icon.
    #[must_use]
    pub fn avatar_url(&self, author: Option<&AuthorRef>) -> String {
        match author {
            Some(author) => format!(
                "{}icon/{}/small/{}",
                self.cdn_url, author.id, author.icon_time
            ),
            None => format!("{}assets/avatars/default-small.png", self.cdn_assets_url),
        }
    }
}
