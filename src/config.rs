//! Render root configuration.

use std::time::Duration;

/// Settings for a [`RenderRoot`](crate::RenderRoot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootConfig {
    /// How long update requests may wait for missing inputs before the root
    /// reports which ones are missing.
    pub diagnostic_delay: Duration,
    /// Ancestry label the top-level description is built under.
    pub ancestry_root: String,
    /// Register [`build`](crate::build) as the normalizer at construction.
    ///
    /// When disabled the normalizer stays a missing input until one is set
    /// through the dispatcher.
    pub install_normalizer: bool,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            diagnostic_delay: Duration::from_secs(3),
            ancestry_root: "root".to_owned(),
            install_normalizer: true,
        }
    }
}

impl RootConfig {
    /// Defaults without a pre-registered normalizer.
    pub fn bare() -> Self {
        Self {
            install_normalizer: false,
            ..Self::default()
        }
    }

    pub fn with_diagnostic_delay(mut self, delay: Duration) -> Self {
        self.diagnostic_delay = delay;
        self
    }
}
