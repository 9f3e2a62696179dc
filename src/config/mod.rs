pub mod key;
pub mod keybindings;
pub mod loader;
mod messages;
pub mod resolver;

use std::time::Duration;

use color_eyre::eyre::eyre;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use messages::{ErrorMessages, Messages};
pub use resolver::{DialogAction, GlobalAction, KeyResolver, PageAction};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dialog::SurfaceLayout;

/// Upper bound on how long a simulated analysis may run.
pub const MAX_ANALYSIS_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Parse a duration in seconds, rejecting values a [`Duration`] cannot hold
/// or that exceed [`MAX_ANALYSIS_DURATION`].
pub fn parse_duration_secs(secs: f64) -> color_eyre::Result<Duration> {
    let duration = Duration::try_from_secs_f64(secs)
        .map_err(|err| eyre!("invalid analysis duration {secs}: {err}"))?;
    if duration > MAX_ANALYSIS_DURATION {
        return Err(eyre!(
            "analysis duration {secs}s exceeds the maximum of {}s",
            MAX_ANALYSIS_DURATION.as_secs()
        ));
    }
    Ok(duration)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Settings for the bundled analysis backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How long a simulated analysis runs before reporting.
    pub duration_secs: f64,
    /// Status code every analysis fails with, if any.
    pub fail_with: Option<u16>,
    pub daily_limit_per_host: u32,
}

impl AnalysisConfig {
    pub fn validate(&self) -> color_eyre::Result<()> {
        parse_duration_secs(self.duration_secs).map(|_| ())
    }

    /// The configured duration, clamped to `0..=MAX_ANALYSIS_DURATION`.
    pub fn delay(&self) -> Duration {
        parse_duration_secs(self.duration_secs).unwrap_or_else(|err| {
            let clamped = if self.duration_secs > 0.0 {
                MAX_ANALYSIS_DURATION
            } else {
                Duration::ZERO
            };
            warn!(%err, ?clamped, "Clamping analysis duration");
            clamped
        })
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            duration_secs: 3.0,
            fail_with: None,
            daily_limit_per_host: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
    #[serde(default)]
    pub dialog: SurfaceLayout,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}
