//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::stepgen::StepgenConfig;

/// Maximum number of stepgen channels in one system.
pub const MAX_STEPGENS: usize = 32;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Tick rate of every generator in hertz.
    pub clock_frequency: u32,

    /// Named stepgen channels.
    #[serde(default)]
    pub stepgens: FnvIndexMap<String<32>, StepgenConfig, MAX_STEPGENS>,
}

impl SystemConfig {
    /// Get a stepgen configuration by name.
    pub fn stepgen(&self, name: &str) -> Option<&StepgenConfig> {
        self.stepgens
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all stepgen names.
    pub fn stepgen_names(&self) -> impl Iterator<Item = &str> {
        self.stepgens.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            clock_frequency: 50_000_000,
            stepgens: FnvIndexMap::new(),
        }
    }
}
