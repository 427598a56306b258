//! Engine configuration
//!
//! Buffer limits and pool sizing are fixed per pool: every tween vended by a
//! pool allocates its value buffers from the configuration the pool was built
//! with. Build the configuration once, before creating any tween, and keep it.

use serde::{Deserialize, Serialize};
use twine_easing::{Easing, Path};

use crate::error::{Result, TwineError};

/// Engine-wide sizing and defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwineConfig {
    /// Maximum number of components a single tween animates together
    #[serde(default = "default_combined_attributes_limit")]
    pub combined_attributes_limit: usize,
    /// Maximum number of waypoints per tween
    #[serde(default)]
    pub waypoints_limit: usize,
    /// Initial free-list capacity of a tween pool
    #[serde(default = "default_capacity")]
    pub pool_capacity: usize,
    /// Initial capacity of a scheduler's managed list
    #[serde(default = "default_capacity")]
    pub scheduler_capacity: usize,
    /// Easing installed by the `to`/`from`/`set` factories
    #[serde(default)]
    pub default_easing: Easing,
    /// Path installed by the `to`/`from` factories
    #[serde(default)]
    pub default_path: Path,
}

fn default_combined_attributes_limit() -> usize {
    3
}

fn default_capacity() -> usize {
    20
}

impl Default for TwineConfig {
    fn default() -> Self {
        Self {
            combined_attributes_limit: default_combined_attributes_limit(),
            waypoints_limit: 0,
            pool_capacity: default_capacity(),
            scheduler_capacity: default_capacity(),
            default_easing: Easing::default(),
            default_path: Path::default(),
        }
    }
}

impl TwineConfig {
    /// Parse and validate a TOML configuration.
    ///
    /// Missing keys take their defaults, so an empty document is valid.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the limits can back a working tween.
    pub fn validate(&self) -> Result<()> {
        if self.combined_attributes_limit == 0 {
            return Err(TwineError::InvalidConfig(
                "combined_attributes_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder: set the combined attribute limit
    pub fn with_combined_attributes_limit(mut self, limit: usize) -> Self {
        self.combined_attributes_limit = limit;
        self
    }

    /// Builder: set the waypoint limit
    pub fn with_waypoints_limit(mut self, limit: usize) -> Self {
        self.waypoints_limit = limit;
        self
    }

    /// Builder: set the factory easing
    pub fn with_default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Builder: set the factory path
    pub fn with_default_path(mut self, path: Path) -> Self {
        self.default_path = path;
        self
    }
}
