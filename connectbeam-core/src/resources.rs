//! Tool resources
//!
//! Sizes and keys the canvas provides to tools: how large handles are
//! painted, how close the pointer must be to grab something, and which
//! registry entry produces new connectors.

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Registry key of the default connector shape
pub const CONNECTOR_SHAPE_ID: &str = "ConnectionShape";

/// Shared tool resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResources {
    /// Radius of painted handles, in view pixels
    #[serde(default = "default_handle_radius")]
    pub handle_radius: f64,

    /// Grab distance for handles and connection points, in view pixels
    #[serde(default = "default_grab_sensitivity")]
    pub grab_sensitivity: f64,

    /// Registry key used to create new connectors
    #[serde(default = "default_connector_type")]
    pub connector_type: String,
}

fn default_handle_radius() -> f64 {
    3.0
}

fn default_grab_sensitivity() -> f64 {
    3.0
}

fn default_connector_type() -> String {
    CONNECTOR_SHAPE_ID.to_string()
}

impl Default for ToolResources {
    fn default() -> Self {
        Self {
            handle_radius: default_handle_radius(),
            grab_sensitivity: default_grab_sensitivity(),
            connector_type: default_connector_type(),
        }
    }
}

impl ToolResources {
    /// Parse resources from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let resources: ToolResources =
            serde_json::from_str(json).context("Failed to parse tool resources")?;
        resources.validate()?;
        Ok(resources)
    }

    /// Reject sizes that would make hit testing meaningless
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.handle_radius.is_finite() && self.handle_radius > 0.0) {
            anyhow::bail!("handle_radius must be positive, got {}", self.handle_radius);
        }
        if !(self.grab_sensitivity.is_finite() && self.grab_sensitivity >= 0.0) {
            anyhow::bail!(
                "grab_sensitivity must not be negative, got {}",
                self.grab_sensitivity
            );
        }
        Ok(())
    }

    /// Builder-style grab sensitivity override
    pub fn with_grab_sensitivity(mut self, grab_sensitivity: f64) -> Self {
        self.grab_sensitivity = grab_sensitivity;
        self
    }
}
