//! Graph configuration.

use crate::error::{GraphError, GraphResult};
use crate::geometry::tolerance::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Settings fixed for the lifetime of a [`crate::Graph`].
///
/// `tolerance` drives vertex fusion in the point index and the X/Y face
/// classification of box subtraction. The default is twice the kernel's
/// point-equality epsilon so that two regions computing the same boundary
/// point with independent rounding land on one vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub tolerance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fusion tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> GraphResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(GraphError::invalid(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
