//! Learning rules.
//!
//! A rule maps the local state of one connection plus the broadcast
//! discrepancy signal to a weight change. The network clamps the result into
//! [0, 1]; rules only decide the direction and size of the change.
//!
//! The default [`SelectionRule`] is a three-factor rule: presynaptic
//! activation, postsynaptic activation and discrepancy must all be present
//! for a weight to grow, and growth is scaled by the capacity the neuron has
//! not yet allocated to its other connections. Without a discrepancy the
//! co-active connection decays in proportion to its own weight.

use crate::config::LearningConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Local state of one connection at learning time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseContext {
    /// Presynaptic activation stored by the last prepare
    pub presynaptic: f64,
    /// Current weight
    pub weight: f64,
    /// Published postsynaptic activation
    pub postsynaptic: f64,
    /// Broadcast signal the postsynaptic neuron learns from
    pub discrepancy: f64,
    /// `max(0, 1 - sum of weights)` over the connection's group
    pub available: f64,
}

/// Weight-update rule applied by `learn()`.
pub trait LearningRule: Debug + Send + Sync {
    /// Weight change for one connection.
    fn weight_change(&self, ctx: &SynapseContext) -> f64;

    /// Short name for logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Default three-factor selection rule.
///
/// ```text
/// d > threshold:  dw =  alpha * d * x * a * available
/// otherwise:      dw = -beta  * w * x * a
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRule {
    pub alpha: f64,
    pub beta: f64,
    pub threshold: f64,
}

impl Default for SelectionRule {
    fn default() -> Self {
        SelectionRule::from(&LearningConfig::default())
    }
}

impl From<&LearningConfig> for SelectionRule {
    fn from(config: &LearningConfig) -> Self {
        SelectionRule {
            alpha: config.alpha,
            beta: config.beta,
            threshold: config.discrepancy_threshold,
        }
    }
}

impl LearningRule for SelectionRule {
    fn weight_change(&self, ctx: &SynapseContext) -> f64 {
        let coactivity = ctx.presynaptic * ctx.postsynaptic;
        if ctx.discrepancy > self.threshold {
            self.alpha * ctx.discrepancy * coactivity * ctx.available
        } else {
            -self.beta * ctx.weight * coactivity
        }
    }

    fn name(&self) -> &'static str {
        "selection"
    }
}
