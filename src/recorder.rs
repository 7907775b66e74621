use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Published state of the whole network after one timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestepRecord {
    /// Timestep counter after the step completed
    pub timestep: u64,
    /// Activation of every neuron, indexed by `NeuronId`
    pub activations: Vec<f64>,
    pub dopaminergic_signal: f64,
    pub hippocampal_signal: f64,
}

/// Recorded activation history for display hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivationTrace {
    /// Identifier of every neuron, indexed by `NeuronId`
    pub labels: Vec<Option<String>>,
    pub steps: Vec<TimestepRecord>,
}

impl ActivationTrace {
    pub fn new(labels: Vec<Option<String>>) -> Self {
        Self {
            labels,
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: TimestepRecord) {
        self.steps.push(step);
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Activation history of the neuron labelled `identifier`.
    pub fn series(&self, identifier: &str) -> Option<Vec<f64>> {
        let index = self
            .labels
            .iter()
            .position(|label| label.as_deref() == Some(identifier))?;
        Some(
            self.steps
                .iter()
                .map(|step| step.activations.get(index).copied().unwrap_or(0.0))
                .collect(),
        )
    }

    /// Export trace to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Export trace to JSON file
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Import trace from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Import trace from JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Records per-timestep activations while enabled.
#[derive(Debug, Clone)]
pub struct ActivationRecorder {
    trace: ActivationTrace,
    recording: bool,
}

impl ActivationRecorder {
    pub fn new(labels: Vec<Option<String>>) -> Self {
        Self {
            trace: ActivationTrace::new(labels),
            recording: true,
        }
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn record(&mut self, step: TimestepRecord) {
        if self.recording {
            self.trace.add_step(step);
        }
    }

    pub fn trace(&self) -> &ActivationTrace {
        &self.trace
    }

    pub fn export_trace(self) -> ActivationTrace {
        self.trace
    }

    pub fn reset(&mut self) {
        self.trace.steps.clear();
    }
}
