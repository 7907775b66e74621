//! Typed neuron handles.
//!
//! A handle is a copyable [`NeuronId`] tagged with the capabilities of the
//! neuron's kind. Handles are returned by the `create_*` and `find_*` network
//! operations, so holding an `OperantUnit` proves the neuron behind it can
//! prepare, commit and learn.

use crate::capability::{Axon, DiscrepancyProducer, Neuron, OperantNeuron, RespondentNeuron};
use crate::error::Result;
use crate::network::{Network, NodeRef};
use crate::neuron::{NeuronId, SignalKind};
use crate::unit_scalar::UnitScalar;

macro_rules! unit_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NeuronId);

        impl $name {
            pub(crate) fn new(id: NeuronId) -> Self {
                $name(id)
            }
        }

        impl Axon for $name {
            fn neuron_id(&self) -> NeuronId {
                self.0
            }
        }

        impl From<$name> for NodeRef {
            fn from(unit: $name) -> NodeRef {
                NodeRef::Neuron(unit.0)
            }
        }
    };
}

unit_handle!(
    /// Output-only neuron whose activation is set by the host.
    InputUnit
);
unit_handle!(
    /// Neuron driven purely by its learned operant connections.
    OperantUnit
);
unit_handle!(
    /// Operant neuron that also accepts respondent inputs.
    RespondentUnit
);
unit_handle!(
    /// Respondent neuron producing the dopaminergic discrepancy signal.
    DopaminergicUnit
);
unit_handle!(
    /// Operant neuron producing the hippocampal discrepancy signal.
    HippocampalUnit
);

impl InputUnit {
    /// Set and publish the activation level immediately.
    pub fn set_activation_level(&self, network: &mut Network, value: f64) -> Result<()> {
        let value = UnitScalar::new(value)?;
        network.set_input_activation(self.0, value);
        Ok(())
    }
}

impl Neuron for OperantUnit {}
impl OperantNeuron for OperantUnit {}

impl Neuron for RespondentUnit {}
impl OperantNeuron for RespondentUnit {}
impl RespondentNeuron for RespondentUnit {}

impl Neuron for DopaminergicUnit {}
impl OperantNeuron for DopaminergicUnit {}
impl RespondentNeuron for DopaminergicUnit {}
impl DiscrepancyProducer for DopaminergicUnit {
    const SIGNAL: SignalKind = SignalKind::Dopaminergic;
}

impl Neuron for HippocampalUnit {}
impl OperantNeuron for HippocampalUnit {}
impl DiscrepancyProducer for HippocampalUnit {
    const SIGNAL: SignalKind = SignalKind::Hippocampal;
}

// Widening conversions follow the capability nesting.

impl From<RespondentUnit> for OperantUnit {
    fn from(unit: RespondentUnit) -> Self {
        OperantUnit(unit.0)
    }
}

impl From<DopaminergicUnit> for OperantUnit {
    fn from(unit: DopaminergicUnit) -> Self {
        OperantUnit(unit.0)
    }
}

impl From<DopaminergicUnit> for RespondentUnit {
    fn from(unit: DopaminergicUnit) -> Self {
        RespondentUnit(unit.0)
    }
}

impl From<HippocampalUnit> for OperantUnit {
    fn from(unit: HippocampalUnit) -> Self {
        OperantUnit(unit.0)
    }
}
