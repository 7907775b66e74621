//! Container hierarchy: layers of neurons, areas of layers, regions of areas.
//!
//! Containers are plain index lists stored in the network arena. Fan-out
//! operations (`activate`, `learn`, weight setting, ...) are the ordinary
//! [`Network`] operations called with a container id; they visit every
//! descendant neuron in container order.
//!
//! Containers grow lazily while the network is unlocked. Growing a container
//! appends children of the container's kind; children of an identified
//! container are named `"{parent}_{index}"` and registered, children of an
//! anonymous container are anonymous.

use crate::error::{Result, SelnetError};
use crate::identifier::Identifier;
use crate::network::{Network, NodeRef};
use crate::neuron::{NeuronId, NeuronKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

macro_rules! container_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                $name(index as u32)
            }

            #[inline]
            pub fn as_usize(self) -> usize {
                self.0 as usize
            }
        }
    };
}

container_id!(
    /// Stable index of a layer.
    LayerId
);
container_id!(
    /// Stable index of an area.
    AreaId
);
container_id!(
    /// Stable index of a region.
    RegionId
);

/// Any container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerId {
    Layer(LayerId),
    Area(AreaId),
    Region(RegionId),
}

impl ContainerId {
    /// Human-readable description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            ContainerId::Layer(_) => "a layer",
            ContainerId::Area(_) => "an area",
            ContainerId::Region(_) => "a region",
        }
    }
}

impl From<LayerId> for ContainerId {
    fn from(id: LayerId) -> Self {
        ContainerId::Layer(id)
    }
}

impl From<AreaId> for ContainerId {
    fn from(id: AreaId) -> Self {
        ContainerId::Area(id)
    }
}

impl From<RegionId> for ContainerId {
    fn from(id: RegionId) -> Self {
        ContainerId::Region(id)
    }
}

impl From<LayerId> for NodeRef {
    fn from(id: LayerId) -> Self {
        NodeRef::Container(id.into())
    }
}

impl From<AreaId> for NodeRef {
    fn from(id: AreaId) -> Self {
        NodeRef::Container(id.into())
    }
}

impl From<RegionId> for NodeRef {
    fn from(id: RegionId) -> Self {
        NodeRef::Container(id.into())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Layer {
    pub identifier: Option<Identifier>,
    pub environment: Option<ContainerId>,
    pub kind: NeuronKind,
    pub neurons: Vec<NeuronId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Area {
    pub identifier: Option<Identifier>,
    pub environment: Option<ContainerId>,
    pub kind: NeuronKind,
    pub layers: Vec<LayerId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Region {
    pub identifier: Option<Identifier>,
    pub kind: NeuronKind,
    pub areas: Vec<AreaId>,
}

impl Network {
    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a free-standing layer whose grown neurons are of `kind`.
    pub fn create_layer(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
        kind: NeuronKind,
    ) -> Result<LayerId> {
        self.add_layer(identifier.into(), None, kind)
    }

    /// Create a free-standing area whose grown layers hold neurons of `kind`.
    ///
    /// Areas never hold neurons directly; a single-layer area is an area
    /// whose neurons all live in layer 0.
    pub fn create_area(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
        kind: NeuronKind,
    ) -> Result<AreaId> {
        self.add_area(identifier.into(), None, kind)
    }

    /// Create a region whose grown areas hold neurons of `kind`.
    pub fn create_region(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
        kind: NeuronKind,
    ) -> Result<RegionId> {
        let identifier = identifier.into();
        self.claim(identifier.as_ref())?;
        let id = RegionId::new(self.regions.len());
        if let Some(identifier) = &identifier {
            self.registry.insert(identifier.clone(), id.into());
        }
        self.regions.push(Region {
            identifier,
            kind,
            areas: Vec::new(),
        });
        Ok(id)
    }

    /// Create a neuron of the layer's kind at `index`, growing the layer with
    /// auto-named neurons up to `index` first. Without an identifier the new
    /// neuron takes the auto name of its slot.
    ///
    /// # Errors
    ///
    /// - `StructureLocked` after `lock_structure()`
    /// - `DuplicateIdentifier` if `identifier` (or a grown name) is taken
    /// - `SlotOccupied` if the layer already has a neuron at `index`
    pub fn create_neuron_in(
        &mut self,
        layer: LayerId,
        identifier: impl Into<Option<Identifier>>,
        index: usize,
    ) -> Result<NeuronId> {
        let length = self.layers[layer.as_usize()].neurons.len();
        if index < length {
            return Err(SelnetError::SlotOccupied { index });
        }
        let identifier = self.slot_name(layer.into(), identifier.into(), index);
        self.claim(identifier.as_ref())?;
        self.check_growth(layer.into(), index, identifier.as_ref())?;

        self.grow_layer(layer, index)?;
        let kind = self.layers[layer.as_usize()].kind;
        let id = self.add_neuron(kind, identifier, Some(layer.into()))?;
        self.layers[layer.as_usize()].neurons.push(id);
        Ok(id)
    }

    /// Create a neuron in layer `layer_index` of an area, growing both levels.
    ///
    /// Areas hold layers only; a single-layer area keeps its neurons in
    /// layer 0. Every name the call would register is checked before either
    /// level grows, so a failed call leaves the area unchanged.
    pub fn create_neuron_in_area(
        &mut self,
        area: AreaId,
        identifier: impl Into<Option<Identifier>>,
        layer_index: usize,
        index: usize,
    ) -> Result<NeuronId> {
        let identifier = identifier.into();
        self.check_nested_create(area.into(), &[layer_index, index], identifier.as_ref())?;
        let layer = self.layer_at(area, layer_index)?;
        self.create_neuron_in(layer, identifier, index)
    }

    /// Create a neuron in `area_index/layer_index` of a region, growing every level.
    pub fn create_neuron_in_region(
        &mut self,
        region: RegionId,
        identifier: impl Into<Option<Identifier>>,
        area_index: usize,
        layer_index: usize,
        index: usize,
    ) -> Result<NeuronId> {
        let identifier = identifier.into();
        self.check_nested_create(
            region.into(),
            &[area_index, layer_index, index],
            identifier.as_ref(),
        )?;
        let area = self.area_at(region, area_index)?;
        let layer = self.layer_at(area, layer_index)?;
        self.create_neuron_in(layer, identifier, index)
    }

    /// Walk `path` down from `root` and collect every identifier a nested
    /// create would register: the auto names of grown containers at each
    /// level and the final node's name. All of them must be free in the
    /// registry and distinct from each other.
    fn check_nested_create(
        &self,
        root: ContainerId,
        path: &[usize],
        identifier: Option<&Identifier>,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        let mut names = Vec::new();
        let mut existing = Some(root);
        let mut parent = self.container_identifier(root).cloned();

        for (depth, &index) in path.iter().enumerate() {
            let last = depth + 1 == path.len();
            let len = existing.map_or(0, |c| self.container_len(c));
            if last {
                if index < len {
                    return Err(SelnetError::SlotOccupied { index });
                }
                if let Some(parent) = &parent {
                    names.extend((len..index).map(|i| parent.child(i)));
                }
                names.extend(
                    identifier
                        .cloned()
                        .or_else(|| parent.as_ref().map(|p| p.child(index))),
                );
                break;
            }
            if let Some(child) = existing.and_then(|c| self.child_container(c, index)) {
                parent = self.container_identifier(child).cloned();
                existing = Some(child);
                continue;
            }
            if let Some(parent) = &parent {
                names.extend((len..=index).map(|i| parent.child(i)));
            }
            parent = parent.map(|p| p.child(index));
            existing = None;
        }

        let mut seen = HashSet::new();
        for name in &names {
            self.check_available(name)?;
            if !seen.insert(name.as_str()) {
                return Err(SelnetError::DuplicateIdentifier(name.to_string()));
            }
        }
        Ok(())
    }

    fn child_container(&self, container: ContainerId, index: usize) -> Option<ContainerId> {
        match container {
            ContainerId::Layer(_) => None,
            ContainerId::Area(id) => self.areas[id.as_usize()]
                .layers
                .get(index)
                .map(|&layer| layer.into()),
            ContainerId::Region(id) => self.regions[id.as_usize()]
                .areas
                .get(index)
                .map(|&area| area.into()),
        }
    }

    /// Create a layer at `index` of an area, growing the area first.
    pub fn create_layer_in(
        &mut self,
        area: AreaId,
        identifier: impl Into<Option<Identifier>>,
        index: usize,
    ) -> Result<LayerId> {
        if index < self.areas[area.as_usize()].layers.len() {
            return Err(SelnetError::SlotOccupied { index });
        }
        let identifier = self.slot_name(area.into(), identifier.into(), index);
        self.claim(identifier.as_ref())?;
        self.check_growth(area.into(), index, identifier.as_ref())?;

        self.grow_area(area, index)?;
        let kind = self.areas[area.as_usize()].kind;
        let layer = self.add_layer(identifier, Some(area.into()), kind)?;
        self.areas[area.as_usize()].layers.push(layer);
        Ok(layer)
    }

    /// Create an area at `index` of a region, growing the region first.
    pub fn create_area_in(
        &mut self,
        region: RegionId,
        identifier: impl Into<Option<Identifier>>,
        index: usize,
    ) -> Result<AreaId> {
        if index < self.regions[region.as_usize()].areas.len() {
            return Err(SelnetError::SlotOccupied { index });
        }
        let identifier = self.slot_name(region.into(), identifier.into(), index);
        self.claim(identifier.as_ref())?;
        self.check_growth(region.into(), index, identifier.as_ref())?;

        self.grow_region(region, index)?;
        let kind = self.regions[region.as_usize()].kind;
        let area = self.add_area(identifier, Some(region.into()), kind)?;
        self.regions[region.as_usize()].areas.push(area);
        Ok(area)
    }

    /// Explicit identifier, or the auto name of slot `index` when none is given.
    fn slot_name(
        &self,
        container: ContainerId,
        identifier: Option<Identifier>,
        index: usize,
    ) -> Option<Identifier> {
        identifier.or_else(|| {
            self.container_identifier(container)
                .map(|parent| parent.child(index))
        })
    }

    fn claim(&self, identifier: Option<&Identifier>) -> Result<()> {
        self.ensure_unlocked()?;
        if let Some(identifier) = identifier {
            self.check_available(identifier)?;
        }
        Ok(())
    }

    fn add_layer(
        &mut self,
        identifier: Option<Identifier>,
        environment: Option<ContainerId>,
        kind: NeuronKind,
    ) -> Result<LayerId> {
        self.claim(identifier.as_ref())?;
        let id = LayerId::new(self.layers.len());
        if let Some(identifier) = &identifier {
            self.registry.insert(identifier.clone(), id.into());
        }
        self.layers.push(Layer {
            identifier,
            environment,
            kind,
            neurons: Vec::new(),
        });
        Ok(id)
    }

    fn add_area(
        &mut self,
        identifier: Option<Identifier>,
        environment: Option<ContainerId>,
        kind: NeuronKind,
    ) -> Result<AreaId> {
        self.claim(identifier.as_ref())?;
        let id = AreaId::new(self.areas.len());
        if let Some(identifier) = &identifier {
            self.registry.insert(identifier.clone(), id.into());
        }
        self.areas.push(Area {
            identifier,
            environment,
            kind,
            layers: Vec::new(),
        });
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Growth
    // ------------------------------------------------------------------

    /// Names for children `range` of a container; fails if any is taken.
    fn child_names(
        &self,
        parent: Option<&Identifier>,
        range: Range<usize>,
    ) -> Result<Vec<Option<Identifier>>> {
        range
            .map(|index| match parent {
                Some(parent) => {
                    let name = parent.child(index);
                    self.check_available(&name)?;
                    Ok(Some(name))
                }
                None => Ok(None),
            })
            .collect()
    }

    /// Reject growth to `len` whose auto names collide with the registry or
    /// with the identifier about to be inserted.
    fn check_growth(
        &self,
        container: ContainerId,
        len: usize,
        reserved: Option<&Identifier>,
    ) -> Result<()> {
        let current = self.container_len(container);
        if len <= current {
            return Ok(());
        }
        let names = self.child_names(self.container_identifier(container), current..len)?;
        if let Some(reserved) = reserved {
            if names.iter().flatten().any(|name| name == reserved) {
                return Err(SelnetError::DuplicateIdentifier(reserved.to_string()));
            }
        }
        Ok(())
    }

    /// Grow a container to at least `len` children.
    ///
    /// Does nothing if the container is already long enough.
    ///
    /// # Errors
    ///
    /// - `StructureLocked` if growth is needed after `lock_structure()`
    /// - `DuplicateIdentifier` if a generated child name is already taken
    pub fn ensure_len(&mut self, container: impl Into<ContainerId>, len: usize) -> Result<()> {
        let container = container.into();
        if len <= self.container_len(container) {
            return Ok(());
        }
        self.ensure_unlocked()?;
        self.check_growth(container, len, None)?;
        match container {
            ContainerId::Layer(layer) => self.grow_layer(layer, len),
            ContainerId::Area(area) => self.grow_area(area, len),
            ContainerId::Region(region) => self.grow_region(region, len),
        }
    }

    fn grow_layer(&mut self, layer: LayerId, len: usize) -> Result<()> {
        let (kind, names) = {
            let l = &self.layers[layer.as_usize()];
            (l.kind, self.child_names(l.identifier.as_ref(), l.neurons.len()..len)?)
        };
        for name in names {
            let id = self.add_neuron(kind, name, Some(layer.into()))?;
            self.layers[layer.as_usize()].neurons.push(id);
        }
        Ok(())
    }

    fn grow_area(&mut self, area: AreaId, len: usize) -> Result<()> {
        let (kind, names) = {
            let a = &self.areas[area.as_usize()];
            (a.kind, self.child_names(a.identifier.as_ref(), a.layers.len()..len)?)
        };
        for name in names {
            let id = self.add_layer(name, Some(area.into()), kind)?;
            self.areas[area.as_usize()].layers.push(id);
        }
        Ok(())
    }

    fn grow_region(&mut self, region: RegionId, len: usize) -> Result<()> {
        let (kind, names) = {
            let r = &self.regions[region.as_usize()];
            (r.kind, self.child_names(r.identifier.as_ref(), r.areas.len()..len)?)
        };
        for name in names {
            let id = self.add_area(name, Some(region.into()), kind)?;
            self.regions[region.as_usize()].areas.push(id);
        }
        Ok(())
    }

    fn subscript_error(&self, container: ContainerId, index: usize, error: SelnetError) -> SelnetError {
        match error {
            SelnetError::StructureLocked => SelnetError::IndexOutOfBounds {
                index,
                length: self.container_len(container),
            },
            other => other,
        }
    }

    /// Neuron at `index` of a layer, growing the layer while unlocked.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` once the structure is locked.
    pub fn neuron_at(&mut self, layer: LayerId, index: usize) -> Result<NeuronId> {
        let container = layer.into();
        self.ensure_len(container, index + 1)
            .map_err(|e| self.subscript_error(container, index, e))?;
        Ok(self.layers[layer.as_usize()].neurons[index])
    }

    /// Layer at `index` of an area, growing the area while unlocked.
    pub fn layer_at(&mut self, area: AreaId, index: usize) -> Result<LayerId> {
        let container = area.into();
        self.ensure_len(container, index + 1)
            .map_err(|e| self.subscript_error(container, index, e))?;
        Ok(self.areas[area.as_usize()].layers[index])
    }

    /// Area at `index` of a region, growing the region while unlocked.
    pub fn area_at(&mut self, region: RegionId, index: usize) -> Result<AreaId> {
        let container = region.into();
        self.ensure_len(container, index + 1)
            .map_err(|e| self.subscript_error(container, index, e))?;
        Ok(self.regions[region.as_usize()].areas[index])
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn layer_neurons(&self, layer: LayerId) -> &[NeuronId] {
        &self.layers[layer.as_usize()].neurons
    }

    pub fn area_layers(&self, area: AreaId) -> &[LayerId] {
        &self.areas[area.as_usize()].layers
    }

    pub fn region_areas(&self, region: RegionId) -> &[AreaId] {
        &self.regions[region.as_usize()].areas
    }

    /// Number of direct children.
    pub fn container_len(&self, container: ContainerId) -> usize {
        match container {
            ContainerId::Layer(id) => self.layers[id.as_usize()].neurons.len(),
            ContainerId::Area(id) => self.areas[id.as_usize()].layers.len(),
            ContainerId::Region(id) => self.regions[id.as_usize()].areas.len(),
        }
    }

    pub fn container_identifier(&self, container: ContainerId) -> Option<&Identifier> {
        match container {
            ContainerId::Layer(id) => self.layers.get(id.as_usize())?.identifier.as_ref(),
            ContainerId::Area(id) => self.areas.get(id.as_usize())?.identifier.as_ref(),
            ContainerId::Region(id) => self.regions.get(id.as_usize())?.identifier.as_ref(),
        }
    }

    /// Neuron kind produced when the container grows.
    pub fn container_kind(&self, container: ContainerId) -> NeuronKind {
        match container {
            ContainerId::Layer(id) => self.layers[id.as_usize()].kind,
            ContainerId::Area(id) => self.areas[id.as_usize()].kind,
            ContainerId::Region(id) => self.regions[id.as_usize()].kind,
        }
    }

    pub(crate) fn container_environment(&self, container: ContainerId) -> Option<ContainerId> {
        match container {
            ContainerId::Layer(id) => self.layers.get(id.as_usize())?.environment,
            ContainerId::Area(id) => self.areas.get(id.as_usize())?.environment,
            ContainerId::Region(_) => None,
        }
    }

    /// Largest number of stacked layers below a container.
    pub fn max_layer_depth(&self, container: ContainerId) -> usize {
        match container {
            ContainerId::Layer(_) => 1,
            ContainerId::Area(id) => self.areas[id.as_usize()].layers.len(),
            ContainerId::Region(id) => self.regions[id.as_usize()]
                .areas
                .iter()
                .map(|&a| self.max_layer_depth(a.into()))
                .max()
                .unwrap_or(0),
        }
    }

    /// Largest number of neurons in any layer below a container.
    pub fn max_node_width(&self, container: ContainerId) -> usize {
        match container {
            ContainerId::Layer(id) => self.layers[id.as_usize()].neurons.len(),
            ContainerId::Area(id) => self.areas[id.as_usize()]
                .layers
                .iter()
                .map(|&l| self.max_node_width(l.into()))
                .max()
                .unwrap_or(0),
            ContainerId::Region(id) => self.regions[id.as_usize()]
                .areas
                .iter()
                .map(|&a| self.max_node_width(a.into()))
                .max()
                .unwrap_or(0),
        }
    }

    /// Append every neuron below `node` (or `node` itself) in container order.
    pub fn collect_neurons(&self, node: NodeRef, out: &mut Vec<NeuronId>) {
        match node {
            NodeRef::Neuron(id) => out.push(id),
            NodeRef::Container(ContainerId::Layer(id)) => {
                out.extend_from_slice(&self.layers[id.as_usize()].neurons)
            }
            NodeRef::Container(ContainerId::Area(id)) => {
                for &layer in &self.areas[id.as_usize()].layers {
                    self.collect_neurons(layer.into(), out);
                }
            }
            NodeRef::Container(ContainerId::Region(id)) => {
                for &area in &self.regions[id.as_usize()].areas {
                    self.collect_neurons(area.into(), out);
                }
            }
        }
    }

    /// Append every operant-capable neuron below `node`, skipping inputs.
    pub fn operant_neurons_in(&self, node: NodeRef, out: &mut Vec<NeuronId>) {
        let mut found = Vec::new();
        self.collect_neurons(node, &mut found);
        out.extend(
            found
                .into_iter()
                .filter(|&id| self.neuron(id).kind().is_operant()),
        );
    }

    fn find_container(&self, identifier: &str, expected: &'static str) -> Result<ContainerId> {
        match self.find_node(identifier)? {
            NodeRef::Container(c) => Ok(c),
            NodeRef::Neuron(id) => Err(SelnetError::WrongNodeKind {
                identifier: identifier.to_string(),
                expected,
                actual: self.neuron(id).kind().describe(),
            }),
        }
    }

    pub fn find_layer(&self, identifier: &str) -> Result<LayerId> {
        match self.find_container(identifier, "a layer")? {
            ContainerId::Layer(id) => Ok(id),
            other => Err(SelnetError::WrongNodeKind {
                identifier: identifier.to_string(),
                expected: "a layer",
                actual: other.describe(),
            }),
        }
    }

    pub fn find_area(&self, identifier: &str) -> Result<AreaId> {
        match self.find_container(identifier, "an area")? {
            ContainerId::Area(id) => Ok(id),
            other => Err(SelnetError::WrongNodeKind {
                identifier: identifier.to_string(),
                expected: "an area",
                actual: other.describe(),
            }),
        }
    }

    pub fn find_region(&self, identifier: &str) -> Result<RegionId> {
        match self.find_container(identifier, "a region")? {
            ContainerId::Region(id) => Ok(id),
            other => Err(SelnetError::WrongNodeKind {
                identifier: identifier.to_string(),
                expected: "a region",
                actual: other.describe(),
            }),
        }
    }
}
