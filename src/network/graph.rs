use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{BoltzError, BoltzResult};

/// Which side of the bipartite network a unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Input-facing layer, labelled `V1..Vn`.
    Visible,
    /// Latent layer, labelled `H1..Hm`.
    Hidden,
}

impl Layer {
    /// Single-letter label prefix.
    pub fn prefix(self) -> char {
        match self {
            Self::Visible => 'V',
            Self::Hidden => 'H',
        }
    }

    /// The layer every edge from `self` connects to.
    pub fn opposite(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}

/// Identity of a unit: layer plus 0-based index within that layer.
///
/// Displays 1-based (`V1`, `H3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId {
    /// Layer tag.
    pub layer: Layer,
    /// Index within the layer, starting at 0.
    pub index: usize,
}

impl UnitId {
    /// Shorthand for a visible unit id.
    pub fn visible(index: usize) -> Self {
        Self {
            layer: Layer::Visible,
            index,
        }
    }

    /// Shorthand for a hidden unit id.
    pub fn hidden(index: usize) -> Self {
        Self {
            layer: Layer::Hidden,
            index,
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.layer.prefix(), self.index + 1)
    }
}

/// Binary unit state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    /// 0
    #[default]
    Off,
    /// 1
    On,
}

impl UnitState {
    /// Numeric value, always 0 or 1.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Map a Bernoulli draw to a state.
    pub fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl TryFrom<u8> for UnitState {
    type Error = BoltzError;

    fn try_from(v: u8) -> BoltzResult<Self> {
        match v {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            _ => Err(BoltzError::precondition(format!(
                "unit state must be 0 or 1, got {v}"
            ))),
        }
    }
}

/// A single stochastic binary unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    /// Unit identity.
    pub id: UnitId,
    /// Current state.
    pub state: UnitState,
}

/// Undirected edge between a visible and a hidden unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Visible endpoint.
    pub visible: UnitId,
    /// Hidden endpoint.
    pub hidden: UnitId,
}

/// Complete bipartite network of binary units.
///
/// Units are stored in canonical order: visible units by index, then hidden units by index.
/// Every iteration in the crate (updates, layout, rendering) follows that order. The topology is
/// implied by the layer sizes, which never change after construction.
#[derive(Clone, Debug)]
pub struct StateGraph {
    visible: usize,
    hidden: usize,
    units: Vec<Unit>,
}

impl StateGraph {
    /// Build a graph with every unit drawn from Bernoulli(0.5).
    pub fn new<R: Rng + ?Sized>(visible: usize, hidden: usize, rng: &mut R) -> BoltzResult<Self> {
        check_counts(visible, hidden)?;
        let units = canonical_ids(visible, hidden)
            .map(|id| Unit {
                id,
                state: UnitState::from_bool(rng.random_bool(0.5)),
            })
            .collect();
        Ok(Self {
            visible,
            hidden,
            units,
        })
    }

    /// Build a graph with explicit initial states.
    pub fn from_states(visible: &[UnitState], hidden: &[UnitState]) -> BoltzResult<Self> {
        check_counts(visible.len(), hidden.len())?;
        let units = canonical_ids(visible.len(), hidden.len())
            .zip(visible.iter().chain(hidden.iter()))
            .map(|(id, &state)| Unit { id, state })
            .collect();
        Ok(Self {
            visible: visible.len(),
            hidden: hidden.len(),
            units,
        })
    }

    /// Number of visible units.
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Number of hidden units.
    pub fn hidden_count(&self) -> usize {
        self.hidden
    }

    /// Total number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Number of edges (`visible * hidden`).
    pub fn edge_count(&self) -> usize {
        self.visible * self.hidden
    }

    /// Units in canonical order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Unit ids in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().map(|u| u.id)
    }

    /// All edges, visible-major.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.visible).flat_map(move |v| {
            (0..self.hidden).map(move |h| Edge {
                visible: UnitId::visible(v),
                hidden: UnitId::hidden(h),
            })
        })
    }

    /// Whether `id` names a unit of this graph.
    pub fn contains(&self, id: UnitId) -> bool {
        self.slot(id).is_some()
    }

    /// The opposite-layer units connected to `id`, in canonical order.
    ///
    /// Returns an empty iterator for ids outside the graph.
    pub fn neighbors(&self, id: UnitId) -> impl Iterator<Item = &Unit> + '_ {
        let range = if self.contains(id) {
            self.layer_range(id.layer.opposite())
        } else {
            0..0
        };
        self.units[range].iter()
    }

    /// Sum of the neighbors' states, in `[0, neighbor count]`.
    pub fn neighbor_energy(&self, id: UnitId) -> u32 {
        self.neighbors(id).map(|u| u32::from(u.state.as_u8())).sum()
    }

    /// Current state of `id`, if it exists.
    pub fn state(&self, id: UnitId) -> Option<UnitState> {
        self.slot(id).map(|i| self.units[i].state)
    }

    /// Overwrite the state of `id`.
    pub fn set_state(&mut self, id: UnitId, state: UnitState) -> BoltzResult<()> {
        let i = self
            .slot(id)
            .ok_or_else(|| BoltzError::precondition(format!("unknown unit {id}")))?;
        self.units[i].state = state;
        Ok(())
    }

    /// Copy of all states in canonical order.
    pub fn states(&self) -> Vec<UnitState> {
        self.units.iter().map(|u| u.state).collect()
    }

    pub(crate) fn state_at(&self, slot: usize) -> UnitState {
        self.units[slot].state
    }

    pub(crate) fn set_state_at(&mut self, slot: usize, state: UnitState) {
        self.units[slot].state = state;
    }

    pub(crate) fn layer_range(&self, layer: Layer) -> std::ops::Range<usize> {
        match layer {
            Layer::Visible => 0..self.visible,
            Layer::Hidden => self.visible..self.visible + self.hidden,
        }
    }

    fn slot(&self, id: UnitId) -> Option<usize> {
        let range = self.layer_range(id.layer);
        (id.index < range.len()).then(|| range.start + id.index)
    }
}

fn check_counts(visible: usize, hidden: usize) -> BoltzResult<()> {
    if visible == 0 || hidden == 0 {
        return Err(BoltzError::precondition(format!(
            "unit counts must be > 0 (visible={visible}, hidden={hidden})"
        )));
    }
    Ok(())
}

fn canonical_ids(visible: usize, hidden: usize) -> impl Iterator<Item = UnitId> {
    (0..visible)
        .map(UnitId::visible)
        .chain((0..hidden).map(UnitId::hidden))
}

#[cfg(test)]
#[path = "../../tests/unit/network/graph.rs"]
mod tests;
