use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{BoltzError, BoltzResult};
use crate::network::graph::{StateGraph, UnitState};

/// Strictly positive, finite sampling temperature.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Temperature(f64);

impl Temperature {
    /// Validate and wrap a temperature.
    pub fn new(t: f64) -> BoltzResult<Self> {
        if !t.is_finite() || t <= 0.0 {
            return Err(BoltzError::precondition(format!(
                "temperature must be finite and > 0, got {t}"
            )));
        }
        Ok(Self(t))
    }

    /// Raw value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(1.0)
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let t = f64::deserialize(deserializer)?;
        Self::new(t).map_err(serde::de::Error::custom)
    }
}

/// How neighbor states are read during one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Every unit reads the states as they were when the sweep started.
    #[default]
    Snapshot,
    /// Units are updated in canonical order and read states written earlier in the same sweep.
    Sequential,
}

/// Logistic activation `1 / (1 + exp(-energy / temperature))`.
///
/// `energy` is never negative here, so the result lies in `[0.5, 1)` for finite inputs and is
/// exactly `0.5` at zero energy.
pub fn activation_probability(energy: u32, temperature: Temperature) -> f64 {
    1.0 / (1.0 + (-f64::from(energy) / temperature.get()).exp())
}

/// Run one sweep over every unit in canonical order.
pub fn step<R: Rng + ?Sized>(
    graph: &mut StateGraph,
    temperature: Temperature,
    policy: UpdatePolicy,
    rng: &mut R,
) {
    match policy {
        UpdatePolicy::Snapshot => {
            let before = graph.clone();
            for slot in 0..graph.unit_count() {
                let id = before.units()[slot].id;
                let p = activation_probability(before.neighbor_energy(id), temperature);
                graph.set_state_at(slot, sample(p, rng));
            }
        }
        UpdatePolicy::Sequential => {
            for slot in 0..graph.unit_count() {
                let id = graph.units()[slot].id;
                let p = activation_probability(graph.neighbor_energy(id), temperature);
                graph.set_state_at(slot, sample(p, rng));
            }
        }
    }
    debug_assert!((0..graph.unit_count()).all(|s| graph.state_at(s).as_u8() <= 1));
}

fn sample<R: Rng + ?Sized>(p: f64, rng: &mut R) -> UnitState {
    UnitState::from_bool(rng.random_bool(p.clamp(0.0, 1.0)))
}

#[cfg(test)]
#[path = "../../tests/unit/network/update.rs"]
mod tests;
