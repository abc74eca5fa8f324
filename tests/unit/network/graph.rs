use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn counts_match_layer_sizes() {
    for (v, h) in [(1, 1), (4, 3), (2, 7), (9, 1)] {
        let g = StateGraph::new(v, h, &mut rng()).unwrap();
        assert_eq!(g.unit_count(), v + h);
        assert_eq!(g.edge_count(), v * h);
        assert_eq!(g.edges().count(), v * h);
    }
}

#[test]
fn edges_are_complete_bipartite_without_duplicates() {
    let g = StateGraph::new(4, 3, &mut rng()).unwrap();
    let edges: BTreeSet<(UnitId, UnitId)> = g.edges().map(|e| (e.visible, e.hidden)).collect();
    assert_eq!(edges.len(), 12);
    for (v, h) in edges {
        assert_eq!(v.layer, Layer::Visible);
        assert_eq!(h.layer, Layer::Hidden);
        assert!(g.contains(v) && g.contains(h));
    }
}

#[test]
fn neighbors_are_the_whole_opposite_layer() {
    let g = StateGraph::new(4, 3, &mut rng()).unwrap();

    let n: Vec<UnitId> = g.neighbors(UnitId::visible(2)).map(|u| u.id).collect();
    assert_eq!(n, vec![UnitId::hidden(0), UnitId::hidden(1), UnitId::hidden(2)]);

    let n: Vec<UnitId> = g.neighbors(UnitId::hidden(0)).map(|u| u.id).collect();
    assert_eq!(n.len(), 4);
    assert!(n.iter().all(|id| id.layer == Layer::Visible));

    assert_eq!(g.neighbors(UnitId::hidden(3)).count(), 0);
}

#[test]
fn canonical_order_and_labels() {
    let g = StateGraph::new(4, 3, &mut rng()).unwrap();
    let labels: Vec<String> = g.ids().map(|id| id.to_string()).collect();
    assert_eq!(labels, ["V1", "V2", "V3", "V4", "H1", "H2", "H3"]);
}

#[test]
fn zero_counts_are_rejected() {
    let err = StateGraph::new(0, 3, &mut rng()).unwrap_err();
    assert!(matches!(err, BoltzError::Precondition(_)));
    assert!(StateGraph::new(4, 0, &mut rng()).is_err());
    assert!(StateGraph::from_states(&[], &[UnitState::On]).is_err());
}

#[test]
fn initial_states_are_roughly_fair() {
    let mut r = rng();
    let mut on = 0usize;
    let mut total = 0usize;
    for _ in 0..500 {
        let g = StateGraph::new(4, 3, &mut r).unwrap();
        on += g.units().iter().filter(|u| u.state == UnitState::On).count();
        total += g.unit_count();
    }
    let frac = on as f64 / total as f64;
    assert!((0.45..0.55).contains(&frac), "fraction on = {frac}");
}

#[test]
fn same_seed_gives_same_initial_states() {
    let a = StateGraph::new(4, 3, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = StateGraph::new(4, 3, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a.states(), b.states());
}

#[test]
fn state_accessors_and_energy() {
    use crate::network::graph::UnitState::{Off, On};
    let mut g = StateGraph::from_states(&[On, Off, On, On], &[Off, On, Off]).unwrap();

    assert_eq!(g.neighbor_energy(UnitId::visible(0)), 1);
    assert_eq!(g.neighbor_energy(UnitId::hidden(2)), 3);

    g.set_state(UnitId::hidden(0), On).unwrap();
    assert_eq!(g.state(UnitId::hidden(0)), Some(On));
    assert_eq!(g.neighbor_energy(UnitId::visible(0)), 2);

    assert_eq!(g.state(UnitId::visible(4)), None);
    assert!(g.set_state(UnitId::visible(4), On).is_err());
}

#[test]
fn state_values_are_binary() {
    assert_eq!(UnitState::try_from(0).unwrap(), UnitState::Off);
    assert_eq!(UnitState::try_from(1).unwrap(), UnitState::On);
    assert!(UnitState::try_from(2).is_err());
}
