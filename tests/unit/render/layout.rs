use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn canvas() -> Canvas {
    Canvas::new(800, 600).unwrap()
}

#[test]
fn layers_occupy_separate_bands() {
    let g = StateGraph::new(4, 3, &mut StdRng::seed_from_u64(1)).unwrap();
    let l = multipartite_layout(&g, canvas(), 35.0, 19.0);

    assert_eq!(l.positions.len(), 7);
    let vx: Vec<f64> = l.positions[..4].iter().map(|p| p.x).collect();
    let hx: Vec<f64> = l.positions[4..].iter().map(|p| p.x).collect();
    assert!(vx.iter().all(|&x| x == vx[0]));
    assert!(hx.iter().all(|&x| x == hx[0]));
    assert!(vx[0] + 4.0 * l.node_radius < hx[0]);
}

#[test]
fn nodes_fit_inside_canvas_below_title() {
    for (w, h) in [(800, 600), (160, 120), (64, 64)] {
        let g = StateGraph::new(4, 3, &mut StdRng::seed_from_u64(1)).unwrap();
        let c = Canvas::new(w, h).unwrap();
        let l = multipartite_layout(&g, c, 35.0, 19.0);
        for p in &l.positions {
            assert!(p.x - l.node_radius >= 0.0 && p.x + l.node_radius <= f64::from(w));
            assert!(p.y - l.node_radius >= l.title_band);
            assert!(p.y + l.node_radius <= f64::from(h));
        }
    }
}

#[test]
fn nodes_within_a_band_are_ordered_and_centered() {
    let g = StateGraph::new(4, 3, &mut StdRng::seed_from_u64(1)).unwrap();
    let l = multipartite_layout(&g, canvas(), 35.0, 19.0);

    let vy: Vec<f64> = l.positions[..4].iter().map(|p| p.y).collect();
    assert!(vy.windows(2).all(|w| w[0] < w[1]));

    let v_mid = (vy[0] + vy[3]) / 2.0;
    assert!((l.positions[5].y - v_mid).abs() < 1e-9);

    // Shared spacing between layers.
    let dv = vy[1] - vy[0];
    let dh = l.positions[5].y - l.positions[4].y;
    assert!((dv - dh).abs() < 1e-9);
}

#[test]
fn layout_ignores_states() {
    use crate::network::graph::UnitState::{Off, On};
    let a = StateGraph::from_states(&[On; 4], &[Off; 3]).unwrap();
    let b = StateGraph::from_states(&[Off, On, Off, On], &[On; 3]).unwrap();
    assert_eq!(
        multipartite_layout(&a, canvas(), 35.0, 19.0),
        multipartite_layout(&b, canvas(), 35.0, 19.0)
    );
}

#[test]
fn edges_cover_every_visible_hidden_pair() {
    let g = StateGraph::new(4, 3, &mut StdRng::seed_from_u64(1)).unwrap();
    let l = multipartite_layout(&g, canvas(), 35.0, 19.0);
    assert_eq!(l.edges.len(), 12);
    assert!(l.edges.iter().all(|&(v, h)| v < 4 && (4..7).contains(&h)));
}

#[test]
fn single_unit_layers_sit_on_the_center_line() {
    let g = StateGraph::new(1, 1, &mut StdRng::seed_from_u64(1)).unwrap();
    let l = multipartite_layout(&g, canvas(), 35.0, 19.0);
    assert_eq!(l.positions[0].y, l.positions[1].y);
    assert_eq!(l.edges, vec![(0, 1)]);
}
