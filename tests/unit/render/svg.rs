use super::*;

use crate::foundation::core::{Canvas, Rgb8};
use crate::network::graph::{StateGraph, UnitState::{Off, On}};
use crate::render::scene::{FrameRenderer, RenderOpts, SceneStyle};

fn renderer(w: u32, h: u32) -> FrameRenderer {
    FrameRenderer::new(RenderOpts {
        canvas: Canvas::new(w, h).unwrap(),
        style: SceneStyle {
            label_font_size: 4.0,
            ..SceneStyle::default()
        },
        ..RenderOpts::default()
    })
    .unwrap()
}

fn graph() -> StateGraph {
    StateGraph::from_states(&[On, Off, On, Off], &[Off, On, On]).unwrap()
}

#[test]
fn document_has_one_element_per_edge_node_and_label() {
    let scene = renderer(200, 150).scene(&graph());
    let doc = scene_to_svg(&scene);
    assert_eq!(doc.matches("<line ").count(), 12);
    assert_eq!(doc.matches("<circle ").count(), 7);
    assert_eq!(doc.matches("<text ").count(), 8);
    for label in ["V1", "V4", "H3"] {
        assert!(doc.contains(&format!(">{label}</text>")));
    }
    assert!(doc.contains("Boltzmann Machine Dynamics"));
}

#[test]
fn caption_is_escaped() {
    let mut scene = renderer(200, 150).scene(&graph());
    scene.title = "a < b & \"c\"".to_owned();
    let doc = scene_to_svg(&scene);
    assert!(doc.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(usvg::Tree::from_str(&doc, &usvg::Options::default()).is_ok());
}

#[test]
fn rasterized_frame_shows_background_and_state_colors() {
    let r = renderer(200, 150);
    let g = graph();
    let scene = r.scene(&g);
    let mut backend = SvgBackend::new();
    let frame = r.render(&g, &mut backend).unwrap();

    assert_eq!((frame.width, frame.height), (200, 150));
    assert_eq!(frame.data.len(), frame.expected_len());
    assert_eq!(frame.pixel(0, 149), Some([255, 255, 255, 255]));

    let rad = scene.layout.node_radius;
    for (i, p) in scene.layout.positions.iter().enumerate() {
        let x = (p.x + rad * 0.6).round() as u32;
        let y = (p.y + rad * 0.6).round() as u32;
        let c: Rgb8 = scene.node_colors[i];
        let px = frame.pixel(x, y).unwrap();
        assert_eq!(px, [c.r, c.g, c.b, 255], "node {}", scene.labels[i]);
    }
}

#[test]
fn surfaces_are_reused_across_frames_and_never_leaked() {
    let r = renderer(64, 48);
    let g = graph();
    let mut backend = SvgBackend::new();
    for _ in 0..5 {
        r.render(&g, &mut backend).unwrap();
    }
    let st = backend.pool_stats();
    assert_eq!(st.outstanding_leases, 0);
    assert_eq!(st.alloc_surfaces, 1);
    assert_eq!(st.reused_surfaces, 4);
}

#[test]
fn identical_states_render_identical_pixels() {
    let r = renderer(64, 48);
    let mut backend = SvgBackend::new();
    let a = r.render(&graph(), &mut backend).unwrap();
    let b = r.render(&graph(), &mut backend).unwrap();
    assert_eq!(a, b);
}

#[test]
fn labels_and_caption_are_drawn() {
    let r = FrameRenderer::new(RenderOpts {
        canvas: Canvas::new(400, 300).unwrap(),
        ..RenderOpts::default()
    })
    .unwrap();
    let g = graph();
    let scene = r.scene(&g);
    let mut backend = SvgBackend::new();
    let frame = r.render(&g, &mut backend).unwrap();

    // Caption: black text on white, well clear of the grey edges.
    let band = scene.layout.title_band as u32;
    let dark_in_band = (0..band)
        .flat_map(|y| (0..frame.width).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|px| px[0] < 128))
        .count();
    assert!(dark_in_band > 0, "caption missing from title band");

    // Labels: pixels at least twice as dark as the node fill near each center.
    for (i, p) in scene.layout.positions.iter().enumerate() {
        let fill: Rgb8 = scene.node_colors[i];
        let (cx, cy) = (p.x.round() as i64, p.y.round() as i64);
        let inked = (-10..=10)
            .flat_map(|dy| (-8..=8).map(move |dx| (cx + dx, cy + dy)))
            .filter_map(|(x, y)| frame.pixel(x as u32, y as u32))
            .filter(|px| {
                u16::from(px[0]) * 2 <= u16::from(fill.r)
                    && u16::from(px[1]) * 2 <= u16::from(fill.g)
                    && u16::from(px[2]) * 2 <= u16::from(fill.b)
            })
            .count();
        assert!(inked > 0, "label {} missing", scene.labels[i]);
    }
}
