use crate::foundation::core::{Canvas, Point, Rect};
use crate::network::graph::{Layer, StateGraph};

/// Resolved node geometry for one frame, in pixel space.
///
/// `positions` follows the graph's canonical unit order; `edges` index into it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSpec {
    /// Raster size the layout was computed for.
    pub canvas: Canvas,
    /// Node centers.
    pub positions: Vec<Point>,
    /// Node pairs to connect, as indices into `positions`.
    pub edges: Vec<(usize, usize)>,
    /// Node disc radius.
    pub node_radius: f64,
    /// Band reserved at the top of the canvas for the caption.
    pub title_band: f64,
}

/// Multipartite layout: one vertical band per layer, visible on the left, hidden on the right.
///
/// Nodes in a band are evenly spaced and centered vertically. All bands share the spacing of the
/// largest layer, so a smaller layer sits more compactly around the center line. The result only
/// depends on the layer sizes, never on unit states.
pub fn multipartite_layout(
    graph: &StateGraph,
    canvas: Canvas,
    max_radius: f64,
    title_font_size: f64,
) -> LayoutSpec {
    let layers = [Layer::Visible, Layer::Hidden];
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let tallest = graph.visible_count().max(graph.hidden_count()) as f64;

    let node_radius = max_radius
        .min(h / (2.5 * tallest + 2.0))
        .min(w / (2.0 * layers.len() as f64 + 2.0))
        .max(1.0);
    let title_band = (title_font_size * 2.0).min(h / 4.0).max(0.0);
    let pad = node_radius * 1.5;

    let area = Rect::new(pad, title_band + pad, w - pad, h - pad);
    let cx = area.center().x;
    let cy = area.center().y;
    let half_h = area.height().max(0.0) / 2.0;

    let mut positions = Vec::with_capacity(graph.unit_count());
    for (li, layer) in layers.iter().enumerate() {
        let x = if layers.len() > 1 {
            area.x0 + area.width().max(0.0) * li as f64 / (layers.len() - 1) as f64
        } else {
            cx
        };

        let n = graph.layer_range(*layer).len();
        for j in 0..n {
            // Offset from the band center in units of the shared spacing, mapped to [-1, 1].
            let offset = j as f64 - (n as f64 - 1.0) / 2.0;
            let norm = if tallest > 1.0 {
                offset / ((tallest - 1.0) / 2.0)
            } else {
                0.0
            };
            positions.push(Point::new(x, cy + norm * half_h));
        }
    }

    let visible = graph.layer_range(Layer::Visible);
    let hidden = graph.layer_range(Layer::Hidden);
    let edges = visible
        .flat_map(|v| hidden.clone().map(move |h| (v, h)))
        .collect();

    LayoutSpec {
        canvas,
        positions,
        edges,
        node_radius,
        title_band,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
