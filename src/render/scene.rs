use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{BoltzError, BoltzResult};
use crate::network::graph::StateGraph;
use crate::render::backend::{FrameRGBA, RasterBackend};
use crate::render::colormap::Colormap;
use crate::render::layout::{LayoutSpec, multipartite_layout};

/// Static visual attributes shared by every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneStyle {
    /// Canvas fill.
    pub background: Rgb8,
    /// Edge stroke color.
    pub edge_color: Rgb8,
    /// Node label color.
    pub label_color: Rgb8,
    /// Caption font size in pixels.
    pub title_font_size: f64,
    /// Node label font size in pixels.
    pub label_font_size: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: Rgb8::new(0xff, 0xff, 0xff),
            edge_color: Rgb8::new(0x80, 0x80, 0x80),
            label_color: Rgb8::new(0x00, 0x00, 0x00),
            title_font_size: 19.0,
            label_font_size: 13.0,
        }
    }
}

/// Frame rendering options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOpts {
    /// Output raster size.
    pub canvas: Canvas,
    /// Caption drawn above the network.
    pub title: String,
    /// Upper bound for the node disc radius; small canvases shrink it.
    pub node_radius: f64,
    /// Colors and font sizes.
    pub style: SceneStyle,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            title: "Boltzmann Machine Dynamics".to_owned(),
            node_radius: 35.0,
            style: SceneStyle::default(),
        }
    }
}

impl RenderOpts {
    /// Validate canvas and sizes.
    pub fn validate(&self) -> BoltzResult<()> {
        self.canvas.validate()?;
        for (name, v) in [
            ("node_radius", self.node_radius),
            ("title_font_size", self.style.title_font_size),
            ("label_font_size", self.style.label_font_size),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(BoltzError::precondition(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a [`RasterBackend`] needs to draw one snapshot.
///
/// `node_colors` and `labels` are parallel to `layout.positions`.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSpec {
    /// Node and edge geometry.
    pub layout: LayoutSpec,
    /// Fill color per node.
    pub node_colors: Vec<Rgb8>,
    /// Label per node (`V1`, `H2`, ...).
    pub labels: Vec<String>,
    /// Caption.
    pub title: String,
    /// Static styling.
    pub style: SceneStyle,
}

/// Maps graph snapshots to frames with a fixed visual encoding.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    opts: RenderOpts,
    colormap: Colormap,
}

impl FrameRenderer {
    /// Create a renderer using the default colormap.
    pub fn new(opts: RenderOpts) -> BoltzResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            colormap: Colormap::blues(),
        })
    }

    /// Render options in effect.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Resolve the scene for the current graph state.
    pub fn scene(&self, graph: &StateGraph) -> SceneSpec {
        let layout = multipartite_layout(
            graph,
            self.opts.canvas,
            self.opts.node_radius,
            self.opts.style.title_font_size,
        );
        SceneSpec {
            layout,
            node_colors: graph
                .units()
                .iter()
                .map(|u| self.colormap.for_state(u.state))
                .collect(),
            labels: graph.ids().map(|id| id.to_string()).collect(),
            title: self.opts.title.clone(),
            style: self.opts.style.clone(),
        }
    }

    /// Rasterize the current graph state.
    ///
    /// Any backend error, or a frame that does not match the configured canvas, is reported as
    /// [`BoltzError::Render`].
    pub fn render(
        &self,
        graph: &StateGraph,
        backend: &mut dyn RasterBackend,
    ) -> BoltzResult<FrameRGBA> {
        let scene = self.scene(graph);
        let frame = backend.rasterize(&scene).map_err(|e| match e {
            BoltzError::Render(_) => e,
            other => BoltzError::render(other.to_string()),
        })?;

        let canvas = self.opts.canvas;
        if frame.width != canvas.width || frame.height != canvas.height {
            return Err(BoltzError::render(format!(
                "backend produced {}x{} frame, expected {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            )));
        }
        if frame.data.len() != frame.expected_len() {
            return Err(BoltzError::render(format!(
                "frame buffer has {} bytes, expected {}",
                frame.data.len(),
                frame.expected_len()
            )));
        }
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
