//! Boltzanim simulates a small stochastic Boltzmann machine and renders its evolution as a
//! looping animation.
//!
//! # Pipeline overview
//!
//! 1. **Build**: `AnimationConfig -> StateGraph` (complete bipartite graph, random binary states)
//! 2. **Step**: one Gibbs-style sweep over every unit ([`step`])
//! 3. **Render**: `StateGraph -> SceneSpec -> FrameRGBA` via a [`RasterBackend`]
//! 4. **Encode**: ordered frames -> looping GIF via an [`AnimationEncoder`]
//!
//! Steps 2 and 3 repeat once per frame. [`render_gif`] runs the whole pipeline with the default
//! backend; [`AnimationAssembler`] lets callers inject their own backend, encoder and RNG.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit randomness**: every stochastic draw takes an injected RNG; a fixed seed
//!   reproduces an animation byte for byte.
//! - **Canonical order**: visible units by index, then hidden units by index, everywhere.
//! - **All or nothing**: a failure at any frame aborts the run; partial animations are never
//!   returned.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod encode;
mod foundation;
mod network;
mod pipeline;
mod render;

/// HTTP boundary (`GET /boltzmann`).
pub mod server;

pub use crate::encode::gif::{GifAnimationEncoder, GifOpts};
pub use crate::encode::sink::{AnimationEncoder, EncodeOpts, InMemoryEncoder, LoopMode};
pub use crate::foundation::core::{Canvas, MAX_CANVAS_DIM, Point, Rect, Rgb8};
pub use crate::foundation::error::{BoltzError, BoltzResult};
pub use crate::network::graph::{Edge, Layer, StateGraph, Unit, UnitId, UnitState};
pub use crate::network::update::{Temperature, UpdatePolicy, activation_probability, step};
pub use crate::pipeline::{
    Animation, AnimationAssembler, AnimationConfig, EncodedAnimation, render_gif,
    render_png_frame,
};
pub use crate::render::backend::{BackendKind, FrameRGBA, RasterBackend, create_backend};
pub use crate::render::colormap::Colormap;
pub use crate::render::layout::{LayoutSpec, multipartite_layout};
pub use crate::render::scene::{FrameRenderer, RenderOpts, SceneSpec, SceneStyle};
pub use crate::render::svg::SvgBackend;
