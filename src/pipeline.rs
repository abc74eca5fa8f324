use std::path::Path;
use std::time::Instant;

use anyhow::Context as _;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::encode::gif::{GifAnimationEncoder, gif_delay_problem};
use crate::encode::sink::{AnimationEncoder, EncodeOpts, LoopMode};
use crate::foundation::error::{BoltzError, BoltzResult};
use crate::network::graph::StateGraph;
use crate::network::update::{Temperature, UpdatePolicy, step};
use crate::render::backend::{BackendKind, FrameRGBA, RasterBackend, create_backend};
use crate::render::scene::{FrameRenderer, RenderOpts};

/// Parameters of one simulation-and-render run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Number of visible units.
    pub visible_units: usize,
    /// Number of hidden units.
    pub hidden_units: usize,
    /// Number of frames (and simulation sweeps) per animation.
    pub frame_count: usize,
    /// Display duration of each frame, in milliseconds.
    pub frame_duration_ms: u32,
    /// Sampling temperature.
    pub temperature: Temperature,
    /// Neighbor-read policy for each sweep.
    pub update_policy: UpdatePolicy,
    /// Fixed RNG seed; `None` draws a fresh seed from the OS per run.
    pub seed: Option<u64>,
    /// Frame rendering options.
    pub render: RenderOpts,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            visible_units: 4,
            hidden_units: 3,
            frame_count: 20,
            frame_duration_ms: 500,
            temperature: Temperature::default(),
            update_policy: UpdatePolicy::default(),
            seed: None,
            render: RenderOpts::default(),
        }
    }
}

impl AnimationConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> BoltzResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            BoltzError::precondition(format!("parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every precondition of a run.
    pub fn validate(&self) -> BoltzResult<()> {
        if self.visible_units == 0 || self.hidden_units == 0 {
            return Err(BoltzError::precondition(format!(
                "unit counts must be > 0 (visible={}, hidden={})",
                self.visible_units, self.hidden_units
            )));
        }
        if self.frame_count == 0 {
            return Err(BoltzError::precondition("frame_count must be >= 1"));
        }
        if let Some(problem) = gif_delay_problem(self.frame_duration_ms) {
            return Err(BoltzError::precondition(problem));
        }
        // Deserialization already enforces this; struct literals do not.
        Temperature::new(self.temperature.get())?;
        self.render.validate()
    }

    /// RNG for one run: seeded if `seed` is set, otherwise from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Ordered, looping frame sequence with a fixed per-frame duration.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    /// Frames in simulation order.
    pub frames: Vec<FrameRGBA>,
    /// Display duration of every frame.
    pub frame_duration_ms: u32,
    /// Loop behavior.
    pub loop_mode: LoopMode,
}

impl Animation {
    /// Encode with `encoder`, preserving frame order.
    pub fn encode(&self, encoder: &mut dyn AnimationEncoder) -> BoltzResult<EncodedAnimation> {
        let opts = EncodeOpts {
            frame_duration_ms: self.frame_duration_ms,
            loop_mode: self.loop_mode,
        };
        let bytes = encoder.encode(&self.frames, &opts).map_err(|e| match e {
            BoltzError::Assembly(_) => e,
            other => BoltzError::assembly(other.to_string()),
        })?;
        Ok(EncodedAnimation {
            bytes,
            content_type: encoder.content_type(),
            frame_count: self.frames.len(),
        })
    }
}

/// Serialized animation ready to be written or streamed.
#[derive(Clone, Debug)]
pub struct EncodedAnimation {
    /// Encoded artifact.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Number of frames in the artifact.
    pub frame_count: usize,
}

/// Drives the simulation, collects one frame per sweep, and encodes the result.
///
/// Owns its backend and encoder; create one per run. Nothing here is shared across runs.
pub struct AnimationAssembler<B, E> {
    backend: B,
    encoder: E,
}

impl<B: RasterBackend, E: AnimationEncoder> AnimationAssembler<B, E> {
    /// Create an assembler from a rendering backend and an encoder.
    pub fn new(backend: B, encoder: E) -> Self {
        Self { backend, encoder }
    }

    /// Borrow the encoder, e.g. to inspect an [`InMemoryEncoder`](crate::InMemoryEncoder).
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Simulate and render `cfg.frame_count` frames.
    ///
    /// Each iteration advances the network by one sweep before capturing, so the first frame
    /// already reflects one update. Any render failure aborts the run and no frames are returned.
    #[tracing::instrument(skip_all, fields(
        frames = cfg.frame_count,
        visible = cfg.visible_units,
        hidden = cfg.hidden_units,
    ))]
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        cfg: &AnimationConfig,
        rng: &mut R,
    ) -> BoltzResult<Animation> {
        cfg.validate()?;
        let renderer = FrameRenderer::new(cfg.render.clone())?;
        let mut graph = StateGraph::new(cfg.visible_units, cfg.hidden_units, rng)?;

        let mut frames = Vec::with_capacity(cfg.frame_count);
        for i in 0..cfg.frame_count {
            step(&mut graph, cfg.temperature, cfg.update_policy, rng);
            let frame = renderer.render(&graph, &mut self.backend)?;
            tracing::debug!(frame = i, states = ?states_bits(&graph), "captured frame");
            frames.push(frame);
        }

        Ok(Animation {
            frames,
            frame_duration_ms: cfg.frame_duration_ms,
            loop_mode: LoopMode::Infinite,
        })
    }

    /// [`generate`](Self::generate) followed by encoding.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        cfg: &AnimationConfig,
        rng: &mut R,
    ) -> BoltzResult<EncodedAnimation> {
        let started = Instant::now();
        let anim = self.generate(cfg, rng)?;
        let encoded = anim.encode(&mut self.encoder)?;
        tracing::info!(
            frames = encoded.frame_count,
            bytes = encoded.bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "animation assembled"
        );
        Ok(encoded)
    }
}

impl<B: RasterBackend> AnimationAssembler<B, GifAnimationEncoder> {
    /// Assembler that encodes to GIF.
    pub fn gif(backend: B) -> Self {
        Self::new(backend, GifAnimationEncoder::default())
    }
}

/// One-shot: simulate, render with the default backend, and encode to a looping GIF.
///
/// Uses `cfg.seed` when set; otherwise every call produces a different animation.
pub fn render_gif(cfg: &AnimationConfig) -> BoltzResult<EncodedAnimation> {
    let mut rng = cfg.rng();
    let mut assembler = AnimationAssembler::gif(create_backend(BackendKind::Svg));
    assembler.run(cfg, &mut rng)
}

/// Render a single PNG: the state after `steps` sweeps (at least one).
pub fn render_png_frame(cfg: &AnimationConfig, steps: usize) -> BoltzResult<Vec<u8>> {
    cfg.validate()?;
    if steps == 0 {
        return Err(BoltzError::precondition("steps must be >= 1"));
    }
    let mut rng = cfg.rng();
    let renderer = FrameRenderer::new(cfg.render.clone())?;
    let mut backend = create_backend(BackendKind::Svg);
    let mut graph = StateGraph::new(cfg.visible_units, cfg.hidden_units, &mut rng)?;
    for _ in 0..steps {
        step(&mut graph, cfg.temperature, cfg.update_policy, &mut rng);
    }
    let frame = renderer.render(&graph, &mut *backend)?;

    let mut out = std::io::Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &crate::encode::gif::to_straight_rgba(&frame),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| BoltzError::render(format!("encode png: {e}")))?;
    Ok(out.into_inner())
}

fn states_bits(graph: &StateGraph) -> String {
    graph
        .units()
        .iter()
        .map(|u| char::from(b'0' + u.state.as_u8()))
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
