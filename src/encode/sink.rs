use serde::{Deserialize, Serialize};

use crate::foundation::error::{BoltzError, BoltzResult};
use crate::render::backend::FrameRGBA;

/// How many times a viewer should play the animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Repeat forever.
    #[default]
    Infinite,
    /// Play `n` additional times after the first pass.
    Finite(u16),
}

/// Timing and looping parameters handed to an [`AnimationEncoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOpts {
    /// Display duration of every frame, in milliseconds.
    pub frame_duration_ms: u32,
    /// Loop behavior.
    pub loop_mode: LoopMode,
}

/// Combines an ordered frame sequence into one animated artifact.
///
/// Ordering contract: frames are encoded exactly in slice order. Implementations must either
/// return a complete artifact or an error; never a truncated one.
pub trait AnimationEncoder {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;
    /// Encode `frames` (non-empty, equal dimensions) into one artifact.
    fn encode(&mut self, frames: &[FrameRGBA], opts: &EncodeOpts) -> BoltzResult<Vec<u8>>;
}

/// Shared input checks for encoders.
pub(crate) fn check_frames(frames: &[FrameRGBA], opts: &EncodeOpts) -> BoltzResult<()> {
    let Some(first) = frames.first() else {
        return Err(BoltzError::assembly("cannot encode an empty frame sequence"));
    };
    if opts.frame_duration_ms == 0 {
        return Err(BoltzError::assembly("frame duration must be > 0"));
    }
    for (i, f) in frames.iter().enumerate() {
        if f.width != first.width || f.height != first.height {
            return Err(BoltzError::assembly(format!(
                "frame {i} is {}x{}, expected {}x{}",
                f.width, f.height, first.width, first.height
            )));
        }
        if f.data.len() != f.expected_len() {
            return Err(BoltzError::assembly(format!(
                "frame {i} has {} bytes, expected {}",
                f.data.len(),
                f.expected_len()
            )));
        }
    }
    Ok(())
}

/// In-memory encoder for tests and debugging.
///
/// Records the frames and options it was given and returns the concatenated pixel bytes.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    opts: Option<EncodeOpts>,
    pub(crate) frames: Vec<FrameRGBA>,
}

impl InMemoryEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options captured by the last `encode` call, if any.
    pub fn opts(&self) -> Option<EncodeOpts> {
        self.opts
    }

    /// Frames captured by the last `encode` call.
    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }
}

impl AnimationEncoder for InMemoryEncoder {
    fn content_type(&self) -> &'static str {
        "application/octet-stream"
    }

    fn encode(&mut self, frames: &[FrameRGBA], opts: &EncodeOpts) -> BoltzResult<Vec<u8>> {
        check_frames(frames, opts)?;
        self.opts = Some(*opts);
        self.frames = frames.to_vec();
        Ok(frames.iter().flat_map(|f| f.data.iter().copied()).collect())
    }
}
