use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{AnimationEncoder, EncodeOpts, LoopMode, check_frames};
use crate::foundation::error::{BoltzError, BoltzResult};
use crate::render::backend::FrameRGBA;

/// GIF frame delays are stored as a `u16` count of hundredths of a second.
pub(crate) const GIF_DELAY_UNIT_MS: u32 = 10;
pub(crate) const GIF_MAX_DELAY_MS: u32 = u16::MAX as u32 * GIF_DELAY_UNIT_MS;

/// Why `ms` cannot be stored exactly as a GIF frame delay, if it cannot.
pub(crate) fn gif_delay_problem(ms: u32) -> Option<String> {
    if ms == 0 || ms % GIF_DELAY_UNIT_MS != 0 {
        Some(format!(
            "frame duration {ms} ms is not a positive multiple of {GIF_DELAY_UNIT_MS} ms"
        ))
    } else if ms > GIF_MAX_DELAY_MS {
        Some(format!(
            "frame duration {ms} ms exceeds the gif maximum of {GIF_MAX_DELAY_MS} ms"
        ))
    } else {
        None
    }
}

/// Options for [`GifAnimationEncoder`].
#[derive(Clone, Copy, Debug)]
pub struct GifOpts {
    /// NeuQuant speed, 1 (best palette) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifOpts {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

/// Animated GIF encoder built on `image`.
#[derive(Clone, Debug, Default)]
pub struct GifAnimationEncoder {
    opts: GifOpts,
}

impl GifAnimationEncoder {
    /// Create an encoder.
    pub fn new(opts: GifOpts) -> Self {
        Self { opts }
    }
}

impl AnimationEncoder for GifAnimationEncoder {
    fn content_type(&self) -> &'static str {
        "image/gif"
    }

    #[tracing::instrument(skip_all, fields(frames = frames.len(), duration_ms = opts.frame_duration_ms))]
    fn encode(&mut self, frames: &[FrameRGBA], opts: &EncodeOpts) -> BoltzResult<Vec<u8>> {
        check_frames(frames, opts)?;
        if let Some(problem) = gif_delay_problem(opts.frame_duration_ms) {
            return Err(BoltzError::assembly(problem));
        }

        let mut out = Vec::new();
        {
            let mut enc = GifEncoder::new_with_speed(&mut out, self.opts.speed.clamp(1, 30));
            let repeat = match opts.loop_mode {
                LoopMode::Infinite => Repeat::Infinite,
                LoopMode::Finite(n) => Repeat::Finite(n),
            };
            enc.set_repeat(repeat)
                .map_err(|e| BoltzError::assembly(format!("set gif repeat: {e}")))?;

            for (i, f) in frames.iter().enumerate() {
                let rgba = to_straight_rgba(f);
                let img = RgbaImage::from_raw(f.width, f.height, rgba).ok_or_else(|| {
                    BoltzError::assembly(format!("frame {i} buffer does not match its size"))
                })?;
                let delay = Delay::from_numer_denom_ms(opts.frame_duration_ms, 1);
                enc.encode_frame(Frame::from_parts(img, 0, 0, delay))
                    .map_err(|e| BoltzError::assembly(format!("encode gif frame {i}: {e}")))?;
            }
        }

        tracing::debug!(bytes = out.len(), "encoded gif");
        Ok(out)
    }
}

/// Copy of the frame's pixels with straight (non-premultiplied) alpha.
pub(crate) fn to_straight_rgba(f: &FrameRGBA) -> Vec<u8> {
    let mut data = f.data.clone();
    if !f.premultiplied {
        return data;
    }
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    data
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
