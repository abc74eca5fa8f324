use crate::foundation::core::Rgb8;
use crate::network::graph::UnitState;

/// Continuous color scale sampled on `[0, 1]`.
///
/// Stops are evenly spaced; samples between stops are linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    stops: Vec<Rgb8>,
}

const BLUES: [Rgb8; 9] = [
    Rgb8::new(0xf7, 0xfb, 0xff),
    Rgb8::new(0xde, 0xeb, 0xf7),
    Rgb8::new(0xc6, 0xdb, 0xef),
    Rgb8::new(0x9e, 0xca, 0xe1),
    Rgb8::new(0x6b, 0xae, 0xd6),
    Rgb8::new(0x42, 0x92, 0xc6),
    Rgb8::new(0x21, 0x71, 0xb5),
    Rgb8::new(0x08, 0x51, 0x9c),
    Rgb8::new(0x08, 0x30, 0x6b),
];

impl Colormap {
    /// Sequential white-to-navy scale (ColorBrewer "Blues").
    pub fn blues() -> Self {
        Self {
            stops: BLUES.to_vec(),
        }
    }

    /// Color at `t`, clamped to `[0, 1]`. NaN maps to the low end.
    pub fn sample(&self, t: f64) -> Rgb8 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last.saturating_sub(1));
        if last == 0 {
            return self.stops[0];
        }
        self.stops[i].lerp(self.stops[i + 1], pos - i as f64)
    }

    /// Color for a unit state with fixed normalization: 0 is the low end, 1 the high end.
    pub fn for_state(&self, state: UnitState) -> Rgb8 {
        self.sample(f64::from(state.as_u8()))
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::blues()
    }
}
