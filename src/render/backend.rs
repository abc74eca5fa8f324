use crate::foundation::error::BoltzResult;
use crate::render::scene::SceneSpec;

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by the built-in backend are fully opaque, so straight and premultiplied
/// alpha coincide; the flag records what the producer guarantees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Expected byte length for the frame dimensions.
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    /// RGBA of the pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Turns a fully resolved scene into pixels.
///
/// Implementations receive the layout, per-node colors, labels and caption, and must not keep
/// any drawing surface borrowed past the call.
pub trait RasterBackend {
    /// Rasterize `scene` into a frame of exactly `scene.layout.canvas` size.
    fn rasterize(&mut self, scene: &SceneSpec) -> BoltzResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// SVG scene rasterized with `resvg`.
    #[default]
    Svg,
}

/// Create a rendering backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn RasterBackend + Send> {
    match kind {
        BackendKind::Svg => Box::new(crate::render::svg::SvgBackend::new()),
    }
}

impl<T: RasterBackend + ?Sized> RasterBackend for Box<T> {
    fn rasterize(&mut self, scene: &SceneSpec) -> BoltzResult<FrameRGBA> {
        (**self).rasterize(scene)
    }
}

impl<T: RasterBackend + ?Sized> RasterBackend for &mut T {
    fn rasterize(&mut self, scene: &SceneSpec) -> BoltzResult<FrameRGBA> {
        (**self).rasterize(scene)
    }
}
