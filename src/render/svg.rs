use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use resvg::tiny_skia;

use crate::foundation::error::{BoltzError, BoltzResult};
use crate::render::backend::{FrameRGBA, RasterBackend};
use crate::render::scene::SceneSpec;
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};

/// Backend that lowers a [`SceneSpec`] to an SVG document and rasterizes it with `resvg`.
///
/// Holds a small surface pool, so one instance should serve one run. The font database is
/// loaded once per process and shared read-only.
pub struct SvgBackend {
    pool: SurfacePool,
}

impl SvgBackend {
    /// Create a backend with an empty surface pool.
    pub fn new() -> Self {
        Self {
            pool: SurfacePool::new(SurfacePoolOpts::default()),
        }
    }

    pub(crate) fn pool_stats(&self) -> SurfacePoolStats {
        self.pool.stats()
    }
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SvgBackend {
    fn drop(&mut self) {
        let st = self.pool_stats();
        tracing::debug!(
            allocated = st.alloc_surfaces,
            reused = st.reused_surfaces,
            dropped = st.dropped_on_release,
            retained = st.retained_surfaces,
            outstanding = st.outstanding_leases,
            "surface pool released"
        );
    }
}

impl RasterBackend for SvgBackend {
    fn rasterize(&mut self, scene: &SceneSpec) -> BoltzResult<FrameRGBA> {
        let fontdb = shared_fontdb();
        let has_text = !scene.labels.is_empty() || !scene.title.is_empty();
        if has_text && fontdb.faces().next().is_none() {
            return Err(BoltzError::render("no font faces loaded for labels and caption"));
        }

        let doc = scene_to_svg(scene);
        let opts = usvg::Options {
            fontdb,
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts)
            .map_err(|e| BoltzError::render(format!("parse scene svg: {e}")))?;

        let canvas = scene.layout.canvas;
        let mut lease = self.pool.lease(canvas.width, canvas.height)?;
        let bg = scene.style.background;
        lease
            .pixmap_mut()
            .fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, 255));
        resvg::render(
            &tree,
            tiny_skia::Transform::identity(),
            &mut lease.pixmap_mut().as_mut(),
        );

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: lease.pixmap().data().to_vec(),
            premultiplied: true,
        })
    }
}

fn shared_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Resolve the requested families first, then any generic family, then the first loaded face.
///
/// The stock resolver maps `sans-serif` to a single named family and drops the text when that
/// family is not installed.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(s) => Family::Name(s),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let stretch = match font.stretch() {
                usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
                usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
                usvg::FontStretch::Condensed => Stretch::Condensed,
                usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
                usvg::FontStretch::Normal => Stretch::Normal,
                usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
                usvg::FontStretch::Expanded => Stretch::Expanded,
                usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
                usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
            };
            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };

            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Serialize a scene as a standalone SVG document.
///
/// Draw order: edges, then nodes, then labels, then caption.
pub(crate) fn scene_to_svg(scene: &SceneSpec) -> String {
    let layout = &scene.layout;
    let (w, h) = (layout.canvas.width, layout.canvas.height);
    let style = &scene.style;
    let mut s = String::with_capacity(4096);

    // `write!` into a String cannot fail.
    let _ = write!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    let _ = write!(
        s,
        r#"<g stroke="{}" stroke-width="1.5" fill="none">"#,
        style.edge_color.to_hex()
    );
    for &(a, b) in &layout.edges {
        let (Some(pa), Some(pb)) = (layout.positions.get(a), layout.positions.get(b)) else {
            continue;
        };
        let _ = write!(
            s,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
            pa.x, pa.y, pb.x, pb.y
        );
    }
    s.push_str("</g>");

    for (p, color) in layout.positions.iter().zip(&scene.node_colors) {
        let _ = write!(
            s,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            p.x,
            p.y,
            layout.node_radius,
            color.to_hex()
        );
    }

    let _ = write!(
        s,
        r#"<g font-family="sans-serif" font-weight="bold" font-size="{:.1}" fill="{}" text-anchor="middle" dominant-baseline="central">"#,
        style.label_font_size,
        style.label_color.to_hex()
    );
    for (p, label) in layout.positions.iter().zip(&scene.labels) {
        let _ = write!(
            s,
            r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
            p.x,
            p.y,
            escape_xml(label)
        );
    }
    s.push_str("</g>");

    let _ = write!(
        s,
        r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
        f64::from(w) / 2.0,
        layout.title_band / 2.0,
        style.title_font_size,
        style.label_color.to_hex(),
        escape_xml(&scene.title)
    );

    s.push_str("</svg>");
    s
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
