use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::render::text::{TextBrush, TextEngine};

const STROKE_TOLERANCE: f64 = 0.1;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is included to make
/// this explicit at API boundaries.
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
    /// Pixel at (`x`, `y`) as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy of the frame with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&crate::foundation::math::unpremultiply_px([
                px[0], px[1], px[2], px[3],
            ]));
        }
        out
    }
}

/// Stroke styling for [`Painter::stroke_path`].
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    /// Line width in pixels.
    pub width: f64,
    /// On/off dash lengths; empty for a solid line.
    pub dash: Vec<f64>,
}

impl LineStyle {
    /// Solid line of `width`.
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            dash: Vec::new(),
        }
    }

    /// Dashed line of `width` with the given on/off pattern.
    pub fn dashed(width: f64, dash: impl Into<Vec<f64>>) -> Self {
        Self {
            width,
            dash: dash.into(),
        }
    }
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Position is the left edge.
    #[default]
    Left,
    /// Position is the horizontal center.
    Center,
}

/// Vertical anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// Position is on the first line's baseline.
    #[default]
    Alphabetic,
    /// Position is the vertical middle of the line box.
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlowKey {
    color: Rgba8,
    inner: u32,
    fade: u32,
    extent: u32,
}

/// Immediate-mode 2D drawing surface over a `vello_cpu` raster.
///
/// One frame is drawn between [`Painter::begin_frame`] and [`Painter::finish`].
pub struct Painter {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: TextEngine,
    glow_cache: HashMap<GlowKey, vello_cpu::Image>,
    warned_no_font: bool,
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_font", &self.text.has_font())
            .finish_non_exhaustive()
    }
}

impl Painter {
    /// Create a painter for `canvas`.
    pub fn new(canvas: Canvas) -> TourscopeResult<Self> {
        let (width, height) = canvas_u16(canvas)?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            text: TextEngine::new(),
            glow_cache: HashMap::new(),
            warned_no_font: false,
        })
    }

    /// Current surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Reallocate the surface for a new size. A no-op when the size is unchanged.
    pub fn resize(&mut self, canvas: Canvas) -> TourscopeResult<()> {
        let (width, height) = canvas_u16(canvas)?;
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.ctx = vello_cpu::RenderContext::new(width, height);
        self.pixmap = vello_cpu::Pixmap::new(width, height);
        Ok(())
    }

    /// Use `font_bytes` (TTF/OTF) for all text.
    pub fn set_font(&mut self, font_bytes: Vec<u8>) -> TourscopeResult<()> {
        self.text.set_font(font_bytes)?;
        self.warned_no_font = false;
        Ok(())
    }

    /// Whether a font is loaded; without one, [`Painter::text`] draws nothing.
    pub fn has_font(&self) -> bool {
        self.text.has_font()
    }

    /// Start a new frame, covering the whole surface with `background`.
    pub fn begin_frame(&mut self, background: Rgba8) {
        self.ctx.reset();
        self.fill_rect(self.canvas().rect(), background);
    }

    /// Rasterize everything drawn since [`Painter::begin_frame`].
    pub fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.reset_transforms();
        self.ctx.set_paint(paint(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Stroke the outline of an axis-aligned rectangle.
    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba8, style: &LineStyle) {
        let mut path = BezPath::new();
        path.move_to((rect.x0, rect.y0));
        path.line_to((rect.x1, rect.y0));
        path.line_to((rect.x1, rect.y1));
        path.line_to((rect.x0, rect.y1));
        path.close_path();
        self.stroke_path(&path, color, style);
    }

    /// Fill `path` with the non-zero rule.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.reset_transforms();
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke `path` (butt caps, miter joins, optional dashes).
    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba8, style: &LineStyle) {
        if !(style.width.is_finite() && style.width > 0.0) {
            return;
        }
        let mut stroke = kurbo::Stroke::new(style.width)
            .with_caps(kurbo::Cap::Butt)
            .with_join(kurbo::Join::Miter);
        if style.dash.iter().any(|d| *d > 0.0) {
            stroke = stroke.with_dashes(0.0, style.dash.iter().copied());
        }
        let outline = kurbo::stroke(path, &stroke, &kurbo::StrokeOpts::default(), STROKE_TOLERANCE);
        self.fill_path(&outline, color);
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        let path = circle_path(center, radius);
        self.fill_path(&path, color);
    }

    /// Stroke a circle's outline.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, color: Rgba8, width: f64) {
        let path = circle_path(center, radius);
        self.stroke_path(&path, color, &LineStyle::solid(width));
    }

    /// Draw a radial halo clipped to a disc of radius `extent`.
    ///
    /// Opaque `color` up to radius `inner`, fading linearly to transparent at `inner + fade`.
    pub fn radial_glow(
        &mut self,
        center: Point,
        color: Rgba8,
        inner: u32,
        fade: u32,
        extent: u32,
    ) -> TourscopeResult<()> {
        let key = GlowKey {
            color,
            inner,
            fade,
            extent,
        };
        let image = match self.glow_cache.get(&key) {
            Some(image) => image.clone(),
            None => {
                let image = glow_image(key)?;
                self.glow_cache.insert(key, image.clone());
                image
            }
        };

        let e = f64::from(extent);
        let origin = Affine::translate((center.x - e, center.y - e));
        self.ctx.set_transform(affine_to_cpu(origin));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(image);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 2.0 * e, 2.0 * e));
        self.reset_transforms();
        Ok(())
    }

    /// Draw one line of text at `pos`.
    ///
    /// Without a loaded font this logs once and draws nothing.
    pub fn text(
        &mut self,
        text: &str,
        pos: Point,
        size_px: f32,
        color: Rgba8,
        align: TextAlign,
        baseline: TextBaseline,
    ) -> TourscopeResult<()> {
        let Some(font) = self.text.font_data() else {
            if !self.warned_no_font {
                tracing::warn!("no font loaded; text labels are skipped");
                self.warned_no_font = true;
            }
            return Ok(());
        };
        let Some(layout) = self.text.layout(text, size_px, TextBrush::from(color))? else {
            return Ok(());
        };

        let width = f64::from(layout.width());
        let height = f64::from(layout.height());
        let first_baseline = layout
            .lines()
            .next()
            .map_or(0.0, |line| f64::from(line.metrics().baseline));
        let dx = match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
        };
        let dy = match baseline {
            TextBaseline::Alphabetic => -first_baseline,
            TextBaseline::Middle => -height / 2.0,
        };

        self.ctx
            .set_transform(affine_to_cpu(Affine::translate((pos.x + dx, pos.y + dy))));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.reset_transforms();
        Ok(())
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn canvas_u16(canvas: Canvas) -> TourscopeResult<(u16, u16)> {
    canvas.validate()?;
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TourscopeError::validation("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TourscopeError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

fn paint(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    use kurbo::Shape as _;
    kurbo::Circle::new(center, radius.max(0.0)).to_path(STROKE_TOLERANCE)
}

fn glow_image(key: GlowKey) -> TourscopeResult<vello_cpu::Image> {
    let side = key.extent.saturating_mul(2).max(1);
    let e = f64::from(key.extent);
    let inner = f64::from(key.inner);
    let fade = f64::from(key.fade.max(1));
    let [r, g, b, a] = key.color.premultiplied();

    let mut bytes = Vec::with_capacity(side as usize * side as usize * 4);
    for y in 0..side {
        for x in 0..side {
            let dx = f64::from(x) + 0.5 - e;
            let dy = f64::from(y) + 0.5 - e;
            let d = (dx * dx + dy * dy).sqrt();
            let k = if d > e {
                0.0
            } else {
                1.0 - ((d - inner) / fade).clamp(0.0, 1.0)
            };
            let scale = |c: u8| (f64::from(c) * k).round() as u8;
            bytes.extend_from_slice(&[scale(r), scale(g), scale(b), scale(a)]);
        }
    }

    let pixmap = image_premul_bytes_to_pixmap(&bytes, side, side)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TourscopeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TourscopeError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TourscopeError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TourscopeError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
