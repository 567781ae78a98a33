//! Software rasterizer backing [`Surface`] with an RGBA byte buffer.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, trace, warn};
use rusttype::{point, Font, Scale};

use crate::config::Color;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::scene::{DrawCommand, FontSpec, Shadow, Stroke};
use crate::surface::Surface;

// ============================================================================
// FONTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    italic: bool,
}

impl FaceKey {
    fn new(family: &str, italic: bool) -> Self {
        Self {
            family: family.to_lowercase(),
            italic,
        }
    }
}

/// Font faces available to text commands, keyed by family name and style.
///
/// Lookup falls back from the italic face to the regular face of the same family,
/// then to the first face that was registered. With no faces at all, text is skipped.
#[derive(Clone, Default)]
pub struct FontBook {
    faces: HashMap<FaceKey, Font<'static>>,
    fallback: Option<FaceKey>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: &str, italic: bool, font: Font<'static>) {
        let key = FaceKey::new(family, italic);
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        self.faces.insert(key, font);
    }

    /// Reads a TrueType/OpenType file and registers it under `family`.
    pub fn load(&mut self, family: &str, italic: bool, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let font = Font::try_from_vec(data).ok_or_else(|| Error::FontLoad {
            path: path.to_path_buf(),
        })?;
        debug!(
            "loaded font {} for family {family:?} (italic: {italic})",
            path.display()
        );
        self.insert(family, italic, font);
        Ok(())
    }

    /// Faces for the default families found in the usual system font directories.
    pub fn system() -> Self {
        let mut dirs = vec![
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
            PathBuf::from("/Library/Fonts"),
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("C:\\Windows\\Fonts"),
        ];
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
            dirs.push(home.join("Library/Fonts"));
        }
        Self::search(&dirs)
    }

    /// Registers the first matching file under each of `dirs` for every default family.
    pub fn search(dirs: &[PathBuf]) -> Self {
        let mut files = HashMap::new();
        for dir in dirs {
            collect_font_files(dir, FONT_DIR_DEPTH, &mut files);
        }

        let mut book = Self::new();
        for &(family, italic, candidates) in SYSTEM_FACES {
            let found = candidates
                .iter()
                .filter_map(|name| files.get(&name.to_lowercase()))
                .find(|path| match book.load(family, italic, path) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!("skipping font {}: {err}", path.display());
                        false
                    }
                });
            if found.is_none() {
                debug!("no system face for {family:?} (italic: {italic})");
            }
        }
        book
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn resolve(&self, spec: &FontSpec) -> Option<&Font<'static>> {
        self.faces
            .get(&FaceKey::new(&spec.family, spec.italic))
            .or_else(|| self.faces.get(&FaceKey::new(&spec.family, false)))
            .or_else(|| self.fallback.as_ref().and_then(|key| self.faces.get(key)))
    }
}

const FONT_DIR_DEPTH: usize = 4;

/// Default families and the file names that provide them, most faithful first.
const SYSTEM_FACES: &[(&str, bool, &[&str])] = &[
    (
        "Arial",
        false,
        &[
            "arial.ttf",
            "LiberationSans-Regular.ttf",
            "Arimo-Regular.ttf",
            "DejaVuSans.ttf",
            "FreeSans.ttf",
        ],
    ),
    (
        "Arial",
        true,
        &[
            "ariali.ttf",
            "Arial Italic.ttf",
            "LiberationSans-Italic.ttf",
            "Arimo-Italic.ttf",
            "DejaVuSans-Oblique.ttf",
            "FreeSansOblique.ttf",
        ],
    ),
    (
        "Times New Roman",
        false,
        &[
            "times.ttf",
            "Times New Roman.ttf",
            "LiberationSerif-Regular.ttf",
            "Tinos-Regular.ttf",
            "DejaVuSerif.ttf",
            "FreeSerif.ttf",
        ],
    ),
    (
        "Times New Roman",
        true,
        &[
            "timesi.ttf",
            "Times New Roman Italic.ttf",
            "LiberationSerif-Italic.ttf",
            "Tinos-Italic.ttf",
            "DejaVuSerif-Italic.ttf",
            "FreeSerifItalic.ttf",
        ],
    ),
];

/// Maps lowercased file names to paths, keeping the first one seen.
fn collect_font_files(dir: &Path, depth: usize, files: &mut HashMap<String, PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth > 0 {
                collect_font_files(&path, depth - 1, files);
            }
        } else if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            files.entry(name.to_lowercase()).or_insert(path);
        }
    }
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}

// ============================================================================
// PIXEL SURFACE
// ============================================================================

/// RGBA8 raster, row-major, starting fully transparent.
#[derive(Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    frame: Vec<u8>,
    fonts: Arc<FontBook>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_fonts(width, height, Arc::new(FontBook::new()))
    }

    pub fn with_fonts(width: u32, height: u32, fonts: Arc<FontBook>) -> Self {
        Self {
            width,
            height,
            frame: vec![0; width as usize * height as usize * 4],
            fonts,
        }
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn fonts(&self) -> &Arc<FontBook> {
        &self.fonts
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    fn canvas(&mut self) -> Canvas<'_> {
        Canvas {
            frame: &mut self.frame,
            width: self.width as usize,
            height: self.height as usize,
        }
    }
}

impl fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn duplicate(&self) -> Self {
        Self::with_fonts(self.width, self.height, Arc::clone(&self.fonts))
    }

    fn clear(&mut self) {
        self.frame.fill(0);
    }

    fn draw_image(&mut self, source: &Self) {
        let width = self.width.min(source.width) as usize;
        let height = self.height.min(source.height) as usize;
        let mut canvas = self.canvas();
        for y in 0..height {
            for x in 0..width {
                let idx = (y * source.width as usize + x) * 4;
                let px = &source.frame[idx..idx + 4];
                if px[3] == 0 {
                    continue;
                }
                let color = Color::new(px[0], px[1], px[2]).with_alpha(px[3] as f32 / 255.0);
                canvas.blend(x as i64, y as i64, color, 1.0);
            }
        }
    }

    fn execute(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Disc {
                center,
                radius,
                fill,
                border,
            } => {
                let mut canvas = self.canvas();
                canvas.fill_disc(*center, *radius, *fill);
                if let Some(Stroke { color, width }) = border {
                    canvas.stroke_ring(*center, *radius, *width, *color);
                }
            }
            DrawCommand::Rect {
                origin,
                width,
                height,
                color,
            } => {
                self.canvas().fill_rect(*origin, *width, *height, *color);
            }
            DrawCommand::Line {
                from,
                to,
                stroke,
                shadow,
            } => {
                let mut canvas = self.canvas();
                if let Some(Shadow {
                    color,
                    blur,
                    offset_x,
                    offset_y,
                }) = shadow
                {
                    canvas.stroke_line(
                        from.offset(*offset_x, *offset_y),
                        to.offset(*offset_x, *offset_y),
                        stroke.width,
                        blur.max(1.0),
                        *color,
                    );
                }
                canvas.stroke_line(*from, *to, stroke.width, 1.0, stroke.color);
            }
            DrawCommand::Text {
                origin,
                text,
                font,
                color,
            } => {
                let fonts = Arc::clone(&self.fonts);
                match fonts.resolve(font) {
                    Some(face) => {
                        self.canvas()
                            .draw_text(*origin, text, face, font.pixel_size() as f32, *color)
                    }
                    None => trace!("no face for {font}, skipping {text:?}"),
                }
            }
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Source-over compositing of `color` scaled by `coverage`.
    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let src_a = (color.alpha * coverage).clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let dst = &mut self.frame[idx..idx + 4];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |src: u8, dst: u8| {
            ((src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a).round() as u8
        };
        let out = [
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ];
        dst.copy_from_slice(&out);
    }

    /// Pixel rows and columns touched by a box, clipped to the canvas.
    fn bounds(&self, min: Point, max: Point) -> Option<(i64, i64, i64, i64)> {
        let finite = [min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite());
        if !finite || self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.bounds(
            center.offset(-radius - 1.0, -radius - 1.0),
            center.offset(radius + 1.0, radius + 1.0),
        ) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dist = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
                let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Outline centered on the circle, like a stroked arc.
    fn stroke_ring(&mut self, center: Point, radius: f64, width: f64, color: Color) {
        if !(width > 0.0) || !(radius >= 0.0) {
            return;
        }
        let half = width / 2.0;
        let reach = radius + half + 1.0;
        let Some((x0, y0, x1, y1)) =
            self.bounds(center.offset(-reach, -reach), center.offset(reach, reach))
        else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dist = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
                let aa = (half + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Axis-aligned rectangle with exact area coverage on its edges.
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        if !(width > 0.0) || !(height > 0.0) {
            return;
        }
        let end = origin.offset(width, height);
        let Some((x0, y0, x1, y1)) = self.bounds(origin, end) else {
            return;
        };
        for y in y0..=y1 {
            let cover_y = (end.y.min(y as f64 + 1.0) - origin.y.max(y as f64)).max(0.0);
            for x in x0..=x1 {
                let cover_x = (end.x.min(x as f64 + 1.0) - origin.x.max(x as f64)).max(0.0);
                let aa = cover_x * cover_y;
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Thick anti-aliased segment; `softness` widens the falloff band for blurred strokes.
    fn stroke_line(&mut self, from: Point, to: Point, thickness: f64, softness: f64, color: Color) {
        if !(thickness > 0.0) {
            return;
        }
        let half = thickness / 2.0;
        let reach = half + softness + 1.0;
        let Some((x0, y0, x1, y1)) = self.bounds(
            Point::new(from.x.min(to.x) - reach, from.y.min(to.y) - reach),
            Point::new(from.x.max(to.x) + reach, from.y.max(to.y) + reach),
        ) else {
            return;
        };
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = if len_sq > 0.0 {
                    (((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nearest = Point::new(from.x + t * dx, from.y + t * dy);
                let dist = p.distance(nearest);
                let aa = ((half + softness / 2.0 - dist) / softness).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Left-aligned text with its baseline at `origin`.
    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        font: &Font<'static>,
        px: f32,
        color: Color,
    ) {
        if !(px > 0.0) || !origin.x.is_finite() || !origin.y.is_finite() {
            return;
        }
        let scale = Scale::uniform(px);
        let start = point(origin.x as f32, origin.y as f32);
        for glyph in font.layout(text, scale, start) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend(
                        bb.min.x as i64 + gx as i64,
                        bb.min.y as i64 + gy as i64,
                        color,
                        v,
                    );
                });
            }
        }
    }
}
