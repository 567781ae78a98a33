//! Retained-mode description of what a clock frame contains.
//!
//! The face and the hands are built as [`Scene`]s of [`DrawCommand`]s and handed to a
//! [`Surface`](crate::surface::Surface), which decides how to rasterize them.

use std::fmt;

use crate::config::{ClockConfig, Color};
use crate::geometry::{
    hour_angle, hour_label, minute_angle, second_angle, text_offset, to_roman, Geometry,
    Point, HOUR_STEP, MINUTE_STEP, TOP,
};
use crate::time::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Drop shadow cast by a single command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in points
    pub size: f64,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            italic: false,
        }
    }

    pub fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    /// Pixel height of the em box (1pt = 4/3 px).
    pub fn pixel_size(&self) -> f64 {
        self.size * 4.0 / 3.0
    }
}

/// Renders the CSS font shorthand, e.g. `italic 7.84pt Arial`.
impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.italic {
            write!(f, "italic ")?;
        }
        write!(f, "{}pt {}", self.size, self.family)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled circle, optionally outlined after filling
    Disc {
        center: Point,
        radius: f64,
        fill: Color,
        border: Option<Stroke>,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        shadow: Option<Shadow>,
    },
    /// Left-aligned text with its baseline at `origin`
    Text {
        origin: Point,
        text: String,
        font: FontSpec,
        color: Color,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// ============================================================================
// STATIC FACE
// ============================================================================

/// Builds the parts of the face that never change: dial, minute marks and numerals.
pub fn face_scene(config: &ClockConfig, geometry: &Geometry) -> Scene {
    let palette = &config.palette;
    let mut scene = Scene::new();

    scene.add_command(DrawCommand::Disc {
        center: geometry.center_point(),
        radius: geometry.face_radius(),
        fill: palette.face,
        border: Some(Stroke {
            color: palette.face_border,
            width: geometry.face_border_line,
        }),
    });

    if config.minute_marks {
        for i in 0..60 {
            let angle = TOP + MINUTE_STEP * i as f64;
            scene.add_command(DrawCommand::Rect {
                origin: geometry.point_at(geometry.inner_center, angle),
                width: geometry.thin_line,
                height: geometry.thin_line,
                color: palette.minute_mark,
            });
        }
    }

    let font = FontSpec::new(geometry.font_family, geometry.font_size);
    for i in 0..12 {
        let angle = TOP + HOUR_STEP * i as f64;
        let position = geometry.point_at(geometry.numeral_radius(), angle);

        if config.numbers_enabled() {
            let hour = hour_label(i);
            let text = if config.roman {
                to_roman(hour)
            } else {
                hour.to_string()
            };
            let (dx, dy) = text_offset(&text, geometry.font_size);
            scene.add_command(DrawCommand::Text {
                origin: position.offset(-dx, dy),
                text,
                font: font.clone(),
                color: palette.darker,
            });
        } else {
            scene.add_command(DrawCommand::Disc {
                center: position,
                radius: geometry.thick_line,
                fill: palette.darker,
                border: None,
            });
        }
    }

    scene
}

// ============================================================================
// PER-TICK HANDS
// ============================================================================

/// Builds the time-dependent layer: label, the three hands, accent and center dot.
pub fn hands_scene(config: &ClockConfig, geometry: &Geometry, time: TimeOfDay) -> Scene {
    let palette = &config.palette;
    let mut scene = Scene::new();

    if let Some(label) = config.label_text() {
        let label_size = geometry.font_size * 0.98;
        let family = config
            .label_font
            .as_deref()
            .filter(|family| !family.is_empty())
            .unwrap_or(geometry.font_family);
        let (dx, _) = text_offset(label, label_size);
        scene.add_command(DrawCommand::Text {
            origin: Point::new(geometry.center - dx, geometry.inner_center * 0.6),
            text: label.to_string(),
            font: FontSpec::new(family, label_size).italic(),
            color: palette.lighter,
        });
    }

    let minute = minute_angle(time.fractional_minutes());
    add_hand(
        &mut scene,
        geometry,
        geometry.point_at(geometry.inner_center * 0.92, minute),
        palette.lighter,
        geometry.thick_line,
        config,
    );

    let hour = hour_angle(time.fractional_hours());
    add_hand(
        &mut scene,
        geometry,
        geometry.point_at(geometry.inner_center * 0.65, hour),
        palette.lighter,
        geometry.thick_line,
        config,
    );

    let second = second_angle(time.fractional_seconds());
    add_hand(
        &mut scene,
        geometry,
        geometry.point_at(geometry.inner_center * 0.92, second),
        palette.highlight,
        geometry.thin_line,
        config,
    );

    // accent circle riding on the second hand
    scene.add_command(DrawCommand::Disc {
        center: geometry.point_at(geometry.inner_center * 0.85, second),
        radius: geometry.thin_line,
        fill: palette.face,
        border: Some(Stroke {
            color: palette.highlight,
            width: geometry.thin_line,
        }),
    });

    scene.add_command(DrawCommand::Disc {
        center: geometry.center_point(),
        radius: geometry.center_dot_radius(),
        fill: palette.darker,
        border: None,
    });

    scene
}

/// A hand runs from its tip to the center and casts a shadow to look raised.
fn add_hand(
    scene: &mut Scene,
    geometry: &Geometry,
    tip: Point,
    color: Color,
    width: f64,
    config: &ClockConfig,
) {
    scene.add_command(DrawCommand::Line {
        from: tip,
        to: geometry.center_point(),
        stroke: Stroke { color, width },
        shadow: Some(Shadow {
            color: config.palette.minute_mark,
            blur: width,
            offset_x: geometry.thin_line,
            offset_y: geometry.thin_line,
        }),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;

    fn setup(config: ClockConfig) -> (ClockConfig, Geometry) {
        let geometry = Geometry::new(&config);
        (config, geometry)
    }

    fn texts(scene: &Scene) -> Vec<&str> {
        scene
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn hand_tips(scene: &Scene) -> Vec<Point> {
        scene
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line { from, .. } => Some(*from),
                _ => None,
            })
            .collect()
    }

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < 1e-6,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn plain_face_has_dial_and_twelve_dots() {
        let (config, geometry) = setup(ClockConfig::new(200.0));
        let scene = face_scene(&config, &geometry);
        assert_eq!(scene.len(), 13);

        match &scene.commands()[0] {
            DrawCommand::Disc {
                center,
                radius,
                fill,
                border,
            } => {
                assert_eq!(*center, Point::new(100.0, 100.0));
                assert!((radius - 92.0).abs() < 1e-9);
                assert_eq!(*fill, Palette::CLASSIC.face);
                let border = border.expect("dial border");
                assert_eq!(border.color, Palette::CLASSIC.face_border);
                assert!((border.width - 12.0).abs() < 1e-9);
            }
            other => panic!("unexpected first command {other:?}"),
        }

        // the first dot sits at 12 o'clock
        match &scene.commands()[1] {
            DrawCommand::Disc { center, radius, .. } => {
                assert_close(*center, Point::new(100.0, 100.0 - 82.0 * 0.92));
                assert!((radius - 4.0).abs() < 1e-9);
            }
            other => panic!("unexpected dot {other:?}"),
        }
    }

    #[test]
    fn minute_marks_add_sixty_squares() {
        let config = ClockConfig::builder().size(200.0).minute_marks(true).build();
        let (config, geometry) = setup(config);
        let scene = face_scene(&config, &geometry);
        let marks: Vec<_> = scene
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect {
                    origin,
                    width,
                    color,
                    ..
                } => Some((*origin, *width, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(marks.len(), 60);
        assert_close(marks[0].0, Point::new(100.0, 100.0 - 82.0));
        assert_close(marks[15].0, Point::new(182.0, 100.0));
        assert!(marks
            .iter()
            .all(|(_, width, color)| (*width - 2.0).abs() < 1e-9
                && *color == Palette::CLASSIC.minute_mark));
    }

    #[test]
    fn arabic_numerals_run_clockwise_from_twelve() {
        let (config, geometry) = setup(ClockConfig::builder().size(200.0).numbers(true).build());
        let scene = face_scene(&config, &geometry);
        assert_eq!(
            texts(&scene),
            vec!["12", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]
        );

        match &scene.commands()[1] {
            DrawCommand::Text { origin, font, .. } => {
                // "12" at 8pt is pulled left by 3.2 and down by 4.8
                assert_close(*origin, Point::new(100.0 - 3.2, 100.0 - 82.0 * 0.92 + 4.8));
                assert_eq!(font.to_string(), "8pt Arial");
            }
            other => panic!("unexpected numeral {other:?}"),
        }
    }

    #[test]
    fn roman_numerals_imply_numbers_and_serif() {
        let (config, geometry) = setup(ClockConfig::builder().size(200.0).roman(true).build());
        let scene = face_scene(&config, &geometry);
        assert_eq!(
            texts(&scene),
            vec!["XII", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI"]
        );
        assert!(scene.commands().iter().all(|command| match command {
            DrawCommand::Text { font, .. } => font.family == "Times New Roman" && !font.italic,
            _ => true,
        }));
    }

    #[test]
    fn face_scene_is_deterministic() {
        let (config, geometry) = setup(
            ClockConfig::builder()
                .size(321.0)
                .minute_marks(true)
                .roman(true)
                .build(),
        );
        assert_eq!(face_scene(&config, &geometry), face_scene(&config, &geometry));
    }

    #[test]
    fn three_o_clock() {
        let (config, geometry) = setup(ClockConfig::new(200.0));
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(15, 0, 0, 0));
        let tips = hand_tips(&scene);
        assert_eq!(tips.len(), 3);

        let inner = geometry.inner_center;
        // minute and second straight up, hour pointing right
        assert_close(tips[0], Point::new(100.0, 100.0 - inner * 0.92));
        assert_close(tips[1], Point::new(100.0 + inner * 0.65, 100.0));
        assert_close(tips[2], Point::new(100.0, 100.0 - inner * 0.92));
    }

    #[test]
    fn half_past_nine() {
        let (config, geometry) = setup(ClockConfig::new(200.0));
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(9, 30, 0, 0));
        let tips = hand_tips(&scene);
        let inner = geometry.inner_center;

        assert_close(tips[0], Point::new(100.0, 100.0 + inner * 0.92));
        let halfway = hour_angle(9.5);
        assert!((halfway - (hour_angle(9.0) + hour_angle(10.0)) / 2.0).abs() < 1e-12);
        assert_close(tips[1], geometry.point_at(inner * 0.65, halfway));
    }

    #[test]
    fn hands_carry_shadows_and_styles() {
        let (config, geometry) = setup(ClockConfig::new(200.0));
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(1, 2, 3, 4));
        let palette = Palette::CLASSIC;

        let lines: Vec<_> = scene
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line {
                    to, stroke, shadow, ..
                } => Some((*to, *stroke, *shadow)),
                _ => None,
            })
            .collect();
        let widths: Vec<f64> = lines.iter().map(|(_, stroke, _)| stroke.width).collect();
        assert_eq!(widths, vec![4.0, 4.0, 2.0]);
        assert_eq!(lines[2].1.color, palette.highlight);

        for (to, stroke, shadow) in lines {
            assert_eq!(to, geometry.center_point());
            let shadow = shadow.expect("hand shadow");
            assert_eq!(shadow.color, palette.minute_mark);
            assert_eq!(shadow.blur, stroke.width);
            assert_eq!((shadow.offset_x, shadow.offset_y), (2.0, 2.0));
        }

        // nothing drawn after the hands casts a shadow
        assert!(matches!(
            scene.commands().last(),
            Some(DrawCommand::Disc { border: None, .. })
        ));
    }

    #[test]
    fn accent_and_center_dot() {
        let (config, geometry) = setup(ClockConfig::new(200.0));
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(0, 0, 15, 0));
        let palette = Palette::CLASSIC;
        let commands = scene.commands();

        match &commands[commands.len() - 2] {
            DrawCommand::Disc {
                center,
                radius,
                fill,
                border,
            } => {
                assert_close(*center, Point::new(100.0 + geometry.inner_center * 0.85, 100.0));
                assert_eq!(*radius, 2.0);
                assert_eq!(*fill, palette.face);
                assert_eq!(border.map(|b| b.color), Some(palette.highlight));
            }
            other => panic!("unexpected accent {other:?}"),
        }
        match &commands[commands.len() - 1] {
            DrawCommand::Disc { radius, fill, .. } => {
                assert_eq!(*radius, 5.0);
                assert_eq!(*fill, palette.darker);
            }
            other => panic!("unexpected center dot {other:?}"),
        }
    }

    #[test]
    fn label_uses_custom_font_when_given() {
        let (config, geometry) = setup(
            ClockConfig::builder()
                .size(200.0)
                .label("Rolex".to_string())
                .label_font("Georgia".to_string())
                .build(),
        );
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(0, 0, 0, 0));
        match &scene.commands()[0] {
            DrawCommand::Text {
                origin,
                text,
                font,
                color,
            } => {
                assert_eq!(text, "Rolex");
                assert!(font.italic);
                assert_eq!(font.family, "Georgia");
                let size = 8.0 * 0.98;
                assert!((font.size - size).abs() < 1e-9);
                assert_close(*origin, Point::new(100.0 - 5.0 * size * 0.2, 82.0 * 0.6));
                assert_eq!(*color, Palette::CLASSIC.lighter);
            }
            other => panic!("unexpected label {other:?}"),
        }
    }

    #[test]
    fn label_defaults_to_face_family() {
        let (config, geometry) = setup(
            ClockConfig::builder()
                .size(200.0)
                .roman(true)
                .label("Quartz".to_string())
                .build(),
        );
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(0, 0, 0, 0));
        assert!(matches!(
            &scene.commands()[0],
            DrawCommand::Text { font, .. } if font.family == "Times New Roman"
        ));
    }

    #[test]
    fn empty_label_strings_are_ignored() {
        let (config, geometry) = setup(
            ClockConfig::builder()
                .size(200.0)
                .label("Quartz".to_string())
                .label_font(String::new())
                .build(),
        );
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(0, 0, 0, 0));
        assert!(matches!(
            &scene.commands()[0],
            DrawCommand::Text { font, .. } if font.family == "Arial"
        ));

        let (config, geometry) = setup(
            ClockConfig::builder()
                .size(200.0)
                .label(String::new())
                .build(),
        );
        let scene = hands_scene(&config, &geometry, TimeOfDay::new(0, 0, 0, 0));
        assert!(texts(&scene).is_empty());
        // three hands, accent and center dot
        assert_eq!(scene.len(), 5);
    }

    #[test]
    fn font_spec_display() {
        assert_eq!(FontSpec::new("Arial", 12.0).to_string(), "12pt Arial");
        assert_eq!(
            FontSpec::new("Georgia", 7.5).italic().to_string(),
            "italic 7.5pt Georgia"
        );
        assert!((FontSpec::new("Arial", 12.0).pixel_size() - 16.0).abs() < 1e-9);
    }
}
