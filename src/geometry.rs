//! Dial geometry: everything derived from the clock size, plus the angle math
//! that places marks, numerals and hands on the face.

use std::f64::consts::PI;

use crate::config::ClockConfig;

/// Angle of the 12 o'clock position. Angles grow clockwise in screen space.
pub const TOP: f64 = PI * 3.0 / 2.0;

pub const MINUTE_STEP: f64 = PI * 2.0 / 60.0;
pub const HOUR_STEP: f64 = PI * 2.0 / 12.0;

const SANS_FAMILY: &str = "Arial";
const SERIF_FAMILY: &str = "Times New Roman";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Constants computed once from the clock size
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub size: f64,
    pub center: f64,
    /// Base radius the marks, numerals and hands are scaled from
    pub inner_center: f64,
    pub thin_line: f64,
    pub thick_line: f64,
    pub face_border_line: f64,
    /// Numeral font size, in points
    pub font_size: f64,
    pub font_family: &'static str,
}

impl Geometry {
    pub fn new(config: &ClockConfig) -> Self {
        let size = config.size;
        let center = size / 2.0;
        Self {
            size,
            center,
            inner_center: center * 0.82,
            thin_line: size * 0.01,
            thick_line: size * 0.02,
            face_border_line: size * 0.06,
            font_size: size * 0.04,
            font_family: if config.roman { SERIF_FAMILY } else { SANS_FAMILY },
        }
    }

    pub fn center_point(&self) -> Point {
        Point::new(self.center, self.center)
    }

    /// Projects a polar coordinate around the dial center onto the surface.
    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        Point::new(
            radius * angle.cos() + self.center,
            radius * angle.sin() + self.center,
        )
    }

    pub fn face_radius(&self) -> f64 {
        self.center * 0.92
    }

    pub fn numeral_radius(&self) -> f64 {
        self.inner_center * 0.92
    }

    pub fn center_dot_radius(&self) -> f64 {
        self.size * 0.025
    }

    /// Pixel edge length of the surfaces; negative or NaN sizes collapse to zero.
    pub fn surface_extent(&self) -> u32 {
        if self.size.is_finite() && self.size > 0.0 {
            self.size.round() as u32
        } else {
            0
        }
    }
}

/// Hour shown at the `index`-th position of the sweep starting from the top.
pub fn hour_label(index: u32) -> u32 {
    match index % 13 {
        0 => 12,
        hour => hour,
    }
}

/// Standard subtractive Roman notation.
pub fn to_roman(mut number: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut numeral = String::new();
    for &(value, symbol) in TABLE.iter() {
        while number >= value {
            numeral.push_str(symbol);
            number -= value;
        }
    }
    numeral
}

/// Approximate shift that centers `text` of the given point size on a target point.
///
/// Returned as `(left, down)`: subtract the first from x, add the second to y.
pub fn text_offset(text: &str, font_size: f64) -> (f64, f64) {
    (text.chars().count() as f64 * font_size * 0.2, font_size * 0.6)
}

pub fn minute_angle(fractional_minutes: f64) -> f64 {
    TOP + MINUTE_STEP * fractional_minutes
}

pub fn hour_angle(fractional_hours: f64) -> f64 {
    TOP + HOUR_STEP * fractional_hours
}

pub fn second_angle(fractional_seconds: f64) -> f64 {
    TOP + MINUTE_STEP * fractional_seconds
}
