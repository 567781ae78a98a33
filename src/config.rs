use bon::Builder;
use std::time::Duration;

/// Color representation for clock elements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// The fixed colors a clock is drawn with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub lighter: Color,
    pub darker: Color,
    pub highlight: Color,
    pub face: Color,
    pub face_border: Color,
    pub minute_mark: Color,
}

impl Palette {
    pub const CLASSIC: Palette = Palette {
        lighter: Color::new(85, 85, 85),
        darker: Color::new(0, 0, 0),
        highlight: Color::new(255, 0, 0),
        face: Color::new(255, 255, 255),
        face_border: Color::new(192, 192, 192),
        minute_mark: Color::new(85, 85, 85).with_alpha(0.4),
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Immutable clock configuration, read once when the clock is initialized.
///
/// Usually produced by the fluent methods on [`crate::ClockRenderer`], but the
/// generated builder works too:
///
/// ```
/// use clockface::ClockConfig;
///
/// let config = ClockConfig::builder().size(240.0).roman(true).build();
/// assert!(config.numbers_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ClockConfig {
    /// Edge length of the square clock, in pixels
    pub size: f64,
    #[builder(default)]
    pub minute_marks: bool,
    #[builder(default)]
    pub numbers: bool,
    #[builder(default)]
    pub roman: bool,
    pub label: Option<String>,
    /// Overrides the font family of the label only
    pub label_font: Option<String>,
    #[builder(default)]
    pub palette: Palette,
}

impl ClockConfig {
    pub fn new(size: f64) -> Self {
        Self::builder().size(size).build()
    }

    /// Roman numerals are only ever drawn as numbers, so either flag enables them.
    pub fn numbers_enabled(&self) -> bool {
        self.numbers || self.roman
    }

    /// The label, unless it is unset or empty.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// Whether drawing this clock needs a font face at all.
    pub fn draws_text(&self) -> bool {
        self.numbers_enabled() || self.label_text().is_some()
    }
}

/// Configuration for the application window hosting a clock
#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    #[builder(default = "Clock".to_string())]
    pub title: String,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub background: Color,
    #[builder(default = Duration::from_millis(100))]
    pub tick_interval: Duration,
    #[builder(default = false)]
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_flag_enables_numbers() {
        let config = ClockConfig::builder().size(100.0).roman(true).build();
        assert!(!config.numbers);
        assert!(config.numbers_enabled());
    }

    #[test]
    fn defaults_use_classic_palette() {
        let config = ClockConfig::new(200.0);
        assert_eq!(config.palette, Palette::CLASSIC);
        assert!(!config.minute_marks);
        assert!(config.label.is_none());
        assert_eq!(config.palette.minute_mark.alpha, 0.4);
    }

    #[test]
    fn empty_label_draws_no_text() {
        let mut config = ClockConfig::new(100.0);
        assert!(!config.draws_text());
        config.label = Some(String::new());
        assert_eq!(config.label_text(), None);
        assert!(!config.draws_text());
        config.label = Some("Acme".into());
        assert!(config.draws_text());
        let roman = ClockConfig::builder().size(100.0).roman(true).build();
        assert!(roman.draws_text());
    }

    #[test]
    fn window_defaults() {
        let window = WindowConfig::default();
        assert_eq!(window.title, "Clock");
        assert_eq!(window.tick_interval, Duration::from_millis(100));
        assert!(!window.resizable);
    }
}
