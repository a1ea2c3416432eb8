//! Visual styling carried by each layer.
//!
//! Styles are plain data. The renderer decides how to express them in its
//! target format.

use std::fmt;

use serde::Serialize;

/// A CSS colour, either a named colour (`"red"`) or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wrap a colour literal without validation.
    ///
    /// # Examples
    /// ```
    /// use beadmap_core::Color;
    ///
    /// assert_eq!(Color::named("red").as_str(), "red");
    /// ```
    #[must_use]
    pub fn named(value: &str) -> Self {
        Self(value.to_owned())
    }

    /// Format the low 24 bits of `value` as `#rrggbb`.
    ///
    /// # Examples
    /// ```
    /// use beadmap_core::Color;
    ///
    /// assert_eq!(Color::from_rgb(0x00_12_ab).as_str(), "#0012ab");
    /// assert_eq!(Color::from_rgb(0xff_00_00_01).as_str(), "#000001");
    /// ```
    #[must_use]
    pub fn from_rgb(value: u32) -> Self {
        Self(format!("#{:06x}", value & 0x00ff_ffff))
    }

    /// Borrow the CSS text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the colour is a `#rrggbb` literal.
    #[must_use]
    pub fn is_hex(&self) -> bool {
        self.0.len() == 7
            && self.0.starts_with('#')
            && self.0.chars().skip(1).all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stroke and fill settings for one layer.
///
/// A `None` fill draws outlines only. `marker_radius` applies to point
/// layers drawn as circle markers; pin layers leave it unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    /// Outline colour.
    pub stroke: Color,
    /// Outline width in pixels.
    pub weight: f64,
    /// Fill colour, if the shape is filled.
    pub fill: Option<Color>,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// SVG dash pattern for the outline, e.g. `"10,5"`.
    pub dash_array: Option<String>,
    /// Circle-marker radius in pixels.
    pub marker_radius: Option<f64>,
}

impl LayerStyle {
    /// An unfilled outline.
    #[must_use]
    pub const fn outline(stroke: Color, weight: f64) -> Self {
        Self {
            stroke,
            weight,
            fill: None,
            fill_opacity: 0.0,
            dash_array: None,
            marker_radius: None,
        }
    }

    /// A shape filled and stroked in the same colour.
    #[must_use]
    pub fn solid(color: Color, weight: f64, fill_opacity: f64) -> Self {
        Self {
            fill: Some(color.clone()),
            fill_opacity,
            ..Self::outline(color, weight)
        }
    }

    /// A circle marker with a distinct outline.
    #[must_use]
    pub fn circle_marker(fill: Color, stroke: Color, radius: f64) -> Self {
        Self {
            fill: Some(fill),
            fill_opacity: 1.0,
            marker_radius: Some(radius),
            ..Self::outline(stroke, 1.0)
        }
    }

    /// Return a copy with the given dash pattern.
    #[must_use]
    pub fn dashed(self, pattern: &str) -> Self {
        Self {
            dash_array: Some(pattern.to_owned()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#FF6B35", true)]
    #[case("#4ecdc4", true)]
    #[case("red", false)]
    #[case("#12345", false)]
    #[case("#12345g", false)]
    fn recognises_hex_literals(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(Color::named(value).is_hex(), expected);
    }

    #[rstest]
    fn solid_style_fills_with_stroke_colour() {
        let style = LayerStyle::solid(Color::named("#e4e4f3"), 1.0, 0.6);
        assert_eq!(style.fill.as_ref(), Some(&style.stroke));
        assert_eq!(style.fill_opacity, 0.6);
        assert!(style.dash_array.is_none());
    }

    #[rstest]
    fn outline_has_no_fill() {
        let style = LayerStyle::outline(Color::named("red"), 2.0);
        assert!(style.fill.is_none());
        assert_eq!(style.fill_opacity, 0.0);
    }
}
