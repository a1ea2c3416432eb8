//! Overlay colours.
//!
//! Well-known operators keep their brand colours. Every other overlay gets a
//! colour derived from a hash of its name, so a region rendered twice looks
//! the same both times.

use xxhash_rust::xxh32::xxh32;

use crate::Color;

/// Brand colours for known operators, matched as case-insensitive substrings.
pub const KNOWN_OPERATORS: [(&str, &str); 9] = [
    ("AT&T", "#009FDB"),
    ("T-Mobile", "#E20074"),
    ("Verizon", "#E81123"),
    ("Mediacom Bolt", "#0033A0"),
    ("Point Broadband", "#F89728"),
    ("Cloud 9 Wireless", "#6BACE4"),
    ("Dragonfly Internet", "#FF5733"),
    ("Rapid Wireless LLC", "#28A745"),
    ("Wildstar Networks", "#8E44AD"),
];

const HASH_SEED: u32 = 0;

/// Colour for an overlay called `name`.
///
/// # Examples
/// ```
/// use beadmap_core::overlay_color;
///
/// assert_eq!(overlay_color("Verizon Fixed Wireless").as_str(), "#E81123");
/// assert_eq!(overlay_color("Acme Net"), overlay_color("Acme Net"));
/// ```
#[must_use]
pub fn overlay_color(name: &str) -> Color {
    let lowered = name.trim().to_lowercase();
    KNOWN_OPERATORS
        .iter()
        .find(|(operator, _)| lowered.contains(&operator.to_lowercase()))
        .map_or_else(
            || Color::from_rgb(xxh32(name.trim().as_bytes(), HASH_SEED)),
            |(_, hex)| Color::named(hex),
        )
}
