//! Ownership classification for infrastructure records.
//!
//! Owner names arrive as free text. [`classify`] maps them onto a small fixed
//! set of [`Category`] values by case-insensitive substring matching, checking
//! categories in priority order so that the first match wins.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::{Color, GeoPoint};

/// Attribute holding the owner name on infrastructure records.
pub const OWNER_ATTRIBUTE: &str = "entity";

/// Ownership category of an infrastructure record.
///
/// Variants are declared in classification priority order, so the derived
/// `Ord` doubles as the composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    /// American Tower and its abbreviations.
    AmericanTowers,
    /// SBA Communications.
    Sba,
    /// Crown Castle.
    CrownCastle,
    /// Everything else, including records without an owner.
    Other,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Self; 4] = [Self::AmericanTowers, Self::Sba, Self::CrownCastle, Self::Other];

    /// Lower-case substrings that select this category.
    #[must_use]
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::AmericanTowers => &["american tower", "amt", "american towers"],
            Self::Sba => &["sba", "sba communications", "sba comm"],
            Self::CrownCastle => &["crown castle", "crown", "ccic"],
            Self::Other => &[],
        }
    }

    /// Short name used in coverage layer names.
    #[must_use]
    pub const fn group_name(self) -> &'static str {
        match self {
            Self::AmericanTowers => "American Towers",
            Self::Sba => "SBA Towers",
            Self::CrownCastle => "Crown Castle",
            Self::Other => "Other",
        }
    }

    /// Name used in marker layer names.
    #[must_use]
    pub const fn marker_name(self) -> &'static str {
        match self {
            Self::AmericanTowers => "American Towers",
            Self::Sba => "SBA Towers",
            Self::CrownCastle => "Crown Castle Towers",
            Self::Other => "Other",
        }
    }

    /// Marker and ring colour.
    #[must_use]
    pub fn color(self) -> Color {
        Color::named(match self {
            Self::AmericanTowers => "red",
            Self::Sba => "purple",
            Self::CrownCastle => "orange",
            Self::Other => "blue",
        })
    }

    fn matches(self, lowered: &str) -> bool {
        self.patterns()
            .iter()
            .any(|pattern| lowered.contains(pattern))
    }
}

/// Classify an owner name.
///
/// Total and deterministic: a missing, empty or unmatched name yields
/// [`Category::Other`].
///
/// # Examples
/// ```
/// use beadmap_core::{Category, classify};
///
/// assert_eq!(classify(Some("Crown Castle")), Category::CrownCastle);
/// assert_eq!(classify(Some("AMT Holdings")), Category::AmericanTowers);
/// assert_eq!(classify(Some("Acme Wireless")), Category::Other);
/// assert_eq!(classify(None), Category::Other);
/// ```
#[must_use]
pub fn classify(name: Option<&str>) -> Category {
    let Some(trimmed) = name.map(str::trim).filter(|value| !value.is_empty()) else {
        return Category::Other;
    };
    let lowered = trimmed.to_lowercase();
    Category::ALL
        .into_iter()
        .find(|category| category.matches(&lowered))
        .unwrap_or(Category::Other)
}

/// Infrastructure points grouped by category.
///
/// Every category has an entry, possibly empty. Iteration follows priority
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroups {
    groups: BTreeMap<Category, Vec<GeoPoint>>,
}

impl CategoryGroups {
    /// Points in `category`, in input order.
    #[must_use]
    pub fn get(&self, category: Category) -> &[GeoPoint] {
        self.groups.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Iterate `(category, points)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[GeoPoint])> {
        self.groups
            .iter()
            .map(|(category, points)| (*category, points.as_slice()))
    }

    /// Total number of grouped points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether no points were grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CategoryGroups {
    fn default() -> Self {
        Self {
            groups: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }
}

/// Tag each point with its category and partition the set.
///
/// The owner is read from the [`OWNER_ATTRIBUTE`] attribute. Input order is
/// preserved within each group.
#[must_use]
pub fn group_by_category(points: Vec<GeoPoint>) -> CategoryGroups {
    let mut grouped = CategoryGroups::default();
    for point in points {
        let category = classify(point.attribute(OWNER_ATTRIBUTE));
        grouped
            .groups
            .entry(category)
            .or_default()
            .push(point.with_category(category));
    }
    for (category, members) in grouped.iter() {
        debug!("Classified {} records as {category:?}", members.len());
    }
    grouped
}

/// Decode an FCC antenna structure code into a readable label.
///
/// Non-letters are stripped before the lookup, so `3BPOLE` and `BPOLE` share a
/// label. Unknown codes yield `"Unknown"`.
///
/// # Examples
/// ```
/// use beadmap_core::structure_type_label;
///
/// assert_eq!(structure_type_label("gtower"), "Guyed Tower");
/// assert_eq!(structure_type_label("3BPOLE"), "Building-Mounted Pole");
/// assert_eq!(structure_type_label("XYZ"), "Unknown");
/// ```
#[must_use]
pub fn structure_type_label(code: &str) -> &'static str {
    let cleaned: String = code
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match cleaned.as_str() {
        "TA" => "Tower Antenna",
        "GTA" | "GTOWER" => "Guyed Tower",
        "LTA" | "LTOWER" => "Lattice Tower",
        "MTA" | "MTOWER" => "Monopole Tower",
        "TOWER" => "Tower",
        "NTOWER" => "Non-Guyed Tower",
        "POLE" | "UPOLE" => "Utility Pole",
        "BPOLE" => "Building-Mounted Pole",
        "BPIPE" => "Building-Mounted Pipe",
        "BTWR" => "Building Tower",
        "PIPE" => "Pipe Structure",
        "MAST" => "Mast",
        "BMAST" => "Building-Mounted Mast",
        "STACK" => "Industrial Stack",
        "SIGN" => "Sign Structure",
        "TREE" => "Tree Structure",
        "RIG" => "Oil or Gas Rig",
        "BRIDG" => "Bridge Structure",
        "SILO" => "Silo",
        "BANT" => "Building Antenna",
        "NNTANN" => "Non-Tower Antenna",
        "TANK" => "Tank",
        _ => "Unknown",
    }
}
