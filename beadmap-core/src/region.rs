//! Region lookup and tabular joins.
//!
//! Subdivision polygons are indexed by name so that tabular records (licence
//! rows) can be grouped against them. The comparison applied to names is a
//! [`KeyPolicy`]; index and join must share one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use geo::{Centroid, Point};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GeoPolygon, TabularRecord};

/// How region names are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Byte-for-byte equality.
    #[default]
    Exact,
    /// Trim, collapse internal whitespace and case-fold before comparing.
    Normalized,
}

impl KeyPolicy {
    /// Derive the key for `name` under this policy.
    ///
    /// # Examples
    /// ```
    /// use beadmap_core::KeyPolicy;
    ///
    /// let key = KeyPolicy::Normalized.key("  Prince   George's ");
    /// assert_eq!(key.as_str(), "prince george's");
    /// assert_eq!(KeyPolicy::Exact.key(" Kent").as_str(), " Kent");
    /// ```
    #[must_use]
    pub fn key(self, name: &str) -> RegionKey {
        match self {
            Self::Exact => RegionKey(name.to_owned()),
            Self::Normalized => RegionKey(
                name.split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase(),
            ),
        }
    }
}

/// Error returned when parsing an unknown [`KeyPolicy`] name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown join key policy '{0}' (expected 'exact' or 'normalized')")]
pub struct UnknownKeyPolicy(pub String);

impl FromStr for KeyPolicy {
    type Err = UnknownKeyPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "normalized" | "normalised" => Ok(Self::Normalized),
            _ => Err(UnknownKeyPolicy(value.to_owned())),
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Normalized => "normalized",
        })
    }
}

/// Name key joining tabular records to a region polygon.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RegionKey(String);

impl RegionKey {
    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An indexed polygon with its label anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntry {
    /// The indexed polygon.
    pub polygon: GeoPolygon,
    /// Centroid of the polygon.
    pub centroid: Point<f64>,
}

/// Polygons indexed by [`RegionKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIndex {
    policy: KeyPolicy,
    entries: BTreeMap<RegionKey, RegionEntry>,
}

impl RegionIndex {
    /// Index `polygons` by name.
    ///
    /// Polygons without a name or a computable centroid are skipped, and the
    /// first polygon wins when two share a key. Both cases are logged.
    #[must_use]
    pub fn build(polygons: &[GeoPolygon], policy: KeyPolicy) -> Self {
        let mut entries = BTreeMap::new();
        for polygon in polygons {
            let Some(name) = polygon.name.as_deref() else {
                warn!("Skipped region polygon without a name");
                continue;
            };
            let Some(centroid) = polygon.geometry.centroid() else {
                warn!("Skipped region polygon '{name}': no centroid");
                continue;
            };
            let key = policy.key(name);
            if entries.contains_key(&key) {
                warn!("Duplicate region key '{key}'; keeping the first polygon");
                continue;
            }
            entries.insert(
                key,
                RegionEntry {
                    polygon: polygon.clone(),
                    centroid,
                },
            );
        }
        Self { policy, entries }
    }

    /// The policy applied to names.
    #[must_use]
    pub const fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// Look up a region by raw name, applying the index policy.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&RegionEntry> {
        self.entries.get(&self.policy.key(name))
    }

    /// Whether `key` is indexed.
    #[must_use]
    pub fn contains(&self, key: &RegionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of [`join`].
///
/// `omitted + grouped()` always equals the number of input records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Matched records per region, in source order.
    pub groups: BTreeMap<RegionKey, Vec<TabularRecord>>,
    /// Records dropped because their key was missing or unmatched.
    pub omitted: usize,
    /// Distinct unmatched key values. Records without a key add nothing here.
    pub omitted_keys: BTreeSet<String>,
    policy: KeyPolicy,
}

impl JoinReport {
    /// Records joined to the region named `name`, applying the join policy.
    #[must_use]
    pub fn records_for(&self, name: &str) -> &[TabularRecord] {
        self.groups
            .get(&self.policy.key(name))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of matched records.
    #[must_use]
    pub fn grouped(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group `records` by their `key_field` value against `index`.
///
/// Records whose key is blank or names no indexed region are omitted and
/// counted; the omission is logged once per call.
///
/// # Examples
/// ```
/// use beadmap_core::{GeoPolygon, KeyPolicy, RegionIndex, TabularRecord, join};
/// use geo::{MultiPolygon, polygon};
///
/// let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
/// let kent = GeoPolygon::new(MultiPolygon(vec![square]), Some("Kent".into()), Default::default());
/// let index = RegionIndex::build(&[kent], KeyPolicy::Exact);
/// let records = vec![
///     TabularRecord::from_pairs([("county_name", "Kent")]),
///     TabularRecord::from_pairs([("county_name", "Sussex")]),
/// ];
///
/// let report = join(&records, "county_name", &index);
/// assert_eq!(report.records_for("Kent").len(), 1);
/// assert_eq!(report.omitted, 1);
/// ```
#[must_use]
pub fn join(records: &[TabularRecord], key_field: &str, index: &RegionIndex) -> JoinReport {
    let policy = index.policy();
    let mut report = JoinReport {
        policy,
        ..JoinReport::default()
    };
    for record in records {
        match record.get(key_field).map(|value| policy.key(value)) {
            Some(key) if index.contains(&key) => {
                report.groups.entry(key).or_default().push(record.clone());
            }
            other => {
                report.omitted += 1;
                if let Some(unmatched) = other {
                    report.omitted_keys.insert(unmatched.0);
                }
            }
        }
    }
    if report.omitted > 0 {
        warn!(
            "Omitted {} of {} records with unmatched '{key_field}' values: {:?}",
            report.omitted,
            records.len(),
            report.omitted_keys
        );
    }
    report
}
