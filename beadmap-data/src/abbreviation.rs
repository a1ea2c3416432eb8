//! Postal abbreviations for US states and territories.
//!
//! Region directories are named after the full state name. The licence table
//! keys records by postal code, so the loader needs this mapping to filter it.

use log::warn;

const STATES: [(&str, &str); 56] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("District of Columbia", "DC"),
    ("Puerto Rico", "PR"),
    ("Virgin Islands", "VI"),
    ("American Samoa", "AS"),
    ("Guam", "GU"),
    ("Northern Mariana Islands", "MP"),
];

const VARIATIONS: [(&str, &str); 3] = [
    ("District Of Columbia", "DC"),
    ("Washington DC", "DC"),
    ("Washington D.C.", "DC"),
];

fn lookup(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, code)| *code)
}

fn title_case(name: &str) -> String {
    let mut previous_is_letter = false;
    name.chars()
        .map(|c| {
            let mapped = if previous_is_letter {
                c.to_lowercase().collect::<String>()
            } else {
                c.to_uppercase().collect::<String>()
            };
            previous_is_letter = c.is_alphabetic();
            mapped
        })
        .collect()
}

/// Postal abbreviation for a state or territory name.
///
/// The name is tried as written, then title-cased, then against a short
/// table of common variations. Unknown names return `None` and are logged.
///
/// # Examples
/// ```
/// use beadmap_data::region_abbreviation;
///
/// assert_eq!(region_abbreviation("Delaware"), Some("DE"));
/// assert_eq!(region_abbreviation("new york"), Some("NY"));
/// assert_eq!(region_abbreviation("Washington D.C."), Some("DC"));
/// assert_eq!(region_abbreviation("Atlantis"), None);
/// ```
#[must_use]
pub fn region_abbreviation(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    let titled = title_case(trimmed);
    let found = lookup(&STATES, trimmed)
        .or_else(|| lookup(&STATES, &titled))
        .or_else(|| lookup(&VARIATIONS, trimmed))
        .or_else(|| lookup(&VARIATIONS, &titled));
    if found.is_none() {
        warn!("No postal abbreviation for region '{name}'");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Maine", Some("ME"))]
    #[case("NORTH CAROLINA", Some("NC"))]
    #[case("district of columbia", Some("DC"))]
    #[case("Washington DC", Some("DC"))]
    #[case("Washington", Some("WA"))]
    #[case("  Guam ", Some("GU"))]
    #[case("Ontario", None)]
    #[case("", None)]
    fn maps_region_names(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(region_abbreviation(name), expected);
    }

    #[rstest]
    fn title_case_follows_word_boundaries() {
        assert_eq!(title_case("new HAMPSHIRE"), "New Hampshire");
        assert_eq!(title_case("o'brien"), "O'Brien");
    }
}
