//! Country name to market code lookup.
//!
//! The volume provider localises results by a 2-letter lowercase market
//! code (the `gl` parameter). Country names arrive from the dashboard as
//! display strings ("United Kingdom"), so lookup is case-insensitive and
//! ignores surrounding whitespace. Unknown countries map to the domestic
//! market.

/// Country treated as the domestic market (no localisation penalty).
pub const DOMESTIC_COUNTRY: &str = "United States";

/// Market code used when a country is not in [`MARKET_CODES`].
pub const DOMESTIC_MARKET: &str = "us";

/// Display name (lowercase) → market code.
pub const MARKET_CODES: &[(&str, &str)] = &[
    ("united states", "us"),
    ("usa", "us"),
    ("us", "us"),
    ("united kingdom", "gb"),
    ("uk", "gb"),
    ("great britain", "gb"),
    ("canada", "ca"),
    ("australia", "au"),
    ("germany", "de"),
    ("france", "fr"),
    ("spain", "es"),
    ("italy", "it"),
    ("netherlands", "nl"),
    ("ireland", "ie"),
    ("new zealand", "nz"),
    ("sweden", "se"),
    ("denmark", "dk"),
    ("norway", "no"),
    ("brazil", "br"),
    ("mexico", "mx"),
    ("japan", "jp"),
    ("india", "in"),
];

/// Map a country display name to its market code.
///
/// "United Kingdom" → "gb", " japan " → "jp", "Atlantis" → "us".
pub fn market_code(country: &str) -> &'static str {
    let needle = normalize_country(country);
    MARKET_CODES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, code)| *code)
        .unwrap_or(DOMESTIC_MARKET)
}

/// Lowercase and collapse internal whitespace.
pub fn normalize_country(country: &str) -> String {
    country
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
