//! Score range lookup
//!
//! Maps a field (or profile attribute) name to the ordered set of integer
//! scores an annotator may pick for it. Lookup order is exact field name,
//! then sub-field name, then [`DEFAULT_RANGE`].

/// Range used when neither the field nor the sub-field has an entry
pub const DEFAULT_RANGE: &[u8] = &[0, 1, 2];

const BINARY: &[u8] = &[0, 1];
const TERNARY: &[u8] = &[0, 1, 2];

/// Static, language-independent range table
const RANGE_TABLE: &[(&str, &[u8])] = &[
    ("dialogues", TERNARY),
    ("memory", TERNARY),
    ("Gender", BINARY),
    ("Power", TERNARY),
    ("Location", TERNARY),
    ("Formality", BINARY),
    ("Speakers", TERNARY),
    ("Name", BINARY),
    ("Age", TERNARY),
    ("Occupation", BINARY),
    ("Religion", BINARY),
    ("Ethnicity", BINARY),
    ("Country", BINARY),
    ("Fame", BINARY),
    ("Education", BINARY),
];

fn lookup(name: &str) -> Option<&'static [u8]> {
    RANGE_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, range)| *range)
}

/// Resolve the permitted scores for `field`, optionally scoped to `sub_field`
///
/// Never fails: unknown names fall through to [`DEFAULT_RANGE`].
pub fn resolve_range(field: &str, sub_field: Option<&str>) -> &'static [u8] {
    lookup(field)
        .or_else(|| sub_field.and_then(lookup))
        .unwrap_or(DEFAULT_RANGE)
}
