/// Generic modifier names and the key tokens Daytona's keyboard API expects.
const DAYTONA_KEY_MAP: &[(&str, &str)] = &[
    ("control", "ctrl"),
    ("command", "cmd"),
    ("meta", "cmd"),
];

/// Translate one generic key name into a Daytona key token.
///
/// Lookup is case-insensitive; names without a mapping are returned
/// unchanged, case preserved.
pub fn daytona_key(name: &str) -> String {
    let lower = name.to_lowercase();
    DAYTONA_KEY_MAP
        .iter()
        .find(|(generic, _)| *generic == lower)
        .map(|(_, token)| token.to_string())
        .unwrap_or_else(|| name.to_string())
}
