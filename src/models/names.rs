/// Check whether a modpack or mod name is unusable.
///
/// Names are opaque strings; the only rule is that they must contain something
/// other than whitespace. Names are stored as given, never trimmed.
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}
