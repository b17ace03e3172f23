/// Case-insensitive matching for free-text search.
pub trait ContainsIgnoreCase {
    /// Returns `true` when `self` contains `needle`, ignoring case. `needle` must already be
    /// lowercase.
    fn contains_lowercase(&self, needle: &str) -> bool;
}

impl ContainsIgnoreCase for str {
    fn contains_lowercase(&self, needle: &str) -> bool {
        needle.is_empty() || self.to_lowercase().contains(needle)
    }
}
