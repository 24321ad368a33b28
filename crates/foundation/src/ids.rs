/// Prefixed sequential identifiers such as `overlay_3`.
///
/// The numeric suffix is what orders ids; anything after the prefix that does
/// not parse as an integer is treated as "no suffix".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: &'static str,
}

impl SequentialIds {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn format(&self, n: u64) -> String {
        format!("{}{}", self.prefix, n)
    }

    /// Numeric suffix of `id`, or `None` when the prefix differs or the
    /// remainder is not a plain integer.
    pub fn suffix(&self, id: &str) -> Option<u64> {
        id.strip_prefix(self.prefix)?.parse::<u64>().ok()
    }

    /// `max(suffix) + 1` over `existing`, or `1` when no id carries a suffix.
    pub fn next<'a>(&self, existing: impl IntoIterator<Item = &'a str>) -> String {
        let max = existing
            .into_iter()
            .filter_map(|id| self.suffix(id))
            .max()
            .unwrap_or(0);
        self.format(max.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::SequentialIds;

    const IDS: SequentialIds = SequentialIds::new("overlay_");

    #[test]
    fn next_starts_at_one() {
        assert_eq!(IDS.next([]), "overlay_1");
    }

    #[test]
    fn next_uses_max_suffix_not_count() {
        assert_eq!(IDS.next(["overlay_1", "overlay_3"]), "overlay_4");
        assert_eq!(IDS.next(["overlay_7", "overlay_2"]), "overlay_8");
    }

    #[test]
    fn ignores_non_numeric_suffixes() {
        assert_eq!(IDS.suffix("overlay_x"), None);
        assert_eq!(IDS.suffix("marker_4"), None);
        assert_eq!(IDS.next(["overlay_x", "overlay_2", "pin"]), "overlay_3");
    }
}
