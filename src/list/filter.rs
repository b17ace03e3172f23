use crate::domain::Resource;
use crate::extensions::str_ext::ContainsIgnoreCase;

/// Status selector of a list page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Records without a status pass every selector.
    fn admits(&self, active: Option<bool>) -> bool {
        match (self, active) {
            (StatusFilter::All, _) | (_, None) => true,
            (StatusFilter::Active, Some(active)) => active,
            (StatusFilter::Inactive, Some(active)) => !active,
        }
    }
}

/// Free-text query combined with a status selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub query: String,
    pub status: StatusFilter,
}

impl Filter {
    pub fn new(query: impl Into<String>, status: StatusFilter) -> Self {
        Filter {
            query: query.into(),
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.status == StatusFilter::All
    }

    pub fn matches<R: Resource>(&self, record: &R) -> bool {
        let needle = self.query.trim().to_lowercase();
        self.status.admits(record.is_active())
            && record.search_fields().iter().any(|field| field.contains_lowercase(&needle))
    }

    /// Keeps the matching records in their original order.
    pub fn apply<'a, R: Resource>(&self, records: impl IntoIterator<Item = &'a R>) -> Vec<&'a R> {
        records.into_iter().filter(|record| self.matches(*record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fixtures;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ids<R: Resource>(records: Vec<&R>) -> Vec<&str> {
        records.into_iter().map(|record| record.id()).collect()
    }

    #[rstest]
    #[case::everything("", StatusFilter::All, vec!["A1", "A2", "A3"])]
    #[case::query_only("norte", StatusFilter::All, vec!["A1"])]
    #[case::query_is_case_insensitive("AVIÁRIO", StatusFilter::All, vec!["A1", "A2", "A3"])]
    #[case::query_is_trimmed("  leste ", StatusFilter::All, vec!["A2"])]
    #[case::active_only("", StatusFilter::Active, vec!["A1", "A2"])]
    #[case::inactive_only("", StatusFilter::Inactive, vec!["A3"])]
    #[case::query_and_status("norte", StatusFilter::Active, vec!["A1"])]
    #[case::no_match("norte", StatusFilter::Inactive, vec![])]
    fn filters_aviaries(#[case] query: &str, #[case] status: StatusFilter, #[case] expected: Vec<&str>) {
        let aviaries = fixtures::aviaries();

        let visible = Filter::new(query, status).apply(&aviaries);

        assert_eq!(ids(visible), expected);
    }

    #[test]
    fn the_status_selector_ignores_resources_without_status() {
        let people = fixtures::people();

        let visible = Filter::new("", StatusFilter::Inactive).apply(&people);

        assert_eq!(ids(visible), vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn matches_on_the_identifier() {
        let sensors = fixtures::sensors();

        let visible = Filter::new("s4", StatusFilter::All).apply(&sensors);

        assert_eq!(ids(visible), vec!["S4"]);
    }

    #[test]
    fn filtering_twice_gives_the_same_result() {
        let sensors = fixtures::sensors();
        let filter = Filter::new("d", StatusFilter::Active);

        let once = filter.apply(&sensors).into_iter().cloned().collect::<Vec<_>>();
        let twice = filter.apply(&once);

        assert_eq!(ids(twice), ids(filter.apply(&sensors)));
    }
}
