use serde::Deserialize;

/// Collections come back either as a bare array or wrapped in a page object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Page { content: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            ListResponse::Page { content } => content,
            ListResponse::Bare(records) => records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::bare(r#"[1, 2, 3]"#)]
    #[case::page(r#"{"content": [1, 2, 3], "totalElements": 3, "number": 0}"#)]
    fn unwraps_both_shapes(#[case] json: &str) {
        let response: ListResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_records(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(serde_json::from_str::<ListResponse<u32>>(r#"{"items": []}"#).is_err());
    }
}
