//! Query-string construction for list filters.
//!
//! Keys are kept in a `BTreeMap`, so the encoded string is deterministic
//! (lexicographic by key) regardless of the order filters were pushed.
//! Absent options contribute nothing; list filters become a single
//! comma-joined value.

use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<&'static str, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Display) -> &mut Self {
        self.params.insert(key, value.to_string());
        self
    }

    pub fn push_opt<V: Display>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Comma-joined list filter. An absent or empty list adds nothing.
    pub fn push_list<V: Display>(&mut self, key: &'static str, values: Option<&[V]>) -> &mut Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            let joined = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.params.insert(key, joined);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Percent-encoded `k=v&k=v`, without the leading `?`.
    pub fn encode(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_encodes_to_nothing() {
        let q = Query::new();
        assert!(q.is_empty());
        assert_eq!(q.encode(), "");
    }

    #[test]
    fn keys_are_sorted_regardless_of_insertion_order() {
        let mut q = Query::new();
        q.push("project_id", 5).push("label_id", 3);
        assert_eq!(q.encode(), "label_id=3&project_id=5");
    }

    #[test]
    fn absent_options_are_skipped() {
        let mut q = Query::new();
        q.push_opt("project_id", None::<u64>)
            .push_opt("filter", Some("today"))
            .push_list("ids", None::<&[u64]>);
        assert_eq!(q.encode(), "filter=today");
    }

    #[test]
    fn list_filter_is_one_comma_joined_parameter() {
        let mut q = Query::new();
        q.push_list("ids", Some(&[1u64, 2, 3][..]));
        assert_eq!(q.encode(), "ids=1%2C2%2C3");
    }

    #[test]
    fn empty_list_is_skipped() {
        let mut q = Query::new();
        q.push_list::<u64>("ids", Some(&[]));
        assert!(q.is_empty());
    }

    #[test]
    fn values_are_percent_encoded() {
        let mut q = Query::new();
        q.push("filter", "today | overdue & p1");
        assert_eq!(q.encode(), "filter=today%20%7C%20overdue%20%26%20p1");
    }
}
