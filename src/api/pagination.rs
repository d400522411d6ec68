use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
///
/// Most list endpoints answer with `{count, next, previous, results}`, a few answer with a bare
/// JSON array; both decode into this shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn has_previous(&self) -> bool {
        self.previous.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de>"))]
enum RawPage<T> {
    // Arrays first: a struct variant would also accept a sequence
    List(Vec<T>),
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        #[serde(default)]
        results: Option<Vec<T>>,
    },
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPage::<T>::deserialize(deserializer)? {
            RawPage::Paginated {
                count,
                next,
                previous,
                results,
            } => Page {
                count: count.unwrap_or(0),
                next,
                previous,
                results: results.unwrap_or_default(),
            },
            RawPage::List(results) => Page {
                count: results.len() as u64,
                next: None,
                previous: None,
                results,
            },
        })
    }
}

/// Query string parameters. Setting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value.to_string());
        self
    }

    /// Set only when a value is present.
    pub fn set_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    /// Set only when a value is present and non-empty (search boxes).
    pub fn set_non_empty(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.set(key, v),
            _ => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `None` when no parameter was set, so callers can skip the query string entirely.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    fn insert(&mut self, key: &str, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }
}

/// `?page=N` only, the most common list parameter.
pub fn page_query(page: Option<u32>) -> Option<QueryParams> {
    QueryParams::new().set_opt("page", page).into_option()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_shape() {
        let page: Page<u32> = serde_json::from_value(json!({
            "count": 30,
            "next": "https://api.example.com/events/?page=2",
            "previous": null,
            "results": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(page.count, 30);
        assert!(page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.results, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_fields_default() {
        let page: Page<u32> = serde_json::from_value(json!({"results": [7]})).unwrap();
        assert_eq!(page.count, 0);
        assert_eq!(page.results, vec![7]);

        let page: Page<u32> = serde_json::from_value(json!({})).unwrap();
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_null_results_is_empty_page() {
        let page: Page<u32> = serde_json::from_value(json!({
            "count": 0,
            "next": null,
            "previous": null,
            "results": null
        }))
        .unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_bare_array_shape() {
        let page: Page<String> = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(page.count, 2);
        assert!(!page.has_next());
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_query_params_set_semantics() {
        let q = QueryParams::new()
            .set("page", 1)
            .set("page", 2)
            .set_opt("event_type", None::<i64>)
            .set_non_empty("search", Some(""))
            .set_non_empty("ordering", Some("-start_date"));
        let pairs: Vec<_> = q.iter().collect();
        assert_eq!(pairs, vec![("page", "2"), ("ordering", "-start_date")]);
        assert_eq!(q.get("page"), Some("2"));
    }

    #[test]
    fn test_page_query() {
        assert_eq!(page_query(None), None);
        assert_eq!(page_query(Some(3)).unwrap().get("page"), Some("3"));
    }
}
