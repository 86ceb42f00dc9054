use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Search term, categorical filters and paging for one collection.
///
/// The same value drives client-side filtering and is forwarded verbatim as
/// query parameters when filtering is delegated to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

/// Filter values meaning "no filter".
fn is_unset(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("all")
}

impl ListQuery {
    /// Build from raw query-string pairs. Unknown keys become categorical filters.
    pub fn from_params(params: HashMap<String, String>) -> Self {
        let mut query = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "page" => query.page = value.trim().parse().ok(),
                "limit" => query.limit = value.trim().parse().ok(),
                "search" => query.set_search(&value),
                _ => query.set_filter(&key, &value),
            }
        }
        query
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search_term() {
            params.push(("search".to_string(), search.to_string()));
        }
        for (key, value) in &self.filters {
            params.push((key.clone(), value.clone()));
        }
        params
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term.to_string())
        };
    }

    /// The trimmed search term, `None` when it matches everything.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Setting an empty or "all" value clears the filter.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if is_unset(value) {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.trim().to_string());
        }
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// `(limit, offset)` when paging was requested. Pages are 1-based.
    ///
    /// The offset is widened so any `u32` page and limit pair is representable.
    pub fn window(&self) -> Option<(u32, u64)> {
        let limit = self.limit.filter(|l| *l > 0)?;
        let page = self.page.unwrap_or(1).max(1);
        Some((limit, u64::from(page - 1) * u64::from(limit)))
    }

    /// Same filters, no paging.
    pub fn without_window(&self) -> Self {
        Self {
            page: None,
            limit: None,
            ..self.clone()
        }
    }
}
