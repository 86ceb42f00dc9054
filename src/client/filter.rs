use tracing::debug;

use super::resource::Resource;
use crate::models::query::ListQuery;

/// Whether `item` passes the search term and every categorical filter.
///
/// Search is a case-insensitive substring match over the resource's search
/// fields. Filters are exact matches; keys the resource does not know are
/// ignored.
pub fn matches<R: Resource>(item: &R, query: &ListQuery) -> bool {
    if let Some(term) = query.search_term() {
        let needle = term.to_lowercase();
        let hit = item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    query.filters.iter().all(|(key, value)| {
        if !R::FILTERS.contains(&key.as_str()) {
            debug!("Ignoring unknown {} filter: {}", R::LABEL, key);
            return true;
        }
        item.filter_value(key).as_deref() == Some(value.as_str())
    })
}

/// The visible subset of `items`, in their original order. Paging is not
/// applied here.
pub fn apply<'a, R: Resource>(items: &'a [R], query: &ListQuery) -> Vec<&'a R> {
    items.iter().filter(|item| matches(*item, query)).collect()
}

/// Applies the query window to an already filtered list.
pub fn page<T>(items: Vec<T>, query: &ListQuery) -> Vec<T> {
    match query.window() {
        Some((limit, offset)) => items
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect(),
        None => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::sample;
    use crate::models::orphan::Orphan;

    fn names(items: &[&Orphan]) -> Vec<String> {
        items.iter().map(|o| o.name.clone()).collect()
    }

    #[test]
    fn test_empty_search_returns_everything_in_order() {
        let orphans = sample::orphans();
        let visible = apply(&orphans, &ListQuery::default());
        assert_eq!(visible.len(), orphans.len());
        let expected: Vec<String> = orphans.iter().map(|o| o.name.clone()).collect();
        assert_eq!(names(&visible), expected);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let orphans = sample::orphans();
        let mut query = ListQuery::default();
        query.set_search("SAR");
        let visible = apply(&orphans, &query);
        assert_eq!(names(&visible), vec!["Sarah Johnson"]);
    }

    #[test]
    fn test_search_also_matches_status() {
        let orphans = sample::orphans();
        let mut query = ListQuery::default();
        query.set_search("adopted");
        let visible = apply(&orphans, &query);
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|o| o.status.as_str() == "adopted"
            || o.name.to_lowercase().contains("adopted")));
    }

    #[test]
    fn test_filters_are_exact_and_combined() {
        let orphans = sample::orphans();
        let mut query = ListQuery::default();
        query.set_filter("status", "pending");
        let pending = apply(&orphans, &query);
        assert!(pending.iter().all(|o| o.status.as_str() == "pending"));

        query.set_filter("gender", "Male");
        let pending_boys = apply(&orphans, &query);
        assert!(pending_boys.len() <= pending.len());
        assert!(pending_boys
            .iter()
            .all(|o| o.status.as_str() == "pending" && o.gender.to_string() == "Male"));

        query.set_filter("status", "all");
        query.set_filter("gender", "");
        assert_eq!(apply(&orphans, &query).len(), orphans.len());
    }

    #[test]
    fn test_unknown_filter_is_ignored() {
        let orphans = sample::orphans();
        let mut query = ListQuery::default();
        query.set_filter("colour", "blue");
        assert_eq!(apply(&orphans, &query).len(), orphans.len());
    }

    #[test]
    fn test_filtering_does_not_touch_the_collection() {
        let orphans = sample::orphans();
        let before = orphans.clone();
        let mut query = ListQuery::default();
        query.set_search("zzz");
        assert!(apply(&orphans, &query).is_empty());
        assert_eq!(orphans, before);
    }

    #[test]
    fn test_page_window() {
        let items: Vec<u32> = (1..=10).collect();
        let query = ListQuery {
            page: Some(2),
            limit: Some(4),
            ..Default::default()
        };
        assert_eq!(page(items.clone(), &query), vec![5, 6, 7, 8]);
        assert_eq!(page(items.clone(), &ListQuery::default()).len(), 10);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=10).collect();
        let query = ListQuery {
            page: Some(u32::MAX),
            limit: Some(u32::MAX),
            ..Default::default()
        };
        assert!(page(items, &query).is_empty());
    }
}
