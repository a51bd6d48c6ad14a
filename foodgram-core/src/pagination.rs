//! Page-number pagination: `?page=N&limit=M`, with absolute next/previous links.

use url::form_urlencoded;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from raw query values. Missing, unparsable or non-positive values
    /// fall back to the defaults; `limit` is capped at [`MAX_PAGE_SIZE`].
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .map(|l| l.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, limit }
    }

    /// Pull `page` and `limit` out of decoded query pairs.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let find = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        Self::from_query(find("page"), find("limit"))
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The first page always exists; later pages must start inside the result set.
    pub fn is_valid_for(&self, count: i64) -> bool {
        self.page == 1 || self.offset() < count
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.page.saturating_mul(self.limit) < count
    }
}

/// Absolute links to the neighbouring pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageLinks {
    /// `base` is the public origin plus request path, e.g.
    /// `http://localhost:3000/api/recipes`. `pairs` are the request's query
    /// parameters; everything except `page` is carried over unchanged.
    pub fn build(base: &str, pairs: &[(String, String)], request: PageRequest, count: i64) -> Self {
        let next = request
            .has_next(count)
            .then(|| page_url(base, pairs, Some(request.page + 1)));
        let previous = match request.page {
            1 => None,
            2 => Some(page_url(base, pairs, None)),
            page => Some(page_url(base, pairs, Some(page - 1))),
        };
        Self { next, previous }
    }
}

fn page_url(base: &str, pairs: &[(String, String)], page: Option<i64>) -> String {
    let page_value = page.map(|p| p.to_string());
    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut page_written = false;
    let mut empty = true;

    for (key, value) in pairs {
        if key == "page" {
            if let (false, Some(p)) = (page_written, page_value.as_deref()) {
                query.append_pair("page", p);
                page_written = true;
                empty = false;
            }
        } else {
            query.append_pair(key, value);
            empty = false;
        }
    }
    if let (false, Some(p)) = (page_written, page_value.as_deref()) {
        query.append_pair("page", p);
        empty = false;
    }

    if empty {
        return base.to_string();
    }
    format!("{}?{}", base, query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::from_pairs(&[]);
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let request = PageRequest::from_query(Some("zero"), Some("-3"));
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_limit_capped() {
        let request = PageRequest::from_query(None, Some("5000"));
        assert_eq!(request.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_and_validity() {
        let request = PageRequest { page: 3, limit: 10 };
        assert_eq!(request.offset(), 20);
        assert!(request.is_valid_for(21));
        assert!(!request.is_valid_for(20));
        assert!(PageRequest { page: 1, limit: 10 }.is_valid_for(0));
    }

    #[test]
    fn test_links_middle_page() {
        let query = pairs(&[("limit", "2"), ("page", "2"), ("tags", "lunch")]);
        let request = PageRequest::from_pairs(&query);
        let links = PageLinks::build("http://x/api/recipes", &query, request, 7);

        assert_eq!(
            links.next.as_deref(),
            Some("http://x/api/recipes?limit=2&page=3&tags=lunch")
        );
        // Page 1 is the canonical URL without a page parameter.
        assert_eq!(
            links.previous.as_deref(),
            Some("http://x/api/recipes?limit=2&tags=lunch")
        );
    }

    #[test]
    fn test_links_last_page() {
        let query = pairs(&[("page", "4")]);
        let request = PageRequest { page: 4, limit: 2 };
        let links = PageLinks::build("http://x/api/users", &query, request, 8);

        assert_eq!(links.next, None);
        assert_eq!(links.previous.as_deref(), Some("http://x/api/users?page=3"));
    }

    #[test]
    fn test_links_first_page_without_query() {
        let links = PageLinks::build("http://x/api/users", &[], PageRequest::default(), 10);
        assert_eq!(links.next.as_deref(), Some("http://x/api/users?page=2"));
        assert_eq!(links.previous, None);
    }

    #[test]
    fn test_links_encode_query_values() {
        let query = pairs(&[("tags", "soup & stew"), ("author", "суп")]);
        let links = PageLinks::build("http://x/api/recipes", &query, PageRequest::default(), 10);
        assert_eq!(
            links.next.as_deref(),
            Some("http://x/api/recipes?tags=soup+%26+stew&author=%D1%81%D1%83%D0%BF&page=2")
        );
    }
}
