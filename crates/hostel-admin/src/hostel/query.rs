use serde::{Deserialize, Serialize};

/// `?page=&per_page=` as sent by admin list pages. Pages are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl PageRequest {
    pub fn first(per_page: usize) -> Self {
        Self {
            page: Some(1),
            per_page: Some(per_page),
        }
    }
}

/// One page of an admin changelist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub page: usize,
    pub per_page: usize,
    pub num_pages: usize,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Slices already ordered `rows`. Pages past the end come back empty.
    pub fn paginate(rows: Vec<T>, request: PageRequest, default_per_page: usize) -> Self {
        let per_page = request.per_page.unwrap_or(default_per_page).max(1);
        let page = request.page.unwrap_or(1).max(1);
        let count = rows.len();
        let num_pages = count.div_ceil(per_page).max(1);
        let results = rows
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Self {
            count,
            page,
            per_page,
            num_pages,
            results,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            page: self.page,
            per_page: self.per_page,
            num_pages: self.num_pages,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Admin-style search: every whitespace separated term must appear, case-insensitively,
/// in at least one of `fields`. An empty or missing query matches everything.
pub fn matches_search(query: Option<&str>, fields: &[&str]) -> bool {
    let Some(query) = query else {
        return true;
    };

    let lowered: Vec<String> = fields.iter().map(|field| field.to_lowercase()).collect();
    query.split_whitespace().all(|term| {
        let term = term.to_lowercase();
        lowered.iter().any(|field| field.contains(&term))
    })
}

/// `None` accepts every value; `Some(expected)` must match exactly.
pub fn matches<T: PartialEq>(expected: Option<T>, actual: T) -> bool {
    expected.map_or(true, |expected| expected == actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginates_with_defaults_and_clamps_page_zero() {
        let rows: Vec<u32> = (1..=45).collect();
        let page = Page::paginate(rows.clone(), PageRequest::default(), 20);
        assert_eq!(page.count, 45);
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.results.first(), Some(&1));
        assert_eq!(page.results.len(), 20);

        let last = Page::paginate(
            rows.clone(),
            PageRequest {
                page: Some(3),
                per_page: None,
            },
            20,
        );
        assert_eq!(last.results, vec![41, 42, 43, 44, 45]);

        let clamped = Page::paginate(
            rows,
            PageRequest {
                page: Some(0),
                per_page: Some(0),
            },
            20,
        );
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 1);
        assert_eq!(clamped.results, vec![1]);
    }

    #[test]
    fn pages_past_the_end_are_empty() {
        let page = Page::paginate(vec!["a", "b"], PageRequest::first(10), 10);
        assert_eq!(page.num_pages, 1);
        let beyond = Page::paginate(
            vec!["a", "b"],
            PageRequest {
                page: Some(4),
                per_page: Some(10),
            },
            10,
        );
        assert!(beyond.results.is_empty());
        assert_eq!(beyond.count, 2);
    }

    #[test]
    fn search_requires_every_term_somewhere() {
        let fields = ["STU-1001", "rahim", "Rahim", "Uddin"];
        assert!(matches_search(None, &fields));
        assert!(matches_search(Some("  "), &fields));
        assert!(matches_search(Some("rahim uddin"), &fields));
        assert!(matches_search(Some("stu-10"), &fields));
        assert!(!matches_search(Some("rahim karim"), &fields));
    }
}
