use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Query string for paginated list endpoints. Pages are 0-based.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    /// Case-insensitive search on name/code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(0)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Trimmed lowercase search text, `None` when blank
    pub fn search(&self) -> Option<String> {
        self.q
            .as_ref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Slice an already filtered and ordered list into one page
pub fn paginate<T>(items: Vec<T>, query: &ListQuery) -> PaginatedResponse<T> {
    let page = query.page();
    let page_size = query.page_size();
    let total = items.len() as u64;
    let start = page.saturating_mul(page_size);

    let items = items
        .into_iter()
        .skip(start as usize)
        .take(page_size as usize)
        .collect();

    PaginatedResponse {
        items,
        total,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(page: Option<u64>, page_size: Option<u64>) -> ListQuery {
        ListQuery {
            page,
            page_size,
            q: None,
        }
    }

    #[test]
    fn defaults_and_clamping() {
        assert_eq!(q(None, None).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(q(None, Some(0)).page_size(), 1);
        assert_eq!(q(None, Some(10_000)).page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn paginate_second_page() {
        let resp = paginate((1..=25).collect::<Vec<_>>(), &q(Some(1), Some(10)));
        assert_eq!(resp.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(resp.total, 25);
        assert_eq!(resp.total_pages, 3);
    }

    #[test]
    fn paginate_past_end_is_empty() {
        let resp = paginate(vec![1, 2, 3], &q(Some(5), Some(10)));
        assert!(resp.items.is_empty());
        assert_eq!(resp.total, 3);
    }

    #[test]
    fn blank_search_is_none() {
        let mut query = ListQuery::default();
        query.q = Some("  ".into());
        assert_eq!(query.search(), None);
        query.q = Some(" HoJas ".into());
        assert_eq!(query.search().as_deref(), Some("hojas"));
    }
}
