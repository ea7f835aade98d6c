//! List query types
//!
//! Filters are rendered by the gateway (PostgREST operators on the hosted
//! backend, direct comparison in the in-memory backend). Pagination is done
//! client-side over fetched rows.

use serde::{Deserialize, Serialize};

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Gte,
    Lt,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
        }
    }
}

/// One `column <op> value` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// Sort order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Row filter for `list` calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.with(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.with(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.with(column, FilterOp::Lt, value)
    }

    fn with(mut self, column: impl Into<String>, op: FilterOp, value: impl ToString) -> Self {
        self.conditions.push(Condition {
            column: column.into(),
            op,
            value: value.to_string(),
        });
        self
    }

    /// Add sorting
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// PostgREST query pairs, e.g. `("status", "eq.unread")`, `("order", "created_at.desc")`
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .conditions
            .iter()
            .map(|c| (c.column.clone(), format!("{}.{}", c.op.as_str(), c.value)))
            .collect();
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        pairs
    }
}

/// One page of a list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Rows of the current page
    pub data: Vec<T>,
    /// Total rows across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total pages (at least 1)
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T: Clone> PaginatedResponse<T> {
    /// Slice a page out of the full row set. `page` is clamped into range.
    pub fn paginate(rows: &[T], page: u32, limit: u32) -> Self {
        let total = rows.len() as u64;
        let pages = total_pages(total, limit);
        let page = page.clamp(1, pages);
        let data = if limit == 0 {
            rows.to_vec()
        } else {
            let start = ((page - 1) as usize) * limit as usize;
            rows.iter().skip(start).take(limit as usize).cloned().collect()
        };
        Self::new(data, total, page, limit)
    }
}

/// Number of pages for `total` rows; an empty list still has one page
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(limit as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_pairs() {
        let filter = Filter::new()
            .eq("status", "unread")
            .gte("start_time", "2026-01-01T00:00:00Z")
            .order_by("created_at", false);

        assert_eq!(
            filter.query_pairs(),
            vec![
                ("status".to_string(), "eq.unread".to_string()),
                ("start_time".to_string(), "gte.2026-01-01T00:00:00Z".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_paginated_response() {
        let rows: Vec<u32> = (1..=23).collect();
        let page = PaginatedResponse::paginate(&rows, 3, 10);

        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data, vec![21, 22, 23]);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_clamped() {
        let rows: Vec<u32> = (1..=5).collect();
        assert_eq!(PaginatedResponse::paginate(&rows, 9, 2).page, 3);
        assert_eq!(PaginatedResponse::paginate(&rows, 0, 2).page, 1);

        let empty: Vec<u32> = Vec::new();
        let page = PaginatedResponse::paginate(&empty, 1, 10);
        assert_eq!(page.total_pages, 1);
        assert!(page.data.is_empty());
    }
}
