//! Query specification: predicate, sort keys, pagination

use crate::filter::Filter;

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A single sort key over a dotted field path.
#[derive(Clone, Debug, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Offset/limit pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

/// A read specification handed to [`crate::Collection::query`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub sorts: Vec<Sort>,
    pub pagination: Option<Pagination>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sorts.push(Sort {
            field: field.into(),
            order: SortOrder::Asc,
        });
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sorts.push(Sort {
            field: field.into(),
            order: SortOrder::Desc,
        });
        self
    }

    pub fn paginate(mut self, offset: u64, limit: u64) -> Self {
        self.pagination = Some(Pagination { offset, limit });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::new()
            .with_filter(Filter::eq("tenantId", "t1"))
            .sort_desc("version")
            .paginate(0, 1);

        assert!(query.filter.is_some());
        assert_eq!(query.sorts.len(), 1);
        assert_eq!(query.sorts[0].order, SortOrder::Desc);
        assert_eq!(query.pagination, Some(Pagination { offset: 0, limit: 1 }));
    }
}
