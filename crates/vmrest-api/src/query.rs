//! Query construction for collection endpoints.
//!
//! The server's list dialect is
//! `query=(field op value)&sort=(field asc)&rowsPerPage=N&pageNumber=P`.
//! Field names and operators are forwarded verbatim -- the server is the
//! sole arbiter of what is legal, and an unknown filter field silently
//! yields zero matches rather than an error. Only paging arguments are
//! validated locally.

use strum::{Display, EnumString};

use crate::error::Error;

/// Filter operator, rendered lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FilterOp {
    Is,
    StartsWith,
    Contains,
}

/// Sort direction, rendered lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
struct FilterClause {
    field: String,
    op: FilterOp,
    value: String,
}

#[derive(Debug, Clone)]
struct SortClause {
    field: String,
    order: SortOrder,
}

#[derive(Debug, Clone, Copy)]
struct PageClause {
    rows_per_page: u32,
    page_number: u32,
}

/// Composable query for a collection endpoint.
///
/// Clauses are emitted in a deterministic order: filters (in insertion
/// order), then sort, then paging.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<FilterClause>,
    sort: Option<SortClause>,
    page: Option<PageClause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter clause. The field name and value are not validated --
    /// they are the server's to judge.
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        self.filters.push(FilterClause {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Set the sort clause, replacing any earlier one.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortClause {
            field: field.into(),
            order,
        });
        self
    }

    /// Set the paging clause. At most one may be present; setting it again
    /// replaces the earlier one. Fails with `InvalidArgument` unless
    /// `rows_per_page > 0` and `page_number >= 1`.
    pub fn page(mut self, rows_per_page: u32, page_number: u32) -> Result<Self, Error> {
        if rows_per_page == 0 {
            return Err(Error::invalid_argument("rowsPerPage must be greater than 0"));
        }
        if page_number == 0 {
            return Err(Error::invalid_argument("pageNumber must be at least 1"));
        }
        self.page = Some(PageClause {
            rows_per_page,
            page_number,
        });
        Ok(self)
    }

    /// Rows per page, if a paging clause is set.
    pub fn rows_per_page(&self) -> Option<u32> {
        self.page.map(|p| p.rows_per_page)
    }

    /// Render the query as ordered key/value pairs ready for the request.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);

        for f in &self.filters {
            params.push((
                "query".to_owned(),
                format!("({} {} {})", f.field, f.op, f.value),
            ));
        }
        if let Some(ref s) = self.sort {
            params.push(("sort".to_owned(), format!("({} {})", s.field, s.order)));
        }
        if let Some(p) = self.page {
            params.push(("rowsPerPage".to_owned(), p.rows_per_page.to_string()));
            params.push(("pageNumber".to_owned(), p.page_number.to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pairs(query: &Query) -> Vec<(String, String)> {
        query.params()
    }

    #[test]
    fn empty_query_has_no_params() {
        assert!(pairs(&Query::new()).is_empty());
    }

    #[test]
    fn filter_clause_dialect() {
        let q = Query::new().filter("Alias", FilterOp::Is, "jdoe");
        assert_eq!(
            pairs(&q),
            vec![("query".to_owned(), "(Alias is jdoe)".to_owned())]
        );
    }

    #[test]
    fn operators_render_lowercase() {
        assert_eq!(FilterOp::StartsWith.to_string(), "startswith");
        assert_eq!(FilterOp::Contains.to_string(), "contains");
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }

    #[test]
    fn clause_ordering_is_filters_sort_paging() {
        let q = Query::new()
            .filter("DisplayName", FilterOp::StartsWith, "Op")
            .filter("ListInDirectory", FilterOp::Is, "true")
            .sort("Alias", SortOrder::Asc)
            .page(25, 2)
            .expect("valid paging");

        let params = q.params();
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["query", "query", "sort", "rowsPerPage", "pageNumber"]);
    }

    #[test]
    fn paging_validated_locally() {
        assert!(Query::new().page(0, 1).is_err());
        assert!(Query::new().page(10, 0).is_err());

        let err = Query::new().page(0, 1).unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn second_paging_clause_replaces_first() {
        let q = Query::new()
            .page(10, 1)
            .and_then(|q| q.page(50, 3))
            .expect("valid paging");
        assert_eq!(q.rows_per_page(), Some(50));

        let tail: Vec<(String, String)> = q.params();
        assert_eq!(
            tail,
            vec![
                ("rowsPerPage".to_owned(), "50".to_owned()),
                ("pageNumber".to_owned(), "3".to_owned()),
            ]
        );
    }
}
