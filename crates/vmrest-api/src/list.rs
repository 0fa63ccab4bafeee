//! Paged list retrieval for collection endpoints.
//!
//! List responses arrive in the CUPI envelope: a `@total` member carrying
//! the server-reported total match count, and the rows under the type's
//! envelope key -- as a JSON array for many matches, a bare object for
//! exactly one, and absent for zero. An empty-but-successful response is
//! the documented representation of "no matches", not an error.

use serde_json::Value;

use crate::error::Error;
use crate::query::Query;
use crate::resource::Resource;
use crate::session::Session;

/// One page of list results, in server response order.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    /// Server-reported total matches; may exceed `items.len()` when the
    /// query was paged.
    pub total_count: u64,
}

impl<T> ListResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fetch one page of `T`'s collection with the given query.
pub async fn fetch_list<T: Resource>(
    session: &Session,
    query: &Query,
) -> Result<ListResult<T>, Error> {
    fetch_list_at(session, T::COLLECTION, query).await
}

/// Same as [`fetch_list`], against an explicit path -- used for
/// sub-resource collections like a call handler's greetings or a
/// distribution list's members.
pub(crate) async fn fetch_list_at<T: Resource>(
    session: &Session,
    path: &str,
    query: &Query,
) -> Result<ListResult<T>, Error> {
    let value = session.get_value_with_params(path, &query.params()).await?;
    parse_envelope::<T>(&value)
}

/// Page through the whole collection, concatenating pages in order.
pub async fn fetch_all<T: Resource>(
    session: &Session,
    rows_per_page: u32,
) -> Result<Vec<T>, Error> {
    let mut all: Vec<T> = Vec::new();
    let mut page_number = 1u32;

    loop {
        let query = Query::new().page(rows_per_page, page_number)?;
        let page = fetch_list::<T>(session, &query).await?;
        let received = page.items.len();
        let total = page.total_count;
        all.extend(page.items);

        let page_size = usize::try_from(rows_per_page).unwrap_or(usize::MAX);
        if received < page_size || u64::try_from(all.len()).unwrap_or(u64::MAX) >= total {
            break;
        }
        page_number += 1;
    }

    Ok(all)
}

fn parse_envelope<T: Resource>(value: &Value) -> Result<ListResult<T>, Error> {
    let items: Vec<T> = match value.get(T::LIST_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(rows)) => rows
            .iter()
            .map(deserialize_row::<T>)
            .collect::<Result<_, _>>()?,
        // Exactly one match: the server emits the row as a bare object.
        Some(row) => vec![deserialize_row::<T>(row)?],
    };

    let fallback = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let total_count = match value.get("@total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(fallback),
        Some(Value::String(s)) => s.parse().unwrap_or(fallback),
        _ => fallback,
    };

    Ok(ListResult { items, total_count })
}

fn deserialize_row<T: Resource>(row: &Value) -> Result<T, Error> {
    serde_json::from_value(row.clone()).map_err(|e| Error::Deserialization {
        message: format!("invalid {} row: {e}", T::NAME),
        body: row.to_string(),
    })
}
