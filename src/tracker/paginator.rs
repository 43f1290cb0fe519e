use serde::Deserialize;

use crate::error::Result;
use crate::models::Record;
use crate::tracker::transport::{decode, Fetch, QueryParams};

pub const DEFAULT_PAGE_LIMIT: u64 = 1000;

/// `(limit, offset)` for one multi-page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub limit: u64,
    pub offset: u64,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }

    /// Take the server's limit when it sent one, then step past the page.
    pub fn advance(&mut self, server_limit: Option<u64>) {
        if let Some(limit) = server_limit {
            self.limit = limit;
        }
        self.offset = self.offset.saturating_add(self.limit);
    }

    fn apply(&self, query: &mut QueryParams) {
        query.insert("limit".to_string(), self.limit.to_string());
        query.insert("offset".to_string(), self.offset.to_string());
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Only the server's page size is read; `offset`, `total` and `returned`
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationMeta {
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Vec<Record>>,
    #[serde(default)]
    pagination: Option<PaginationMeta>,
}

pub struct Paginator<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: Fetch + ?Sized> Paginator<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Fetch every page of `endpoint`, stopping at the first empty page.
    ///
    /// `pagination.total` is never consulted, so an empty page in the middle
    /// of a result set ends the fetch early, and a server that never sends an
    /// empty page is polled forever.
    pub async fn fetch_all(&self, endpoint: &str, query: &QueryParams) -> Result<Vec<Record>> {
        let mut query = query.clone();
        let mut cursor = PageCursor::new();
        let mut all_items = Vec::new();

        loop {
            cursor.apply(&mut query);
            let response = self.fetcher.get(endpoint, &query, true).await?;
            let envelope: Envelope = decode(endpoint, "envelope", response)?;

            let items = envelope.data.unwrap_or_default();
            if items.is_empty() {
                break;
            }

            let items_count = items.len();
            all_items.extend(items);

            let server_limit = envelope.pagination.and_then(|p| p.limit);
            cursor.advance(server_limit);
            tracing::debug!(
                "Received {} records from {}, next limit={} offset={}",
                items_count,
                endpoint,
                cursor.limit,
                cursor.offset
            );
        }

        Ok(all_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tracker::testing::ScriptedFetch;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ENDPOINT: &str = "https://example.test/projects/1/stories";

    fn page(ids: &[u64], limit: Option<u64>) -> serde_json::Value {
        let data: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
        match limit {
            Some(limit) => json!({ "data": data, "pagination": { "limit": limit, "total": 99 } }),
            None => json!({ "data": data }),
        }
    }

    fn ids(records: &[Record]) -> Vec<u64> {
        records.iter().filter_map(Record::id).collect()
    }

    #[test]
    fn cursor_starts_at_default_limit() {
        assert_eq!(PageCursor::new(), PageCursor { limit: 1000, offset: 0 });
    }

    #[test]
    fn cursor_uses_server_limit_before_stepping() {
        let mut cursor = PageCursor::new();
        cursor.advance(Some(500));
        assert_eq!(cursor, PageCursor { limit: 500, offset: 500 });
        cursor.advance(None);
        assert_eq!(cursor, PageCursor { limit: 500, offset: 1000 });
    }

    #[tokio::test]
    async fn concatenates_pages_until_empty() {
        let fetch = ScriptedFetch::new(vec![
            Ok(page(&[1, 2], Some(2))),
            Ok(page(&[3], Some(2))),
            Ok(page(&[], Some(2))),
        ]);

        let records = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(ids(&records), vec![1, 2, 3]);
        assert_eq!(fetch.call_count(), 3);
    }

    #[tokio::test]
    async fn offset_follows_server_limit() {
        let fetch = ScriptedFetch::new(vec![
            Ok(page(&[1, 2, 3], Some(3))),
            Ok(page(&[4, 5], Some(2))),
            Ok(page(&[6], None)),
            Ok(page(&[], None)),
        ]);

        Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap();

        let cursors: Vec<(String, String)> = fetch
            .calls()
            .iter()
            .map(|c| (c.query["limit"].clone(), c.query["offset"].clone()))
            .collect();
        assert_eq!(
            cursors,
            vec![
                ("1000".to_string(), "0".to_string()),
                ("3".to_string(), "3".to_string()),
                ("2".to_string(), "5".to_string()),
                ("2".to_string(), "7".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn every_page_is_enveloped_and_keeps_caller_params() {
        let fetch = ScriptedFetch::new(vec![Ok(page(&[1], Some(1000))), Ok(page(&[], None))]);
        let mut query = QueryParams::new();
        query.insert("filter".to_string(), "state:started".to_string());

        Paginator::new(&fetch).fetch_all(ENDPOINT, &query).await.unwrap();

        assert_eq!(query.len(), 1);
        for call in fetch.calls() {
            assert!(call.with_envelope);
            assert_eq!(call.endpoint, ENDPOINT);
            assert_eq!(call.query["filter"], "state:started");
        }
    }

    #[tokio::test]
    async fn empty_first_page_costs_one_call() {
        let fetch = ScriptedFetch::new(vec![Ok(json!({ "data": [], "pagination": { "limit": 1000 } }))]);

        let records = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(fetch.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_data_field_ends_the_fetch() {
        let fetch = ScriptedFetch::new(vec![Ok(json!({ "pagination": { "limit": 1000 } }))]);

        let records = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(fetch.call_count(), 1);
    }

    #[tokio::test]
    async fn ignores_unread_pagination_fields() {
        let fetch = ScriptedFetch::new(vec![
            Ok(json!({
                "data": [{ "id": 1 }],
                "pagination": { "limit": 1, "offset": "0", "total": "3", "returned": null }
            })),
            Ok(json!({ "data": [], "pagination": { "limit": 1, "total": "3" } })),
        ]);

        let records = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(ids(&records), vec![1]);
        let calls = fetch.calls();
        assert_eq!(calls[1].query["offset"], "1");
    }

    #[tokio::test]
    async fn transient_empty_page_truncates() {
        let fetch = ScriptedFetch::new(vec![
            Ok(page(&[1], Some(1))),
            Ok(page(&[], Some(1))),
            Ok(page(&[3], Some(1))),
        ]);

        let records = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(ids(&records), vec![1]);
        assert_eq!(fetch.call_count(), 2);
    }

    #[tokio::test]
    async fn error_mid_fetch_discards_partial_results() {
        let fetch = ScriptedFetch::new(vec![
            Ok(page(&[1, 2], Some(2))),
            Err(Error::api(ENDPOINT, Some(500), "500")),
            Ok(page(&[], None)),
        ]);

        let err = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(fetch.call_count(), 2);
    }

    #[tokio::test]
    async fn each_fetch_starts_a_fresh_cursor() {
        let fetch = ScriptedFetch::new(vec![
            Ok(page(&[1, 2], Some(2))),
            Ok(page(&[], Some(2))),
            Ok(page(&[7], Some(1))),
            Ok(page(&[], Some(1))),
        ]);
        let paginator = Paginator::new(&fetch);

        paginator.fetch_all(ENDPOINT, &QueryParams::new()).await.unwrap();
        paginator.fetch_all(ENDPOINT, &QueryParams::new()).await.unwrap();

        let calls = fetch.calls();
        let third = &calls[2];
        assert_eq!(third.query["limit"], "1000");
        assert_eq!(third.query["offset"], "0");
    }

    #[tokio::test]
    async fn non_array_data_is_an_api_error() {
        let fetch = ScriptedFetch::new(vec![Ok(json!({ "data": "nope" }))]);

        let err = Paginator::new(&fetch)
            .fetch_all(ENDPOINT, &QueryParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: None, .. }));
        assert!(err.to_string().contains(ENDPOINT));
        assert!(err.to_string().contains("malformed envelope"));
    }
}
