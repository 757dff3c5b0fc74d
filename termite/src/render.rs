use crate::index::IndexReader;
use crate::DocId;
use anyhow::Result;
use serde::Serialize;

/// Fixed cap on rendered hits; `count` still reports the full match total.
pub const RESULT_LIMIT: usize = 50;

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: DocId,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub time_sec: f64,
    pub results: Vec<SearchHit>,
}

/// Resolves at most the first `RESULT_LIMIT` ids through the document
/// store, keeping ascending id order.
pub fn render_results(index: &IndexReader, ids: &[DocId], time_sec: f64) -> Result<SearchResponse> {
    let mut results = Vec::with_capacity(ids.len().min(RESULT_LIMIT));
    for &id in ids.iter().take(RESULT_LIMIT) {
        let (url, title) = index.doc(id)?;
        results.push(SearchHit { id, url, title });
    }
    Ok(SearchResponse { count: ids.len(), time_sec, results })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_stable_field_order() {
        let resp = SearchResponse {
            count: 2,
            time_sec: 0.5,
            results: vec![SearchHit {
                id: 7,
                url: "http://a".into(),
                title: "A \"quoted\" title".into(),
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.starts_with("{\"count\":2,\"time_sec\":0.5,\"results\":"));
        assert!(json.contains("\\\"quoted\\\""));
    }
}
