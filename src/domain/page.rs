//! One page of listing results.

use serde_json::Value;

use super::bike::Bike;
use super::error::ApiError;

/// Number of bikes the backend returns per page.
pub const PAGE_SIZE: u64 = 12;

/// The result of a listing fetch: the bikes on the page and the total match count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BikePage {
    pub items: Vec<Bike>,
    pub total_count: u64,
}

impl BikePage {
    /// Interprets a listing response body.
    ///
    /// The backend answers either with a paginated envelope
    /// `{"results": [...], "count": n}` or with a bare array, in which case
    /// the array length is the total. A missing `count` in the envelope also
    /// falls back to the number of results.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is neither shape or a bike
    /// entry cannot be read.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        let (results, count) = match body {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => {
                let count = map.get("count").and_then(Value::as_u64);
                match map.remove("results") {
                    Some(Value::Array(items)) => (items, count),
                    _ => {
                        return Err(ApiError::Decode(
                            "listing response has no 'results' array".to_string(),
                        ))
                    }
                }
            }
            other => {
                return Err(ApiError::Decode(format!(
                    "unexpected listing response: {other}"
                )))
            }
        };

        let items = results
            .into_iter()
            .map(serde_json::from_value::<Bike>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::Decode(format!("invalid bike entry: {e}")))?;

        let total_count = count.unwrap_or(items.len() as u64);
        Ok(Self { items, total_count })
    }

    /// Number of pages needed for `total_count` bikes. Zero when there are none.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(PAGE_SIZE);
        if pages > u32::MAX as u64 {
            u32::MAX
        } else {
            pages as u32
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_paginated_envelope() {
        let page = BikePage::from_json(json!({
            "results": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}],
            "count": 30
        }))
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 30);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn accepts_bare_array() {
        let page = BikePage::from_json(json!([{"id": 1}, {"id": 2}, {"id": 3}])).unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn empty_listing_has_zero_pages() {
        let page = BikePage::from_json(json!({"results": [], "count": 0})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(BikePage::from_json(json!({"detail": "x"})), Err(ApiError::Decode(_))));
        assert!(matches!(BikePage::from_json(json!("nope")), Err(ApiError::Decode(_))));
    }
}
