//! The range-scan planner: translates a query descriptor into a single
//! forward-cursor scan over the engine's byte-ordered keyspace.

use bytes::Bytes;
use common::engine::Cursor;

use crate::error::{Error, Result};
use crate::key::{Key, KeyType};
use crate::query::{Entry, Query};

/// Returns true if the key is present and its type differs from `key_type`.
fn key_type_mismatch(key: Option<&Key>, key_type: KeyType) -> bool {
    key.is_some_and(|k| k.key_type() != key_type)
}

/// Runs `query` against a cursor positioned over one bucket.
///
/// The scan starts at the first key greater than or equal to
/// `max(prefix, range.start)` and walks forward, stopping at the first key
/// outside the prefix or at `range.end` (exclusive). A key byte-equal to
/// the prefix is skipped; only strict descendants of the prefix are
/// returned. Entries come back in ascending key order.
///
/// Any of the descriptor's keys whose type differs from `key_type` fails
/// the whole query with [`Error::KeyTypeMismatch`] before the cursor is
/// touched.
pub(crate) async fn scan_with_cursor(
    cursor: &mut (dyn Cursor + Send),
    query: &Query,
    key_type: KeyType,
) -> Result<Vec<Entry>> {
    if key_type_mismatch(query.prefix.as_ref(), key_type)
        || key_type_mismatch(query.range.start.as_ref(), key_type)
        || key_type_mismatch(query.range.end.as_ref(), key_type)
    {
        return Err(Error::KeyTypeMismatch);
    }

    // A zero-length prefix filters nothing.
    let prefix = query
        .prefix
        .as_ref()
        .map(Key::bytes)
        .filter(|p| !p.is_empty());

    // Cursor starts at max(prefix, range.start); empty means the first key.
    let mut cursor_start = prefix.clone().unwrap_or_else(Bytes::new);
    if let Some(start) = &query.range.start {
        let start = start.bytes();
        if cursor_start < start {
            cursor_start = start;
        }
    }
    let end = query.range.end.as_ref().map(Key::bytes);

    let mut entries = Vec::new();
    let mut record = cursor.seek(&cursor_start).await?;
    while let Some(r) = record {
        if let Some(prefix) = &prefix {
            // Ascending order guarantees no further key can match.
            if !r.key.starts_with(prefix) {
                break;
            }
            // Strictly equal to the prefix is not allowed.
            if r.key == *prefix {
                record = cursor.next().await?;
                continue;
            }
        }
        if let Some(end) = &end {
            if *end <= r.key {
                break;
            }
        }
        entries.push(Entry::from_parts(&r.key, &r.value, query.keys_only));
        record = cursor.next().await?;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use common::engine::{Engine, Scope};
    use common::InMemoryEngine;

    use super::*;
    use crate::query::KeyRange;

    const BUCKET: &[u8] = b"datastore";

    async fn scope_with(pairs: &[(&str, &str)]) -> Box<dyn Scope> {
        let engine = InMemoryEngine::new();
        let mut scope = engine.begin_scope(true).await.unwrap();
        for (k, v) in pairs {
            scope
                .put(BUCKET, Bytes::from(k.to_string()), Bytes::from(v.to_string()))
                .await
                .unwrap();
        }
        scope
    }

    async fn scan(scope: &dyn Scope, query: &Query) -> Result<Vec<Entry>> {
        let mut cursor = scope.cursor(BUCKET).await.unwrap();
        scan_with_cursor(cursor.as_mut(), query, KeyType::Bytes).await
    }

    fn keys(entries: &[Entry]) -> Vec<&[u8]> {
        entries.iter().map(|e| e.key.as_slice()).collect()
    }

    #[tokio::test]
    async fn should_return_all_entries_in_ascending_order_without_constraints() {
        // given
        let scope = scope_with(&[("c", "3"), ("a", "1"), ("b", "2")]).await;

        // when
        let entries = scan(scope.as_ref(), &Query::default()).await.unwrap();

        // then
        assert_eq!(
            keys(&entries),
            vec![b"a".as_slice(), b"b".as_slice(), b"c".as_slice()]
        );
        assert_eq!(entries[0].value, Some(Bytes::from("1")));
    }

    #[tokio::test]
    async fn should_exclude_key_equal_to_prefix() {
        // given
        let scope = scope_with(&[("keks", "v1"), ("keks2", "v2")]).await;
        let query = Query {
            prefix: Some(Key::from_bytes("keks")),
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then - the key equal to the prefix itself is not returned
        assert_eq!(keys(&entries), vec![b"keks2".as_slice()]);
    }

    #[tokio::test]
    async fn should_include_all_strict_descendants_of_prefix() {
        // given
        let scope = scope_with(&[("keks", "v1"), ("keks2", "v2")]).await;
        let query = Query {
            prefix: Some(Key::from_bytes("kek")),
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then
        assert_eq!(keys(&entries), vec![b"keks".as_slice(), b"keks2".as_slice()]);
    }

    #[tokio::test]
    async fn should_stop_at_first_key_outside_prefix() {
        // given
        let scope = scope_with(&[("a", "1"), ("kek1", "2"), ("kek2", "3"), ("z", "4")]).await;
        let query = Query {
            prefix: Some(Key::from_bytes("kek")),
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then
        assert_eq!(keys(&entries), vec![b"kek1".as_slice(), b"kek2".as_slice()]);
    }

    #[tokio::test]
    async fn should_treat_empty_prefix_as_no_filter() {
        // given - includes a zero-length key
        let scope = scope_with(&[("", "empty"), ("a", "1")]).await;
        let query = Query {
            prefix: Some(Key::from_bytes(Bytes::new())),
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then - nothing is filtered, nothing is excluded
        assert_eq!(keys(&entries), vec![b"".as_slice(), b"a".as_slice()]);
    }

    #[tokio::test]
    async fn should_scan_inclusive_start_exclusive_end() {
        // given
        let scope = scope_with(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]).await;
        let query = Query {
            range: KeyRange {
                start: Some(Key::from_bytes("b")),
                end: Some(Key::from_bytes("d")),
            },
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then
        assert_eq!(keys(&entries), vec![b"b".as_slice(), b"c".as_slice()]);
    }

    #[tokio::test]
    async fn should_return_empty_when_start_is_beyond_all_keys() {
        // given
        let scope = scope_with(&[("a", "1"), ("b", "2")]).await;
        let query = Query {
            range: KeyRange {
                start: Some(Key::from_bytes("x")),
                end: None,
            },
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn should_return_empty_when_end_is_not_after_start() {
        // given
        let scope = scope_with(&[("a", "1"), ("b", "2"), ("c", "3")]).await;
        let query = Query {
            range: KeyRange {
                start: Some(Key::from_bytes("c")),
                end: Some(Key::from_bytes("a")),
            },
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then - empty result, not an error
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn should_start_at_range_start_when_it_exceeds_prefix() {
        // given
        let scope = scope_with(&[
            ("user:a", "1"),
            ("user:m", "2"),
            ("user:z", "3"),
            ("vvv", "4"),
        ])
        .await;
        let query = Query {
            prefix: Some(Key::from_bytes("user:")),
            range: KeyRange {
                start: Some(Key::from_bytes("user:m")),
                end: None,
            },
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then
        assert_eq!(
            keys(&entries),
            vec![b"user:m".as_slice(), b"user:z".as_slice()]
        );
    }

    #[tokio::test]
    async fn should_start_at_prefix_when_range_start_is_smaller() {
        // given
        let scope = scope_with(&[("aaa", "0"), ("user:a", "1"), ("user:b", "2")]).await;
        let query = Query {
            prefix: Some(Key::from_bytes("user:")),
            range: KeyRange {
                start: Some(Key::from_bytes("a")),
                end: None,
            },
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then - the prefix wins the max(prefix, start) rule
        assert_eq!(
            keys(&entries),
            vec![b"user:a".as_slice(), b"user:b".as_slice()]
        );
    }

    #[tokio::test]
    async fn should_combine_prefix_exclusion_with_range_end() {
        // given
        let scope = scope_with(&[("kek", "0"), ("kek1", "1"), ("kek2", "2"), ("kek3", "3")]).await;
        let query = Query {
            prefix: Some(Key::from_bytes("kek")),
            range: KeyRange {
                start: None,
                end: Some(Key::from_bytes("kek3")),
            },
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then - "kek" is skipped by exclusion, "kek3" by the exclusive end
        assert_eq!(keys(&entries), vec![b"kek1".as_slice(), b"kek2".as_slice()]);
    }

    #[tokio::test]
    async fn should_omit_values_for_keys_only_queries() {
        // given
        let scope = scope_with(&[("a", "value")]).await;
        let query = Query {
            keys_only: true,
            ..Query::default()
        };

        // when
        let entries = scan(scope.as_ref(), &query).await.unwrap();

        // then - no value, but the size is still populated
        assert_eq!(entries.len(), 1);
        assert!(entries[0].value.is_none());
        assert_eq!(entries[0].size, 5);
    }

    #[tokio::test]
    async fn should_return_empty_for_empty_bucket() {
        // given
        let scope = scope_with(&[]).await;

        // when
        let entries = scan(scope.as_ref(), &Query::default()).await.unwrap();

        // then
        assert!(entries.is_empty());
    }
}
