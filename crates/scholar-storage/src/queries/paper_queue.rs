//! The paper work queue: upsert, lease, commit, recover, estimate, hydrate.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection};

use scholar_core::errors::StorageError;
use scholar_core::{PaperMetadata, ScholarResult};

use super::MAX_SQL_PARAMS;
use crate::to_storage_err;

/// Idempotent merge keyed by fqn. On conflict the payload, abstract
/// length, and sync time are overwritten and both indexing fields are
/// forcibly nulled, re-queuing the record even if it was already indexed.
/// Returns the affected-row count; no-op on empty input.
pub fn upsert_batch(conn: &Connection, papers: &[PaperMetadata]) -> ScholarResult<usize> {
    if papers.is_empty() {
        return Ok(0);
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("upsert_batch begin: {e}")))?;

    let now = Utc::now().to_rfc3339();
    let mut affected = 0usize;
    for paper in papers {
        let payload = serde_json::to_string(paper).map_err(|e| to_storage_err(e.to_string()))?;
        affected += tx
            .execute(
                "INSERT INTO paper_records
                    (fqn, paper_metadata, abstract_len, synced_at, indexed_at, indexing_reserved_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, NULL)
                 ON CONFLICT(fqn) DO UPDATE SET
                    paper_metadata = excluded.paper_metadata,
                    abstract_len = excluded.abstract_len,
                    synced_at = excluded.synced_at,
                    indexed_at = NULL,
                    indexing_reserved_at = NULL",
                params![paper.fqn(), payload, paper.abstract_len() as i64, now],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("upsert_batch commit: {e}")))?;
    Ok(affected)
}

/// Atomically claim up to `batch_size` eligible records, shortest
/// abstracts first, and return their payloads. The claim marks
/// `indexing_reserved_at` on exactly the selected rows inside one
/// transaction; callers running concurrently can never receive
/// overlapping rows because claims serialize on the write connection.
/// An empty result means the backlog is exhausted, not an error.
pub fn lease_batch(conn: &Connection, batch_size: usize) -> ScholarResult<Vec<PaperMetadata>> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("lease_batch begin: {e}")))?;

    let now = Utc::now().to_rfc3339();
    let payloads: Vec<String> = {
        let mut stmt = tx
            .prepare(
                "UPDATE paper_records SET indexing_reserved_at = ?1
                 WHERE fqn IN (
                     SELECT fqn FROM paper_records
                     WHERE indexed_at IS NULL AND indexing_reserved_at IS NULL
                     ORDER BY abstract_len ASC
                     LIMIT ?2
                 )
                 RETURNING paper_metadata",
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params![now, batch_size as i64], |row| row.get(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        rows.collect::<Result<_, _>>()
            .map_err(|e| to_storage_err(e.to_string()))?
    };

    tx.commit()
        .map_err(|e| to_storage_err(format!("lease_batch commit: {e}")))?;

    payloads.iter().map(|json| parse_payload(json)).collect()
}

/// Mark the given records indexed: set `indexed_at` and clear the
/// reservation. Returns the affected-row count.
pub fn mark_indexed(conn: &Connection, papers: &[PaperMetadata]) -> ScholarResult<usize> {
    if papers.is_empty() {
        return Ok(0);
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("mark_indexed begin: {e}")))?;

    let now = Utc::now().to_rfc3339();
    let mut affected = 0usize;
    let fqns: Vec<String> = papers.iter().map(PaperMetadata::fqn).collect();
    for chunk in fqns.chunks(MAX_SQL_PARAMS) {
        let placeholders = in_placeholders(2, chunk.len());
        let sql = format!(
            "UPDATE paper_records
             SET indexed_at = ?1, indexing_reserved_at = NULL
             WHERE fqn IN ({placeholders})"
        );
        affected += tx
            .execute(
                &sql,
                params_from_iter(std::iter::once(&now).chain(chunk.iter())),
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("mark_indexed commit: {e}")))?;
    Ok(affected)
}

/// Unconditionally release every reservation, whoever took it and however
/// old it is. This sweep is the only lease-recovery mechanism; it assumes
/// a single active indexer system-wide.
pub fn clear_all_reservations(conn: &Connection) -> ScholarResult<usize> {
    conn.execute(
        "UPDATE paper_records SET indexing_reserved_at = NULL
         WHERE indexing_reserved_at IS NOT NULL",
        [],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Count of currently-eligible rows. Progress reporting only; may race
/// with concurrent writers.
pub fn estimate_backlog(conn: &Connection) -> ScholarResult<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM paper_records
             WHERE indexed_at IS NULL AND indexing_reserved_at IS NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

/// Fetch records by fqn, preserving the input order and silently
/// dropping ids that are not present.
pub fn get_by_ids(conn: &Connection, fqns: &[String]) -> ScholarResult<Vec<PaperMetadata>> {
    if fqns.is_empty() {
        return Ok(Vec::new());
    }

    let mut found: HashMap<String, String> = HashMap::with_capacity(fqns.len());
    for chunk in fqns.chunks(MAX_SQL_PARAMS) {
        let placeholders = in_placeholders(1, chunk.len());
        let sql = format!("SELECT fqn, paper_metadata FROM paper_records WHERE fqn IN ({placeholders})");
        let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            let (fqn, payload) = row.map_err(|e| to_storage_err(e.to_string()))?;
            found.insert(fqn, payload);
        }
    }

    let mut papers = Vec::with_capacity(found.len());
    for fqn in fqns {
        if let Some(payload) = found.get(fqn) {
            papers.push(parse_payload(payload)?);
        }
    }
    Ok(papers)
}

/// `?start, ?start+1, ...` for an `IN` list.
fn in_placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stored payloads that no longer validate are fatal for the operation
/// touching them, never silently skipped.
fn parse_payload(json: &str) -> ScholarResult<PaperMetadata> {
    serde_json::from_str(json).map_err(|e| {
        StorageError::PayloadInvalid {
            fqn: serde_json::from_str::<serde_json::Value>(json)
                .ok()
                .and_then(|v| {
                    Some(format!(
                        "{}/{}",
                        v.get("source")?.as_str()?,
                        v.get("id")?.as_str()?
                    ))
                })
                .unwrap_or_else(|| "<unparsable>".to_string()),
            reason: e.to_string(),
        }
        .into()
    })
}
