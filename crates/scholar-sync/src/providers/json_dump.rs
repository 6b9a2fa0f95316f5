//! JSONL dump provider: one paper per line, progress measured in bytes.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use scholar_core::errors::SyncError;
use scholar_core::{PaperMetadata, PaperVersion, ScholarResult};

use super::{FetchProgress, MetadataFetchResult};

/// Version creation timestamps in the dump, e.g. "Mon, 2 Apr 2007 19:18:42 GMT".
const VERSION_CREATED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub struct JsonDumpProvider {
    path: PathBuf,
}

#[derive(Deserialize)]
struct RawVersion {
    version: String,
    created: String,
}

#[derive(Deserialize)]
struct RawDumpRow {
    id: String,
    title: String,
    #[serde(rename = "abstract")]
    abstract_text: String,
    authors: String,
    /// Whitespace-separated category list.
    categories: String,
    #[serde(default)]
    doi: Option<String>,
    update_date: NaiveDate,
    #[serde(default)]
    license: Option<String>,
    #[serde(rename = "journal-ref", default)]
    journal_ref: Option<String>,
    versions: Vec<RawVersion>,
}

impl JsonDumpProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn provides_source(&self) -> &'static str {
        "arxiv"
    }

    pub fn fetch_metadata(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> ScholarResult<MetadataFetchResult> {
        let total_progress = std::fs::metadata(&self.path)
            .map_err(|e| feed_io(&self.path, &e))?
            .len();
        let file = File::open(&self.path).map_err(|e| feed_io(&self.path, &e))?;

        Ok(MetadataFetchResult {
            total_progress,
            stream: Box::new(DumpRows {
                source: self.provides_source(),
                reader: BufReader::new(file),
                bytes_read: 0,
                since,
                line: String::new(),
            }),
        })
    }
}

fn feed_io(path: &Path, e: &std::io::Error) -> scholar_core::ScholarError {
    SyncError::FeedIo {
        path: path.display().to_string(),
        message: e.to_string(),
    }
    .into()
}

struct DumpRows {
    source: &'static str,
    reader: BufReader<File>,
    bytes_read: u64,
    since: Option<DateTime<Utc>>,
    line: String,
}

impl DumpRows {
    fn map_row(&self, row: RawDumpRow) -> ScholarResult<(PaperMetadata, DateTime<Utc>)> {
        let versions = row
            .versions
            .into_iter()
            .map(|v| {
                let created = NaiveDateTime::parse_from_str(&v.created, VERSION_CREATED_FORMAT)
                    .map_err(|e| SyncError::MalformedRow {
                        reason: format!("version timestamp {:?}: {e}", v.created),
                    })?
                    .and_utc();
                Ok(PaperVersion {
                    version: v.version,
                    created,
                })
            })
            .collect::<ScholarResult<Vec<_>>>()?;

        // The dump carries a calendar date; compare and store it at
        // midnight UTC.
        let updated_at = row.update_date.and_time(NaiveTime::MIN).and_utc();
        let categories: BTreeSet<String> =
            row.categories.split_whitespace().map(String::from).collect();

        Ok((
            PaperMetadata {
                source: self.source.to_string(),
                id: row.id,
                authors: row.authors,
                title: row.title,
                doi: row.doi,
                license: row.license,
                abstract_text: row.abstract_text,
                categories,
                journal_ref: row.journal_ref,
                updated_at,
                versions,
            },
            updated_at,
        ))
    }
}

impl Iterator for DumpRows {
    type Item = ScholarResult<FetchProgress>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line.clear();
        let n = match self.reader.read_line(&mut self.line) {
            Ok(0) => return None,
            Ok(n) => n,
            Err(e) => {
                return Some(Err(SyncError::FeedIo {
                    path: "<dump stream>".to_string(),
                    message: e.to_string(),
                }
                .into()))
            }
        };
        self.bytes_read += n as u64;

        let row: RawDumpRow = match serde_json::from_str(self.line.trim_end()) {
            Ok(row) => row,
            Err(e) => {
                return Some(Err(SyncError::MalformedRow {
                    reason: e.to_string(),
                }
                .into()))
            }
        };

        let (metadata, updated_at) = match self.map_row(row) {
            Ok(mapped) => mapped,
            Err(e) => return Some(Err(e)),
        };

        // Rows at or before the cursor still report progress so the
        // caller's totals stay honest.
        let metadata = match self.since {
            Some(since) if updated_at < since => None,
            _ => Some(metadata),
        };

        Some(Ok(FetchProgress {
            metadata,
            progress: self.bytes_read,
        }))
    }
}
