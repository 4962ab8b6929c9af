//! JSON export file source.
//!
//! Reads the array the record store's REST endpoint returns, saved to disk.

use super::{sort_by_generation, MemberSource, SourceError, SourceResult};
use crate::model::member::MemberRecord;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Record source backed by one JSON file holding an array of records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses records from a JSON string without touching the file system.
    pub fn parse(&self, content: &str) -> SourceResult<Vec<MemberRecord>> {
        let mut members: Vec<MemberRecord> =
            serde_json::from_str(content).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        sort_by_generation(&mut members);
        Ok(members)
    }
}

impl MemberSource for JsonFileSource {
    fn fetch_members(&self) -> SourceResult<Vec<MemberRecord>> {
        let started_at = Instant::now();
        let result = std::fs::read_to_string(&self.path)
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })
            .and_then(|content| self.parse(&content));

        match &result {
            Ok(members) => info!(
                "event=source_fetch module=source status=ok kind=json records={} duration_ms={}",
                members.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=source_fetch module=source status=error kind=json duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}
