//! Newline-delimited JSON track replay.
//!
//! Each non-blank line is a `LocationSample`
//! (`{"latitude": .., "longitude": .., "timestamp": ..}`). Lines that fail
//! to parse are skipped with a warning.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use georemind_domain::{GeoRemindError, LocationSample, Result};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

use super::source::PositionSource;
use crate::errors::InfraError;

/// Longest sleep between two paced samples.
const MAX_PACING_GAP: Duration = Duration::from_secs(300);

pub struct TrackFileSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
    paced: bool,
    last_timestamp: Option<DateTime<Utc>>,
}

impl TrackFileSource {
    /// Open a track file.
    ///
    /// With `paced`, replay sleeps between samples according to their
    /// timestamps (gaps capped at five minutes).
    ///
    /// # Errors
    /// `GeoRemindError::Config` when the file does not exist, `Internal` for
    /// other I/O failures.
    pub async fn open(path: impl AsRef<Path>, paced: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await.map_err(|err| {
            let mapped: GeoRemindError = InfraError::from(err).into();
            match mapped {
                GeoRemindError::Config(msg) => {
                    GeoRemindError::Config(format!("{msg} ({})", path.display()))
                }
                other => other,
            }
        })?;
        debug!(path = %path.display(), paced, "Opened track file");
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_number: 0,
            paced,
            last_timestamp: None,
        })
    }

    async fn pace(&mut self, timestamp: DateTime<Utc>) {
        if let Some(previous) = self.last_timestamp.replace(timestamp) {
            if !self.paced {
                return;
            }
            let gap = (timestamp - previous).to_std().unwrap_or(Duration::ZERO).min(MAX_PACING_GAP);
            if !gap.is_zero() {
                tokio::time::sleep(gap).await;
            }
        }
    }
}

#[async_trait]
impl PositionSource for TrackFileSource {
    async fn next_position(&mut self) -> Option<LocationSample> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!(path = %self.path.display(), lines = self.line_number, "Track replay finished");
                    return None;
                }
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "Track file read failed");
                    return None;
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<LocationSample>(&line) {
                Ok(sample) => {
                    self.pace(sample.timestamp).await;
                    return Some(sample);
                }
                Err(err) => {
                    warn!(line = self.line_number, error = %err, "Skipping malformed track sample");
                }
            }
        }
    }
}
