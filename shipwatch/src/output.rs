//! Overlay output files
//!
//! Everything consumers read lives in one data directory:
//!
//! - `{provider}_current.json`: `{provider, updated_at, count, items}`
//! - `{provider}_overlay.txt`: one display line per item
//! - `combined_overlay.txt`: the lines of every provider, or `No data`
//!
//! Files are written to a temporary name and renamed into place, so a reader
//! polling the directory never sees a half-written file.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

pub const DEFAULT_STALE_MINUTES: u64 = 5;
pub const COMBINED_OVERLAY_FILE: &str = "combined_overlay.txt";
pub const NO_DATA: &str = "No data";

const CURRENT_SUFFIX: &str = "_current.json";

pub struct OverlayOutput {
    data_dir: PathBuf,
    stale_secs: i64,
    clock: Arc<dyn Clock>,
}

impl OverlayOutput {
    /// Create the data directory and blank out stale provider files
    pub fn new(data_dir: impl Into<PathBuf>, stale_minutes: u64) -> Result<Self> {
        Self::with_clock(data_dir, stale_minutes, Arc::new(SystemClock))
    }

    pub fn with_clock(
        data_dir: impl Into<PathBuf>,
        stale_minutes: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Cannot create data directory {}", data_dir.display()))?;

        let output = OverlayOutput {
            data_dir,
            stale_secs: (stale_minutes * 60) as i64,
            clock,
        };
        output.startup_cleanup()?;
        Ok(output)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn write_provider_data<S: Serialize>(
        &self,
        provider: &str,
        items: &[S],
        lines: &[String],
    ) -> Result<()> {
        let doc = json!({
            "provider": provider,
            "updated_at": self.timestamp(),
            "count": items.len(),
            "items": items,
        });
        let json_file = self.data_dir.join(format!("{}{}", provider, CURRENT_SUFFIX));
        self.write_json(&json_file, &doc)?;

        let text_file = self.data_dir.join(format!("{}_overlay.txt", provider));
        self.write_atomic(&text_file, &lines.join("\n"))?;

        log::debug!("Wrote {} items to {}", items.len(), json_file.display());
        Ok(())
    }

    /// Concatenate the lines of every provider, in the order given
    pub fn write_combined_overlay(&self, providers: &[(String, Vec<String>)]) -> Result<()> {
        let all: Vec<&str> = providers
            .iter()
            .flat_map(|(_, lines)| lines.iter().map(String::as_str))
            .collect();

        let text = if all.is_empty() {
            NO_DATA.to_string()
        } else {
            all.join("\n")
        };
        self.write_atomic(&self.data_dir.join(COMBINED_OVERLAY_FILE), &text)?;

        log::debug!("Wrote combined overlay with {} lines", all.len());
        Ok(())
    }

    fn startup_cleanup(&self) -> Result<()> {
        let entries = std::fs::read_dir(&self.data_dir)
            .with_context(|| format!("Cannot list {}", self.data_dir.display()))?;

        let now = self.clock.now();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_current = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(CURRENT_SUFFIX));
            if !is_current {
                continue;
            }

            let Some(doc) = std::fs::read_to_string(&path)
                .ok()
                .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
            else {
                log::warn!("Ignoring unreadable {}", path.display());
                continue;
            };

            let updated_at = doc["updated_at"]
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc));

            match updated_at {
                Some(t) if (now - t).num_seconds() <= self.stale_secs => {}
                Some(t) => {
                    log::info!(
                        "Clearing stale data from {} (age: {}s)",
                        path.display(),
                        (now - t).num_seconds()
                    );
                    self.write_empty(&path)?;
                }
                None => {
                    log::warn!("No valid updated_at in {}, clearing", path.display());
                    self.write_empty(&path)?;
                }
            }
        }
        Ok(())
    }

    fn write_empty(&self, path: &Path) -> Result<()> {
        let doc = json!({
            "updated_at": self.timestamp(),
            "count": 0,
            "items": [],
        });
        self.write_json(path, &doc)
    }

    fn write_json(&self, path: &Path, doc: &serde_json::Value) -> Result<()> {
        let text = serde_json::to_string_pretty(doc)?;
        self.write_atomic(path, &text)
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Cannot write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Cannot replace {}", path.display()))?;
        Ok(())
    }

    fn timestamp(&self) -> String {
        self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};
    use serde_json::Value;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn write_current(dir: &Path, name: &str, updated_at: &str) -> PathBuf {
        let path = dir.join(name);
        let doc = json!({"provider": "ships", "updated_at": updated_at, "count": 1, "items": [{"mmsi": 1}]});
        std::fs::write(&path, doc.to_string()).unwrap();
        path
    }

    #[test]
    fn test_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("nested").join("data");
        let output = OverlayOutput::new(&data, DEFAULT_STALE_MINUTES).unwrap();
        assert!(data.is_dir());
        assert_eq!(output.data_dir(), data.as_path());
    }

    #[test]
    fn test_write_provider_data() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let output = OverlayOutput::with_clock(dir.path(), 5, clock).unwrap();

        let items = vec![json!({"mmsi": 1, "name": "A"}), json!({"mmsi": 2, "name": "B"})];
        let lines = vec!["A (1) 3.0 kts, east".to_string(), "B (2) stationary".to_string()];
        output.write_provider_data("ships", &items, &lines).unwrap();

        let doc = read_json(&dir.path().join("ships_current.json"));
        assert_eq!(doc["provider"], "ships");
        assert_eq!(doc["updated_at"], "2026-05-01T12:00:00Z");
        assert_eq!(doc["count"], 2);
        assert_eq!(doc["items"][1]["name"], "B");

        let text = std::fs::read_to_string(dir.path().join("ships_overlay.txt")).unwrap();
        assert_eq!(text, "A (1) 3.0 kts, east\nB (2) stationary");
        assert!(!dir.path().join("ships_current.tmp").exists());
    }

    #[test]
    fn test_combined_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let output = OverlayOutput::new(dir.path(), 5).unwrap();

        output
            .write_combined_overlay(&[
                ("ships".to_string(), vec!["ONE".to_string(), "TWO".to_string()]),
                ("tides".to_string(), vec![]),
                ("harbour".to_string(), vec!["THREE".to_string()]),
            ])
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join(COMBINED_OVERLAY_FILE)).unwrap();
        assert_eq!(text, "ONE\nTWO\nTHREE");
    }

    #[test]
    fn test_combined_overlay_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let output = OverlayOutput::new(dir.path(), 5).unwrap();

        output
            .write_combined_overlay(&[("ships".to_string(), vec![])])
            .unwrap();
        let text = std::fs::read_to_string(dir.path().join(COMBINED_OVERLAY_FILE)).unwrap();
        assert_eq!(text, NO_DATA);
    }

    #[test]
    fn test_startup_clears_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let stale = write_current(dir.path(), "ships_current.json", "2026-05-01T11:50:00Z");
        let fresh = write_current(dir.path(), "aurora_current.json", "2026-05-01T11:58:00+00:00");
        let garbled = write_current(dir.path(), "tides_current.json", "yesterday");
        std::fs::write(dir.path().join("notes_current.json"), "not json").unwrap();

        let clock = Arc::new(ManualClock::new(start()));
        OverlayOutput::with_clock(dir.path(), 5, clock).unwrap();

        let doc = read_json(&stale);
        assert_eq!(doc["count"], 0);
        assert_eq!(doc["items"], json!([]));
        assert_eq!(doc["updated_at"], "2026-05-01T12:00:00Z");

        assert_eq!(read_json(&fresh)["count"], 1);
        assert_eq!(read_json(&garbled)["count"], 0);
        // Not JSON: left alone
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes_current.json")).unwrap(),
            "not json"
        );
    }

    #[test]
    fn test_stale_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let at = start() - Duration::minutes(5);
        let path = write_current(
            dir.path(),
            "ships_current.json",
            &at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );

        let clock = Arc::new(ManualClock::new(start()));
        OverlayOutput::with_clock(dir.path(), 5, clock).unwrap();
        assert_eq!(read_json(&path)["count"], 1);
    }
}
