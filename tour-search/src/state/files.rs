//! JSON state files.
//!
//! Each file carries a [`Fingerprint`] of the inputs that produced it. The
//! memo files also record the start day of the epoch they were built for,
//! since deadlines and double-header candidates depend on it. A file whose
//! header does not match the current run is ignored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{EventId, Schedule, VenueTable};
use crate::planner::{DeadEndRecord, PathRecord, SearchConfig};

use super::error::StateError;

/// Everything a persisted table depends on besides the start day.
///
/// Cache records refer to events by master-list position and were derived
/// with the reachability rule, so the digest covers the venue matrices and
/// every schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub venue_count: usize,
    pub event_count: usize,
    /// Hex `blake3` digest of the venue table and schedule.
    pub inputs: String,
    pub config: SearchConfig,
}

impl Fingerprint {
    pub fn new(venues: &VenueTable, schedule: &Schedule, config: &SearchConfig) -> Self {
        Self {
            venue_count: venues.len(),
            event_count: schedule.len(),
            inputs: input_digest(venues, schedule),
            config: *config,
        }
    }
}

fn input_digest(venues: &VenueTable, schedule: &Schedule) -> String {
    let mut hasher = blake3::Hasher::new();
    for from in venues.venues() {
        hasher.update(venues.code(from).as_str().as_bytes());
        hasher.update(&venues.tz_offset(from).unwrap_or(i8::MIN).to_le_bytes());
        for to in venues.venues() {
            hasher.update(&venues.minutes_between(from, to).to_le_bytes());
            hasher.update(&[u8::from(venues.can_fly_between(from, to))]);
        }
    }
    for (_, event) in schedule.iter() {
        hasher.update(&(venues.bit_index(event.venue()) as u64).to_le_bytes());
        hasher.update(&event.start().and_utc().timestamp().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// The best itinerary found so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    /// Trip length in minutes.
    pub length: u32,
    /// Master-list positions of the stops, in order.
    pub events: Vec<EventId>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MemoFile<T> {
    fingerprint: Fingerprint,
    start_day: i32,
    entries: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BestFile {
    fingerprint: Fingerprint,
    best: BestRecord,
}

/// Where state files live.
#[derive(Debug, Clone)]
pub struct StateConfig {
    /// Directory holding the state files.
    pub dir: PathBuf,
    /// File name of the dead-end table.
    pub dead_ends: String,
    /// File name of the shortest-path table.
    pub shortest_paths: String,
    /// File name of the best itinerary.
    pub best: String,
}

impl StateConfig {
    /// State files with default names in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dead_ends: "noExtensions.json".to_string(),
            shortest_paths: "shortestPath.json".to_string(),
            best: "bestSolution.json".to_string(),
        }
    }

    pub fn dead_ends_path(&self) -> PathBuf {
        self.dir.join(&self.dead_ends)
    }

    pub fn shortest_paths_path(&self) -> PathBuf {
        self.dir.join(&self.shortest_paths)
    }

    pub fn best_path(&self) -> PathBuf {
        self.dir.join(&self.best)
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Reads and writes the state files for one set of inputs.
#[derive(Debug, Clone)]
pub struct StateFiles {
    config: StateConfig,
    fingerprint: Fingerprint,
}

impl StateFiles {
    pub fn new(config: StateConfig, fingerprint: Fingerprint) -> Self {
        Self {
            config,
            fingerprint,
        }
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Dead ends recorded for an epoch starting on `start_day`.
    ///
    /// Missing, unreadable or mismatched files yield an empty table.
    pub fn load_dead_ends(&self, start_day: i32) -> Vec<DeadEndRecord> {
        self.load_memo(&self.config.dead_ends_path(), "dead-end", start_day)
    }

    /// Shortest-path entries recorded for an epoch starting on `start_day`.
    pub fn load_paths(&self, start_day: i32) -> Vec<PathRecord> {
        self.load_memo(&self.config.shortest_paths_path(), "shortest-path", start_day)
    }

    /// The persisted best itinerary, if it was produced from the same inputs.
    pub fn load_best(&self) -> Option<BestRecord> {
        let path = self.config.best_path();
        let file: BestFile = read_json(&path, "best itinerary")?;
        if file.fingerprint != self.fingerprint {
            warn!(path = %path.display(), "best itinerary was produced from different inputs, ignoring");
            return None;
        }
        Some(file.best)
    }

    pub fn save_dead_ends(
        &self,
        start_day: i32,
        entries: Vec<DeadEndRecord>,
    ) -> Result<(), StateError> {
        let file = MemoFile {
            fingerprint: self.fingerprint.clone(),
            start_day,
            entries,
        };
        write_json(&self.config.dead_ends_path(), &file)?;
        debug!(entries = file.entries.len(), "wrote dead-end table");
        Ok(())
    }

    pub fn save_paths(&self, start_day: i32, entries: Vec<PathRecord>) -> Result<(), StateError> {
        let file = MemoFile {
            fingerprint: self.fingerprint.clone(),
            start_day,
            entries,
        };
        write_json(&self.config.shortest_paths_path(), &file)?;
        debug!(entries = file.entries.len(), "wrote shortest-path table");
        Ok(())
    }

    pub fn save_best(&self, best: &BestRecord) -> Result<(), StateError> {
        let file = BestFile {
            fingerprint: self.fingerprint.clone(),
            best: best.clone(),
        };
        write_json(&self.config.best_path(), &file)
    }

    fn load_memo<T: DeserializeOwned>(&self, path: &Path, what: &str, start_day: i32) -> Vec<T> {
        let Some(file) = read_json::<MemoFile<T>>(path, what) else {
            return Vec::new();
        };
        if file.fingerprint != self.fingerprint || file.start_day != start_day {
            warn!(
                path = %path.display(),
                recorded_start_day = file.start_day,
                start_day,
                "{what} table was built for different inputs, starting empty"
            );
            return Vec::new();
        }
        info!(entries = file.entries.len(), "loaded {what} table");
        file.entries
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Option<T> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no {what} file found");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read {what} file");
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse {what} file");
            None
        }
    }
}

/// Write `value` to a sibling temp file, then rename it into place.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| StateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string(value).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|source| StateError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
