use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    constants::DURATION_LIMITS,
    timer::{FocusTimer, HistoryEntry},
};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid session data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid history data: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Serialize)]
struct SessionRecord<'a> {
    #[serde(rename = "timeLeft")]
    time_left: u64,
    task: &'a str,
    duration: u64,
    notes: &'a str,
}

#[derive(Deserialize)]
struct RawSessionRecord {
    #[serde(rename = "timeLeft", default)]
    time_left: Option<LooseNumber>,
    #[serde(default)]
    task: String,
    #[serde(default)]
    duration: Option<LooseNumber>,
    #[serde(default)]
    notes: String,
}

// older snapshots stored duration as a string
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(value) => Some(*value),
            LooseNumber::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub time_left: u64,
    pub duration_minutes: u64,
    pub task: String,
    pub notes: String,
}

pub fn save_session(path: &Path, timer: &FocusTimer) -> Result<(), StorageError> {
    let record = SessionRecord {
        time_left: timer.remaining_seconds,
        task: timer.task_label.as_str(),
        duration: timer.configured_minutes,
        notes: timer.notes.as_str(),
    };
    write_json_atomic(path, &record)
}

pub fn load_session(path: &Path) -> Option<SavedSession> {
    if !path.exists() {
        return None;
    }

    let loaded = read_json::<RawSessionRecord>(path)
        .ok()
        .and_then(validate_session);
    if loaded.is_none() {
        let _ = delete_file_if_exists(path);
    }
    loaded
}

fn validate_session(raw: RawSessionRecord) -> Option<SavedSession> {
    let time_left = raw.time_left.as_ref().and_then(LooseNumber::as_f64)?;
    if !time_left.is_finite() || time_left <= 1.0 {
        return None;
    }

    let duration_minutes = match &raw.duration {
        Some(value) => {
            let minutes = value.as_f64()?;
            if !minutes.is_finite()
                || minutes < DURATION_LIMITS.min_minutes as f64
                || minutes > DURATION_LIMITS.max_minutes as f64
            {
                return None;
            }
            minutes as u64
        }
        None => DURATION_LIMITS.default_minutes,
    };

    Some(SavedSession {
        time_left: time_left as u64,
        duration_minutes,
        task: raw.task,
        notes: raw.notes,
    })
}

pub fn append_history(path: &Path, entry: &HistoryEntry) -> Result<(), StorageError> {
    let file_existed = path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::io(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!file_existed)
        .from_writer(file);
    writer.serialize(entry)?;
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

pub fn load_history(path: &Path) -> Result<Vec<HistoryEntry>, StorageError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();
    for row in reader.deserialize() {
        match row {
            Ok(entry) => entries.push(entry),
            Err(e) => eprintln!("Warning: Skipping malformed history row: {}", e),
        }
    }
    Ok(entries)
}

pub fn get_data_dir() -> PathBuf {
    let local_history = Path::new("./history.csv");
    if local_history.exists() {
        return PathBuf::from(".");
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "lumen", "lumen") {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        data_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_state_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "lumen", "lumen") {
        if let Some(state_dir) = proj_dirs.state_dir() {
            let dir = state_dir.to_path_buf();
            fs::create_dir_all(&dir).ok();
            return dir;
        }
    }
    PathBuf::from(".")
}

pub fn get_session_path() -> PathBuf {
    get_state_dir().join("session.json")
}

pub fn get_history_path() -> PathBuf {
    get_data_dir().join("history.csv")
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, &json)
}

pub fn delete_file_if_exists(path: &Path) -> Result<(), StorageError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| StorageError::io(path, e))?;
    }
    Ok(())
}

pub fn atomic_write(path: &Path, content: &str) -> Result<(), StorageError> {
    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
    tmp_file
        .write_all(content.as_bytes())
        .map_err(|e| StorageError::io(&tmp_path, e))?;
    tmp_file
        .sync_all()
        .map_err(|e| StorageError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf, time::SystemTime};

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::timer::{SessionKind, SessionOutcome};

    fn unique_path(prefix: &str, extension: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        PathBuf::from(format!("/tmp/{}_{}.{}", prefix, now, extension))
    }

    #[test]
    fn test_session_round_trip() {
        let path = unique_path("lumen_session_roundtrip", "json");
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);
        timer.task_label = "write draft".to_string();
        timer.notes = "chapter two".to_string();

        save_session(&path, &timer).unwrap();
        let loaded = load_session(&path).expect("session should load");
        assert_eq!(loaded.time_left, 1500);
        assert_eq!(loaded.duration_minutes, 25);
        assert_eq!(loaded.task, "write draft");
        assert_eq!(loaded.notes, "chapter two");

        timer.start();
        for _ in 0..3 {
            timer.tick();
        }
        save_session(&path, &timer).unwrap();
        let loaded = load_session(&path).expect("session should load");
        assert_eq!(loaded.time_left, 1497);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_accepts_partial_record() {
        let path = unique_path("lumen_session_partial", "json");
        fs::write(&path, r#"{"timeLeft": 45, "duration": 10, "task": "x"}"#).unwrap();

        let loaded = load_session(&path).expect("session should load");
        assert_eq!(loaded.time_left, 45);
        assert_eq!(loaded.duration_minutes, 10);
        assert_eq!(loaded.task, "x");
        assert_eq!(loaded.notes, "");

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_finished_session_and_clears_file() {
        let path = unique_path("lumen_session_finished", "json");
        fs::write(&path, r#"{"timeLeft": 0, "duration": 10}"#).unwrap();

        assert!(load_session(&path).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_rejects_one_second_remainder() {
        let path = unique_path("lumen_session_stale", "json");
        fs::write(&path, r#"{"timeLeft": 1, "duration": 10}"#).unwrap();

        assert!(load_session(&path).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_defaults_missing_duration() {
        let path = unique_path("lumen_session_no_duration", "json");
        fs::write(&path, r#"{"timeLeft": 300}"#).unwrap();

        let loaded = load_session(&path).expect("session should load");
        assert_eq!(loaded.time_left, 300);
        assert_eq!(loaded.duration_minutes, 25);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_accepts_string_duration() {
        let path = unique_path("lumen_session_string_duration", "json");
        fs::write(&path, r#"{"timeLeft": 620, "duration": "45"}"#).unwrap();

        let loaded = load_session(&path).expect("session should load");
        assert_eq!(loaded.time_left, 620);
        assert_eq!(loaded.duration_minutes, 45);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_out_of_range_duration() {
        let path = unique_path("lumen_session_bad_duration", "json");
        fs::write(&path, r#"{"timeLeft": 300, "duration": 500}"#).unwrap();

        assert!(load_session(&path).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let path = unique_path("lumen_session_malformed", "json");
        fs::write(&path, "{not json").unwrap();

        assert!(load_session(&path).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let path = unique_path("lumen_session_missing", "json");
        assert!(load_session(&path).is_none());
    }

    #[test]
    fn test_history_appends_across_calls() {
        let path = unique_path("lumen_history_append", "csv");
        let first = HistoryEntry {
            date: "2026-03-10".to_string(),
            end_time: "09:30:00".to_string(),
            kind: SessionKind::Focus,
            task: "draft".to_string(),
            planned_minutes: 25,
            elapsed_seconds: 1500,
            outcome: SessionOutcome::Completed,
        };
        let second = HistoryEntry {
            date: "2026-03-10".to_string(),
            end_time: "10:05:00".to_string(),
            kind: SessionKind::Break,
            task: "draft".to_string(),
            planned_minutes: 5,
            elapsed_seconds: 120,
            outcome: SessionOutcome::Abandoned,
        };

        append_history(&path, &first).unwrap();
        append_history(&path, &second).unwrap();

        let entries = load_history(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], first);
        assert_eq!(entries[1], second);

        fs::remove_file(path).ok();
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestJsonValue {
        name: String,
        count: usize,
    }

    #[test]
    fn test_json_helper_round_trip() {
        let path = unique_path("lumen_json_roundtrip", "json");
        let value = TestJsonValue {
            name: "sample".to_string(),
            count: 3,
        };

        write_json_atomic(&path, &value).unwrap();
        let loaded: TestJsonValue = read_json(&path).unwrap();
        assert_eq!(loaded, value);

        delete_file_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
