//! Where the client keeps its cookie jar and logs

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "roster";
const APPLICATION: &str = "roster";

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept besides `latest.log`.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Persistent application data (`~/.local/share/roster` on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Regenerable data, logs included (`~/.cache/roster` on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// The stored session cookie.
pub fn token_file() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("cookies.json"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archives `latest.log` under a timestamp and prunes old archives.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_in(&cache, &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
}

fn rotate_in(dir: &Path, stamp: &str) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join(format!("{}.log", stamp)));
    }

    let Ok(entries) = fs::read_dir(dir) else { return };
    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();
    if logs.len() <= MAX_OLD_LOGS {
        return;
    }

    logs.sort_by_key(|e| (e.metadata().and_then(|m| m.modified()).ok(), e.file_name()));
    for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_archives_and_prunes() {
        let dir = std::env::temp_dir().join(format!("roster-logs-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..MAX_OLD_LOGS + 3 {
            fs::write(dir.join(format!("2024010{:02}.log", i)), "old").unwrap();
        }
        fs::write(dir.join(LATEST_LOG), "current").unwrap();

        rotate_in(&dir, "99999999_000000");

        assert!(!dir.join(LATEST_LOG).exists());
        let remaining = fs::read_dir(&dir).unwrap().count();
        assert_eq!(remaining, MAX_OLD_LOGS);
        fs::remove_dir_all(&dir).unwrap();
    }
}
