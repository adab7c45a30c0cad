use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "HospitalRecords";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "HOSPITAL_DB_PATH";

const DB_FILE_NAME: &str = "hospital.db";

/// Get the application data directory
/// ~/HospitalRecords/ on all platforms, or the working directory when no
/// home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => PathBuf::from(".").join(APP_NAME),
    }
}

/// Database file: `$HOSPITAL_DB_PATH` if set and non-empty, else
/// `~/HospitalRecords/hospital.db`.
pub fn database_path() -> PathBuf {
    database_path_from(std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
}

fn database_path_from(override_path: Option<PathBuf>) -> PathBuf {
    override_path
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| app_data_dir().join(DB_FILE_NAME))
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "hospital_records=debug,warn"
    } else {
        "hospital_records=info,warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_named_after_app() {
        let dir = app_data_dir();
        assert!(dir.ends_with("HospitalRecords"));
    }

    #[test]
    fn database_under_app_data_by_default() {
        let path = database_path_from(None);
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("hospital.db"));
    }

    #[test]
    fn override_path_wins() {
        let path = database_path_from(Some(PathBuf::from("/tmp/records.db")));
        assert_eq!(path, PathBuf::from("/tmp/records.db"));
    }

    #[test]
    fn empty_override_ignored() {
        let path = database_path_from(Some(PathBuf::new()));
        assert!(path.ends_with("hospital.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
