use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the workspace home directory.
pub const HOME_ENV: &str = "FAQ_INTENT_HOME";

/// Default bind address for `serve`.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

const RAW_FILE: &str = "college_faq.csv";
const CLEAN_FILE: &str = "clean_data.csv";

/// Fixed file layout of a pipeline workspace.
///
/// Every stage reads and writes well-known paths under a single home
/// directory, so the scripts can be run independently in any order once
/// their inputs exist:
///
/// ```text
/// <home>/data/raw/college_faq.csv
/// <home>/data/processed/clean_data.csv
/// <home>/artifacts/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    home: PathBuf,
}

impl Workspace {
    pub fn new<P: AsRef<Path>>(home: P) -> Self {
        Self {
            home: home.as_ref().to_path_buf(),
        }
    }

    /// Resolves the workspace from an explicit path, falling back to
    /// [`Workspace::default_home`].
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::new(explicit.unwrap_or_else(Self::default_home))
    }

    /// Returns the default home directory
    pub fn default_home() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(HOME_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // 2. Platform-specific data directory
        if let Some(data_dir) = dirs::data_local_dir() {
            return data_dir.join("faq-intent");
        }

        // 3. Fallback to the user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("faq-intent");
        }

        // 4. Last resort
        env::temp_dir().join("faq-intent")
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn raw_path(&self) -> PathBuf {
        self.home.join("data").join("raw").join(RAW_FILE)
    }

    pub fn processed_path(&self) -> PathBuf {
        self.home.join("data").join("processed").join(CLEAN_FILE)
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.home.join("artifacts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let ws = Workspace::new("/srv/faq");
        assert_eq!(ws.raw_path(), PathBuf::from("/srv/faq/data/raw/college_faq.csv"));
        assert_eq!(
            ws.processed_path(),
            PathBuf::from("/srv/faq/data/processed/clean_data.csv")
        );
        assert_eq!(ws.artifacts_dir(), PathBuf::from("/srv/faq/artifacts"));
    }

    #[test]
    fn test_explicit_home_wins() {
        let ws = Workspace::resolve(Some(PathBuf::from("/tmp/explicit")));
        assert_eq!(ws.home(), Path::new("/tmp/explicit"));
    }

    #[test]
    fn test_default_home_is_named() {
        // Either the env override or one of the platform fallbacks.
        let home = Workspace::default_home();
        match env::var(HOME_ENV) {
            Ok(value) if !value.trim().is_empty() => assert_eq!(home, PathBuf::from(value)),
            _ => assert!(home.ends_with("faq-intent")),
        }
    }
}
