//! Configuration loading and resolution.

use std::path::PathBuf;

use zundamon::PeoplePolicy;

/// Log file used when nothing else is configured.
pub const DEFAULT_LOG_FILE: &str = "zundamon_mcp.log";

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub people_policy: PeoplePolicy,
}

/// Resolve the diagnostic log file.
///
/// Order: disabled flag, explicit path, `ZUNDAMON_LOG_FILE`, then
/// [`DEFAULT_LOG_FILE`] in the working directory.
pub fn resolve_log_file(explicit: Option<&str>, disabled: bool) -> Option<PathBuf> {
    if disabled {
        return None;
    }

    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var("ZUNDAMON_LOG_FILE") {
        if !env_path.trim().is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    Some(PathBuf::from(DEFAULT_LOG_FILE))
}

/// Strict mode comes from `--strict` or `ZUNDAMON_STRICT=1|true`.
pub fn resolve_people_policy(strict: bool) -> PeoplePolicy {
    let from_env = std::env::var("ZUNDAMON_STRICT")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    if strict || from_env {
        PeoplePolicy::Reject
    } else {
        PeoplePolicy::Normalize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_wins() {
        assert_eq!(resolve_log_file(Some("x.log"), true), None);
    }

    #[test]
    fn test_explicit_path() {
        assert_eq!(
            resolve_log_file(Some("/tmp/z.log"), false),
            Some(PathBuf::from("/tmp/z.log"))
        );
    }

    #[test]
    fn test_strict_flag() {
        assert_eq!(resolve_people_policy(true), PeoplePolicy::Reject);
    }
}
