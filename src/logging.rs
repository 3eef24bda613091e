use anyhow::{Result, anyhow, bail};
use std::env;
use std::fs::{self, File, OpenOptions};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const LOG_DIR_NAME: &str = "selfagent/logs";
pub(crate) const DEFAULT_FILTER: &str = "selfagent=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Server logs go to stderr; `RUST_LOG` overrides the default filter.
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// The terminal client owns the screen, so its logs go to a per-session file.
pub fn init_session_file() -> Result<PathBuf> {
    let log_dir = resolve_log_dir_from_env()?;
    let (file, path) = create_session_log(&log_dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok();

    Ok(path)
}

fn create_session_log(log_dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(log_dir).map_err(|err| {
        anyhow!(
            "Failed to create log directory {}: {err}",
            log_dir.display()
        )
    })?;

    let path = log_dir.join(format!("client-{}.log", session_id()));
    let file = create_log_file(&path)
        .map_err(|err| anyhow!("Failed to create log file {}: {err}", path.display()))?;
    Ok((file, path))
}

fn session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}

#[cfg(unix)]
fn create_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_log_file(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

pub fn resolve_log_dir_from_env() -> Result<PathBuf> {
    let xdg_state = env::var("XDG_STATE_HOME").ok();
    let home = dirs::home_dir();
    resolve_log_dir(xdg_state.as_deref(), home.as_deref())
}

fn resolve_log_dir(xdg_state_home: Option<&str>, home_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_state_home {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve log path: XDG_STATE_HOME is set but empty");
        }
        return Ok(PathBuf::from(trimmed).join(LOG_DIR_NAME));
    }

    let home =
        home_dir.ok_or_else(|| anyhow!("Failed to resolve log path: HOME directory is unavailable"))?;
    Ok(home.join(".local/state").join(LOG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::{create_session_log, resolve_log_dir, session_id};
    use std::fs;
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn resolve_log_dir_uses_xdg_state_when_set() {
        let dir = resolve_log_dir(Some("/tmp/state"), Some(Path::new("/home/fallback")))
            .expect("log path");
        assert_eq!(dir, Path::new("/tmp/state/selfagent/logs"));
    }

    #[test]
    fn resolve_log_dir_uses_home_fallback() {
        let dir = resolve_log_dir(None, Some(Path::new("/home/alice"))).expect("log path");
        assert_eq!(dir, Path::new("/home/alice/.local/state/selfagent/logs"));
    }

    #[test]
    fn resolve_log_dir_rejects_empty_xdg_state() {
        let err = resolve_log_dir(Some("   "), Some(Path::new("/home/alice")))
            .expect_err("empty xdg state should fail");
        assert!(
            err.to_string()
                .contains("Failed to resolve log path: XDG_STATE_HOME is set but empty")
        );
    }

    #[test]
    fn resolve_log_dir_fails_without_home_and_xdg_state() {
        let err = resolve_log_dir(None, None).expect_err("missing home should fail");
        assert!(err.to_string().contains("HOME directory is unavailable"));
    }

    #[test]
    fn session_id_is_two_hex_segments() {
        let id = session_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(
            parts
                .iter()
                .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_hexdigit()))
        );
    }

    #[test]
    fn session_log_is_created_inside_nested_dir() {
        let dir = tempdir().expect("tempdir");
        let log_dir = dir.path().join("state/selfagent/logs");
        let (_file, path) = create_session_log(&log_dir).expect("create log");

        assert!(path.starts_with(&log_dir));
        assert!(fs::metadata(&path).expect("metadata").is_file());
        let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
        assert!(name.starts_with("client-") && name.ends_with(".log"));
    }

    #[cfg(unix)]
    #[test]
    fn session_log_permissions_are_owner_only() {
        let dir = tempdir().expect("tempdir");
        let (_file, path) = create_session_log(dir.path()).expect("create log");
        let mode = fs::metadata(path).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
