use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://selfagent.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const CONFIG_DIR_NAME: &str = "selfagent";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub database_url: String,
    pub bind: String,
    pub api_url: String,
    pub http_debug: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    openai_api_key: Option<String>,
    openai_model: Option<String>,
    openai_base_url: Option<String>,
    database_url: Option<String>,
    bind: Option<String>,
    api_url: Option<String>,
    http_debug: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Resolves settings from the environment, `.env`, the config file and defaults,
    /// in that order of precedence.
    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = match explicit_path {
            Some(path) => {
                if !path.is_file() {
                    bail!("Failed to load config {}: file not found", path.display());
                }
                path.to_path_buf()
            }
            None => discover_config_path()?,
        };
        let file_config = load_file_config(&config_path)?.unwrap_or_default();

        // Existing process variables always win over the .env file.
        dotenvy::dotenv().ok();

        let http_debug = match env_non_empty("SELFAGENT_HTTP_DEBUG") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                anyhow!("Invalid SELFAGENT_HTTP_DEBUG value '{value}': expected true/false/1/0")
            })?,
            None => file_config.http_debug.unwrap_or(false),
        };

        Ok(Self {
            openai_api_key: env_non_empty("OPENAI_API_KEY")
                .or_else(|| file_value(file_config.openai_api_key.as_deref())),
            openai_model: env_non_empty("OPENAI_MODEL")
                .or_else(|| file_value(file_config.openai_model.as_deref()))
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: env_non_empty("OPENAI_BASE_URL")
                .or_else(|| file_value(file_config.openai_base_url.as_deref()))
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            database_url: env_non_empty("DATABASE_URL")
                .or_else(|| file_value(file_config.database_url.as_deref()))
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind: env_non_empty("SELFAGENT_BIND")
                .or_else(|| file_value(file_config.bind.as_deref()))
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            api_url: env_non_empty("SELFAGENT_API_URL")
                .or_else(|| file_value(file_config.api_url.as_deref()))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            http_debug,
            config_path,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| file_value(Some(&value)))
}

fn file_value(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_API_URL, DEFAULT_BIND, DEFAULT_DATABASE_URL, DEFAULT_OPENAI_MODEL};
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::path::Path;

    fn reset_vars() {
        unsafe {
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("OPENAI_MODEL");
            env::remove_var("OPENAI_BASE_URL");
            env::remove_var("DATABASE_URL");
            env::remove_var("SELFAGENT_BIND");
            env::remove_var("SELFAGENT_API_URL");
            env::remove_var("SELFAGENT_HTTP_DEBUG");
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    fn with_cwd<T>(path: &Path, f: impl FnOnce() -> T) -> T {
        let cwd = env::current_dir().expect("current dir");
        env::set_current_dir(path).expect("set current dir");
        let result = f();
        env::set_current_dir(cwd).expect("restore current dir");
        result
    }

    fn write_default_config(root: &Path, content: &str) {
        let config_dir = root.join("selfagent");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(config_dir.join("config.toml"), content).expect("write config");
    }

    #[test]
    #[serial]
    fn load_uses_defaults_when_unset() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.openai_api_key, None);
        assert_eq!(cfg.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.bind, DEFAULT_BIND);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(!cfg.http_debug);
        assert_eq!(cfg.config_path, tmp.path().join("selfagent/config.toml"));
    }

    #[test]
    #[serial]
    fn load_env_overrides_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_default_config(
            tmp.path(),
            r#"
openai_api_key = "file_key"
openai_model = "file_model"
openai_base_url = "https://example.com/v1"
database_url = "sqlite://file.db"
"#,
        );

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("OPENAI_API_KEY", "os_key");
            env::set_var("DATABASE_URL", "sqlite://os.db");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.openai_api_key.as_deref(), Some("os_key"));
        assert_eq!(cfg.openai_model, "file_model");
        assert_eq!(cfg.openai_base_url, "https://example.com/v1");
        assert_eq!(cfg.database_url, "sqlite://os.db");
    }

    #[test]
    #[serial]
    fn load_does_not_override_existing_os_env_with_dotenv() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::write(
            tmp.path().join(".env"),
            "OPENAI_API_KEY=dotenv_key\nOPENAI_MODEL=dotenv_model\n",
        )
        .expect("write env file");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("OPENAI_API_KEY", "os_key");
            env::set_var("OPENAI_MODEL", "os_model");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.openai_api_key.as_deref(), Some("os_key"));
        assert_eq!(cfg.openai_model, "os_model");
    }

    #[test]
    #[serial]
    fn blank_values_fall_back_to_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_default_config(tmp.path(), "openai_model = \"   \"\n");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("OPENAI_API_KEY", "  ");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.openai_api_key, None);
        assert_eq!(cfg.openai_model, DEFAULT_OPENAI_MODEL);
    }

    #[test]
    #[serial]
    fn load_with_explicit_path_reads_that_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "bind = \"0.0.0.0:8080\"\nhttp_debug = true\n").expect("write config");

        reset_vars();
        let cfg = with_cwd(tmp.path(), || {
            AppConfig::load_with_path(Some(&path)).expect("load config")
        });
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert!(cfg.http_debug);
        assert_eq!(cfg.config_path, path);
    }

    #[test]
    #[serial]
    fn load_with_explicit_path_fails_when_missing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("missing.toml");

        reset_vars();
        let err = AppConfig::load_with_path(Some(&path)).expect_err("load should fail");
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    #[serial]
    fn load_fails_when_xdg_config_home_is_empty() {
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "   ");
        }

        let err = AppConfig::load().expect_err("load should fail");
        assert!(
            err.to_string()
                .contains("Failed to resolve config path: XDG_CONFIG_HOME is set but empty")
        );
    }

    #[test]
    #[serial]
    fn load_fails_on_unknown_root_key() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_default_config(tmp.path(), "mongo_uri = \"mongodb://localhost\"");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let err = with_cwd(tmp.path(), || AppConfig::load().expect_err("load should fail"));
        assert!(err.to_string().contains("Failed to load config"));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    #[serial]
    fn load_rejects_invalid_http_debug_env() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("SELFAGENT_HTTP_DEBUG", "loud");
        }

        let err = with_cwd(tmp.path(), || AppConfig::load().expect_err("load should fail"));
        assert!(err.to_string().contains("Invalid SELFAGENT_HTTP_DEBUG value 'loud'"));
        reset_vars();
    }
}
