use crate::error::ConfigurationError;
use crate::util;
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

fn default_teachers_file() -> PathBuf {
    PathBuf::from(env::var("TEACHERS_FILE").unwrap_or("./teachers.json".to_string()))
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(env::var("STATIC_DIR").unwrap_or("./static".to_string()))
}

fn default_security_dir() -> PathBuf {
    PathBuf::from(env::var("SECURITY_DIR").unwrap_or("./security".to_string()))
}

fn default_activities_file() -> Option<PathBuf> {
    env::var("ACTIVITIES_FILE").ok().map(PathBuf::from)
}

fn default_session_ttl_hours() -> i64 {
    24 * 7
}

fn true_bool() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    file_path: PathBuf,

    #[serde(default = "default_teachers_file")]
    pub teachers_file: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_security_dir")]
    pub security_dir: PathBuf,
    /// YAML roster replacing the built-in Mergington activities.
    #[serde(default = "default_activities_file")]
    pub activities_file: Option<PathBuf>,

    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,

    #[serde(default = "true_bool")]
    pub enforce_capacity: bool,
    /// Treat any non-empty session cookie as the caller's username.
    #[serde(default)]
    pub accept_unsigned_sessions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file_path: config_dir().join("settings.yml"),
            teachers_file: default_teachers_file(),
            static_dir: default_static_dir(),
            security_dir: default_security_dir(),
            activities_file: default_activities_file(),
            session_ttl_hours: default_session_ttl_hours(),
            secure_cookies: false,
            enforce_capacity: true,
            accept_unsigned_sessions: false,
        }
    }
}

#[inline]
fn config_dir() -> PathBuf {
    PathBuf::from(env::var("CONFIG_DIR").unwrap_or("./config".to_string()))
}

impl Config {
    pub fn load() -> Result<Config, ConfigurationError> {
        let config_file = util::find_first_subpath(
            config_dir(),
            &["settings.yml", "settings.yaml"],
            Path::exists,
        )
        .ok_or_else(|| ConfigurationError::NotFound(config_dir()))?;

        Self::load_from(config_file)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, ConfigurationError> {
        let file = File::open(path.as_ref())?;
        let mut config: Config = serde_yaml::from_reader(BufReader::new(file))?;
        config.file_path = path.as_ref().to_path_buf();

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigurationError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.file_path)?;
        let mut out = BufWriter::new(file);
        serde_yaml::to_writer(&mut out, self)?;
        out.flush()?;
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.max(1))
    }
}
