use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_UPLOAD_DIR: &str = "upload";
pub const DEFAULT_LOG_FILE: &str = "logs/face-compare.log";
pub const DEFAULT_COMPARATOR_SCRIPT: &str = "compare_faces.py";
pub const DEFAULT_ENV_NAME: &str = "face-compare";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Anchor for every relative path below. Unset means the executable's directory.
    pub base_dir: Option<String>,
    pub upload_dir: String,
    /// Directory searched for a colocated comparator script.
    pub script_dir: String,
    pub log_file: String,
    pub comparator_script: String,
    pub script_interpreter: String,
    /// Environment runner. Empty runs the comparator directly.
    pub env_runner: String,
    pub env_runner_args: Vec<String>,
    pub env_name: String,
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
            script_dir: ".".to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            comparator_script: DEFAULT_COMPARATOR_SCRIPT.to_string(),
            script_interpreter: "python".to_string(),
            env_runner: "conda".to_string(),
            env_runner_args: vec![
                "run".to_string(),
                "--no-capture-output".to_string(),
                "-n".to_string(),
            ],
            env_name: DEFAULT_ENV_NAME.to_string(),
            timeout_secs: None,
        }
    }
}

impl AppConfig {
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(executable_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.resolve(&self.upload_dir)
    }

    pub fn script_dir(&self) -> PathBuf {
        self.resolve(&self.script_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Comparator command line without the image flags.
    ///
    /// A script present in `script_dir` is run through the interpreter, otherwise
    /// the bare script name is left for the runner to resolve from `PATH`.
    pub fn comparator_command(&self) -> Vec<String> {
        let local_script = self.script_dir().join(&self.comparator_script);
        if local_script.is_file() {
            vec![
                self.script_interpreter.clone(),
                local_script.to_string_lossy().into_owned(),
            ]
        } else {
            vec![self.comparator_script.clone()]
        }
    }
}

fn executable_dir() -> Option<PathBuf> {
    env::current_exe().ok()?.parent().map(Path::to_path_buf)
}

/// Layers, later wins: `Config.toml` next to the executable, `Config.toml` in the
/// working directory, `FACE_COMPARE_*` environment variables. All optional.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let mut builder = Config::builder();
    if let Some(dir) = executable_dir() {
        builder = builder.add_source(ConfigFile::from(dir.join("Config.toml")).required(false));
    }
    let config = builder
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("FACE_COMPARE").try_parsing(true))
        .build()?;
    Ok(config.try_deserialize::<AppConfig>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_target_conda_environment() {
        let config = AppConfig::default();
        assert_eq!(config.env_runner, "conda");
        assert_eq!(config.env_runner_args, vec!["run", "--no-capture-output", "-n"]);
        assert_eq!(config.env_name, "face-compare");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_relative_paths_anchor_to_base_dir() {
        let config = AppConfig {
            base_dir: Some("/opt/face-compare".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.upload_dir(), PathBuf::from("/opt/face-compare/upload"));
        assert_eq!(config.script_dir(), PathBuf::from("/opt/face-compare/."));
        assert_eq!(
            config.log_file(),
            PathBuf::from("/opt/face-compare/logs/face-compare.log")
        );

        let absolute = AppConfig {
            upload_dir: "/srv/faces".to_string(),
            ..config
        };
        assert_eq!(absolute.upload_dir(), PathBuf::from("/srv/faces"));
    }

    #[test]
    fn test_default_base_dir_is_executable_dir() {
        let expected = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(AppConfig::default().base_dir(), expected);
        assert_eq!(AppConfig::default().upload_dir(), expected.join("upload"));
    }

    #[test]
    fn test_local_script_found_relative_to_base_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("compare_faces.py"), "print('ok')").unwrap();
        let config = AppConfig {
            base_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..AppConfig::default()
        };
        let command = config.comparator_command();
        assert_eq!(command[0], "python");
        assert_eq!(PathBuf::from(&command[1]), dir.path().join(".").join("compare_faces.py"));
    }

    #[test]
    fn test_comparator_command_falls_back_to_bare_name() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            script_dir: dir.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        assert_eq!(config.comparator_command(), vec!["compare_faces.py".to_string()]);
    }

    #[test]
    fn test_comparator_command_prefers_local_script() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("compare_faces.py");
        fs::write(&script, "print('ok')").unwrap();

        let config = AppConfig {
            script_dir: dir.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.comparator_command(),
            vec!["python".to_string(), script.to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed = Config::builder()
            .add_source(config::File::from_str(
                "upload_dir = \"/srv/faces\"\ntimeout_secs = 30",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();
        assert_eq!(parsed.upload_dir, "/srv/faces");
        assert_eq!(parsed.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(parsed.env_name, DEFAULT_ENV_NAME);
    }
}
