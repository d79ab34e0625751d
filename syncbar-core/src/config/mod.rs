use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod frequency;

pub use frequency::{Frequency, InvalidFrequency};

pub const CONFIG_TEMPLATE: &str = r#"# syncbar configuration

# program used to copy files; receives the additional arguments, an
# --exclude-from reference, the source and the destination, in that order
executable-path = "rsync"

# how often to sync automatically: a number followed by s, m, h or d,
# or "manual" to only sync on request
frequency = "manual"

# local directory to copy from
source = ""

# local directory, or a remote spec such as "host:/path"
destination = ""

additional-arguments = ["--archive", "--delete"]
"#;

fn default_executable_path() -> PathBuf {
    PathBuf::from("rsync")
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(
        default = "default_executable_path",
        alias = "executablePath",
        alias = "executable_path"
    )]
    pub executable_path: PathBuf,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(
        default,
        alias = "additionalArguments",
        alias = "additional_arguments"
    )]
    pub additional_arguments: Vec<String>,

    /// path of the configuration file, if the configuration was loaded from a file
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            executable_path: default_executable_path(),
            frequency: Frequency::default(),
            source: String::new(),
            destination: String::new(),
            additional_arguments: Vec::new(),
            loaded_from: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("invalid configuration string")]
    InvalidConfigString(String, #[source] eyre::Report),
    #[error("invalid configuration file {}", .0.display())]
    InvalidConfigFile(PathBuf, #[source] eyre::Report),
    #[error("i/o error reading configuration file {}", .0.display())]
    IoError(PathBuf, #[source] std::io::Error),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationInvalid {
    #[error("no source configured")]
    EmptySource,
    #[error("no destination configured")]
    EmptyDestination,
    #[error("no executable path configured")]
    EmptyExecutablePath,
}

impl Config {
    pub fn parse(s: &str) -> Result<Config, ConfigLoadError> {
        toml::from_str(s).map_err(|e| ConfigLoadError::InvalidConfigString(s.to_owned(), e.into()))
    }

    pub async fn parse_file(p: &Path) -> Result<Config, ConfigLoadError> {
        let config_string = tokio::fs::read_to_string(p)
            .await
            .map_err(|e| ConfigLoadError::IoError(p.to_owned(), e))?;
        let mut config: Config = toml::from_str(&config_string)
            .map_err(|e| ConfigLoadError::InvalidConfigFile(p.to_owned(), e.into()))?;
        config.loaded_from = Some(p.to_owned());
        Ok(config)
    }

    /// Checks the minimum needed to attempt a run. Says nothing about whether
    /// the executable can actually be launched.
    pub fn validate(&self) -> Result<(), ConfigurationInvalid> {
        if self.source.trim().is_empty() {
            Err(ConfigurationInvalid::EmptySource)
        } else if self.destination.trim().is_empty() {
            Err(ConfigurationInvalid::EmptyDestination)
        } else if self.executable_path.as_os_str().is_empty() {
            Err(ConfigurationInvalid::EmptyExecutablePath)
        } else {
            Ok(())
        }
    }
}
