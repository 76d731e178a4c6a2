use core::fmt;
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(20);
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl(String),
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl(url) => {
                write!(f, "invalid URL '{}': must be http(s)://host[:port][/path]", url)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// base URL of the GitHub REST API, without a trailing slash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubBaseUrl(String);

impl GithubBaseUrl {
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let pattern = r"^https?://[A-Za-z0-9.-]+(:\d+)?(/\S*)?$";
        let re = regex::Regex::new(pattern)
            .map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;

        let trimmed = base_url.trim();
        if re.is_match(trimmed) {
            Ok(GithubBaseUrl(trimmed.trim_end_matches('/').to_string()))
        } else {
            Err(ConfigError::InvalidBaseUrl(base_url.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// join a path below the base, the path is used verbatim
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for GithubBaseUrl {
    fn default() -> Self {
        GithubBaseUrl(DEFAULT_GITHUB_API.to_string())
    }
}

impl fmt::Display for GithubBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// everything the server needs to start
#[derive(Debug)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub www_dir: PathBuf,
    pub file_root: PathBuf,
    pub github_api: GithubBaseUrl,
    pub strict_path_containment: bool,
    pub proxy_timeout: Duration,
    pub client_timeout: Duration,
    github_token: Option<SecretString>,
}

impl ServerConfig {
    /// built-in defaults, ignoring the environment
    pub fn builtin() -> Self {
        ServerConfig {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            www_dir: PathBuf::from("www"),
            file_root: PathBuf::from("."),
            github_api: GithubBaseUrl::default(),
            strict_path_containment: false,
            proxy_timeout: PROXY_TIMEOUT,
            client_timeout: CLIENT_TIMEOUT,
            github_token: None,
        }
    }

    pub fn github_token(&self) -> Option<&SecretString> {
        self.github_token.as_ref()
    }

    pub fn has_github_token(&self) -> bool {
        self.github_token
            .as_ref()
            .map(|t| !t.expose_secret().is_empty())
            .unwrap_or(false)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// read an env var and parse it, warning and falling back on garbage
fn env_or<T>(key: &'static str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    match env::var(key) {
        Ok(val) => match parse(&val) {
            Some(parsed) => parsed,
            None => {
                let err = ConfigError::InvalidValue { key, value: val };
                log::warn!("{}. using default.", err);
                default
            }
        },
        Err(_) => default,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let builtin = ServerConfig::builtin();

        let github_api = match env::var("FUNHTTP_GITHUB_API") {
            Ok(val) => match GithubBaseUrl::parse(&val) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("invalid FUNHTTP_GITHUB_API: {}. using default.", e);
                    GithubBaseUrl::default()
                }
            },
            Err(_) => GithubBaseUrl::default(),
        };

        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        ServerConfig {
            bind: env_or("FUNHTTP_BIND", builtin.bind, |v| v.parse().ok()),
            port: env_or("FUNHTTP_PORT", builtin.port, |v| v.parse().ok()),
            www_dir: env_or("FUNHTTP_WWW", builtin.www_dir, |v| Some(PathBuf::from(v))),
            file_root: env_or("FUNHTTP_FILE_ROOT", builtin.file_root, |v| {
                Some(PathBuf::from(v))
            }),
            github_api,
            strict_path_containment: env_or(
                "FUNHTTP_STRICT_PATHS",
                builtin.strict_path_containment,
                parse_flag,
            ),
            proxy_timeout: builtin.proxy_timeout,
            client_timeout: builtin.client_timeout,
            github_token,
        }
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bind: {}:{} www: {} file_root: {} github_api: {} strict_paths: {} token: {}",
            self.bind,
            self.port,
            self.www_dir.display(),
            self.file_root.display(),
            self.github_api,
            self.strict_path_containment,
            if self.has_github_token() { "set" } else { "none" }
        )
    }
}
