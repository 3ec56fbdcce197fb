// Configuration module entry point
// Loads layered configuration: defaults, config file, environment, command line

mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub use types::{Config, LoggingConfig, Overrides, PerformanceConfig, RoutesConfig, ServerConfig};

/// Config file looked up in the working directory when none is given explicitly
pub const DEFAULT_CONFIG_NAME: &str = "devserve";

/// Prefix for environment overrides, e.g. `DEVSERVE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "DEVSERVE";

impl Config {
    /// Build a configuration serving `root_dir` on `port`, everything else default
    pub fn new(port: u16, root_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.server.port = port;
        config.server.root_dir = Some(root_dir.into());
        config
    }

    /// Load configuration from the given file (or the optional default file),
    /// `DEVSERVE_*` environment variables and command line overrides, in that order
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option(
                "server.root_dir",
                overrides
                    .root_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, at runtime construction
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::Address(addr))
    }

    /// Directory served as the root of the file tree.
    ///
    /// Falls back to the directory holding the running executable, then to the
    /// working directory.
    pub fn root_dir(&self) -> PathBuf {
        if let Some(root) = &self.server.root_dir {
            return root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.root_dir.is_none());
        assert_eq!(config.routes.index_files, ["index.html", "index.htm"]);
        assert!(config.routes.directory_listing);
        assert_eq!(config.logging.access_log_format, "combined");
    }

    #[test]
    fn test_new_sets_port_and_root() {
        let config = Config::new(9001, "/srv/www");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.root_dir(), PathBuf::from("/srv/www"));
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:9001".parse().unwrap()
        );
    }

    #[test]
    fn test_default_root_is_executable_dir() {
        let exe = std::env::current_exe().unwrap();
        assert_eq!(Config::default().root_dir(), exe.parent().unwrap());
    }

    #[test]
    fn test_invalid_host() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(matches!(config.socket_addr(), Err(Error::Address(_))));
    }

    #[test]
    fn test_load_file_and_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100
root_dir = "/var/www"

[routes]
directory_listing = false
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.root_dir(), PathBuf::from("/var/www"));
        assert!(!config.routes.directory_listing);
        assert_eq!(config.server.host, "0.0.0.0");

        let overrides = Overrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(9200),
            root_dir: Some(PathBuf::from("/tmp/site")),
        };
        let config = Config::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.root_dir(), PathBuf::from("/tmp/site"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nworkers = 0").unwrap();

        let err = Config::load(Some(file.path()), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("server.workers"), "{err}");
    }

    #[test]
    fn test_explicit_workers_accepted() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nworkers = 2").unwrap();

        let config = Config::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(config.server.workers, Some(2));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = Config::load(
            Some(Path::new("/nonexistent/devserve.toml")),
            &Overrides::default(),
        );
        assert!(result.is_err());
    }
}
