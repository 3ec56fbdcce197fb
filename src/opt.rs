use clap::{ArgAction, Parser};
use std::path::PathBuf;

use devserve::config::Overrides;

/// Serve a directory over HTTP with permissive CORS and no-cache headers
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./devserve.toml if present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Port to listen on [default: 8000]
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory to serve [default: the executable's directory]
    #[arg(short = 'r', long = "root")]
    pub root: Option<PathBuf>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(short = 'b', long = "bind")]
    pub bind: Option<String>,
}

impl Options {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.bind.clone(),
            port: self.port,
            root_dir: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Options::command().debug_assert();
    }

    #[test]
    fn overrides_from_args() {
        let opt = Options::parse_from(["devserve", "-p", "9000", "--root", "site", "-vv"]);
        assert_eq!(opt.verbose, 2);

        let overrides = opt.overrides();
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(overrides.root_dir, Some(PathBuf::from("site")));
        assert_eq!(overrides.host, None);
    }

    #[test]
    fn no_args_overrides_nothing() {
        let opt = Options::parse_from(["devserve"]);
        assert!(opt.config.is_none());
        assert_eq!(opt.overrides().port, None);
    }
}
