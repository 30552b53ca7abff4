//! Command line and environment configuration for the server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

/// The web server for Expense Tracker.
///
/// Every option can also be set with the environment variable named in its
/// help text.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The SQLite database file, or `:memory:` for a throwaway database.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// The interface to listen on.
    #[arg(long, env = "ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub address: IpAddr,

    /// The canonical timezone used to work out the current date, e.g. "Asia/Kolkata".
    #[arg(long, env = "TIMEZONE", default_value = "Etc/UTC")]
    pub timezone: String,

    /// The file that debug logs are appended to.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    pub log_path: String,
}

impl Config {
    /// The address the server binds to.
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

#[cfg(test)]
mod config_tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use clap::Parser;

    use crate::Config;

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "server",
            "--database-url",
            "expenses.db",
            "--port",
            "8080",
            "--address",
            "0.0.0.0",
            "--timezone",
            "Asia/Kolkata",
            "--log-path",
            "server.log",
        ])
        .expect("Could not parse config");

        assert_eq!(config.database_url, "expenses.db");
        assert_eq!(config.timezone, "Asia/Kolkata");
        assert_eq!(config.log_path, "server.log");
        assert_eq!(
            config.socket_address(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
        );
    }

    #[test]
    fn database_url_is_required() {
        // Only meaningful when the variable is not set in the test environment.
        if std::env::var_os("DATABASE_URL").is_some() {
            return;
        }

        assert!(Config::try_parse_from(["server"]).is_err());
    }

    #[test]
    fn defaults_to_localhost_3000() {
        let config = Config::try_parse_from(["server", "--database-url", ":memory:"])
            .expect("Could not parse config");

        if std::env::var_os("PORT").is_none() && std::env::var_os("ADDRESS").is_none() {
            assert_eq!(
                config.socket_address(),
                SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000)
            );
        }
    }
}
