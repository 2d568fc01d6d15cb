use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub program: ProgramConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            program: ProgramConfig::from_env(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Fixed identities used by the referral program, injected rather than
/// read from process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    pub sender: SenderIdentity,
    /// Placeholder mailbox filed on ineligible candidates so outbound
    /// notices never target an unknown address.
    pub invalid_candidate_email: String,
}

impl ProgramConfig {
    pub fn from_env() -> Self {
        let address = env::var("REFERRAL_SENDER_ADDRESS")
            .unwrap_or_else(|_| "referrals@scout-program.com".to_string());
        let display_name = env::var("REFERRAL_SENDER_NAME")
            .unwrap_or_else(|_| "Driver Referral Program".to_string());
        let reply_to = env::var("REFERRAL_REPLY_TO").unwrap_or_else(|_| address.clone());
        let invalid_candidate_email = env::var("REFERRAL_INVALID_CANDIDATE_EMAIL")
            .unwrap_or_else(|_| "noreply-invalid@invalid-referrals.com".to_string());

        Self {
            sender: SenderIdentity {
                address,
                display_name,
                reply_to,
            },
            invalid_candidate_email,
        }
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            sender: SenderIdentity {
                address: "referrals@scout-program.com".to_string(),
                display_name: "Driver Referral Program".to_string(),
                reply_to: "referrals@scout-program.com".to_string(),
            },
            invalid_candidate_email: "noreply-invalid@invalid-referrals.com".to_string(),
        }
    }
}

/// Fixed from/display/reply-to identity applied to every outbound notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub address: String,
    pub display_name: String,
    pub reply_to: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
