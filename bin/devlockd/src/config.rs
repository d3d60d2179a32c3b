use std::path::PathBuf;

use devlock_devices::token::DEFAULT_TOKEN_TTL_SECS;

pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Credential signing secret. Required; the server refuses to start
    /// without it.
    pub jwt_secret: String,

    /// Listening port.
    pub port: u16,

    /// Optional redb database path. When unset, all state lives in
    /// memory and is lost on restart.
    pub db_path: Option<PathBuf>,

    /// Enrollment credential lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl ServerConfig {
    /// Load configuration from the environment:
    ///
    /// - `JWT_SECRET` — signing secret, required
    /// - `PORT` — listening port, default 5000
    /// - `TOKEN_TTL_SECS` — credential lifetime, default 30 days
    ///
    /// CLI flags override the environment where given.
    pub fn from_env(port_override: Option<u16>, db_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();

        let port = match port_override {
            Some(p) => p,
            None => match std::env::var("PORT") {
                Ok(v) => v
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid PORT value: {}", v))?,
                Err(_) => DEFAULT_PORT,
            },
        };

        let token_ttl_secs = match std::env::var("TOKEN_TTL_SECS") {
            Ok(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid TOKEN_TTL_SECS value: {}", v))?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        let config = Self {
            jwt_secret,
            port,
            db_path,
            token_ttl_secs,
        };
        config.verify()?;
        Ok(config)
    }

    /// Verify the configuration is ready for use.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET is not set; refusing to start without a signing secret");
        }
        Ok(())
    }
}
