use anyhow::Context;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";
const DEFAULT_COOKIE_DAYS: i64 = 365;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings read from the environment, with `.env` as a fallback.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Where links point; the pairing page lives at `{public_url}/pairing`.
    pub public_url: Url,
    /// How long a device keeps the pairing cookie.
    pub cookie_days: i64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let public_url = var_or("PUBLIC_URL", DEFAULT_PUBLIC_URL);
        let public_url = Url::parse(&public_url).with_context(|| format!("PUBLIC_URL {public_url:?} is not a URL"))?;

        let cookie_days = match dotenv::var("COOKIE_DAYS") {
            Ok(days) => days
                .parse()
                .with_context(|| format!("COOKIE_DAYS {days:?} is not a whole number"))?,
            Err(_) => DEFAULT_COOKIE_DAYS,
        };

        Ok(Self {
            bind_addr: var_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            public_url,
            cookie_days,
            log_level: var_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| default.to_owned())
}
