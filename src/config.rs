use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub page_size: usize,
    /// `limit` sent when listing every submission. `None` omits the parameter.
    pub submission_limit: Option<u32>,
    pub api_timeout: Duration,
    pub utc_offset_hours: i32,
    pub secure_cookies: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_base_url = env_required("ASPIRASI_API_URL")?
            .trim_end_matches('/')
            .to_string();

        if api_base_url.is_empty() {
            return Err("ASPIRASI_API_URL must not be empty".to_string());
        }

        let host: IpAddr = env_or("ASPIRASI_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ASPIRASI_HOST: {e}"))?;

        let port: u16 = env_or("ASPIRASI_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ASPIRASI_PORT: {e}"))?;

        let page_size: usize = env_or("ASPIRASI_PAGE_SIZE", "10")
            .parse()
            .map_err(|e| format!("Invalid ASPIRASI_PAGE_SIZE: {e}"))?;
        if page_size == 0 {
            return Err("ASPIRASI_PAGE_SIZE must be at least 1".to_string());
        }

        let submission_limit = match env_or("ASPIRASI_SUBMISSION_LIMIT", "0")
            .parse::<u32>()
            .map_err(|e| format!("Invalid ASPIRASI_SUBMISSION_LIMIT: {e}"))?
        {
            0 => None,
            n => Some(n),
        };

        let api_timeout = env_or("ASPIRASI_API_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| format!("Invalid ASPIRASI_API_TIMEOUT_SECS: {e}"))?;

        let utc_offset_hours: i32 = env_or("ASPIRASI_UTC_OFFSET_HOURS", "7")
            .parse()
            .map_err(|e| format!("Invalid ASPIRASI_UTC_OFFSET_HOURS: {e}"))?;
        if !(-12..=14).contains(&utc_offset_hours) {
            return Err(format!(
                "ASPIRASI_UTC_OFFSET_HOURS out of range: {utc_offset_hours}"
            ));
        }

        let secure_cookies = !matches!(
            env_or("ASPIRASI_SECURE_COOKIES", "true").as_str(),
            "false" | "0" | "no"
        );

        let log_level = env_or("ASPIRASI_LOG_LEVEL", "info");

        Ok(Config {
            api_base_url,
            host,
            port,
            page_size,
            submission_limit,
            api_timeout,
            utc_offset_hours,
            secure_cookies,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
