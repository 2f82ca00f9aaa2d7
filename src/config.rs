use std::net::IpAddr;
use std::time::Duration;

use crate::submission::limits::Limits;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:7890";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_body_size: usize,
    pub feishu: FeishuConfig,
    pub proxy_url: Option<String>,
    pub timeouts: Timeouts,
    pub limits: Limits,
    pub enforce_limits: bool,
}

/// Credentials and identifiers of the Bitable the submissions land in.
#[derive(Debug, Clone)]
pub struct FeishuConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_secret: String,
    /// Bitable app token. Also the parent node for attachment uploads.
    pub app_token: String,
    pub table_id: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub token: Duration,
    pub upload: Duration,
    pub record: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            token: Duration::from_secs(20),
            upload: Duration::from_secs(60),
            record: Duration::from_secs(20),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("IDEADROP_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid IDEADROP_HOST: {e}"))?;

        let port: u16 = env_or("IDEADROP_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid IDEADROP_PORT: {e}"))?;

        let log_level = env_or("IDEADROP_LOG_LEVEL", "info");

        let max_body_size: usize = env_or("IDEADROP_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid IDEADROP_MAX_BODY_SIZE: {e}"))?;

        let feishu = FeishuConfig {
            base_url: env_or("IDEADROP_FEISHU_BASE_URL", "https://open.feishu.cn/open-apis")
                .trim_end_matches('/')
                .to_string(),
            app_id: env_required("IDEADROP_FEISHU_APP_ID")?,
            app_secret: env_required("IDEADROP_FEISHU_APP_SECRET")?,
            app_token: env_required("IDEADROP_FEISHU_APP_TOKEN")?,
            table_id: env_required("IDEADROP_FEISHU_TABLE_ID")?,
        };

        let proxy_url = parse_proxy(std::env::var("HTTP_PROXY").ok());

        let timeouts = Timeouts {
            token: env_secs("IDEADROP_TOKEN_TIMEOUT_SECS", 20)?,
            upload: env_secs("IDEADROP_UPLOAD_TIMEOUT_SECS", 60)?,
            record: env_secs("IDEADROP_RECORD_TIMEOUT_SECS", 20)?,
        };

        let enforce_limits = match env_or("IDEADROP_ENFORCE_LIMITS", "true").as_str() {
            "false" | "0" | "no" | "off" => false,
            _ => true,
        };

        Ok(Config {
            host,
            port,
            log_level,
            max_body_size,
            feishu,
            proxy_url,
            timeouts,
            limits: Limits::default(),
            enforce_limits,
        })
    }
}

/// Unset falls back to the local proxy; `none`, `off` or an empty value
/// disables proxying altogether.
pub fn parse_proxy(raw: Option<String>) -> Option<String> {
    match raw {
        None => Some(DEFAULT_PROXY_URL.to_string()),
        Some(value) => {
            let value = value.trim();
            if value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("off") {
                None
            } else {
                Some(value.to_string())
            }
        }
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_secs(key: &str, default: u64) -> Result<Duration, String> {
    let secs: u64 = env_or(key, &default.to_string())
        .parse()
        .map_err(|e| format!("Invalid {key}: {e}"))?;
    if secs == 0 {
        return Err(format!("Invalid {key}: must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
