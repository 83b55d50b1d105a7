use std::env;

use talentdesk_core::storage::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

const DEFAULT_PRESIGN_TTL_SECS: u64 = 900;

/// Application configuration loaded from environment variables.
///
/// Resolved once at startup and handed to the state factory.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table holding every entity (default: "talentdesk")
    pub table_name: String,
    /// Endpoint override for a local DynamoDB. When set, the table is created
    /// on startup if missing.
    pub aws_endpoint_url: Option<String>,
    /// Page size when a caller does not ask for one (default: 25)
    pub default_page_size: u32,
    /// Largest page a caller may request (default: 100)
    pub max_page_size: u32,
    /// Include collaborator and store failure details in error responses
    /// (default: false)
    pub expose_error_details: bool,
    /// Managed-services gateway. Mock collaborators are used when absent.
    pub gateway_url: Option<String>,
    pub gateway_api_key: String,
    /// Bucket for resume files. Needs the `s3` feature; the gateway or mock
    /// storage is used otherwise.
    pub resume_bucket: Option<String>,
    /// Lifetime of presigned resume URLs in seconds (default: 900)
    pub presign_ttl_secs: u64,
    /// Sender address for notifications (default: "jobs@talentdesk.local")
    pub mail_from: String,
    /// Public site URL used in emails (default: "http://localhost:3000")
    pub site_url: String,
    /// Emit JSON log lines instead of human-readable ones (default: false)
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLE_NAME` - DynamoDB table name (default: "talentdesk")
    /// - `AWS_ENDPOINT_URL` - DynamoDB endpoint override (optional)
    /// - `DEFAULT_PAGE_SIZE` - default page size (default: 25)
    /// - `MAX_PAGE_SIZE` - maximum page size (default: 100)
    /// - `EXPOSE_ERROR_DETAILS` - "true"/"1" to expose internal error details
    /// - `GATEWAY_URL` / `GATEWAY_API_KEY` - managed-services gateway (optional)
    /// - `RESUME_BUCKET` - S3 bucket for resume files (optional)
    /// - `PRESIGN_TTL_SECS` - presigned URL lifetime (default: 900)
    /// - `MAIL_FROM` - notification sender address
    /// - `SITE_URL` - public site URL
    /// - `LOG_FORMAT` - "json" for JSON logs
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            table_name: non_empty("TABLE_NAME").unwrap_or_else(|| "talentdesk".to_string()),
            aws_endpoint_url: non_empty("AWS_ENDPOINT_URL"),
            default_page_size: non_empty("DEFAULT_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: non_empty("MAX_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_PAGE_SIZE),
            expose_error_details: non_empty("EXPOSE_ERROR_DETAILS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            gateway_url: non_empty("GATEWAY_URL"),
            gateway_api_key: lookup("GATEWAY_API_KEY").unwrap_or_default(),
            resume_bucket: non_empty("RESUME_BUCKET"),
            presign_ttl_secs: non_empty("PRESIGN_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PRESIGN_TTL_SECS),
            mail_from: non_empty("MAIL_FROM")
                .unwrap_or_else(|| "jobs@talentdesk.local".to_string()),
            site_url: non_empty("SITE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            log_json: non_empty("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        }
    }

    /// Page bounds for the services. The default never exceeds the maximum.
    pub fn page_limits(&self) -> PageLimits {
        let max_size = self.max_page_size.max(1);
        PageLimits {
            default_size: self.default_page_size.clamp(1, max_size),
            max_size,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.table_name, "talentdesk");
        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 100);
        assert!(!config.expose_error_details);
        assert_eq!(config.gateway_url, None);
        assert_eq!(config.resume_bucket, None);
        assert_eq!(config.presign_ttl_secs, 900);
        assert!(!config.log_json);
    }

    #[test]
    fn test_values_from_environment() {
        let config = config(&[
            ("TABLE_NAME", "talentdesk-staging"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
            ("DEFAULT_PAGE_SIZE", "10"),
            ("EXPOSE_ERROR_DETAILS", "TRUE"),
            ("GATEWAY_URL", "https://gateway.internal"),
            ("GATEWAY_API_KEY", "secret"),
            ("RESUME_BUCKET", "talentdesk-resumes"),
            ("PRESIGN_TTL_SECS", "300"),
            ("LOG_FORMAT", "json"),
        ]);

        assert_eq!(config.table_name, "talentdesk-staging");
        assert_eq!(config.aws_endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.default_page_size, 10);
        assert!(config.expose_error_details);
        assert_eq!(config.gateway_url.as_deref(), Some("https://gateway.internal"));
        assert_eq!(config.gateway_api_key, "secret");
        assert_eq!(config.resume_bucket.as_deref(), Some("talentdesk-resumes"));
        assert_eq!(config.presign_ttl_secs, 300);
        assert!(config.log_json);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config(&[
            ("DEFAULT_PAGE_SIZE", "lots"),
            ("EXPOSE_ERROR_DETAILS", "maybe"),
            ("TABLE_NAME", "  "),
        ]);

        assert_eq!(config.default_page_size, 25);
        assert!(!config.expose_error_details);
        assert_eq!(config.table_name, "talentdesk");
    }

    #[test]
    fn test_page_limits_keep_default_within_max() {
        let config = config(&[("DEFAULT_PAGE_SIZE", "500"), ("MAX_PAGE_SIZE", "50")]);
        let limits = config.page_limits();

        assert_eq!(limits.max_size, 50);
        assert_eq!(limits.default_size, 50);
    }
}
