/// Configuration management for the claim publisher
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub sdk: SdkConfig,
    pub membership: MembershipConfig,
    pub thumbnail: ThumbnailConfig,
    pub search: SearchConfig,
    pub reflector: ReflectorConfig,
    pub logging: LoggingConfig,
}

/// SDK (publish / file_list) endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    pub url: String,
    pub timeout_secs: u64,
}

/// Membership backend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipConfig {
    pub api_url: String,
}

/// Thumbnail CDN upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    pub upload_url: String,
    /// Uploads at or above this size are rejected before any request
    pub size_limit_bytes: u64,
}

/// Search backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_url: String,
    /// Recommendation endpoint used for related-to searches
    pub api_alt_url: String,
    pub user_id: Option<String>,
}

/// Reflector polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectorConfig {
    pub poll_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sdk: SdkConfig {
                url: "http://localhost:5279".to_string(),
                timeout_secs: 30,
            },
            membership: MembershipConfig {
                api_url: "https://api.odysee.com/membership".to_string(),
            },
            thumbnail: ThumbnailConfig {
                upload_url: "https://thumbs.odycdn.com/upload".to_string(),
                size_limit_bytes: 2 * 1024 * 1024,
            },
            search: SearchConfig {
                api_url: "https://lighthouse.odysee.tv/search".to_string(),
                api_alt_url: "https://recsys.odysee.tv/search".to_string(),
                user_id: None,
            },
            reflector: ReflectorConfig {
                poll_interval_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> ClientResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let sdk_url = env::var("PUBLISHER_SDK_URL").unwrap_or(defaults.sdk.url);
        let timeout_secs = parse_var("PUBLISHER_HTTP_TIMEOUT_SECS", defaults.sdk.timeout_secs)?;

        let membership_api_url =
            env::var("PUBLISHER_MEMBERSHIP_API_URL").unwrap_or(defaults.membership.api_url);

        let upload_url =
            env::var("PUBLISHER_THUMBNAIL_UPLOAD_URL").unwrap_or(defaults.thumbnail.upload_url);
        let size_limit_bytes = parse_var(
            "PUBLISHER_THUMBNAIL_SIZE_LIMIT_BYTES",
            defaults.thumbnail.size_limit_bytes,
        )?;

        let search_api_url =
            env::var("PUBLISHER_SEARCH_API_URL").unwrap_or(defaults.search.api_url);
        let search_api_alt_url =
            env::var("PUBLISHER_SEARCH_API_ALT_URL").unwrap_or(defaults.search.api_alt_url);
        let search_user_id = env::var("PUBLISHER_SEARCH_USER_ID")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let poll_interval_secs = parse_var(
            "PUBLISHER_REFLECTOR_POLL_SECS",
            defaults.reflector.poll_interval_secs,
        )?;

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.logging.level);

        Ok(ClientConfig {
            sdk: SdkConfig {
                url: sdk_url,
                timeout_secs,
            },
            membership: MembershipConfig {
                api_url: membership_api_url,
            },
            thumbnail: ThumbnailConfig {
                upload_url,
                size_limit_bytes,
            },
            search: SearchConfig {
                api_url: search_api_url,
                api_alt_url: search_api_alt_url,
                user_id: search_user_id,
            },
            reflector: ReflectorConfig { poll_interval_secs },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ClientResult<()> {
        let urls = [
            ("SDK URL", &self.sdk.url),
            ("membership API URL", &self.membership.api_url),
            ("thumbnail upload URL", &self.thumbnail.upload_url),
            ("search API URL", &self.search.api_url),
            ("search alt API URL", &self.search.api_alt_url),
        ];
        for (label, url) in urls {
            if url.trim().is_empty() {
                return Err(ClientError::Config(format!("{} cannot be empty", label)));
            }
        }

        if self.reflector.poll_interval_secs == 0 {
            return Err(ClientError::Config(
                "Reflector poll interval must be at least 1 second".to_string(),
            ));
        }

        if self.thumbnail.size_limit_bytes == 0 {
            return Err(ClientError::Config(
                "Thumbnail size limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
