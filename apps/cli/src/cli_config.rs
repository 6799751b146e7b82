use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use suppressor_core::{ApiBaseUrl, AppError, AppResult, Credentials, NonEmptyString, SecretString};

const API_URL_VAR: &str = "PRISMA_API_URL";
const ACCESS_KEY_VAR: &str = "PRISMA_ACCESS_KEY";
const SECRET_KEY_VAR: &str = "PRISMA_SECRET_KEY";
const HTTP_TIMEOUT_VAR: &str = "PRISMA_HTTP_TIMEOUT_SECS";

/// Delete policy suppressions from the platform API.
#[derive(Parser, Debug)]
#[command(name = "suppressor", version)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Maximum number of suppressions to delete; 0 deletes all of them.
    #[arg(short, long, value_name = "N", default_value = "0")]
    pub limit: String,

    /// Log file the run is appended to.
    #[arg(long, value_name = "PATH", default_value = "app.log")]
    pub log_file: PathBuf,
}

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// API root every request is sent to.
    pub api_url: ApiBaseUrl,
    /// Access key pair used to log in.
    pub credentials: Credentials,
    /// Per-request timeout; `None` keeps the client default.
    pub http_timeout: Option<Duration>,
}

impl CliConfig {
    /// Loads settings from the process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = non_empty(API_URL_VAR);
        let access_key = non_empty(ACCESS_KEY_VAR);
        let secret_key = non_empty(SECRET_KEY_VAR);

        let (Some(api_url), Some(access_key), Some(secret_key)) = (api_url, access_key, secret_key)
        else {
            let missing: Vec<&str> = [API_URL_VAR, ACCESS_KEY_VAR, SECRET_KEY_VAR]
                .into_iter()
                .filter(|name| non_empty(*name).is_none())
                .collect();
            return Err(AppError::Validation(format!(
                "{} must be set",
                missing.join(", ")
            )));
        };

        let api_url = ApiBaseUrl::parse(api_url.as_str())?;
        let credentials = Credentials::new(
            NonEmptyString::new(access_key)?,
            SecretString::new(secret_key)?,
        );

        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            Some(value) => {
                let seconds = value.trim().parse::<u64>().map_err(|error| {
                    AppError::Validation(format!(
                        "invalid {HTTP_TIMEOUT_VAR} value '{value}': {error}"
                    ))
                })?;
                (seconds > 0).then(|| Duration::from_secs(seconds))
            }
            None => None,
        };

        Ok(Self {
            api_url,
            credentials,
            http_timeout,
        })
    }
}
