use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

/// Default development origin (Vite dev server).
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub pushover: PushoverConfig,
    pub origin: OriginConfig,
    pub variant: GatewayVariant,
    pub deployment: DeploymentMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "dev".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushoverConfig {
    pub user_key: String,
    pub api_token: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OriginConfig {
    /// Additional allowed origins beyond the hardcoded production set.
    pub allowed_origins: Vec<String>,
}

/// Deployment-wide strictness flag. Drives both the origin policy and the
/// request validator: the permissive variant relies on framework CORS and
/// minimal field checks, the strict variant evaluates the allow-list per
/// request and enforces the full validation ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayVariant {
    Permissive,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Long-running listener; exposes the /health probe route.
    Server,
    /// Single-handler deployment; same routes minus /health.
    Serverless,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut common = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize::<CommonConfig>()?;

        // Plain PORT (the convention of hosting platforms) applies when the
        // prefixed form is absent.
        if env::var("APP__PORT").is_err() {
            if let Ok(port) = env::var("PORT") {
                common.port = port.parse().unwrap_or(common.port);
            }
        }

        let is_prod = common.environment == "prod";

        Ok(GatewayConfig {
            common,
            pushover: PushoverConfig {
                user_key: get_env("PUSHOVER_USER_KEY", Some(""), is_prod)?,
                api_token: get_env("PUSHOVER_API_TOKEN", Some(""), is_prod)?,
                enabled: env::var("PUSHOVER_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
            },
            origin: OriginConfig {
                allowed_origins: parse_origin_list(
                    &env::var("ALLOWED_ORIGINS").unwrap_or_default(),
                ),
            },
            variant: match env::var("GATEWAY_VARIANT")
                .unwrap_or_else(|_| "permissive".to_string())
                .as_str()
            {
                "strict" => GatewayVariant::Strict,
                _ => GatewayVariant::Permissive,
            },
            deployment: match env::var("DEPLOYMENT_MODE")
                .unwrap_or_else(|_| "server".to_string())
                .as_str()
            {
                "serverless" => DeploymentMode::Serverless,
                _ => DeploymentMode::Server,
            },
        })
    }
}

/// Split a comma-separated origin list, trimming entries and dropping blanks.
/// Trailing-slash normalization happens in the allow-list itself.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::Config(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::Config(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
