use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "marketplace.toml",
    "config/marketplace.toml",
    "crates/config/marketplace.toml",
    "../marketplace.toml",
    "../config/marketplace.toml",
    "backend/marketplace.toml",
    "backend/config/marketplace.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://marketplace.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Default records inserted into an empty store at startup.
///
/// ```
/// use marketplace_config::SeedConfig;
///
/// let seed = SeedConfig::default();
/// assert!(seed.enabled);
/// assert_eq!(seed.college_domain, "default.edu");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "SeedConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "SeedConfig::default_college_name")]
    pub college_name: String,
    #[serde(default = "SeedConfig::default_college_domain")]
    pub college_domain: String,
    #[serde(default = "SeedConfig::default_seller_name")]
    pub seller_name: String,
    #[serde(default = "SeedConfig::default_seller_email")]
    pub seller_email: String,
}

impl SeedConfig {
    const fn default_enabled() -> bool {
        true
    }

    fn default_college_name() -> String {
        "Default University".to_string()
    }

    fn default_college_domain() -> String {
        "default.edu".to_string()
    }

    fn default_seller_name() -> String {
        "Campus Seller".to_string()
    }

    fn default_seller_email() -> String {
        "seller@default.edu".to_string()
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            college_name: Self::default_college_name(),
            college_domain: Self::default_college_domain(),
            seller_name: Self::default_seller_name(),
            seller_email: Self::default_seller_email(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use marketplace_config::load;
///
/// std::env::remove_var("MARKETPLACE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())
        .and_then(|b| b.set_default("http.port", i64::from(defaults.http.port)))
        .and_then(|b| b.set_default("database.url", defaults.database.url.clone()))
        .and_then(|b| {
            b.set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )
        })
        .and_then(|b| b.set_default("seed.enabled", defaults.seed.enabled))
        .and_then(|b| b.set_default("seed.college_name", defaults.seed.college_name.clone()))
        .and_then(|b| {
            b.set_default("seed.college_domain", defaults.seed.college_domain.clone())
        })
        .and_then(|b| b.set_default("seed.seller_name", defaults.seed.seller_name.clone()))
        .and_then(|b| b.set_default("seed.seller_email", defaults.seed.seller_email.clone()))
        .context("unable to register configuration defaults")?;

    let mut builder = builder;
    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("MARKETPLACE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via MARKETPLACE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(
        config::Environment::with_prefix("MARKETPLACE")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
