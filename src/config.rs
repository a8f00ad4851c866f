use std::env;

/// Knobs of the catalog core, handed to services at construction.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub default_language: String,
    /// Language tried when a text is missing in the requested one.
    pub fallback_language: Option<String>,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            fallback_language: Some("en".to_string()),
            default_page_limit: 20,
            max_page_limit: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub catalog: CatalogSettings,
    pub media_root: String,
    pub media_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = CatalogSettings::default();
        let default_page_limit = parse_limit("PAGE_LIMIT", defaults.default_page_limit)?;
        let max_page_limit = parse_limit("MAX_PAGE_LIMIT", defaults.max_page_limit)?;
        if default_page_limit > max_page_limit {
            anyhow::bail!("PAGE_LIMIT ({default_page_limit}) exceeds MAX_PAGE_LIMIT ({max_page_limit})");
        }
        let catalog = CatalogSettings {
            default_language: env::var("DEFAULT_LANGUAGE")
                .ok()
                .filter(|code| !code.trim().is_empty())
                .unwrap_or(defaults.default_language),
            // An explicitly empty value turns the fallback off.
            fallback_language: match env::var("FALLBACK_LANGUAGE") {
                Ok(code) if code.trim().is_empty() => None,
                Ok(code) => Some(code.trim().to_string()),
                Err(_) => defaults.fallback_language,
            },
            default_page_limit,
            max_page_limit,
        };

        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        let media_url = env::var("MEDIA_URL").unwrap_or_else(|_| "/media".to_string());

        Ok(Self {
            port,
            database_url,
            host,
            catalog,
            media_root,
            media_url: media_url.trim_end_matches('/').to_string(),
        })
    }
}

fn parse_limit(name: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(name) {
        Ok(raw) => {
            let value: u64 = raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("{name} must be a positive integer, got {raw:?}"))?;
            if value == 0 {
                anyhow::bail!("{name} must be a positive integer");
            }
            Ok(value)
        }
        Err(_) => Ok(default),
    }
}
