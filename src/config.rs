use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Location of the place catalog table (file path or http(s) URL)
    #[serde(default = "default_places_source")]
    pub places_source: String,

    /// Location of the rating observations table (file path or http(s) URL)
    #[serde(default = "default_ratings_source")]
    pub ratings_source: String,

    /// Number of recommendations returned when the request does not specify one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Upper bound accepted for `top_n` on the HTTP surface
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_places_source() -> String {
    "https://raw.githubusercontent.com/AwalDinz/rekomendasi-wisata-yogya/main/dataset/tour.csv"
        .to_string()
}

fn default_ratings_source() -> String {
    "https://raw.githubusercontent.com/AwalDinz/rekomendasi-wisata-yogya/main/dataset/tour_rating.csv"
        .to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_max_top_n() -> usize {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the recommendation bounds are usable
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_top_n == 0 {
            anyhow::bail!("MAX_TOP_N must be at least 1");
        }
        if self.default_top_n == 0 || self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N must be between 1 and MAX_TOP_N ({}), got {}",
                self.max_top_n,
                self.default_top_n
            );
        }
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            places_source: default_places_source(),
            ratings_source: default_ratings_source(),
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_default_top_n_above_max_rejected() {
        let config = Config {
            default_top_n: 12,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = Config {
            default_top_n: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
