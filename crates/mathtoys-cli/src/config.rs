//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$MATHTOYS_CONFIG` environment variable
//! 2. `~/.config/mathtoys/config.toml`
//! 3. Built-in defaults (everything is optional)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use mathtoys_core::DEFAULT_MAX_SPAN;
use mathtoys_web::ComputeSettings;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sampling: SamplingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

/// Plot grid settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Points per plotted series.
    pub num_points: usize,
    /// Widest accepted x-range.
    pub max_span: f64,
    /// Decimals kept on the wire.
    pub precision: u32,
}

// --- Defaults ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5008,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let settings = ComputeSettings::default();
        Self {
            num_points: settings.num_points,
            max_span: DEFAULT_MAX_SPAN,
            precision: settings.precision,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_points < 2 {
            bail!("sampling.num_points must be at least 2, got {}", self.num_points);
        }
        if !(self.max_span.is_finite() && self.max_span > 0.0) {
            bail!("sampling.max_span must be positive, got {}", self.max_span);
        }
        Ok(())
    }

    /// Apply a command-line grid size on top of the configured one.
    pub fn with_points(mut self, points: Option<usize>) -> Result<Self> {
        if let Some(n) = points {
            if n < 2 {
                bail!("--points must be at least 2, got {n}");
            }
            self.num_points = n;
        }
        Ok(self)
    }

    pub fn to_settings(&self) -> ComputeSettings {
        ComputeSettings {
            num_points: self.num_points,
            max_span: self.max_span,
            precision: self.precision,
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    let config = match config_path() {
        Some(p) if p.exists() => {
            let content =
                std::fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))?;
            parse_config(&content).with_context(|| format!("parsing {}", p.display()))?
        }
        _ => Config::default(),
    };
    Ok(config)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.sampling.validate()?;
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("MATHTOYS_CONFIG") {
        return Some(PathBuf::from(p));
    }

    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("mathtoys")
            .join("config.toml")
    })
}

/// Show the active config path (for `mathtoys config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
