// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use crate::valuation::implied_growth::{SolverSettings, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Runtime configuration for the valuation tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Numerical engine settings
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Implied-growth search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Stop once the growth bracket is narrower than this
    pub tolerance: f64,

    /// Hard ceiling on bisection iterations
    pub max_iterations: usize,

    /// Lower bound of the growth search
    pub search_low: f64,

    /// Upper bound of the growth search
    pub search_high: f64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl EngineConfig {
    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            low: self.search_low,
            high: self.search_high,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.solver_settings()
            .validate()
            .map_err(|e| AppError::Config(format!("Invalid engine settings: {}", e)))
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        let engine_config = EngineConfig {
            tolerance: env_or("DCF_TOLERANCE", defaults.engine.tolerance)?,
            max_iterations: env_or("DCF_MAX_ITERATIONS", defaults.engine.max_iterations)?,
            search_low: env_or("DCF_SEARCH_LOW", defaults.engine.search_low)?,
            search_high: env_or("DCF_SEARCH_HIGH", defaults.engine.search_high)?,
        };

        let logging_config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| defaults.logging.level.clone()),
            to_file: env_or("LOG_TO_FILE", false)?,
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        Ok(Config {
            engine: engine_config,
            logging: logging_config,
        })
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path)
            .map_err(|e| AppError::Config(format!("Failed to open config file: {}", e)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply command-line overrides, then validate the resulting engine settings.
    ///
    /// Loaders do not validate, so a flag can correct a bad file or env value.
    pub fn apply_overrides(
        &mut self,
        tolerance: Option<f64>,
        max_iterations: Option<usize>,
    ) -> AppResult<()> {
        if let Some(tolerance) = tolerance {
            self.engine.tolerance = tolerance;
        }
        if let Some(max_iterations) = max_iterations {
            self.engine.max_iterations = max_iterations;
        }
        self.engine.validate()
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path)
                    .map_err(|e| AppError::Config(format!("Failed to create log file: {}", e)))?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        // A second init (tests, embedding) keeps the first logger
        builder.try_init().ok();

        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                tolerance: DEFAULT_TOLERANCE,
                max_iterations: DEFAULT_MAX_ITERATIONS,
                search_low: -0.5,
                search_high: 0.5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}
