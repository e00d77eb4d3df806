// ABOUTME: Configuration module for the carousel-slides application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::export::ExportOptions;
use crate::remote::RemoteConfig;
use crate::render::RenderConfig;
use std::env;
use std::path::PathBuf;

const DEFAULT_STATE_DIR: &str = ".carousel";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout_ms: u64,
    pub browser_path: Option<String>,
    pub canvas_size: u32,
    pub default_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: 30000, // 30 seconds
            browser_path: env::var("BROWSER_PATH").ok(),
            canvas_size: 1080,
            default_timeout_ms: 30000, // 30 seconds
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|s| s.trim().parse::<T>().ok())
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let state_dir = non_empty_var("CAROUSEL_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));
        let api_key = non_empty_var("GEMINI_API_KEY");
        let model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base =
            non_empty_var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let request_timeout_ms = parsed_var("REQUEST_TIMEOUT_MS").unwrap_or(30000);
        let browser_path = non_empty_var("BROWSER_PATH");
        let canvas_size = parsed_var::<u32>("CANVAS_SIZE")
            .filter(|size| *size > 0)
            .unwrap_or(1080);
        let default_timeout_ms = parsed_var("DEFAULT_TIMEOUT_MS").unwrap_or(30000);

        Self {
            state_dir,
            api_key,
            model,
            api_base,
            request_timeout_ms,
            browser_path,
            canvas_size,
            default_timeout_ms,
        }
    }

    /// Get a render configuration with defaults from this config
    pub fn get_render_config(&self, canvas_size: Option<u32>) -> RenderConfig {
        RenderConfig {
            canvas_size: canvas_size.unwrap_or(self.canvas_size),
            timeout_ms: self.default_timeout_ms,
            browser_path: self.browser_path.clone(),
            ..RenderConfig::default()
        }
    }

    /// Get the remote client configuration
    pub fn get_remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            timeout_ms: self.request_timeout_ms,
        }
    }

    /// Get export options with defaults
    pub fn get_export_options(
        &self,
        output: Option<PathBuf>,
        canvas_size: Option<u32>,
        title: Option<String>,
    ) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            output: output.unwrap_or(defaults.output),
            canvas_size: canvas_size.unwrap_or(self.canvas_size),
            title: title.unwrap_or(defaults.title),
        }
    }
}
