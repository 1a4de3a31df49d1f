//! Layered configuration for the snake Python tool server.
//!
//! - [`SnakeConfig`]: root type with `tools`, `server` and `logging` sections
//! - [`load_merged`] / [`load_with_explicit`]: file layers plus env overrides
//! - [`schema`]: JSON Schema for `snake.json`
//! - [`validation`]: advisory warnings
//!
//! # Precedence (lowest to highest)
//! 1. Default values
//! 2. Global config (`~/.config/snake/snake.json`)
//! 3. Local config (`./snake.json`)
//! 4. Explicit file (`--config`)
//! 5. Environment variables
//!
//! # Example
//! ```no_run
//! use snake_config::load_merged;
//! use std::path::Path;
//!
//! let loaded = load_merged(Path::new(".")).unwrap();
//! println!("mypy: {}", loaded.config.tools.mypy.common.binary_or("mypy"));
//! ```
//!
//! # Environment Variables
//! - `SNAKE_FLAKE8_BIN`, `SNAKE_MYPY_BIN`, `SNAKE_PYTEST_BIN`: executable overrides
//! - `SNAKE_LOG_LEVEL`: override log level
//! - `SNAKE_LOG_JSON`: enable JSON logging ("true" or "1")

pub mod loader;
pub mod merge;
pub mod schema;
pub mod types;
pub mod validation;

pub use loader::{LoadedSnakeConfig, load_merged, load_with_explicit};
pub use schema::schema_json_pretty;
pub use types::{
    KNOWN_TOOLS, LoggingConfig, MypyConfig, OutputFormat, ServerConfig, SnakeConfig, ToolConfig,
    ToolsConfig,
};
pub use validation::AdvisoryWarning;
