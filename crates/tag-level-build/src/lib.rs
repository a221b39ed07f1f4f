//! Build-time utilities for tag-level.
//!
//! This crate provides tools for:
//! - Parsing `levels.toml` configuration files
//! - Generating Rust constants and a `config()` constructor from them
//!
//! # Usage in build.rs
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     println!("cargo:rerun-if-changed=levels.toml");
//!     let out = std::path::Path::new(&std::env::var("OUT_DIR").unwrap()).join("levels.rs");
//!     tag_level_build::generate("levels.toml", out).expect("Failed to generate levels");
//! }
//!
//! // src/main.rs
//! mod levels {
//!     include!(concat!(env!("OUT_DIR"), "/levels.rs"));
//! }
//! let shared = tag_level::SharedTagLevels::from_config(&levels::config());
//! ```
//!
//! # Config format
//!
//! ```toml
//! default = "info"       # level for tags without an override
//! max_wait_ms = 10       # read-path lock wait
//!
//! [limits]
//! max_overrides = 32
//! max_tag_bytes = 512
//!
//! [levels]
//! wifi = "warn"
//! net = "debug"
//! ```

mod codegen;
mod toml_parser;

pub use codegen::generate_code;
pub use toml_parser::{ConfigError, LevelsConfig};

use std::path::Path;

/// Main entry point for build.rs integration.
///
/// Reads `levels.toml` and writes the generated Rust source to
/// `output_path`. The output file is left untouched when its content would
/// not change, so dependents are not rebuilt needlessly.
///
/// # Errors
///
/// Returns an error if:
/// - `levels.toml` cannot be read, parsed or validated
/// - The output file cannot be written
pub fn generate(
    config_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<(), GenerateError> {
    let config = LevelsConfig::from_file(config_path)?;
    write_if_changed(output_path.as_ref(), &generate_code(&config))?;
    Ok(())
}

fn write_if_changed(path: &Path, code: &str) -> std::io::Result<()> {
    match std::fs::read_to_string(path) {
        Ok(existing) if existing == code => Ok(()),
        _ => std::fs::write(path, code),
    }
}

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Failed to read or validate levels.toml
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Failed to write the generated file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
