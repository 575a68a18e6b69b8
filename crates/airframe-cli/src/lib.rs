//! CLI logic for the Airframe configuration tool.
//!
//! Reads a vehicle configuration, decodes it into an assembly graph and
//! writes the normalised configuration string back out.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use airframe::{AirframeError, Designer, Load, ParseError};

/// Run the Airframe CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `AirframeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - An invalid default design
/// - Decode errors, and warnings when `--strict` is set
pub fn run(args: &Args) -> Result<(), AirframeError> {
    info!(input_path = args.input; "Processing configuration");

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let source = source.trim();

    if args.strict {
        check_strict(source)?;
    }

    let mut designer = Designer::new(app_config)?;
    match designer.load(source)? {
        Load::Decoded { warnings } => {
            info!(
                joints = designer.graph().joints_count(),
                connectors = designer.graph().connectors_count(),
                warnings = warnings.len();
                "Configuration decoded"
            );
        }
        Load::Fallback { error } => {
            warn!(error:% = error; "Input replaced by the default design");
        }
    }

    let encoded = designer.encode();
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{encoded}\n"))?;
            info!(output_file = path.as_str(); "Configuration written");
        }
        None => println!("{encoded}"),
    }

    Ok(())
}

/// Rejects input that would not decode cleanly.
fn check_strict(source: &str) -> Result<(), AirframeError> {
    let decoded = airframe_grammar::decode(source)
        .map_err(|err| AirframeError::new_parse_error(err, source))?;
    if !decoded.warnings.is_empty() {
        return Err(AirframeError::new_parse_error(
            ParseError::new(decoded.warnings),
            source,
        ));
    }
    Ok(())
}
