//! Rebound CLI library
//!
//! This module contains the logic of the `rebound` checker: it parses a
//! bracketed-list file with a small combinator kernel and reports the first
//! parse failure the way the `rebound` library renders it.

pub mod combinator;
pub mod config;
pub mod error;
pub mod error_adapter;
pub mod grammar;

mod args;

pub use args::Args;
pub use config::AppConfig;
pub use error::CliError;
pub use error_adapter::ErrorAdapter;
pub use grammar::Value;

use std::fs;

use log::{debug, info};

use rebound::{CharStream, ParserError, ParserState, RenderOptions, State};

/// Run the Rebound CLI application
///
/// This function loads the configuration, reads the input file and checks
/// that it is a well-formed list document.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Grammar bugs detected by the loop guard
pub fn run(args: &Args) -> Result<Value, CliError> {
    info!(input_path = args.input; "Checking file");

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?
        .with_overrides(args.column_width, args.no_line_context);
    app_config.validate()?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let value = check(&source, &args.input, &app_config)?;

    info!(input_path = args.input, items = value.count_items(); "Input is well-formed");

    Ok(value)
}

/// Parses `source` as a list document named `name`.
///
/// # Errors
///
/// Returns [`CliError::Parse`] with the error rendered according to
/// `config`, or [`CliError::InfiniteLoop`] if the grammar stopped making
/// progress.
pub fn check(source: &str, name: &str, config: &AppConfig) -> Result<Value, CliError> {
    let stream = CharStream::with_name(source, name);
    let start = State::new(stream.position_at(0));

    let reply = grammar::document().parse(&stream, &start)?;
    let value = match reply.result {
        Ok(value) => value,
        Err(failure) => {
            debug!(failure:?, position:% = reply.state.position(); "Parse failed");
            let err = ParserError::new(reply.state.position().clone(), reply.error);

            let render = config.render();
            let mut options = RenderOptions::from_config(render);
            if render.show_line_context() {
                options = options.stream(&stream);
            }
            let mut report = String::new();
            err.write_fmt_to(&mut report, &options)
                .expect("Writing to String buffer is infallible");

            return Err(CliError::new_parse_error(err, report));
        }
    };

    Ok(value)
}
