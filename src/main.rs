//! localizer - find global symbols that could be static
//!
//! Reads the link reports collected during a build and lists global symbols
//! that no other translation unit references.

use anyhow::Result;
use clap::Parser;
use localizer::cli::{Args, CliApp};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    localizer::logging::init_tracing(args.verbose);

    // Create and run the CLI application
    let app = CliApp::new(args);
    let exit_code = app.run()?;

    // Exit with the appropriate code
    std::process::exit(exit_code);
}
