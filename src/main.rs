//! javah - JNI Native Header Generator
//!
//! Generates C header files for the `native` methods of compiled Java
//! classes, resolving classes through class paths, module paths and the JDK
//! named by `JAVA_HOME`.
//!
//! # Usage
//!
//! ```bash
//! javah -d include --classpath build/classes org.example.Native
//! javah -o all.h --classpath lib/app.jar org.example.A org.example.B
//! javah --json --classpath build/classes org.example.Native
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use javah::app::{JavahTask, OutputTarget};
use javah::cli::Cli;

/// Main entry point for the javah CLI
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the --log-level flag
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.classes.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let mut task = JavahTask::new();

    for spec in &cli.classpath {
        task.add_class_paths(spec);
    }
    for dir in &cli.module_path {
        task.add_module_path(dir)?;
    }
    if !task.has_search_paths() {
        task.add_class_path(".");
    }
    if !cli.no_runtime {
        task.add_runtime_search_path();
    }

    if let Some(file) = cli.output {
        task.set_output(OutputTarget::SingleFile(file));
    } else if let Some(dir) = cli.directory {
        task.set_output(OutputTarget::Directory(dir));
    }
    task.set_json(cli.json);

    info!("Processing {} class(es)", cli.classes.len());
    for class in cli.classes {
        task.add_class(class);
    }

    task.run()?;
    Ok(())
}
