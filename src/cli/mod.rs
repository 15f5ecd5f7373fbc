//! CLI module for javah
//!
//! Flat argument layout matching the historical javah tool: output options,
//! search path options and a list of fully qualified class names.

use std::path::PathBuf;

use clap::Parser;

/// Generate JNI native headers from compiled Java class files
///
/// Classes are given by their fully qualified names (for example,
/// `java.lang.Object`); an argument naming an existing `.class` file is read
/// directly.
#[derive(Parser, Debug)]
#[command(name = "javah")]
#[command(about = "Generate JNI native headers from compiled Java class files")]
#[command(version)]
pub struct Cli {
    /// Write all headers into a single output file
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        conflicts_with = "directory"
    )]
    pub output: Option<PathBuf>,

    /// Write one header per class into this directory (default: current directory)
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Path from which to load classes: directories, jar/zip archives, jmod
    /// files; a trailing /* expands to every jar in that directory
    #[arg(
        long = "classpath",
        visible_alias = "cp",
        value_name = "PATH",
        env = "CLASSPATH"
    )]
    pub classpath: Vec<String>,

    /// Directory of modular archives to search (repeatable)
    #[arg(long = "module-path", value_name = "DIR")]
    pub module_path: Vec<PathBuf>,

    /// Do not search the JDK named by JAVA_HOME for platform classes
    #[arg(long = "no-runtime")]
    pub no_runtime: bool,

    /// Print class metadata as JSON instead of writing headers
    #[arg(long = "json")]
    pub json: bool,

    /// Logging level
    #[arg(long = "log-level", default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Fully qualified class names to process
    #[arg(value_name = "CLASSES")]
    pub classes: Vec<String>,
}
