use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Linksly binary.
#[derive(Debug, Parser)]
#[command(name = "linksly", version, about = "Linksly landing site")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "LINKSLY_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Secret key for the service. Applies whether or not `serve` is named.
    #[arg(
        long = "secret-key",
        env = "SECRET_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    pub secret_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the landing site and the signup API.
    Serve(Box<ServeArgs>),
    /// Render every page into a static tree for GitHub Pages.
    #[command(name = "export")]
    Export(ExportArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub overrides: ExportOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PathOverrides {
    /// Override the template directory.
    #[arg(long = "templates-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub templates_dir: Option<PathBuf>,

    /// Override the static asset directory.
    #[arg(long = "static-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(flatten)]
    pub paths: PathOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the subscriber log file.
    #[arg(long = "subscribers-log", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub subscribers_log: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ExportOverrides {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(flatten)]
    pub paths: PathOverrides,

    /// Override the export output directory. Its contents are deleted on every run.
    #[arg(long = "output-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,
}
