//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{
    fmt,
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::site::SiteMetadata;

pub use cli::{
    CliArgs, Command, ExportArgs, ExportOverrides, LoggingOverrides, PathOverrides, ServeArgs,
    ServeOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "linksly";
const ENV_PREFIX: &str = "LINKSLY";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5002;
const DEFAULT_TEMPLATES_DIR: &str = "templates";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_OUTPUT_DIR: &str = "docs";
const DEFAULT_SUBSCRIBERS_LOG: &str = "subscribers.txt";
pub(crate) const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub site: SiteMetadata,
    pub paths: PathSettings,
    pub security: SecuritySettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct PathSettings {
    pub templates: PathBuf,
    pub static_dir: PathBuf,
    pub output: PathBuf,
    pub subscribers_log: PathBuf,
}

#[derive(Clone)]
pub struct SecuritySettings {
    pub secret_key: String,
}

impl SecuritySettings {
    /// The built-in key is only fit for local development.
    pub fn uses_default_key(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("site.keywords"),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Export(args)) => raw.apply_export_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }
    if let Some(key) = cli.secret_key.as_ref() {
        raw.security.secret_key = Some(key.clone());
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    site: RawSiteSettings,
    paths: RawPathSettings,
    security: RawSecuritySettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(path) = overrides.subscribers_log.as_ref() {
            self.paths.subscribers_log = Some(path.clone());
        }

        self.apply_logging_overrides(&overrides.logging);
        self.apply_path_overrides(&overrides.paths);
    }

    fn apply_export_overrides(&mut self, overrides: &ExportOverrides) {
        if let Some(output) = overrides.output_dir.as_ref() {
            self.paths.output = Some(output.clone());
        }

        self.apply_logging_overrides(&overrides.logging);
        self.apply_path_overrides(&overrides.paths);
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_path_overrides(&mut self, overrides: &PathOverrides) {
        if let Some(dir) = overrides.templates_dir.as_ref() {
            self.paths.templates = Some(dir.clone());
        }
        if let Some(dir) = overrides.static_dir.as_ref() {
            self.paths.static_dir = Some(dir.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            site,
            paths,
            security,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            site: build_site_metadata(site)?,
            paths: build_path_settings(paths)?,
            security: build_security_settings(security)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }
    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_site_metadata(site: RawSiteSettings) -> Result<SiteMetadata, LoadError> {
    let defaults = SiteMetadata::default();

    let title = non_empty(site.title, defaults.title, "site.title")?;
    let domain = non_empty(site.domain, defaults.domain, "site.domain")?;
    if domain.contains("://") || domain.chars().any(char::is_whitespace) {
        return Err(LoadError::invalid(
            "site.domain",
            "expected a bare domain such as `linksly.app`",
        ));
    }

    let keywords = match site.keywords {
        Some(keywords) => keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect(),
        None => defaults.keywords,
    };

    Ok(SiteMetadata {
        title,
        description: site.description.unwrap_or(defaults.description),
        keywords,
        og_image: site.og_image.unwrap_or(defaults.og_image),
        twitter_card: site.twitter_card.unwrap_or(defaults.twitter_card),
        app_store_url: site.app_store_url.unwrap_or(defaults.app_store_url),
        domain,
    })
}

fn build_path_settings(paths: RawPathSettings) -> Result<PathSettings, LoadError> {
    let templates = non_empty_path(paths.templates, DEFAULT_TEMPLATES_DIR, "paths.templates")?;
    let static_dir = non_empty_path(paths.static_dir, DEFAULT_STATIC_DIR, "paths.static_dir")?;
    let output = non_empty_path(paths.output, DEFAULT_OUTPUT_DIR, "paths.output")?;
    let subscribers_log = non_empty_path(
        paths.subscribers_log,
        DEFAULT_SUBSCRIBERS_LOG,
        "paths.subscribers_log",
    )?;

    // The exporter wipes `output` on every run.
    for (key, source) in [
        ("paths.templates", &templates),
        ("paths.static_dir", &static_dir),
    ] {
        if source.starts_with(&output) {
            return Err(LoadError::invalid(
                key,
                format!(
                    "must not live inside the export output directory `{}`",
                    output.display()
                ),
            ));
        }
    }

    Ok(PathSettings {
        templates,
        static_dir,
        output,
        subscribers_log,
    })
}

fn build_security_settings(security: RawSecuritySettings) -> Result<SecuritySettings, LoadError> {
    let secret_key = non_empty(
        security.secret_key,
        DEFAULT_SECRET_KEY.to_string(),
        "security.secret_key",
    )?;
    Ok(SecuritySettings { secret_key })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    description: Option<String>,
    keywords: Option<Vec<String>>,
    og_image: Option<String>,
    twitter_card: Option<String>,
    app_store_url: Option<String>,
    domain: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPathSettings {
    templates: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    subscribers_log: Option<PathBuf>,
}

#[derive(Clone, Deserialize, Default)]
#[serde(default)]
struct RawSecuritySettings {
    secret_key: Option<String>,
}

impl fmt::Debug for RawSecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSecuritySettings")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_empty(
    value: Option<String>,
    default: String,
    key: &'static str,
) -> Result<String, LoadError> {
    match value {
        None => Ok(default),
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(LoadError::invalid(key, "must not be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}

fn non_empty_path(
    value: Option<PathBuf>,
    default: &str,
    key: &'static str,
) -> Result<PathBuf, LoadError> {
    let path = value.unwrap_or_else(|| PathBuf::from(default));
    if path.as_os_str().is_empty() || path == Path::new(".") {
        return Err(LoadError::invalid(
            key,
            "must name a directory or file, not the working directory",
        ));
    }
    Ok(path)
}
