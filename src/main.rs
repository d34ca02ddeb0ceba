//! wirelog: send one HTTP request and log the exchange.
//!
//! # Architecture Overview
//!
//! ```text
//!   flags + config file
//!          │
//!          ▼
//!   ┌──────────────┐     ┌──────────────────┐     ┌────────────────┐
//!   │    config    │────▶│  observability   │────▶│   transport    │
//!   │ load+validate│     │ JSON / tracing   │     │ wrapper(client)│
//!   └──────────────┘     └──────────────────┘     └───────┬────────┘
//!                                                         │
//!                        request ─────────────────────────┤
//!                                                         ▼
//!                                                   network / server
//!                                                         │
//!   stdout ◀──────────────── response body ───────────────┘
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Uri};
use tokio::io::AsyncWriteExt;
use tower::ServiceExt;

use wirelog::config::{load_config, validate_config, Config, LogFormat};
use wirelog::observability::{self, JsonLogger, Logger, TracingLogger};
use wirelog::transport::{logged_client, TransportWrapper};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for LogFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => LogFormat::Json,
            FormatArg::Text => LogFormat::Text,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wirelog")]
#[command(about = "Send an HTTP request and log the exchange", long_about = None)]
struct Cli {
    /// URL to send the request to.
    url: Uri,

    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(short, long, allow_negative_numbers = true)]
    v: Option<i64>,

    /// Verbosity level of header records.
    #[arg(long, allow_negative_numbers = true)]
    header_v: Option<i64>,

    /// Verbosity level of body records.
    #[arg(long, allow_negative_numbers = true)]
    body_v: Option<i64>,

    /// Log format.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Log file. Standard error when omitted.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Request method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: Method,

    /// Request body.
    #[arg(short, long)]
    data: Option<String>,
}

impl Cli {
    /// Merge flags over the file configuration.
    fn resolve(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        if let Some(v) = self.v {
            config.logging.v = v;
        }
        if let Some(format) = self.format {
            config.logging.format = format.into();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if let Some(v) = self.header_v {
            config.transport.header_v = v;
        }
        if let Some(v) = self.body_v {
            config.transport.body_v = v;
        }

        validate_config(&config).map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })?;
        Ok(config)
    }
}

fn create_logger(config: &Config) -> Result<Arc<dyn Logger>, Box<dyn std::error::Error>> {
    let max_v = u32::try_from(config.logging.v)?;
    let logger: Arc<dyn Logger> = match config.logging.format {
        LogFormat::Json => {
            let logger = match &config.logging.file {
                Some(path) => {
                    let file = OpenOptions::new().create(true).append(true).open(path)?;
                    JsonLogger::new(file, max_v)
                }
                None => JsonLogger::stderr(max_v),
            };
            // Several processes may share one log file.
            logger.with_value("pid", std::process::id()).into_shared()
        }
        LogFormat::Text => Arc::new(TracingLogger::new(max_v)),
    };
    Ok(logger)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    observability::subscriber::init(u32::try_from(config.logging.v)?);

    let logger = create_logger(&config)?;
    let wrapper = TransportWrapper::builder()
        .logger(logger)
        .config(config.transport)
        .build()?;

    tracing::debug!(
        url = %cli.url,
        method = %cli.method,
        header_v = wrapper.header_v(),
        body_v = wrapper.body_v(),
        "Sending request"
    );

    let body = cli.data.clone().map(Bytes::from).unwrap_or_default();
    let request = Request::builder()
        .method(cli.method.clone())
        .uri(cli.url.clone())
        .body(Full::new(body))?;

    let response = logged_client(&wrapper).oneshot(request).await?;
    let status = response.status();

    let mut stdout = tokio::io::stdout();
    let mut body = response.into_body();
    while let Some(frame) = body.frame().await {
        if let Ok(data) = frame?.into_data() {
            stdout.write_all(&data).await?;
        }
    }
    stdout.flush().await?;

    if !status.is_success() {
        tracing::warn!(status = %status, "Server returned an error status");
    }
    Ok(())
}
