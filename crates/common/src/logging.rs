//! Provides utilities to initialize logging and OpenTelemetry tracing.
use std::env;

use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use tracing::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable holding the OTLP collector endpoint.
pub const OTLP_URL_ENVVAR: &str = "REN_GATEWAY_OTLP_URL";

/// Environment variable name for the service label, which is appended to the
/// whoami string.
pub const SVC_LABEL_ENVVAR: &str = "REN_GATEWAY_SVC_LABEL";

/// Base whoami string used when the host does not pick one.
const DEFAULT_BASE_NAME: &str = "(ren-gateway)";

/// Configuration for the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Identifies the process in logs and as the exported `service.name`.
    whoami: String,

    /// The OpenTelemetry URL for exporting traces.
    otel_url: Option<String>,
}

impl LoggerConfig {
    /// Creates a new instance with whoami set and no trace export.
    pub const fn new(whoami: String) -> Self {
        Self {
            whoami,
            otel_url: None,
        }
    }

    /// Creates a new instance whose whoami string is `base` plus the service label from the
    /// environment, if any.
    pub fn with_base_name(base: &str) -> Self {
        Self::new(get_whoami_string(base))
    }

    /// Creates a new instance from `base` with the trace export endpoint taken from
    /// [`OTLP_URL_ENVVAR`].
    pub fn from_env(base: &str) -> Self {
        let mut config = Self::with_base_name(base);
        if let Some(url) = get_otlp_url_from_env() {
            config.set_otlp_url(url);
        }
        config
    }

    /// Sets the opentelemetry URL to the provided string.
    pub fn set_otlp_url(&mut self, url: String) {
        self.otel_url = Some(url);
    }

    /// The whoami string.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }

    /// The OpenTelemetry URL, if trace export is enabled.
    pub fn otlp_url(&self) -> Option<&str> {
        self.otel_url.as_deref()
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_base_name(DEFAULT_BASE_NAME)
    }
}

/// Initializes the logging subsystem with the provided config.
///
/// Logs go to stdout, filtered by `RUST_LOG`. `LOG_FILE=1` and `LOG_LINE_NUM=1` add source
/// locations. If an OTLP URL is configured, spans are also exported there; an exporter that
/// cannot be built is reported and skipped.
///
/// A host process calls this once, before starting any session:
///
/// ```no_run
/// # #![allow(unused_crate_dependencies)]
/// use ren_gateway_common::logging::{self, LoggerConfig};
///
/// // picks up REN_GATEWAY_OTLP_URL and REN_GATEWAY_SVC_LABEL
/// logging::init(LoggerConfig::from_env("mint-host"));
/// tracing::info!("gateway host started");
/// ```
pub fn init(config: LoggerConfig) {
    let filt = tracing_subscriber::EnvFilter::from_default_env();

    let log_file = env::var("LOG_FILE").is_ok_and(|v| v == "1");
    let log_line_num = env::var("LOG_LINE_NUM").is_ok_and(|v| v == "1");

    let stdout_sub = tracing_subscriber::fmt::layer()
        .compact()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(log_file)
                .with_line_number(log_line_num),
        )
        .with_filter(filt);

    let exporter = config.otel_url.as_ref().map(|otel_url| {
        opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(otel_url)
            .build()
    });

    match exporter {
        Some(Ok(exporter)) => {
            let resource = Resource::builder()
                .with_attribute(KeyValue::new("service.name", config.whoami.clone()))
                .build();

            let tp = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build();

            let tracer = tp.tracer("ren-gateway");
            let otel_sub = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(stdout_sub)
                .with(otel_sub)
                .init();
        }
        Some(Err(err)) => {
            tracing_subscriber::registry().with(stdout_sub).init();
            warn!(%err, "could not build span exporter, traces will not be exported");
        }
        None => {
            tracing_subscriber::registry().with(stdout_sub).init();
        }
    }

    info!(whoami = %config.whoami, "logging started");
}

/// Gets the OTLP URL from the standard envvar.
pub fn get_otlp_url_from_env() -> Option<String> {
    env::var(OTLP_URL_ENVVAR).ok()
}

/// Gets the service label from the standard envvar, which should be included
/// in the whoami string.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string.
pub fn get_whoami_string(base: &str) -> String {
    whoami_with_label(base, get_service_label_from_env().as_deref())
}

fn whoami_with_label(base: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
