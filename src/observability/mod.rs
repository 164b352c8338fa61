//! Tracing export to a local OTLP/JSON file.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → TracerProvider → FileSpanExporter → bike-rental-otlp.json
//! ```
//!
//! Each export is one line holding a complete `resourceSpans` document. The
//! file lives in the data directory and rotates at 10 MB, keeping three
//! backups. Analytics events share the pipeline under their own target.

mod exporter;
mod init;
mod otlp;
mod rotating;

pub use init::init_tracing;
pub use rotating::RotatingFile;

/// `service.name` resource attribute and instrumentation scope.
pub const SERVICE_NAME: &str = "bike-rental";

pub const TRACE_FILE_NAME: &str = "bike-rental-otlp.json";
