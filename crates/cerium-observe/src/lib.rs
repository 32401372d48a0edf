//! Observability setup for Cerium: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
