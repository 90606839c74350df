//! Unit-economics calculator.
//!
//! Raw business-model inputs flow through a template (`validate` then `normalize`) into the
//! engine's single entry point, [`engine::calculate`], which returns metrics, severity-tagged
//! flags and an overall verdict. Everything under [`engine`] is pure; configuration, telemetry
//! and the [`service`] facade wrap it for the CLI and HTTP collaborators; [`router`] exposes the
//! service over HTTP.

pub mod config;
pub mod engine;
pub mod error;
pub mod router;
pub mod scenario;
pub mod service;
pub mod telemetry;
pub mod templates;

pub use engine::{calculate, CalculationError, CalculationResult, NormalizedInputs};
pub use service::{CalculationOutcome, CalculatorService, CalculatorServiceError};
pub use templates::{RawInputs, TemplateId, TemplateRegistry};
