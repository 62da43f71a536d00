//! Genreport Core Library
//!
//! This crate provides the core functionality for Genreport:
//! - Configuration parsing and validation
//! - Reference factor tables
//! - Generator readings and the transform engine
//! - Output document rendering
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Reference  │────▶│  Transform  │────▶│   Output    │
//! │   Factors   │     │   Engine    │     │  Document   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲
//!                     ┌─────────────┐
//!                     │  Generation │
//!                     │  Document   │
//!                     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use genreport_core::{Engine, ReferenceData, output};
//!
//! let reference = ReferenceData::parse(
//!     "<R><ValueFactor><Low>0.5</Low></ValueFactor><EmissionsFactor/></R>",
//! )?;
//! let report = Engine::new(&reference).transform_str(
//!     "<GenerationReport><WindGenerator><Name>W1</Name><Location>Offshore</Location>\
//!      <Day><Date>d</Date><Energy>100</Energy><Price>2</Price></Day></WindGenerator>\
//!      </GenerationReport>",
//! )?;
//! let xml = output::render(&report)?;
//! assert!(xml.contains("<Total>100.000000000</Total>"));
//! # Ok::<(), genreport_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod output;
pub mod reference;
pub mod xml;

pub use config::{Config, ConfigOverrides, ProjectConfig};
pub use engine::{Engine, GenerationReport};
pub use error::{Error, Result};
pub use reference::ReferenceData;

/// Transform one input document into the text of its output document.
///
/// Generator-level problems are absorbed into the returned report; only a
/// malformed input document or a rendering failure is an error.
pub fn generate(input_xml: &str, reference: &ReferenceData) -> Result<(GenerationReport, String)> {
    let report = Engine::new(reference).transform_str(input_xml)?;
    let rendered = output::render(&report)?;
    Ok((report, rendered))
}
