//! Generation transform engine
//!
//! Turns one input document plus the reference factors into a
//! [`GenerationReport`]. The engine holds nothing but a shared borrow of the
//! reference tables, so one instance can serve any number of documents.
//!
//! Generators are processed Wind, then Gas, then Coal, each group in document
//! order. A generator that fails (missing field, bad number, unknown factor)
//! contributes nothing and is recorded in [`GenerationReport::skipped`].

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::generators::{FuelGenerator, GeneratorKind, WindGenerator};
use crate::reference::{FactorLevel, ReferenceData};
use crate::xml::Element;

/// Weighted generation total for one generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorTotal {
    /// Generator name
    pub name: String,
    /// Σ energy × price × value factor
    pub total: f64,
}

/// Emission of one fuel generator on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEmission {
    /// Generator name
    pub name: String,
    /// Date, as written in the input
    pub date: String,
    /// energy × emissions rating × emission factor
    pub emission: f64,
}

/// Heat rate of one coal generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatRate {
    /// Generator name
    pub name: String,
    /// total heat input / actual net generation, unguarded
    pub heat_rate: f64,
}

/// A generator left out of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedGenerator {
    /// Generator type
    pub kind: GeneratorKind,
    /// Name, if it could be read
    pub name: Option<String>,
    /// Why it was skipped
    pub reason: String,
}

/// Everything one generator adds to the report
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// Generation total
    pub total: GeneratorTotal,
    /// One row per day; empty for wind
    pub emissions: Vec<DailyEmission>,
    /// Coal only
    pub heat_rate: Option<HeatRate>,
}

/// Result of processing a single generator
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorOutcome {
    /// Generator was fully processed
    Processed(Contribution),
    /// Generator failed and contributes nothing
    Skipped(SkippedGenerator),
}

/// Derived collections for one input document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Totals in processing order
    pub totals: Vec<GeneratorTotal>,
    /// Every fuel generator day, in processing order
    pub daily_emissions: Vec<DailyEmission>,
    /// Highest emitter per date, in first-seen date order
    pub max_emissions: Vec<DailyEmission>,
    /// Coal heat rates in processing order
    pub heat_rates: Vec<HeatRate>,
    /// Generators that were left out
    pub skipped: Vec<SkippedGenerator>,
}

impl GenerationReport {
    fn absorb(&mut self, outcome: GeneratorOutcome) {
        match outcome {
            GeneratorOutcome::Processed(contribution) => {
                self.totals.push(contribution.total);
                self.daily_emissions.extend(contribution.emissions);
                self.heat_rates.extend(contribution.heat_rate);
            }
            GeneratorOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }
}

/// Transform engine bound to one set of reference factors
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    reference: &'a ReferenceData,
}

impl<'a> Engine<'a> {
    /// Create an engine over the given reference data
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Parse an input document and transform it
    pub fn transform_str(&self, xml: &str) -> Result<GenerationReport> {
        Ok(self.transform(&Element::parse(xml)?))
    }

    /// Transform a parsed input document
    pub fn transform(&self, document: &Element) -> GenerationReport {
        let mut report = GenerationReport::default();

        for kind in GeneratorKind::PROCESSING_ORDER {
            for element in document.descendants(kind.element_name()) {
                report.absorb(self.process(kind, element));
            }
        }

        report.max_emissions = max_emission_per_day(&report.daily_emissions);

        tracing::debug!(
            totals = report.totals.len(),
            daily_emissions = report.daily_emissions.len(),
            heat_rates = report.heat_rates.len(),
            skipped = report.skipped.len(),
            "Transformed generation document"
        );
        report
    }

    /// Process one generator element into a tagged outcome
    pub fn process(&self, kind: GeneratorKind, element: &Element) -> GeneratorOutcome {
        let result = match kind {
            GeneratorKind::Wind => self.process_wind(element),
            GeneratorKind::Gas => self.process_fuel(kind, element, FactorLevel::Medium),
            GeneratorKind::Coal => self.process_fuel(kind, element, FactorLevel::High),
        };

        match result {
            Ok(contribution) => GeneratorOutcome::Processed(contribution),
            Err(err) => {
                let name = element.child_text("Name").map(str::to_string);
                tracing::warn!(
                    generator = name.as_deref().unwrap_or("<unnamed>"),
                    kind = %kind,
                    "Skipping generator: {}",
                    err
                );
                GeneratorOutcome::Skipped(SkippedGenerator {
                    kind,
                    name,
                    reason: err.to_string(),
                })
            }
        }
    }

    fn process_wind(&self, element: &Element) -> Result<Contribution> {
        let wind = WindGenerator::from_element(element)?;
        let level = if wind.is_offshore() {
            FactorLevel::Low
        } else {
            FactorLevel::High
        };
        let value_factor = self.reference.value_factors.get(level)?;

        let total: f64 = wind
            .days
            .iter()
            .map(|day| day.energy * day.price * value_factor)
            .sum();

        Ok(Contribution {
            total: GeneratorTotal {
                name: wind.name,
                total,
            },
            emissions: Vec::new(),
            heat_rate: None,
        })
    }

    fn process_fuel(
        &self,
        kind: GeneratorKind,
        element: &Element,
        emission_level: FactorLevel,
    ) -> Result<Contribution> {
        let fuel = FuelGenerator::from_element(kind, element)?;
        let value_factor = self.reference.value_factors.get(FactorLevel::Medium)?;
        let emission_factor = self.reference.emission_factors.get(emission_level)?;

        let total: f64 = fuel
            .days
            .iter()
            .map(|day| day.energy * day.price * value_factor)
            .sum();

        let emissions = fuel
            .days
            .iter()
            .map(|day| {
                let date = day.date.clone().ok_or_else(|| Error::MissingField {
                    element: "Day".to_string(),
                    field: "Date".to_string(),
                })?;
                Ok(DailyEmission {
                    name: fuel.name.clone(),
                    date,
                    emission: day.energy * fuel.emissions_rating * emission_factor,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let heat_rate = fuel.heat.map(|heat| HeatRate {
            name: fuel.name.clone(),
            heat_rate: heat.total_heat_input / heat.actual_net_generation,
        });

        Ok(Contribution {
            total: GeneratorTotal {
                name: fuel.name,
                total,
            },
            emissions,
            heat_rate,
        })
    }
}

/// Pick the highest emission for every date.
///
/// Dates appear in the order they are first seen. A row only replaces the
/// current maximum when it is strictly greater, so the earliest row wins an
/// exact tie.
pub fn max_emission_per_day(rows: &[DailyEmission]) -> Vec<DailyEmission> {
    let mut maxima: Vec<&DailyEmission> = Vec::new();
    let mut slot_by_date: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match slot_by_date.get(row.date.as_str()) {
            Some(&slot) => {
                let current = maxima[slot].emission;
                // NaN ranks below every number
                if row.emission > current || (current.is_nan() && !row.emission.is_nan()) {
                    maxima[slot] = row;
                }
            }
            None => {
                slot_by_date.insert(row.date.as_str(), maxima.len());
                maxima.push(row);
            }
        }
    }

    maxima.into_iter().cloned().collect()
}
