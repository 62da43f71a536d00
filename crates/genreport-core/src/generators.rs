//! Generator readings
//!
//! Typed views of the generator nodes in an input document. Each reading is
//! parsed on its own so that one malformed generator never affects its
//! siblings.

use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::xml::Element;

/// Location value that selects the low value factor for wind generators
pub const OFFSHORE: &str = "Offshore";

/// Generator type, determined by the element that wraps the reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeneratorKind {
    /// `WindGenerator`
    Wind,
    /// `GasGenerator`
    Gas,
    /// `CoalGenerator`
    Coal,
}

impl GeneratorKind {
    /// Processing order of generator groups
    pub const PROCESSING_ORDER: [GeneratorKind; 3] =
        [GeneratorKind::Wind, GeneratorKind::Gas, GeneratorKind::Coal];

    /// Element name of this generator type in input documents
    pub fn element_name(self) -> &'static str {
        match self {
            GeneratorKind::Wind => "WindGenerator",
            GeneratorKind::Gas => "GasGenerator",
            GeneratorKind::Coal => "CoalGenerator",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Wind => f.write_str("wind"),
            GeneratorKind::Gas => f.write_str("gas"),
            GeneratorKind::Coal => f.write_str("coal"),
        }
    }
}

/// One day's reading
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    /// Opaque date identifier, kept exactly as written
    pub date: Option<String>,
    /// Energy generated
    pub energy: f64,
    /// Price
    pub price: f64,
}

impl DayRecord {
    fn from_element(day: &Element) -> Result<Self> {
        Ok(Self {
            date: day.child_text("Date").map(str::to_string),
            energy: day.required_f64("Energy")?,
            price: day.required_f64("Price")?,
        })
    }
}

fn days_of(generator: &Element) -> Result<Vec<DayRecord>> {
    generator
        .descendants("Day")
        .into_iter()
        .map(DayRecord::from_element)
        .collect()
}

/// A `WindGenerator` reading
#[derive(Debug, Clone, PartialEq)]
pub struct WindGenerator {
    /// Generator name
    pub name: String,
    /// Location, when present
    pub location: Option<String>,
    /// Day records in document order
    pub days: Vec<DayRecord>,
}

impl WindGenerator {
    /// Read a wind generator from its element
    pub fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            name: element.required_text("Name")?.to_string(),
            location: element.child_text("Location").map(str::to_string),
            days: days_of(element)?,
        })
    }

    /// Whether the location is exactly `Offshore`
    pub fn is_offshore(&self) -> bool {
        self.location.as_deref() == Some(OFFSHORE)
    }
}

/// Heat figures carried only by coal generators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoalHeat {
    /// `TotalHeatInput`
    pub total_heat_input: f64,
    /// `ActualNetGeneration`
    pub actual_net_generation: f64,
}

/// A `GasGenerator` or `CoalGenerator` reading
#[derive(Debug, Clone, PartialEq)]
pub struct FuelGenerator {
    /// Gas or coal
    pub kind: GeneratorKind,
    /// Generator name
    pub name: String,
    /// Emissions rating, applied to every day
    pub emissions_rating: f64,
    /// Heat figures; always present for coal, never for gas
    pub heat: Option<CoalHeat>,
    /// Day records in document order
    pub days: Vec<DayRecord>,
}

impl FuelGenerator {
    /// Read a fuel generator from its element
    pub fn from_element(kind: GeneratorKind, element: &Element) -> Result<Self> {
        let name = element.required_text("Name")?.to_string();
        let emissions_rating = element.required_f64("EmissionsRating")?;
        let heat = match kind {
            GeneratorKind::Coal => Some(CoalHeat {
                total_heat_input: element.required_f64("TotalHeatInput")?,
                actual_net_generation: element.required_f64("ActualNetGeneration")?,
            }),
            _ => None,
        };

        Ok(Self {
            kind,
            name,
            emissions_rating,
            heat,
            days: days_of(element)?,
        })
    }
}
