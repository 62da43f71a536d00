//! Reference factor tables
//!
//! The reference document carries two small tables of multipliers:
//!
//! ```xml
//! <ReferenceData>
//!   <Factors>
//!     <ValueFactor><High>0.946</High><Medium>0.696</Medium><Low>0.265</Low></ValueFactor>
//!     <EmissionsFactor><High>0.812</High><Medium>0.562</Medium><Low>0.312</Low></EmissionsFactor>
//!   </Factors>
//! </ReferenceData>
//! ```
//!
//! Both tables are loaded once at startup and shared read-only by every
//! transformation afterwards.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::xml::Element;

/// Factor category used by the transformation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorLevel {
    /// `Low` category
    Low,
    /// `Medium` category
    Medium,
    /// `High` category
    High,
}

impl FactorLevel {
    /// Element name of this category in the reference document
    pub fn as_str(self) -> &'static str {
        match self {
            FactorLevel::Low => "Low",
            FactorLevel::Medium => "Medium",
            FactorLevel::High => "High",
        }
    }
}

impl fmt::Display for FactorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two reference tables a [`FactorTable`] holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    /// Multipliers for energy × price
    Value,
    /// Multipliers for energy × emissions rating
    Emission,
}

impl FactorKind {
    /// Section element name in the reference document
    pub fn section(self) -> &'static str {
        match self {
            FactorKind::Value => "ValueFactor",
            FactorKind::Emission => "EmissionsFactor",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorKind::Value => f.write_str("value"),
            FactorKind::Emission => f.write_str("emission"),
        }
    }
}

/// Category name → multiplier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorTable {
    kind: FactorKind,
    factors: BTreeMap<String, f64>,
}

impl FactorTable {
    /// Build a table from explicit entries
    pub fn new<K: Into<String>>(kind: FactorKind, entries: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            kind,
            factors: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Read every child of a section element as `<Key>number</Key>`.
    /// A repeated key keeps its last value.
    fn from_section(kind: FactorKind, section: &Element) -> Result<Self> {
        let mut factors = BTreeMap::new();
        for entry in &section.children {
            let raw = entry.text();
            let value = raw
                .parse::<f64>()
                .map_err(|_| Error::MalformedFactorValue {
                    section: kind.section().to_string(),
                    key: entry.name.clone(),
                    value: raw.to_string(),
                })?;
            factors.insert(entry.name.clone(), value);
        }
        Ok(Self { kind, factors })
    }

    /// Look up the multiplier for a category
    pub fn get(&self, level: FactorLevel) -> Result<f64> {
        self.get_key(level.as_str())
    }

    /// Look up the multiplier for an arbitrary category name
    pub fn get_key(&self, key: &str) -> Result<f64> {
        self.factors
            .get(key)
            .copied()
            .ok_or_else(|| Error::UnknownFactorKey {
                table: self.kind.to_string(),
                key: key.to_string(),
            })
    }

    /// Which table this is
    pub fn kind(&self) -> FactorKind {
        self.kind
    }

    /// Entries sorted by category name
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.factors.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the table has no categories
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Both factor tables from one reference document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceData {
    /// Value factors
    pub value_factors: FactorTable,
    /// Emission factors
    pub emission_factors: FactorTable,
}

impl ReferenceData {
    /// Extract both tables from a parsed reference document
    pub fn from_document(root: &Element) -> Result<Self> {
        Ok(Self {
            value_factors: load_table(root, FactorKind::Value)?,
            emission_factors: load_table(root, FactorKind::Emission)?,
        })
    }

    /// Parse reference data from XML text
    pub fn parse(xml: &str) -> Result<Self> {
        Self::from_document(&Element::parse(xml)?)
    }

    /// Read and parse a reference document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading reference data from {}", path.display());

        let contents = std::fs::read_to_string(path)?;
        let reference = Self::parse(&contents)?;

        tracing::info!(
            value_factors = reference.value_factors.len(),
            emission_factors = reference.emission_factors.len(),
            "Loaded reference data from {}",
            path.display()
        );
        Ok(reference)
    }
}

fn load_table(root: &Element, kind: FactorKind) -> Result<FactorTable> {
    let section = if root.name == kind.section() {
        Some(root)
    } else {
        root.find(kind.section())
    };
    let section = section.ok_or_else(|| Error::MissingReferenceSection {
        section: kind.section().to_string(),
    })?;
    FactorTable::from_section(kind, section)
}
