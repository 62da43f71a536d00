//! Output document writer
//!
//! Serializes a [`GenerationReport`] as:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <GenerationOutput xmlns:xsi="..." xmlns:xsd="...">
//!   <Totals>
//!     <Generator><Name>..</Name><Total>..</Total></Generator>
//!   </Totals>
//!   <MaxEmissionGenerators>
//!     <Day><Name>..</Name><Date>..</Date><Emission>..</Emission></Day>
//!   </MaxEmissionGenerators>
//!   <ActualHeatRates>
//!     <ActualHeatRate><Name>..</Name><HeatRate>..</HeatRate></ActualHeatRate>
//!   </ActualHeatRates>
//! </GenerationOutput>
//! ```
//!
//! Totals and emissions use fixed nine-decimal notation; heat rates use the
//! shortest representation that round-trips.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fmt::Display;
use std::io::Write;

use crate::engine::GenerationReport;
use crate::error::{Error, Result};

/// Root element of the output document
pub const ROOT_ELEMENT: &str = "GenerationOutput";

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Render the report as an XML document
pub fn render(report: &GenerationReport) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_error)?;

    let root = BytesStart::new(ROOT_ELEMENT)
        .with_attributes([("xmlns:xsi", XSI_NAMESPACE), ("xmlns:xsd", XSD_NAMESPACE)]);
    writer.write_event(Event::Start(root)).map_err(write_error)?;

    let totals: Vec<_> = report
        .totals
        .iter()
        .map(|t| vec![("Name", t.name.clone()), ("Total", format_fixed(t.total))])
        .collect();
    write_section(&mut writer, "Totals", "Generator", &totals)?;

    let maxima: Vec<_> = report
        .max_emissions
        .iter()
        .map(|m| {
            vec![
                ("Name", m.name.clone()),
                ("Date", m.date.clone()),
                ("Emission", format_fixed(m.emission)),
            ]
        })
        .collect();
    write_section(&mut writer, "MaxEmissionGenerators", "Day", &maxima)?;

    let heat_rates: Vec<_> = report
        .heat_rates
        .iter()
        .map(|h| vec![("Name", h.name.clone()), ("HeatRate", format_default(h.heat_rate))])
        .collect();
    write_section(&mut writer, "ActualHeatRates", "ActualHeatRate", &heat_rates)?;

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(write_error)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(write_error)
}

/// Fixed-point notation with nine decimals
pub fn format_fixed(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.9}")
    } else {
        format_default(value)
    }
}

/// Shortest round-trip notation; non-finite values use the XML Schema
/// spellings `INF`, `-INF` and `NaN`
pub fn format_default(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

type Record<'a> = Vec<(&'a str, String)>;

fn write_section<W: Write>(
    writer: &mut Writer<W>,
    section: &str,
    item: &str,
    records: &[Record<'_>],
) -> Result<()> {
    if records.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(section)))
            .map_err(write_error);
    }

    writer
        .write_event(Event::Start(BytesStart::new(section)))
        .map_err(write_error)?;
    for record in records {
        writer
            .write_event(Event::Start(BytesStart::new(item)))
            .map_err(write_error)?;
        for (field, value) in record {
            writer
                .create_element(*field)
                .write_text_content(BytesText::new(value))
                .map_err(write_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(item)))
            .map_err(write_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(section)))
        .map_err(write_error)
}

fn write_error(err: impl Display) -> Error {
    Error::XmlWrite {
        message: err.to_string(),
    }
}
