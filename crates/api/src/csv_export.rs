// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of operatives.
//!
//! The output is meant to be opened directly in a spreadsheet: it starts with
//! a UTF-8 byte order mark and every field is quoted.

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use operativos_domain::{ConclusionData, Operative, Tallies, normalize_trimmed};
use thiserror::Error;

/// UTF-8 byte order mark written before the header row.
pub const UTF8_BOM: &str = "\u{feff}";

/// Column headers, in output order.
pub const EXPORT_HEADERS: [&str; 21] = [
    "ID",
    "TIPO",
    "ESTATUS DETALLADO",
    "ESTATUS",
    "FECHA",
    "HORA INICIO",
    "HORA CIERRE",
    "REGION",
    "CUADRANTE",
    "COLONIA",
    "CALLE",
    "COORDENADAS",
    "REPRESENTANTE",
    "TELEFONO_REP",
    "PARTICIPANTES",
    "REVISIONES_PERSONAS",
    "REVISIONES_TRANSPORTE_PUBLICO",
    "REVISIONES_PARTICULARES",
    "REVISIONES_MOTOCICLETAS",
    "DETENIDOS",
    "PETICIONES_VECINALES",
];

const IN_PROGRESS_STATUS: &str = "EN DESARROLLO";
const NO_CLOSE_TIME: &str = "--:--";

/// Errors that can occur while building an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A row could not be written.
    #[error("Failed to write CSV row: {0}")]
    Write(#[from] csv::Error),

    /// The writer could not be flushed into its buffer.
    #[error("Failed to finish CSV output: {0}")]
    Finish(String),

    /// The output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Inclusive date range applied to `startDate`. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Returns true if `start_date` lies inside the range.
    ///
    /// With no bounds every operative matches. With any bound, an
    /// unparseable date never matches.
    #[must_use]
    pub fn contains(&self, start_date: &str) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Ok(date) = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d") else {
            return false;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Renders `operatives` as CSV text, keeping only those inside `range`.
///
/// # Arguments
///
/// * `operatives` - The operatives the caller may see
/// * `range` - Inclusive date filter on the start date
///
/// # Returns
///
/// The CSV text, starting with a byte order mark.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_operatives(
    operatives: &[&Operative],
    range: DateRange,
) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for operative in operatives
        .iter()
        .filter(|operative| range.contains(&operative.start_date))
    {
        writer.write_record(export_row(operative))?;
    }

    let bytes: Vec<u8> = writer
        .into_inner()
        .map_err(|e| ExportError::Finish(e.to_string()))?;
    let body: String = String::from_utf8(bytes)?;
    Ok(format!("{UTF8_BOM}{body}"))
}

/// Builds the 21 cells of one export row.
#[must_use]
pub fn export_row(operative: &Operative) -> Vec<String> {
    let conclusion: Option<&ConclusionData> = operative.conclusion();
    let tallies: Tallies = conclusion.map_or(Tallies::ZERO, |c| c.tallies);
    let reunion = conclusion.and_then(|c| c.reunion_details.as_ref());

    let detailed_status: String = conclusion.map_or_else(
        || {
            operative
                .specific_type
                .clone()
                .filter(|specific| !specific.trim().is_empty())
                .unwrap_or_else(|| IN_PROGRESS_STATUS.to_string())
        },
        |c| c.result.as_str().to_string(),
    );

    let close_time: String = conclusion.map_or_else(
        || NO_CLOSE_TIME.to_string(),
        |c| c.concluded_at.format("%H:%M").to_string(),
    );

    let cells: [String; 21] = [
        operative.id.clone(),
        operative.operative_type.clone(),
        detailed_status,
        operative.status().as_str().to_string(),
        format_export_date(&operative.start_date),
        operative.start_time.clone(),
        close_time,
        operative.region.clone(),
        operative.quadrant.clone(),
        operative.location.colony.clone(),
        operative.location.street.clone(),
        format!(
            "{:.6}, {:.6}",
            operative.location.latitude, operative.location.longitude
        ),
        reunion.map(|r| r.representative_name.clone()).unwrap_or_default(),
        reunion.map(|r| r.phone.clone()).unwrap_or_default(),
        reunion
            .map(|r| r.participant_count.to_string())
            .unwrap_or_default(),
        tallies.people_checked.to_string(),
        tallies.public_transport_checked.to_string(),
        tallies.private_vehicles_checked.to_string(),
        tallies.motorcycles_checked.to_string(),
        conclusion
            .and_then(|c| c.detainees_count)
            .unwrap_or(0)
            .to_string(),
        reunion
            .map(|r| r.petitions.replace(['\r', '\n'], " "))
            .unwrap_or_default(),
    ];

    cells.iter().map(|cell| normalize_trimmed(cell)).collect()
}

/// Formats a stored `YYYY-MM-DD` date as `DD/MM/YYYY`, or returns it unchanged
/// when it does not parse.
#[must_use]
pub fn format_export_date(start_date: &str) -> String {
    NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d")
        .map_or_else(|_| start_date.to_string(), |date| date.format("%d/%m/%Y").to_string())
}
