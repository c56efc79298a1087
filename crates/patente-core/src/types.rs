//! Shared record types for the vehicle lookup pipeline.
//!
//! These types form the stable contract consumed by presentation and
//! history collaborators: field names serialize in the external camelCase
//! shape, and string fields are total — absent data is represented by
//! sentinel placeholders instead of missing fields.

use crate::plate::PlateNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for vehicle fields the source did not provide.
pub const UNAVAILABLE: &str = "No disponible";

/// Sentinel for a report date the source did not provide.
pub const UNKNOWN_DATE: &str = "Fecha desconocida";

/// Sentinel for a report location the source did not provide.
pub const UNKNOWN_LOCATION: &str = "Ubicación desconocida";

/// Descriptive vehicle attributes.
///
/// String fields default to [`UNAVAILABLE`] rather than being absent, so
/// the record stays total over accessed sub-fields. `year` is the one
/// exception: it is `None` unless the source produced a valid 4-digit year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    /// Manufacturer, e.g. "Kia".
    pub make: String,
    /// Model, e.g. "Rio".
    pub model: String,
    /// Four-digit model year, if known.
    pub year: Option<i32>,
    /// Color, e.g. "Negro".
    pub color: String,
}

impl VehicleInfo {
    /// All-sentinel vehicle info for lookups that returned no data.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            make: UNAVAILABLE.to_string(),
            model: UNAVAILABLE.to_string(),
            year: None,
            color: UNAVAILABLE.to_string(),
        }
    }
}

/// Details of a theft report attached to a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    /// Date of the report as shown by the source.
    pub report_date: String,
    /// Location of the report as shown by the source.
    pub report_location: String,
}

impl ReportInfo {
    /// All-sentinel report info for reported vehicles with no detail.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            report_date: UNKNOWN_DATE.to_string(),
            report_location: UNKNOWN_LOCATION.to_string(),
        }
    }
}

/// A single lookup result for one plate, immutable once constructed.
///
/// Invariant: `report_info` is present if and only if `is_reported` is
/// true. The constructors below are the only intended way to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Canonical plate identifier this record describes.
    pub plate_number: PlateNumber,
    /// Whether the vehicle carries an active theft report.
    #[serde(rename = "isStolen")]
    pub is_reported: bool,
    /// Descriptive vehicle attributes (sentinel-defaulted).
    pub vehicle_info: VehicleInfo,
    /// Theft report details; present exactly when `is_reported` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_info: Option<ReportInfo>,
    /// Source-level confidence in this record, 0-100.
    pub confidence: f32,
    /// Which provider produced the record.
    pub source: String,
}

impl VehicleRecord {
    /// A record for a vehicle with no active theft report.
    #[must_use]
    pub fn clean(
        plate_number: PlateNumber,
        vehicle_info: VehicleInfo,
        confidence: f32,
        source: impl Into<String>,
    ) -> Self {
        Self {
            plate_number,
            is_reported: false,
            vehicle_info,
            report_info: None,
            confidence,
            source: source.into(),
        }
    }

    /// A record for a vehicle with an active theft report.
    #[must_use]
    pub fn reported(
        plate_number: PlateNumber,
        vehicle_info: VehicleInfo,
        report_info: ReportInfo,
        confidence: f32,
        source: impl Into<String>,
    ) -> Self {
        Self {
            plate_number,
            is_reported: true,
            vehicle_info,
            report_info: Some(report_info),
            confidence,
            source: source.into(),
        }
    }

    /// The definitive "no results" record.
    ///
    /// The absence of data is itself a high-confidence result, so
    /// confidence is fixed at 100.
    #[must_use]
    pub fn not_found(plate_number: PlateNumber, source: impl Into<String>) -> Self {
        Self::clean(plate_number, VehicleInfo::unavailable(), 100.0, source)
    }
}

/// The externally visible lookup response.
///
/// Flattens the record and adds verification metadata; this is the shape
/// presentation and history collaborators consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleReport {
    /// The underlying record.
    #[serde(flatten)]
    pub record: VehicleRecord,
    /// How the record was obtained: "api", "scraper", "simulation" or "cache".
    pub verification_method: String,
    /// When the lookup completed.
    pub verification_time: Timestamp,
    /// Informational disclaimer for presentation, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    /// OCR confidence passed through unchanged when the plate came from a
    /// captured image; never recomputed here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f32>,
}

/// Text produced by the optical-character collaborator.
///
/// The pipeline consumes `text` for normalization and carries `confidence`
/// through to [`VehicleReport::ocr_confidence`] untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrReading {
    /// Raw recognized text, possibly noisy.
    pub text: String,
    /// Recognition confidence as reported by the OCR engine.
    pub confidence: f32,
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
