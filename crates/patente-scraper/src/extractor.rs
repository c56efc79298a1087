//! Best-effort field extraction from the results page.
//!
//! Each field is scraped by a named extractor over the concatenated text
//! of a small set of candidate result regions. Extraction is best-effort
//! per field: a missing marker keeps the sentinel default instead of
//! failing the whole record. Patterns are isolated here so they can be
//! swapped when the target site's layout changes without touching the
//! navigation logic.

use patente_core::{
    PlateNumber, ReportInfo, VehicleInfo, VehicleRecord, UNAVAILABLE, UNKNOWN_DATE,
    UNKNOWN_LOCATION,
};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Fixed confidence for records extracted from the target site. The
/// extraction heuristic itself, not per-field certainty, is the limiting
/// factor, so this is a constant rather than a computed score.
pub const SCRAPE_CONFIDENCE: f32 = 98.0;

/// Source label attached to extracted records.
pub const SOURCE: &str = "patentechile.com";

/// Regions that carry an explicit "no results" marker.
const NO_RESULTS_REGIONS: &str = ".no-results-message, .error-message";

/// Regions styled as alerts whose text flags an active theft report.
const REPORT_STATUS_REGIONS: &str = ".stolen-status, .alert-danger, .text-danger";

/// Candidate regions carrying the vehicle description fields.
const VEHICLE_INFO_REGIONS: &str = ".vehicle-info, .card-body, .result-item";

/// Candidate regions carrying theft report details.
const REPORT_INFO_REGIONS: &str = ".report-info, .alert-info, .stolen-details";

/// Keywords that mark a vehicle as reported when found in a status region.
const REPORT_KEYWORDS: [&str; 2] = ["ROBADO", "ENCARGO"];

fn make_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Marca:\s*([^\n,]+)").expect("valid regex"))
}

fn model_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Modelo:\s*([^\n,]+)").expect("valid regex"))
}

fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Año:\s*(\d{4})").expect("valid regex"))
}

fn color_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Color:\s*([^\n,]+)").expect("valid regex"))
}

fn report_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Fecha:\s*([^\n,]+)").expect("valid regex"))
}

fn report_location_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:Lugar|Ubicación):\s*([^\n,]+)").expect("valid regex"))
}

/// Extract a vehicle record from the rendered results page.
///
/// Caller must have already confirmed the page is a loaded, non-blocked
/// results page. Never fails: absent fields keep their sentinel defaults
/// so partial data stays explicit rather than hidden.
#[must_use]
pub fn extract(html: &str, plate: &PlateNumber) -> VehicleRecord {
    let document = Html::parse_document(html);

    // An explicit "no results" marker is a definitive answer
    if has_region(&document, NO_RESULTS_REGIONS) {
        tracing::debug!(plate = %plate, "no results marker present");
        return VehicleRecord::not_found(plate.clone(), SOURCE);
    }

    let vehicle_text = region_text(&document, VEHICLE_INFO_REGIONS);
    let vehicle_info = VehicleInfo {
        make: extract_make(&vehicle_text).unwrap_or_else(|| UNAVAILABLE.to_string()),
        model: extract_model(&vehicle_text).unwrap_or_else(|| UNAVAILABLE.to_string()),
        year: extract_year(&vehicle_text),
        color: extract_color(&vehicle_text).unwrap_or_else(|| UNAVAILABLE.to_string()),
    };

    if is_reported(&document) {
        let report_text = region_text(&document, REPORT_INFO_REGIONS);
        let report_info = ReportInfo {
            report_date: extract_report_date(&report_text)
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            report_location: extract_report_location(&report_text)
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        };
        VehicleRecord::reported(plate.clone(), vehicle_info, report_info, SCRAPE_CONFIDENCE, SOURCE)
    } else {
        VehicleRecord::clean(plate.clone(), vehicle_info, SCRAPE_CONFIDENCE, SOURCE)
    }
}

/// Manufacturer, from a "Marca:" marker up to the next delimiter.
fn extract_make(text: &str) -> Option<String> {
    capture_trimmed(make_pattern(), text)
}

/// Model, from a "Modelo:" marker.
fn extract_model(text: &str) -> Option<String> {
    capture_trimmed(model_pattern(), text)
}

/// Model year, from an "Año:" marker; must be exactly four digits.
fn extract_year(text: &str) -> Option<i32> {
    year_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Color, from a "Color:" marker.
fn extract_color(text: &str) -> Option<String> {
    capture_trimmed(color_pattern(), text)
}

/// Report date, from a "Fecha:" marker in a report region.
fn extract_report_date(text: &str) -> Option<String> {
    capture_trimmed(report_date_pattern(), text)
}

/// Report location, from a "Lugar:" or "Ubicación:" marker.
fn extract_report_location(text: &str) -> Option<String> {
    capture_trimmed(report_location_pattern(), text)
}

fn capture_trimmed(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Whether any report-styled region carries a theft keyword.
fn is_reported(document: &Html) -> bool {
    let text = region_text(document, REPORT_STATUS_REGIONS);
    REPORT_KEYWORDS.iter().any(|kw| text.contains(kw))
}

fn has_region(document: &Html, css: &str) -> bool {
    Selector::parse(css)
        .ok()
        .is_some_and(|selector| document.select(&selector).next().is_some())
}

/// Concatenated text of every element matching the selector group, with
/// a newline between elements so field markers never run together.
fn region_text(document: &Html, css: &str) -> String {
    let Ok(selector) = Selector::parse(css) else {
        return String::new();
    };
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
