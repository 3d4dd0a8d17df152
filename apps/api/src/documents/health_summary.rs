//! Health log → one-table summary document.

use crate::layout::{
    render_sections, ComposeError, Composer, DocumentSection, DownloadableArtifact, PageConfig,
    SectionBody, TableSpec, TextStyle,
};
use crate::tracker::log::HealthLogEntry;

pub const SUMMARY_TITLE: &str = "Health Tracker Summary";
pub const SUMMARY_FILENAME: &str = "HealthSummary.pdf";
const TABLE_FONT_SIZE_PT: f32 = 10.0;

const COLUMNS: [&str; 6] = [
    "Date",
    "Water Intake (ml)",
    "Blood Pressure",
    "Exercise (hrs)",
    "Blood Sugar (mg/dL)",
    "Improvements",
];

pub fn summary_table(entries: &[HealthLogEntry]) -> Result<TableSpec, ComposeError> {
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.date.format("%d/%m/%Y").to_string(),
                e.reading.water.clone(),
                e.reading.pressure.clone(),
                e.reading.time.clone(),
                e.reading.sugar.clone(),
                e.improvements.as_str().to_string(),
            ]
        })
        .collect();
    let headers = COLUMNS.iter().map(|c| c.to_string()).collect();
    Ok(TableSpec::new(headers, rows)?.with_font_size(TABLE_FONT_SIZE_PT))
}

/// Lays out the summary without encoding it. `None` when there is nothing to
/// summarize.
pub fn compose_health_summary(
    config: PageConfig,
    entries: &[HealthLogEntry],
) -> Result<Option<Composer>, ComposeError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut composer = Composer::begin_document(config, SUMMARY_TITLE);
    composer.write_heading(SUMMARY_TITLE, TextStyle::section())?;
    composer.advance(4.0);
    let sections = [DocumentSection::untitled(SectionBody::Table(summary_table(entries)?))];
    render_sections(&mut composer, &sections)?;
    Ok(Some(composer))
}

/// Produces `HealthSummary.pdf`, or `None` for an empty log.
pub fn build_health_summary(
    config: PageConfig,
    entries: &[HealthLogEntry],
) -> Result<Option<DownloadableArtifact>, ComposeError> {
    match compose_health_summary(config, entries)? {
        Some(composer) => composer.finalize_document(SUMMARY_FILENAME).map(Some),
        None => Ok(None),
    }
}
