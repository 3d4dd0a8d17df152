//! Paginated document composer: greedy single-pass layout onto fixed-height pages.
//!
//! # Page-break rule
//! Before drawing any atomic unit (a heading, a wrapped line, a bullet item, a
//! key/value row, a table row) the composer compares `offset + unit_height`
//! against `page_height - margin`. If it exceeds, a new page is appended, the
//! offset resets to `margin`, and an open table re-emits its header row.
//! There is no look-ahead and no widow/orphan control.
//!
//! A unit taller than a whole printable page can never be placed and is
//! rejected with [`ComposeError::ContentTooLarge`].
//!
//! The composer is single-use: [`Composer::finalize_document`] consumes it.

use std::sync::LazyLock;

use bytes::Bytes;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::layout::font_metrics::{get_metrics, line_height_mm, FontFace, PageConfig};
use crate::layout::page::{DrawOp, Page, Rgb, TextStyle, UnitKind};
use crate::layout::pdf::encode_pdf;
use crate::layout::sections::TableSpec;
use crate::layout::wrap::wrap_text;

pub const BULLET: &str = "•";

/// Fraction of a line's height between its top and the text baseline.
const BASELINE_RATIO: f32 = 0.72;
/// Inner padding of table cells, in millimetres.
const CELL_PADDING_MM: f32 = 2.0;
const HEADER_FILL: Rgb = Rgb::TEAL;
const STRIPE_FILL: Rgb = Rgb::new(245, 245, 245);
/// Gap between the two columns of a key/value row.
const KEY_VALUE_GAP_MM: f32 = 5.0;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("table row {row} has {actual} cells but the header has {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("table has no columns")]
    EmptyTable,

    #[error("content unit of {height_mm:.1}mm cannot fit a printable page of {available_mm:.1}mm")]
    ContentTooLarge { height_mm: f32, available_mm: f32 },

    #[error("PDF encoding failed: {0}")]
    Encoding(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

/// Vertical position tracker threaded through one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderCursor {
    /// Distance from the top edge of the current page to the next free line.
    pub offset_mm: f32,
    pub page_index: usize,
    pub page_height_mm: f32,
    pub margin_mm: f32,
}

impl RenderCursor {
    /// A fresh cursor positioned at `margin` on page 0.
    pub fn begin_document(page_height_mm: f32, margin_mm: f32) -> Self {
        Self {
            offset_mm: margin_mm,
            page_index: 0,
            page_height_mm,
            margin_mm,
        }
    }

    /// Lowest offset any unit may reach on a page.
    pub fn usable_bottom_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    pub fn fits(&self, unit_height_mm: f32) -> bool {
        self.offset_mm + unit_height_mm <= self.usable_bottom_mm()
    }

    fn next_page(&mut self) {
        self.page_index += 1;
        self.offset_mm = self.margin_mm;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Artifact
// ────────────────────────────────────────────────────────────────────────────

/// The finished binary document, ready to be served as a download.
#[derive(Debug, Clone)]
pub struct DownloadableArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub page_count: usize,
    pub bytes: Bytes,
}

/// Replaces every whitespace run with a single underscore.
pub fn sanitize_filename(suggested: &str) -> String {
    WHITESPACE_RUN.replace_all(suggested, "_").into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

pub struct Composer {
    config: PageConfig,
    title: String,
    cursor: RenderCursor,
    pages: Vec<Page>,
}

impl Composer {
    pub fn begin_document(config: PageConfig, title: impl Into<String>) -> Self {
        let cursor = RenderCursor::begin_document(config.height_mm, config.margin_mm);
        Self {
            config,
            title: title.into(),
            cursor,
            pages: vec![Page::default()],
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> &RenderCursor {
        &self.cursor
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Adds vertical space without drawing. Never breaks on its own; the next
    /// unit that does not fit will.
    pub fn advance(&mut self, mm: f32) {
        self.cursor.offset_mm += mm;
    }

    /// Ends the current page and starts a new one.
    pub fn page_break(&mut self) {
        self.cursor.next_page();
        self.pages.push(Page::default());
        debug!(page = self.cursor.page_index, "composer page break");
    }

    /// Applies the page-break rule for a unit of `height_mm`.
    fn ensure_room(&mut self, height_mm: f32) -> Result<(), ComposeError> {
        let available_mm = self.config.printable_height_mm();
        if height_mm > available_mm {
            return Err(ComposeError::ContentTooLarge {
                height_mm,
                available_mm,
            });
        }
        if !self.cursor.fits(height_mm) {
            self.page_break();
        }
        Ok(())
    }

    fn current_page(&mut self) -> &mut Page {
        // begin_document seeds page 0 and page_break always pushes.
        let idx = self.pages.len() - 1;
        &mut self.pages[idx]
    }

    fn draw_text(&mut self, x_mm: f32, baseline_mm: f32, text: String, style: TextStyle) {
        self.current_page().ops.push(DrawOp::Text {
            x_mm,
            baseline_mm,
            text,
            style,
        });
    }

    fn fill_rect(&mut self, x_mm: f32, top_mm: f32, width_mm: f32, height_mm: f32, color: Rgb) {
        self.current_page().ops.push(DrawOp::FillRect {
            x_mm,
            top_mm,
            width_mm,
            height_mm,
            color,
        });
    }

    fn mark(&mut self, unit: UnitKind) {
        self.current_page().units.push(unit);
    }

    // ── Headings ────────────────────────────────────────────────────────────

    pub fn write_heading(&mut self, text: &str, style: TextStyle) -> Result<(), ComposeError> {
        self.write_heading_at(text, 0.0, style)
    }

    /// Heading indented by `indent_mm` from the left margin.
    pub fn write_heading_at(
        &mut self,
        text: &str,
        indent_mm: f32,
        style: TextStyle,
    ) -> Result<(), ComposeError> {
        let height = line_height_mm(style.size_pt);
        self.ensure_room(height)?;

        let x = self.config.margin_mm + indent_mm;
        let baseline = self.cursor.offset_mm + height * BASELINE_RATIO;
        self.draw_text(x, baseline, text.to_string(), style);
        self.mark(UnitKind::Heading);
        self.cursor.offset_mm += height;
        Ok(())
    }

    // ── Paragraphs ──────────────────────────────────────────────────────────

    /// Wraps `text` in the body font to `max_width_mm` and draws it at the left margin.
    ///
    /// Returns the number of lines drawn.
    pub fn write_wrapped_paragraph(
        &mut self,
        text: &str,
        max_width_mm: f32,
    ) -> Result<usize, ComposeError> {
        let style = TextStyle::body(self.config.body_font_size_pt);
        self.write_paragraph_styled(text, 0.0, max_width_mm, style)
    }

    /// Paragraph with an explicit indent and style. Each wrapped line is its own unit.
    pub fn write_paragraph_styled(
        &mut self,
        text: &str,
        indent_mm: f32,
        max_width_mm: f32,
        style: TextStyle,
    ) -> Result<usize, ComposeError> {
        let metrics = get_metrics(style.face);
        let lines = wrap_text(text, metrics, style.size_pt, max_width_mm);
        let height = line_height_mm(style.size_pt);
        let x = self.config.margin_mm + indent_mm;

        for line in &lines {
            self.ensure_room(height)?;
            let baseline = self.cursor.offset_mm + height * BASELINE_RATIO;
            self.draw_text(x, baseline, line.clone(), style);
            self.mark(UnitKind::Line);
            self.cursor.offset_mm += height;
        }
        Ok(lines.len())
    }

    // ── Bulleted lists ──────────────────────────────────────────────────────

    /// Draws every non-blank item as one bullet unit, indented by `indent_mm`.
    ///
    /// Items are wrapped to the remaining content width; continuation lines hang
    /// under the item text. A whole item moves to the next page together.
    /// Returns the number of bullets drawn.
    pub fn write_bulleted_list(
        &mut self,
        items: &[String],
        indent_mm: f32,
    ) -> Result<usize, ComposeError> {
        let style = TextStyle::body(self.config.body_font_size_pt);
        let metrics = get_metrics(style.face);
        let height = line_height_mm(style.size_pt);

        let bullet_prefix = format!("{BULLET} ");
        let hang_mm = metrics.measure_mm(&bullet_prefix, style.size_pt);
        let x = self.config.margin_mm + indent_mm;
        let text_width = (self.config.content_width_mm() - indent_mm - hang_mm).max(0.0);

        let mut drawn = 0;
        for item in items.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
            let lines = wrap_text(item, metrics, style.size_pt, text_width);
            self.ensure_room(height * lines.len() as f32)?;

            for (i, line) in lines.into_iter().enumerate() {
                let baseline = self.cursor.offset_mm + height * BASELINE_RATIO;
                if i == 0 {
                    self.draw_text(x, baseline, format!("{bullet_prefix}{line}"), style);
                } else {
                    self.draw_text(x + hang_mm, baseline, line, style);
                }
                self.cursor.offset_mm += height;
            }
            self.mark(UnitKind::Bullet);
            drawn += 1;
        }
        Ok(drawn)
    }

    // ── Key/value rows ──────────────────────────────────────────────────────

    /// Lays `pairs` out two per row as `Key: value`, the second column starting
    /// at `right_column_mm` from the left margin. Each row is one unit.
    pub fn write_key_value_rows(
        &mut self,
        pairs: &[(String, String)],
        right_column_mm: f32,
    ) -> Result<(), ComposeError> {
        let style = TextStyle::body(self.config.body_font_size_pt);
        let metrics = get_metrics(style.face);
        let height = line_height_mm(style.size_pt);
        let left_width = (right_column_mm - KEY_VALUE_GAP_MM).max(0.0);
        let right_width = (self.config.content_width_mm() - right_column_mm).max(0.0);

        for row in pairs.chunks(2) {
            let cells: Vec<(f32, Vec<String>)> = row
                .iter()
                .zip([(0.0, left_width), (right_column_mm, right_width)])
                .map(|((key, value), (offset, width))| {
                    let text = format!("{key}: {value}");
                    (offset, wrap_text(&text, metrics, style.size_pt, width))
                })
                .collect();

            let line_count = cells.iter().map(|(_, l)| l.len()).max().unwrap_or(0).max(1);
            self.ensure_room(height * line_count as f32)?;

            let top = self.cursor.offset_mm;
            for (offset, lines) in cells {
                for (i, line) in lines.into_iter().enumerate() {
                    let baseline = top + height * (i as f32 + BASELINE_RATIO);
                    self.draw_text(self.config.margin_mm + offset, baseline, line, style);
                }
            }
            self.mark(UnitKind::KeyValueRow);
            self.cursor.offset_mm += height * line_count as f32;
        }
        Ok(())
    }

    // ── Tables ──────────────────────────────────────────────────────────────

    /// Draws a header row followed by every data row at `font_size_pt`.
    ///
    /// Column widths are an equal split of the content width, shared by the
    /// header and all rows. A row that does not fit starts a new page that
    /// opens with a repeated header. The header is never left alone at the
    /// bottom of a page.
    pub fn write_table(&mut self, spec: &TableSpec, font_size_pt: f32) -> Result<(), ComposeError> {
        let columns = spec.column_count();
        if columns == 0 {
            return Err(ComposeError::EmptyTable);
        }

        let col_width = self.config.content_width_mm() / columns as f32;
        let header_style = TextStyle::new(font_size_pt, FontFace::HelveticaBold, Rgb::WHITE);
        let body_style = TextStyle::body(font_size_pt);

        let header = layout_row(spec.headers(), col_width, header_style);
        let rows: Vec<LaidOutRow> = spec
            .rows()
            .iter()
            .map(|r| layout_row(r, col_width, body_style))
            .collect();

        let first_row_height = rows.first().map(|r| r.height_mm).unwrap_or(0.0);
        self.ensure_room(header.height_mm + first_row_height)?;
        self.draw_table_header(&header, col_width, header_style);

        for (i, row) in rows.iter().enumerate() {
            let available_mm = self.config.printable_height_mm();
            if header.height_mm + row.height_mm > available_mm {
                return Err(ComposeError::ContentTooLarge {
                    height_mm: header.height_mm + row.height_mm,
                    available_mm,
                });
            }
            if !self.cursor.fits(row.height_mm) {
                self.page_break();
                self.draw_table_header(&header, col_width, header_style);
            }

            if i % 2 == 1 {
                let (x, top, width) = (
                    self.config.margin_mm,
                    self.cursor.offset_mm,
                    self.config.content_width_mm(),
                );
                self.fill_rect(x, top, width, row.height_mm, STRIPE_FILL);
            }
            self.draw_row_cells(row, col_width, body_style);
            self.mark(UnitKind::TableRow);
            self.cursor.offset_mm += row.height_mm;
        }
        Ok(())
    }

    fn draw_table_header(&mut self, header: &LaidOutRow, col_width: f32, style: TextStyle) {
        let (x, top, width) = (
            self.config.margin_mm,
            self.cursor.offset_mm,
            self.config.content_width_mm(),
        );
        self.fill_rect(x, top, width, header.height_mm, HEADER_FILL);
        self.draw_row_cells(header, col_width, style);
        self.mark(UnitKind::TableHeader);
        self.cursor.offset_mm += header.height_mm;
    }

    fn draw_row_cells(&mut self, row: &LaidOutRow, col_width: f32, style: TextStyle) {
        let line_h = line_height_mm(style.size_pt);
        let top = self.cursor.offset_mm;
        for (col, lines) in row.cells.iter().enumerate() {
            let x = self.config.margin_mm + col as f32 * col_width + CELL_PADDING_MM;
            for (i, line) in lines.iter().enumerate() {
                let baseline = top + CELL_PADDING_MM + line_h * (i as f32 + BASELINE_RATIO);
                self.draw_text(x, baseline, line.clone(), style);
            }
        }
    }

    // ── Finalize ────────────────────────────────────────────────────────────

    /// Encodes every page drawn so far, in order, and names the artifact.
    pub fn finalize_document(
        self,
        suggested_filename: &str,
    ) -> Result<DownloadableArtifact, ComposeError> {
        let filename = sanitize_filename(suggested_filename);
        let bytes = encode_pdf(&self.title, &self.config, &self.pages)?;
        debug!(
            filename = %filename,
            pages = self.pages.len(),
            size = bytes.len(),
            "document finalized"
        );
        Ok(DownloadableArtifact {
            filename,
            content_type: "application/pdf",
            page_count: self.pages.len(),
            bytes: Bytes::from(bytes),
        })
    }
}

/// A table row with every cell already wrapped to its column.
struct LaidOutRow {
    cells: Vec<Vec<String>>,
    height_mm: f32,
}

fn layout_row(cells: &[String], col_width: f32, style: TextStyle) -> LaidOutRow {
    let metrics = get_metrics(style.face);
    let inner_width = (col_width - 2.0 * CELL_PADDING_MM).max(0.0);
    let cells: Vec<Vec<String>> = cells
        .iter()
        .map(|c| wrap_text(c, metrics, style.size_pt, inner_width))
        .collect();
    let line_count = cells.iter().map(|c| c.len()).max().unwrap_or(0).max(1);
    LaidOutRow {
        height_mm: line_count as f32 * line_height_mm(style.size_pt) + 2.0 * CELL_PADDING_MM,
        cells,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    fn composer() -> Composer {
        Composer::begin_document(default_page_config(20.0), "Test")
    }

    fn table(rows: usize) -> TableSpec {
        TableSpec::new(
            vec!["Date".into(), "Water".into(), "Status".into()],
            (0..rows)
                .map(|i| vec![format!("day {i}"), "2000".into(), "Good".into()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_begin_document_positions_cursor_at_margin() {
        let cursor = RenderCursor::begin_document(297.0, 20.0);
        assert_eq!(cursor.offset_mm, 20.0);
        assert_eq!(cursor.page_index, 0);
        assert_eq!(cursor.usable_bottom_mm(), 277.0);
    }

    #[test]
    fn test_heading_advances_by_scaled_line_height() {
        let mut c = composer();
        c.write_heading("Daily Meal Plan", TextStyle::section()).unwrap();
        let expected = 20.0 + line_height_mm(16.0);
        assert!((c.cursor().offset_mm - expected).abs() < 1e-4);
        assert_eq!(c.pages()[0].count_units(UnitKind::Heading), 1);
    }

    #[test]
    fn test_heading_breaks_when_cursor_past_bottom() {
        let mut c = composer();
        c.advance(300.0);
        c.write_heading("Lifestyle", TextStyle::subsection()).unwrap();
        assert_eq!(c.pages().len(), 2);
        assert_eq!(c.cursor().page_index, 1);
        assert_eq!(c.pages()[1].count_units(UnitKind::Heading), 1);
    }

    #[test]
    fn test_paragraph_lines_break_across_pages_without_loss() {
        let mut c = composer();
        let sentence = "Eat warm cooked meals at regular times every day. ";
        let text = sentence.repeat(120);
        let drawn = c.write_wrapped_paragraph(&text, 170.0).unwrap();

        assert!(c.pages().len() > 1, "long paragraph should span pages");
        let total: usize = c.pages().iter().map(|p| p.count_units(UnitKind::Line)).sum();
        assert_eq!(total, drawn);

        let joined: Vec<&str> = c.pages().iter().flat_map(|p| p.texts()).collect();
        assert_eq!(joined.join(" "), text.trim_end());
    }

    #[test]
    fn test_no_unit_crosses_bottom_margin() {
        let mut c = composer();
        let text = "word ".repeat(2000);
        c.write_wrapped_paragraph(&text, 170.0).unwrap();
        for page in c.pages() {
            for op in &page.ops {
                if let DrawOp::Text { baseline_mm, .. } = op {
                    assert!(*baseline_mm <= 277.0, "baseline {baseline_mm} below margin");
                }
            }
        }
    }

    #[test]
    fn test_bulleted_list_skips_blank_items() {
        let mut c = composer();
        let items = vec![
            "Triphala at bedtime".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Ginger tea".to_string(),
        ];
        let drawn = c.write_bulleted_list(&items, 5.0).unwrap();
        assert_eq!(drawn, 2);
        assert_eq!(c.pages()[0].count_units(UnitKind::Bullet), 2);
        let texts: Vec<&str> = c.pages()[0].texts().collect();
        assert_eq!(texts, vec!["• Triphala at bedtime", "• Ginger tea"]);
    }

    #[test]
    fn test_empty_bulleted_list_does_not_move_cursor() {
        let mut c = composer();
        let before = c.cursor().clone();
        assert_eq!(c.write_bulleted_list(&[], 5.0).unwrap(), 0);
        assert_eq!(c.write_bulleted_list(&["  ".to_string()], 5.0).unwrap(), 0);
        assert_eq!(c.cursor(), &before);
        assert!(c.pages()[0].ops.is_empty());
    }

    #[test]
    fn test_table_header_repeats_on_every_page_with_rows() {
        let mut c = composer();
        c.write_table(&table(120), 10.0).unwrap();
        assert!(c.pages().len() > 1, "120 rows should span pages");

        let mut total_rows = 0;
        for page in c.pages() {
            let rows = page.count_units(UnitKind::TableRow);
            total_rows += rows;
            if rows > 0 {
                assert_eq!(page.count_units(UnitKind::TableHeader), 1);
                assert_eq!(page.units.first(), Some(&UnitKind::TableHeader));
            }
        }
        assert_eq!(total_rows, 120);
    }

    #[test]
    fn test_table_header_not_orphaned_at_page_bottom() {
        let mut c = composer();
        // Leave room for less than header + one row.
        c.advance(250.0);
        c.write_table(&table(3), 10.0).unwrap();
        assert_eq!(c.pages().len(), 2);
        assert_eq!(c.pages()[0].count_units(UnitKind::TableHeader), 0);
        assert_eq!(c.pages()[1].count_units(UnitKind::TableHeader), 1);
    }

    #[test]
    fn test_table_without_columns_is_rejected() {
        let spec = TableSpec::new(vec![], vec![]).unwrap();
        let mut c = composer();
        assert!(matches!(
            c.write_table(&spec, 10.0),
            Err(ComposeError::EmptyTable)
        ));
    }

    #[test]
    fn test_unit_taller_than_page_is_rejected() {
        let mut c = composer();
        let items = vec!["word ".repeat(3000)];
        let err = c.write_bulleted_list(&items, 0.0).unwrap_err();
        assert!(matches!(err, ComposeError::ContentTooLarge { .. }));
    }

    #[test]
    fn test_key_value_rows_two_per_row() {
        let mut c = composer();
        let pairs = vec![
            ("Name".to_string(), "Priya Sharma".to_string()),
            ("Age".to_string(), "32".to_string()),
            ("Constitution".to_string(), "Vata-Pitta".to_string()),
        ];
        c.write_key_value_rows(&pairs, 90.0).unwrap();
        assert_eq!(c.pages()[0].count_units(UnitKind::KeyValueRow), 2);
        let texts: Vec<&str> = c.pages()[0].texts().collect();
        assert_eq!(
            texts,
            vec!["Name: Priya Sharma", "Age: 32", "Constitution: Vata-Pitta"]
        );
    }

    #[test]
    fn test_sanitize_filename_collapses_whitespace_runs() {
        assert_eq!(
            sanitize_filename("Priya Sharma_Diet_Chart.pdf"),
            "Priya_Sharma_Diet_Chart.pdf"
        );
        assert_eq!(sanitize_filename("a \t  b\nc.pdf"), "a_b_c.pdf");
        assert_eq!(sanitize_filename("HealthSummary.pdf"), "HealthSummary.pdf");
    }

    #[test]
    fn test_finalize_produces_pdf_bytes() {
        let mut c = composer();
        c.write_heading("Health Tracker Summary", TextStyle::section()).unwrap();
        c.write_table(&table(60), 10.0).unwrap();
        let pages = c.pages().len();
        let artifact = c.finalize_document("Health Summary.pdf").unwrap();
        assert_eq!(artifact.filename, "Health_Summary.pdf");
        assert_eq!(artifact.content_type, "application/pdf");
        assert_eq!(artifact.page_count, pages);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}
