//! Section data model rendered by the composer.

use serde::{Deserialize, Serialize};

use crate::layout::composer::{ComposeError, Composer};
use crate::layout::page::TextStyle;

/// Indent applied to bulleted lists inside a section.
const LIST_INDENT_MM: f32 = 5.0;
/// Left offset of the second column of key/value rows.
const RIGHT_COLUMN_MM: f32 = 90.0;
/// Space left after each section body.
const SECTION_GAP_MM: f32 = 6.0;

/// Column headers plus rows of stringified cells.
///
/// Every row has exactly as many cells as there are headers. The constructor
/// rejects anything else; a mismatched row is a caller error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Body font size in points.
    pub font_size_pt: f32,
}

impl TableSpec {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ComposeError> {
        let expected = headers.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ComposeError::RowArity {
                row,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            headers,
            rows,
            font_size_pt: 10.0,
        })
    }

    pub fn with_font_size(mut self, font_size_pt: f32) -> Self {
        self.font_size_pt = font_size_pt;
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "kebab-case")]
pub enum SectionBody {
    Paragraph(String),
    BulletedList(Vec<String>),
    KeyValuePairs(Vec<(String, String)>),
    Table(TableSpec),
}

/// A titled block of content. Built fresh for each generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSection {
    pub title: Option<String>,
    pub body: SectionBody,
}

impl DocumentSection {
    pub fn new(title: impl Into<String>, body: SectionBody) -> Self {
        Self {
            title: Some(title.into()),
            body,
        }
    }

    pub fn untitled(body: SectionBody) -> Self {
        Self { title: None, body }
    }

    /// True when rendering the body would draw nothing.
    pub fn is_blank(&self) -> bool {
        match &self.body {
            SectionBody::Paragraph(text) => text.trim().is_empty(),
            SectionBody::BulletedList(items) => items.iter().all(|i| i.trim().is_empty()),
            SectionBody::KeyValuePairs(pairs) => pairs.is_empty(),
            SectionBody::Table(_) => false,
        }
    }
}

/// Renders sections in order against one composer.
///
/// Sections whose body is blank are skipped together with their title.
pub fn render_sections(
    composer: &mut Composer,
    sections: &[DocumentSection],
) -> Result<(), ComposeError> {
    let content_width = composer.config().content_width_mm();

    for section in sections.iter().filter(|s| !s.is_blank()) {
        if let Some(title) = &section.title {
            composer.write_heading(title, TextStyle::subsection())?;
            composer.advance(1.0);
        }

        match &section.body {
            SectionBody::Paragraph(text) => {
                composer.write_wrapped_paragraph(text, content_width)?;
            }
            SectionBody::BulletedList(items) => {
                composer.write_bulleted_list(items, LIST_INDENT_MM)?;
            }
            SectionBody::KeyValuePairs(pairs) => {
                composer.write_key_value_rows(pairs, RIGHT_COLUMN_MM)?;
            }
            SectionBody::Table(spec) => {
                composer.write_table(spec, spec.font_size_pt)?;
            }
        }
        composer.advance(SECTION_GAP_MM);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;
    use crate::layout::page::UnitKind;

    #[test]
    fn test_table_spec_rejects_mismatched_row() {
        let err = TableSpec::new(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        )
        .unwrap_err();
        match err {
            ComposeError::RowArity {
                row,
                expected,
                actual,
            } => {
                assert_eq!((row, expected, actual), (1, 2, 1));
            }
            other => panic!("expected RowArity, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_sections_are_skipped_with_their_title() {
        let mut composer = Composer::begin_document(default_page_config(20.0), "t");
        let sections = vec![
            DocumentSection::new("Recommended Herbs", SectionBody::BulletedList(vec!["".into()])),
            DocumentSection::new("Health Goals", SectionBody::Paragraph("  ".into())),
            DocumentSection::new(
                "Dietary Guidelines",
                SectionBody::BulletedList(vec!["Avoid cold water".into()]),
            ),
        ];
        render_sections(&mut composer, &sections).unwrap();

        let page = &composer.pages()[0];
        assert_eq!(page.count_units(UnitKind::Heading), 1);
        assert_eq!(page.count_units(UnitKind::Bullet), 1);
        let texts: Vec<&str> = page.texts().collect();
        assert_eq!(texts, vec!["Dietary Guidelines", "• Avoid cold water"]);
    }

    #[test]
    fn test_sections_render_in_order() {
        let mut composer = Composer::begin_document(default_page_config(20.0), "t");
        let table = TableSpec::new(vec!["Col".into()], vec![vec!["cell".into()]]).unwrap();
        let sections = vec![
            DocumentSection::untitled(SectionBody::Paragraph("intro".into())),
            DocumentSection::new("Table", SectionBody::Table(table)),
        ];
        render_sections(&mut composer, &sections).unwrap();
        let texts: Vec<&str> = composer.pages()[0].texts().collect();
        assert_eq!(texts, vec!["intro", "Table", "Col", "cell"]);
    }
}
