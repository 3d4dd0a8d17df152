//! Display list produced by the composer and consumed by the PDF encoder.
//!
//! Coordinates are millimetres measured from the top-left corner of the page;
//! the encoder flips them into PDF's bottom-left space.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GRAY: Rgb = Rgb::new(100, 100, 100);
    pub const EMERALD: Rgb = Rgb::new(5, 150, 105);
    pub const TEAL: Rgb = Rgb::new(22, 160, 133);
}

/// Font size, face and color for one run of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size_pt: f32,
    pub face: FontFace,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(size_pt: f32, face: FontFace, color: Rgb) -> Self {
        Self {
            size_pt,
            face,
            color,
        }
    }

    /// Document title.
    pub const fn title() -> Self {
        Self::new(20.0, FontFace::HelveticaBold, Rgb::EMERALD)
    }

    pub const fn subtitle() -> Self {
        Self::new(12.0, FontFace::Helvetica, Rgb::GRAY)
    }

    /// Top-level section heading.
    pub const fn section() -> Self {
        Self::new(16.0, FontFace::HelveticaBold, Rgb::BLACK)
    }

    /// Heading inside a section (meal names, list titles).
    pub const fn subsection() -> Self {
        Self::new(14.0, FontFace::HelveticaBold, Rgb::EMERALD)
    }

    pub const fn body(size_pt: f32) -> Self {
        Self::new(size_pt, FontFace::Helvetica, Rgb::BLACK)
    }

    pub const fn label(size_pt: f32) -> Self {
        Self::new(size_pt, FontFace::HelveticaBold, Rgb::BLACK)
    }

    pub const fn footer() -> Self {
        Self::new(10.0, FontFace::Helvetica, Rgb::GRAY)
    }
}

/// A single drawing instruction on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    /// Text whose baseline sits at `baseline_mm` from the top edge.
    Text {
        x_mm: f32,
        baseline_mm: f32,
        text: String,
        style: TextStyle,
    },
    /// Filled rectangle whose top edge sits at `top_mm`.
    FillRect {
        x_mm: f32,
        top_mm: f32,
        width_mm: f32,
        height_mm: f32,
        color: Rgb,
    },
}

/// Marks which logical unit a run of operations belongs to, so callers can
/// reason about page content without re-parsing the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Heading,
    Line,
    Bullet,
    KeyValueRow,
    TableHeader,
    TableRow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
    /// One entry per atomic unit drawn on this page, in drawing order.
    pub units: Vec<UnitKind>,
}

impl Page {
    #[cfg(test)]
    pub fn count_units(&self, kind: UnitKind) -> usize {
        self.units.iter().filter(|u| **u == kind).count()
    }

    /// All text runs on the page, in drawing order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::FillRect { .. } => None,
        })
    }
}
