//! PDF encoding of a composed display list via `printpdf`.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect,
    Rgb as PdfRgb,
};

use crate::layout::composer::ComposeError;
use crate::layout::font_metrics::{FontFace, PageConfig};
use crate::layout::page::{DrawOp, Page, Rgb};

/// Encodes `pages` in order into PDF bytes. An empty page list still yields
/// one blank page.
pub fn encode_pdf(title: &str, config: &PageConfig, pages: &[Page]) -> Result<Vec<u8>, ComposeError> {
    let (width, height) = (Mm(config.width_mm), Mm(config.height_mm));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ComposeError::Encoding(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ComposeError::Encoding(format!("font error: {e}")))?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, format!("Page {}", i + 1));
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, config.height_mm, &regular, &bold);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ComposeError::Encoding(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ComposeError::Encoding(format!("buffer error: {e}")))
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &Page,
    page_height_mm: f32,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    // Display-list coordinates grow downwards from the top edge.
    let flip = |y_mm: f32| Mm(page_height_mm - y_mm);

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x_mm,
                baseline_mm,
                text,
                style,
            } => {
                let font = match style.face {
                    FontFace::Helvetica => regular,
                    FontFace::HelveticaBold => bold,
                };
                layer.set_fill_color(to_color(style.color));
                layer.use_text(text.as_str(), style.size_pt, Mm(*x_mm), flip(*baseline_mm), font);
            }
            DrawOp::FillRect {
                x_mm,
                top_mm,
                width_mm,
                height_mm,
                color,
            } => {
                layer.set_fill_color(to_color(*color));
                layer.add_rect(Rect::new(
                    Mm(*x_mm),
                    flip(top_mm + height_mm),
                    Mm(x_mm + width_mm),
                    flip(*top_mm),
                ));
            }
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
        None,
    ))
}
