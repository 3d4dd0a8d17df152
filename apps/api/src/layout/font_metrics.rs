//! Static font-metric tables for the two built-in PDF faces the composer draws with.
//!
//! Character widths are in em units (relative to font size), taken from the
//! Adobe core-font AFM files divided by 1000. Both tables cover ASCII 0x20..=0x7E
//! (95 printable characters). Index = (char as usize) - 32.
//!
//! All document geometry is in millimetres; font sizes are in points.

use serde::{Deserialize, Serialize};

/// One PostScript point in millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.55;

// ────────────────────────────────────────────────────────────────────────────
// Font face enum
// ────────────────────────────────────────────────────────────────────────────

/// The built-in faces used by every generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Physical page geometry shared by every page of a document.
///
/// `margin_mm` is applied on all four sides; the usable bottom of a page is
/// `height_mm - margin_mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    /// Body text size used for paragraphs, lists and key/value rows.
    pub body_font_size_pt: f32,
}

impl PageConfig {
    /// Horizontal space between the left and right margins.
    pub fn content_width_mm(&self) -> f32 {
        (self.width_mm - 2.0 * self.margin_mm).max(0.0)
    }

    /// Vertical space between the top and bottom margins.
    pub fn printable_height_mm(&self) -> f32 {
        (self.height_mm - 2.0 * self.margin_mm).max(0.0)
    }
}

/// A4 portrait with the given margin and an 11pt body.
pub fn default_page_config(margin_mm: f32) -> PageConfig {
    PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm,
        body_font_size_pt: 11.0,
    }
}

/// Baseline-to-baseline distance for a font size, in millimetres.
pub fn line_height_mm(font_size_pt: f32) -> f32 {
    font_size_pt * PT_TO_MM * LINE_SPACING
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Rendered width of a string in millimetres at `font_size_pt`.
    pub fn measure_mm(&self, s: &str, font_size_pt: f32) -> f32 {
        self.measure_str(s) * font_size_pt * PT_TO_MM
    }

    /// Width of one inter-word space in millimetres at `font_size_pt`.
    pub fn space_mm(&self, font_size_pt: f32) -> f32 {
        self.space_width * font_size_pt * PT_TO_MM
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {     |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {     |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFace::Helvetica);
        // "Diet" = D(0.722) + i(0.222) + e(0.556) + t(0.278) = 1.778
        let width = metrics.measure_str("Diet");
        assert!(
            (width - 1.778).abs() < 1e-3,
            "Diet width should be ~1.778, got {width}"
        );
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = get_metrics(FontFace::Helvetica);
        let width = metrics.measure_str("•");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_not_narrower_than_regular() {
        let text = "Recommended Herbs";
        let regular = get_metrics(FontFace::Helvetica).measure_str(text);
        let bold = get_metrics(FontFace::HelveticaBold).measure_str(text);
        assert!(bold >= regular, "bold {bold} should be >= regular {regular}");
    }

    #[test]
    fn test_measure_mm_scales_with_font_size() {
        let metrics = get_metrics(FontFace::Helvetica);
        let small = metrics.measure_mm("Tulsi tea", 10.0);
        let large = metrics.measure_mm("Tulsi tea", 20.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }

    #[test]
    fn test_line_height_at_body_size_is_about_six_mm() {
        let h = line_height_mm(11.0);
        assert!(h > 5.8 && h < 6.2, "11pt line height was {h}");
    }

    #[test]
    fn test_default_page_config_sanity() {
        let config = default_page_config(20.0);
        assert_eq!(config.width_mm, 210.0);
        assert_eq!(config.height_mm, 297.0);
        assert!((config.content_width_mm() - 170.0).abs() < 1e-4);
        assert!((config.printable_height_mm() - 257.0).abs() < 1e-4);
    }
}
