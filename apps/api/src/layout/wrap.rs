//! Greedy word-boundary wrapping.
//!
//! A word wider than the limit is placed on its own line verbatim; it is never
//! hyphenated or split.

use crate::layout::font_metrics::FontMetricTable;

/// Splits `text` into lines no wider than `max_width_mm` at `font_size_pt`.
///
/// Hard line breaks in the input are kept. Runs of whitespace inside a line
/// collapse to a single space. A blank hard line yields an empty line, but a
/// text that is blank overall yields no lines at all.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    font_size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    let space_w = metrics.space_mm(font_size_pt);
    let mut lines = Vec::new();

    for hard_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in hard_line.split_whitespace() {
            let word_w = metrics.measure_mm(word, font_size_pt);

            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space_w + word_w > max_width_mm {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFace};

    fn helvetica() -> &'static FontMetricTable {
        get_metrics(FontFace::Helvetica)
    }

    #[test]
    fn test_blank_text_has_no_lines() {
        assert!(wrap_text("", helvetica(), 11.0, 100.0).is_empty());
        assert!(wrap_text("   \n  ", helvetica(), 11.0, 100.0).is_empty());
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_text("Warm cooked foods", helvetica(), 11.0, 170.0);
        assert_eq!(lines, vec!["Warm cooked foods".to_string()]);
    }

    #[test]
    fn test_lines_never_exceed_width_except_long_words() {
        let metrics = helvetica();
        let text = "Favor warm, moist and grounding foods such as cooked grains, root \
                    vegetables, ghee and mild spices; avoid cold drinks, raw salads and \
                    extremely dry snacks, especially in the evening when digestion is slow. \
                    Pneumonoultramicroscopicsilicovolcanoconiosis is a very long word indeed.";
        for max_width in [20.0_f32, 35.0, 60.0, 120.0] {
            let lines = wrap_text(text, metrics, 11.0, max_width);
            for line in &lines {
                let w = metrics.measure_mm(line, 11.0);
                let single_word = !line.contains(' ');
                assert!(
                    w <= max_width + 1e-3 || single_word,
                    "line {line:?} is {w}mm wide at limit {max_width}"
                );
            }
        }
    }

    #[test]
    fn test_overwide_word_kept_verbatim_on_own_line() {
        let lines = wrap_text(
            "a Ashwagandhachurnawithwarmmilk b",
            helvetica(),
            11.0,
            15.0,
        );
        assert_eq!(
            lines,
            vec![
                "a".to_string(),
                "Ashwagandhachurnawithwarmmilk".to_string(),
                "b".to_string()
            ]
        );
    }

    #[test]
    fn test_every_word_survives_in_order() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let lines = wrap_text(text, helvetica(), 11.0, 25.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_hard_breaks_are_kept() {
        let lines = wrap_text("first\n\nthird", helvetica(), 11.0, 170.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }
}
