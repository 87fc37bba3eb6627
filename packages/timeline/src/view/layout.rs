//! Deterministic text-metrics approximation for the side-scrolling cards.
//!
//! Real font measurement lives in the rendering layer; here we only need a
//! stable, platform-independent estimate so card heights can be derived (and
//! cached) alongside the rest of the display content. The model is a fixed
//! glyph advance scaled by the caller's text scale.

/// Width of one side-scrolling detail card, in points.
pub const SIDE_SCROLLING_CELL_WIDTH: f32 = 250.0;
/// Vertical padding above the card content.
pub const CELL_TOP_PADDING: f32 = 17.0;
/// Vertical padding below the card content.
pub const CELL_BOTTOM_PADDING: f32 = 15.0;
/// Horizontal padding on each side of the card content.
pub const CELL_HORIZONTAL_PADDING: f32 = 15.0;
/// Extra height reserved for the card shadow.
pub const ADDITIONAL_POINTS_FOR_SHADOW: f32 = 16.0;
/// Gap between a reference card's title line and its description.
pub const REFERENCE_TITLE_DESCRIPTION_SPACING: f32 = 13.0;

const BASE_LINE_HEIGHT: f32 = 20.0;
const BASE_GLYPH_ADVANCE: f32 = 7.0;

/// Content width available inside one card.
pub fn available_width() -> f32 {
    SIDE_SCROLLING_CELL_WIDTH - 2.0 * CELL_HORIZONTAL_PADDING
}

/// Height of one wrapped text line at the given scale.
pub fn line_height(text_scale: f32) -> f32 {
    (BASE_LINE_HEIGHT * text_scale).ceil()
}

/// Characters that fit on one line of `width` points at the given scale.
pub fn chars_per_line(width: f32, text_scale: f32) -> usize {
    let advance = BASE_GLYPH_ADVANCE * text_scale;
    ((width / advance).floor() as usize).max(1)
}

/// Estimated height of a wrapped text block; zero for empty text.
pub fn text_block_height(char_count: usize, width: f32, text_scale: f32) -> f32 {
    if char_count == 0 {
        return 0.0;
    }
    let per_line = chars_per_line(width, text_scale);
    let lines = char_count.div_ceil(per_line);
    lines as f32 * line_height(text_scale)
}

/// Count of characters that survive HTML tag stripping.
///
/// Snippets arrive with inline markup (`<ins>`, `<del>`, highlights); only
/// the visible text contributes to wrapping.
pub fn visible_text_len(html: &str) -> usize {
    let mut count = 0;
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => count += 1,
            _ => {}
        }
    }
    count
}

/// Strip HTML tags, keeping visible text only.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_len_ignores_tags() {
        assert_eq!(visible_text_len("plain"), 5);
        assert_eq!(visible_text_len("<b>bold</b>"), 4);
        assert_eq!(visible_text_len("<ins class=\"x\">a</ins>b"), 2);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<i>History</i> section"), "History section");
        assert_eq!(strip_html("no markup"), "no markup");
    }

    #[test]
    fn test_text_block_height_scales_with_length() {
        let width = available_width();
        assert_eq!(text_block_height(0, width, 1.0), 0.0);

        let one_line = text_block_height(10, width, 1.0);
        assert_eq!(one_line, line_height(1.0));

        let per_line = chars_per_line(width, 1.0);
        let two_lines = text_block_height(per_line + 1, width, 1.0);
        assert_eq!(two_lines, 2.0 * line_height(1.0));
    }

    #[test]
    fn test_larger_scale_fits_fewer_chars_per_line() {
        let width = available_width();
        assert!(chars_per_line(width, 2.0) < chars_per_line(width, 1.0));
    }
}
