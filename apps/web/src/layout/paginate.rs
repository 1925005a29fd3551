//! Mechanical pagination of the content strip.
//!
//! The strip is drawn whole on every page, shifted up by one page height per
//! page, until its full height has been covered. There is no awareness of the
//! content: a line lands on whichever page its baseline falls on.

/// Vertical offsets (mm) at which the strip is drawn on successive pages.
///
/// A strip shorter than a page yields a single page at offset 0.
pub fn page_offsets(content_height_mm: f32, page_height_mm: f32) -> Vec<f32> {
    if !(page_height_mm > 0.0) || !(content_height_mm >= page_height_mm) {
        return vec![0.0];
    }

    let mut offsets = Vec::new();
    let mut height_left = content_height_mm;
    let mut offset = 0.0_f32;
    while height_left > 0.0 {
        offsets.push(offset);
        height_left -= page_height_mm;
        offset -= page_height_mm;
    }
    offsets
}

/// Position of a strip coordinate on the page drawn at `offset_mm`, measured
/// down from the page top, or `None` when it falls on another page.
pub fn position_on_page(strip_y_mm: f32, offset_mm: f32, page_height_mm: f32) -> Option<f32> {
    let y = strip_y_mm + offset_mm;
    (y > 0.0 && y <= page_height_mm).then_some(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: f32 = 297.0;

    #[test]
    fn test_short_content_is_one_page() {
        assert_eq!(page_offsets(120.0, A4), vec![0.0]);
    }

    #[test]
    fn test_exactly_one_page_height_is_one_page() {
        assert_eq!(page_offsets(A4, A4), vec![0.0]);
    }

    #[test]
    fn test_overflow_adds_shifted_pages() {
        assert_eq!(page_offsets(400.0, A4), vec![0.0, -A4]);
        assert_eq!(page_offsets(700.0, A4), vec![0.0, -A4, -2.0 * A4]);
    }

    #[test]
    fn test_degenerate_page_height_is_one_page() {
        assert_eq!(page_offsets(400.0, 0.0), vec![0.0]);
        assert_eq!(page_offsets(f32::NAN, A4), vec![0.0]);
    }

    #[test]
    fn test_every_strip_line_lands_on_exactly_one_page() {
        let height = 650.0;
        let offsets = page_offsets(height, A4);
        let mut y = 5.0;
        while y < height {
            let pages = offsets
                .iter()
                .filter(|o| position_on_page(y, **o, A4).is_some())
                .count();
            assert_eq!(pages, 1, "strip y {y} landed on {pages} pages");
            y += 7.3;
        }
    }

    #[test]
    fn test_position_on_second_page() {
        assert_eq!(position_on_page(300.0, -A4, A4), Some(3.0));
        assert_eq!(position_on_page(300.0, 0.0, A4), None);
    }
}
