//! Cropping a page to its content.
//!
//! Regions are given in PDF points with the origin at the top-left corner
//! of the page and y growing downwards, the same orientation as the
//! rendered image.

/// Whitespace kept around the content of a cropped page, in points.
pub const CROP_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The whole of a page of the given size.
    pub const fn from_size(size: (f64, f64)) -> Self {
        Self::new(0.0, 0.0, size.0, size.1)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// Region of a page of `page_size` to show when cropping to `content`.
///
/// The content is widened by [`CROP_MARGIN`] on each side and clamped to
/// the page. A result narrower or shorter than half the page is extended
/// to half the page to the right or bottom, which may reach past the page
/// edge. Without content the whole page is kept.
pub fn crop_box(page_size: (f64, f64), content: Option<Rect>) -> Rect {
    let (width, height) = page_size;

    let Some(content) = content else {
        return Rect::from_size(page_size);
    };

    let mut region = Rect {
        x1: (content.x1 - CROP_MARGIN).max(0.0),
        y1: (content.y1 - CROP_MARGIN).max(0.0),
        x2: (content.x2 + CROP_MARGIN).min(width),
        y2: (content.y2 + CROP_MARGIN).min(height),
    };

    if region.width() < width / 2.0 {
        region.x2 = region.x1 + width / 2.0;
    }

    if region.height() < height / 2.0 {
        region.y2 = region.y1 + height / 2.0;
    }

    region
}

#[cfg(test)]
mod test {
    use super::*;

    const LETTER: (f64, f64) = (612.0, 792.0);

    #[test]
    fn test_margin_added() {
        let content = Rect::new(72.0, 72.0, 540.0, 720.0);

        assert_eq!(crop_box(LETTER, Some(content)), Rect::new(67.0, 67.0, 545.0, 725.0));
    }

    #[test]
    fn test_clamped_to_page() {
        let content = Rect::new(2.0, 1.0, 611.0, 790.0);

        assert_eq!(crop_box(LETTER, Some(content)), Rect::from_size(LETTER));
    }

    #[test]
    fn test_small_content_keeps_half_page() {
        let content = Rect::new(100.0, 200.0, 110.0, 210.0);
        let region = crop_box(LETTER, Some(content));

        assert_eq!(region, Rect::new(95.0, 195.0, 95.0 + 306.0, 195.0 + 396.0));
        assert_eq!(region.width(), LETTER.0 / 2.0);
        assert_eq!(region.height(), LETTER.1 / 2.0);
    }

    #[test]
    fn test_half_page_may_extend_past_edge() {
        let content = Rect::new(580.0, 10.0, 600.0, 780.0);
        let region = crop_box(LETTER, Some(content));

        assert_eq!(region.x1, 575.0);
        assert_eq!(region.x2, 575.0 + 306.0);
        assert_eq!((region.y1, region.y2), (5.0, 785.0));
    }

    #[test]
    fn test_blank_page_is_not_cropped() {
        assert_eq!(crop_box(LETTER, None), Rect::from_size(LETTER));
    }
}
