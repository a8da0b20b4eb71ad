//! Header/footer band classification.
//!
//! Running headers and footers routinely contain stray bold integers
//! (page numbers) that would otherwise read as question numbers, so
//! spans in either band are excluded from all further processing.

/// Vertical classification of a span on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Header,
    Footer,
    Body,
}

/// Classify a span's top edge against the page's exclusion bands.
///
/// The footer test runs first: on pages short enough for the two bands
/// to overlap, footers are the more common source of false positives.
pub fn classify(y0: f32, page_height: f32, header_fraction: f32, footer_fraction: f32) -> Zone {
    if page_height <= 0.0 {
        return Zone::Body;
    }
    if y0 > page_height * (1.0 - footer_fraction) {
        return Zone::Footer;
    }
    if y0 < page_height * header_fraction {
        return Zone::Header;
    }
    Zone::Body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_span() {
        assert_eq!(classify(400.0, 800.0, 0.12, 0.12), Zone::Body);
    }

    #[test]
    fn test_header_span() {
        assert_eq!(classify(50.0, 800.0, 0.12, 0.12), Zone::Header);
    }

    #[test]
    fn test_footer_span() {
        assert_eq!(classify(750.0, 800.0, 0.12, 0.12), Zone::Footer);
    }

    #[test]
    fn test_band_edges_belong_to_body() {
        // Thresholds are strict, matching the 0.88 cut of the source tool.
        assert_eq!(classify(96.0, 800.0, 0.12, 0.12), Zone::Body);
        assert_eq!(classify(704.0, 800.0, 0.12, 0.12), Zone::Body);
    }

    #[test]
    fn test_overlap_prefers_footer() {
        // Bands overlap when the fractions sum past 1.0; the footer wins.
        assert_eq!(classify(50.0, 100.0, 0.6, 0.6), Zone::Footer);
    }

    #[test]
    fn test_degenerate_page_height() {
        assert_eq!(classify(10.0, 0.0, 0.12, 0.12), Zone::Body);
    }
}
