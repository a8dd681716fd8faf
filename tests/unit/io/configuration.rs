//! Tests for rendering constants

#[cfg(test)]
mod tests {
    use photomosaic::io::configuration::{
        BLACK, DEFAULT_BLACK_SUBSTITUTE, DEFAULT_JPEG_QUALITY, DEFAULT_SCALE_FACTOR,
        DEFAULT_WHITE_SUBSTITUTE, FRAME_EXTENSION, IMAGE_EXTENSIONS, NEAR_WHITE_THRESHOLD,
        RAW_FRAMES_DIR, RENDERED_FRAMES_DIR, VIDEO_EXTENSIONS, WHITE,
    };

    // Tests the colour-swap defaults substitute distinct colours
    // Verified by defaulting both substitutes to black
    #[test]
    fn test_swap_substitutes() {
        assert_ne!(DEFAULT_WHITE_SUBSTITUTE, WHITE);
        assert_ne!(DEFAULT_BLACK_SUBSTITUTE, BLACK);
        assert_ne!(DEFAULT_WHITE_SUBSTITUTE, DEFAULT_BLACK_SUBSTITUTE);
    }

    // Tests rendering defaults stay within encoder and grid limits
    // Verified by setting the quality above 100
    #[test]
    fn test_render_defaults() {
        assert!((1..=100).contains(&DEFAULT_JPEG_QUALITY));
        assert!(DEFAULT_SCALE_FACTOR >= 2);
        assert!(NEAR_WHITE_THRESHOLD < u8::MAX);
    }

    // Tests image and video extension lists do not overlap
    // Verified by adding jpg to the video list
    #[test]
    fn test_extension_lists() {
        assert!(IMAGE_EXTENSIONS.iter().all(|ext| !VIDEO_EXTENSIONS.contains(ext)));
        assert!(IMAGE_EXTENSIONS.contains(&FRAME_EXTENSION));
        assert_ne!(RAW_FRAMES_DIR, RENDERED_FRAMES_DIR);
    }
}
