//! Tests for media classification and image I/O

#[cfg(test)]
mod tests {
    use crate::solid;
    use photomosaic::MosaicError;
    use photomosaic::io::image::{
        ExtensionMatching, MediaKind, classify, is_supported_image, load_rgb, output_path,
        save_jpeg,
    };
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    // Tests exact matching accepts the listed extensions only
    // Verified by lower-casing extensions before comparison
    #[test]
    fn test_classify_exact() {
        let exact = ExtensionMatching::Exact;
        for name in ["a.jpg", "a.jpeg", "a.png"] {
            assert_eq!(classify(Path::new(name), exact), Some(MediaKind::Image));
        }
        assert_eq!(classify(Path::new("a.mp4"), exact), Some(MediaKind::Video));
        assert_eq!(classify(Path::new("a.MOV"), exact), Some(MediaKind::Video));
        for name in ["a.mov", "a.JPG", "a.gif", "a", "a.txt"] {
            assert_eq!(classify(Path::new(name), exact), None, "{name}");
        }
    }

    // Tests relaxed matching accepts any letter case
    // Verified by matching exactly in both modes
    #[test]
    fn test_classify_case_insensitive() {
        let relaxed = ExtensionMatching::CaseInsensitive;
        assert_eq!(classify(Path::new("a.mov"), relaxed), Some(MediaKind::Video));
        assert_eq!(classify(Path::new("a.JPG"), relaxed), Some(MediaKind::Image));
        assert!(is_supported_image(Path::new("a.PnG"), relaxed));
        assert!(!is_supported_image(Path::new("a.Mp4"), relaxed));
        assert_eq!(ExtensionMatching::default(), ExtensionMatching::Exact);
    }

    // Tests saved JPEGs decode back at their dimensions
    // Verified by writing a PNG under a jpg name
    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = output_path(dir.path(), "frame", "jpg");
        assert_eq!(path, dir.path().join("frame.jpg"));

        save_jpeg(&solid(12, 7, [200, 10, 10]), &path, 75).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.get(..2), Some([0xFF, 0xD8].as_slice()));

        let loaded = load_rgb(&path).unwrap();
        assert_eq!(loaded.dimensions(), (12, 7));
        let red = loaded.get_pixel(6, 3).0;
        assert!(red[0] > 180 && red[1] < 40 && red[2] < 40);
    }

    // Tests saving into a missing directory reports the path
    // Verified by creating parent directories
    #[test]
    fn test_save_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.jpg");
        let err = save_jpeg(&solid(2, 2, [0, 0, 0]), &path, 75).unwrap_err();
        assert!(matches!(err, MosaicError::FileSystem { path: ref p, .. } if *p == path));
    }

    // Tests undecodable and missing files fail as load errors
    // Verified by returning a blank image on decode failure
    #[test]
    fn test_load_failures() {
        let dir = TempDir::new().unwrap();
        let garbage = dir.path().join("garbage.png");
        fs::write(&garbage, b"nope").unwrap();

        for path in [garbage, PathBuf::from("/nonexistent/photo.png")] {
            assert!(matches!(load_rgb(&path), Err(MosaicError::ImageLoad { .. })));
        }
    }
}
