//! Tests for source fitting, grid compositing and stamping

#[cfg(test)]
mod tests {
    use crate::{solid, solid_library};
    use image::{Rgb, RgbImage};
    use photomosaic::MosaicError;
    use photomosaic::mosaic::canvas::{Canvas, GridSummary, composite, fit_source, upscale_ratio};
    use photomosaic::mosaic::matching::Matcher;
    use photomosaic::mosaic::scale::{ResolvedScale, resolve};
    use photomosaic::mosaic::tiles::TileLibrary;

    const BLACK: [u8; 3] = [0, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];
    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    fn layout(factor: u32, width: u32, height: u32) -> ResolvedScale {
        ResolvedScale {
            factor,
            width,
            height,
            candidates: vec![factor],
        }
    }

    // Tests the uniform ratio only enlarges smaller sources
    // Verified by using the minimum of the two axis ratios
    #[test]
    fn test_upscale_ratio() {
        assert!((upscale_ratio((50, 100), (100, 100)) - 2.0).abs() < f64::EPSILON);
        assert!((upscale_ratio((200, 50), (100, 100)) - 2.0).abs() < f64::EPSILON);
        assert!((upscale_ratio((200, 200), (100, 100)) - 1.0).abs() < f64::EPSILON);
        assert!((upscale_ratio((0, 10), (100, 100)) - 1.0).abs() < f64::EPSILON);
    }

    // Tests fitted frames always have the target dimensions
    // Verified by returning the scaled source at its own size
    #[test]
    fn test_fit_source_dimensions() {
        for (source, target) in [
            ((3, 7), (40, 30)),
            ((400, 20), (40, 30)),
            ((40, 30), (40, 30)),
            ((900, 900), (60, 20)),
        ] {
            let fitted = fit_source(&solid(source.0, source.1, RED), target.0, target.1);
            assert_eq!(fitted.dimensions(), target);
        }
    }

    // Tests a small source is enlarged to cover the target
    // Verified by skipping the nearest-neighbour enlargement
    #[test]
    fn test_fit_source_enlarges_small_source() {
        let fitted = fit_source(&solid(2, 2, RED), 4, 4);
        assert!(fitted.pixels().all(|p| p.0 == RED));

        let mut source = solid(2, 2, RED);
        source.put_pixel(1, 1, Rgb(BLUE));
        let fitted = fit_source(&source, 4, 4);
        assert_eq!(fitted.get_pixel(1, 1).0, RED);
        assert_eq!(fitted.get_pixel(2, 2).0, BLUE);
        assert_eq!(fitted.get_pixel(3, 3).0, BLUE);
    }

    // Tests a large source is cut at the target edge, anchored at the origin
    // Verified by centring the paste
    #[test]
    fn test_fit_source_crops_large_source() {
        let mut source = solid(8, 8, BLUE);
        source.put_pixel(0, 0, Rgb(RED));
        let fitted = fit_source(&source, 4, 4);

        assert_eq!(fitted.dimensions(), (4, 4));
        assert_eq!(fitted.get_pixel(0, 0).0, RED);
        assert_eq!(fitted.get_pixel(1, 0).0, BLUE);
    }

    // Tests every cell is stamped with its closest tile
    // Verified by stamping cells at transposed offsets
    #[test]
    fn test_composite_stamps_matching_tiles() {
        let frame = RgbImage::from_fn(4, 4, |x, _| if x < 2 { Rgb(BLACK) } else { Rgb(WHITE) });
        let library = solid_library(2, &[BLACK, WHITE]);
        let mut canvas = Canvas::blank(4, 4);

        let summary = composite(
            &frame,
            &layout(2, 4, 4),
            &library,
            &mut Matcher::default(),
            &mut canvas,
        )
        .unwrap();

        assert_eq!(summary, GridSummary { columns: 2, rows: 2 });
        assert_eq!(summary.cells(), 4);
        assert_eq!(canvas.image(), &frame);
    }

    // Tests the remainder strip past the last full cell is left untouched
    // Verified by stamping a partial tile over the remainder
    #[test]
    fn test_composite_leaves_remainder() {
        let frame = solid(5, 4, BLACK);
        let library = solid_library(2, &[BLACK]);
        let mut canvas = Canvas::blank(5, 4);

        composite(
            &frame,
            &layout(2, 5, 4),
            &library,
            &mut Matcher::default(),
            &mut canvas,
        )
        .unwrap();

        assert_eq!(canvas.image().get_pixel(3, 0).0, BLACK);
        assert_eq!(canvas.image().get_pixel(4, 0).0, WHITE);
        assert_eq!(canvas.image().get_pixel(4, 3).0, WHITE);
    }

    // Tests compositing fails on an empty library
    // Verified by returning an untouched canvas
    #[test]
    fn test_composite_requires_tiles() {
        let result = composite(
            &solid(4, 4, BLACK),
            &layout(2, 4, 4),
            &TileLibrary::default(),
            &mut Matcher::default(),
            &mut Canvas::blank(4, 4),
        );
        assert!(matches!(result, Err(MosaicError::EmptyTileLibrary { .. })));
    }

    // Tests compositing rejects tiles of the wrong size
    // Verified by removing the tile size check
    #[test]
    fn test_composite_rejects_mismatched_tiles() {
        let result = composite(
            &solid(4, 4, BLACK),
            &layout(2, 4, 4),
            &solid_library(4, &[BLACK]),
            &mut Matcher::default(),
            &mut Canvas::blank(4, 4),
        );
        assert!(matches!(result, Err(MosaicError::InvalidParameter { .. })));
    }

    // Tests stamping places tile pixels at the offset
    // Verified by ignoring the offset
    #[test]
    fn test_canvas_stamp() {
        let library = solid_library(2, &[RED]);
        let mut canvas = Canvas::blank(6, 4);
        let tile = library.get(0).unwrap();

        canvas.stamp(tile, 4, 2);

        assert_eq!(canvas.dimensions(), (6, 4));
        assert_eq!(canvas.image().get_pixel(4, 2).0, RED);
        assert_eq!(canvas.image().get_pixel(5, 3).0, RED);
        assert_eq!(canvas.image().get_pixel(3, 2).0, WHITE);
        assert_eq!(canvas.into_image().pixels().filter(|p| p.0 == RED).count(), 4);
    }

    // Tests output dimensions follow the resolved layout for any aspect ratio
    // Verified by sizing the canvas from the source image
    #[test]
    fn test_output_matches_resolved_dimensions() {
        for (source, target) in [((13, 70), (60, 40)), ((300, 20), (60, 40)), ((61, 41), (97, 101))] {
            let scale = resolve(5, target.0, target.1).unwrap();
            let library = solid_library(scale.factor, &[BLACK, RED]);
            let fitted = fit_source(&solid(source.0, source.1, RED), scale.width, scale.height);
            let mut canvas = Canvas::blank(scale.width, scale.height);
            composite(&fitted, &scale, &library, &mut Matcher::default(), &mut canvas).unwrap();
            assert_eq!(canvas.dimensions(), (scale.width, scale.height));
        }
    }
}
