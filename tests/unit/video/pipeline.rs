//! Tests for frame naming, frame rates and the ffmpeg pipeline

#[cfg(test)]
mod tests {
    use photomosaic::MosaicError;
    use photomosaic::video::pipeline::{
        Ffmpeg, FrameRate, VideoPipeline, clear_frames, count_frames, frame_file_name,
        frame_path, is_frame_file,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    // Tests frames are numbered from zero without padding
    // Verified by zero-padding the index
    #[test]
    fn test_frame_names() {
        assert_eq!(frame_file_name(0), "frame-0.jpg");
        assert_eq!(frame_file_name(12), "frame-12.jpg");
        assert_eq!(
            frame_path(Path::new("frames"), 3),
            Path::new("frames").join("frame-3.jpg")
        );
    }

    // Tests counting stops at the first missing frame
    // Verified by counting every matching file
    #[test]
    fn test_count_frames() {
        let dir = TempDir::new().unwrap();
        assert_eq!(count_frames(dir.path()), 0);

        for index in [0, 1, 2, 4] {
            fs::write(frame_path(dir.path(), index), b"jpg").unwrap();
        }
        fs::write(dir.path().join("frame-x.jpg"), b"jpg").unwrap();
        assert_eq!(count_frames(dir.path()), 3);
    }

    // Tests rational and whole frame rates parse and display
    // Verified by truncating rates to whole numbers
    #[test]
    fn test_frame_rate_parse() {
        let ntsc: FrameRate = "30000/1001".parse().unwrap();
        assert_eq!(ntsc.numerator, 30000);
        assert_eq!(ntsc.denominator, 1001);
        assert_eq!(ntsc.to_string(), "30000/1001");
        assert!((ntsc.as_f64() - 29.97).abs() < 0.01);

        let whole: FrameRate = " 25\n".parse().unwrap();
        assert_eq!(whole, FrameRate::per_second(25));
        assert!((whole.as_f64() - 25.0).abs() < f64::EPSILON);
    }

    // Tests malformed and zero rates are rejected
    // Verified by accepting a zero denominator
    #[test]
    fn test_frame_rate_rejects_invalid() {
        for text in ["", "abc", "30/0", "0/1", "30/x", "-1/1"] {
            assert!(
                matches!(
                    text.parse::<FrameRate>(),
                    Err(MosaicError::InvalidParameter {
                        parameter: "frame_rate",
                        ..
                    })
                ),
                "{text:?} should be rejected"
            );
        }
    }

    // Tests a missing executable surfaces as a pipeline error
    // Verified by treating spawn failures as zero frames
    #[test]
    fn test_ffmpeg_missing_executable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-tool");
        let mut pipeline = Ffmpeg::new(&missing, &missing);

        let extracted = pipeline.extract_frames(&dir.path().join("clip.mp4"), dir.path());
        assert!(matches!(
            extracted,
            Err(MosaicError::VideoPipeline {
                stage: "frame rate probe",
                ..
            })
        ));

        let assembled = pipeline.assemble_video(
            &dir.path().join("out.mp4"),
            dir.path(),
            FrameRate::per_second(30),
            1,
        );
        assert!(matches!(
            assembled,
            Err(MosaicError::VideoPipeline {
                stage: "video assembly",
                ..
            })
        ));
    }

    // Tests only numbered frame names are recognised
    // Verified by matching on the prefix alone
    #[test]
    fn test_is_frame_file() {
        assert!(is_frame_file(Path::new("raw/frame-0.jpg")));
        assert!(is_frame_file(Path::new("frame-128.jpg")));
        for name in ["frame-.jpg", "frame-x.jpg", "frame-1.png", "frame-1jpg", "shot-1.jpg"] {
            assert!(!is_frame_file(Path::new(name)), "{name}");
        }
    }

    // Tests clearing removes numbered frames and keeps other files
    // Verified by removing every file in the directory
    #[test]
    fn test_clear_frames() {
        let dir = TempDir::new().unwrap();
        for index in 0..4 {
            fs::write(frame_path(dir.path(), index), b"old").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        assert_eq!(clear_frames(dir.path()).unwrap(), 4);
        assert_eq!(count_frames(dir.path()), 0);
        assert!(dir.path().join("notes.txt").is_file());
        assert_eq!(clear_frames(dir.path()).unwrap(), 0);
        assert!(clear_frames(&dir.path().join("missing")).is_err());
    }

    // Writes an executable shell script into `dir`
    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    // Tests the extracted count covers this decode only, not leftovers of a longer video
    // Verified by counting frames without clearing the directory first
    #[cfg(unix)]
    #[test]
    fn test_extract_ignores_stale_frames() {
        let tools = TempDir::new().unwrap();
        let ffmpeg = script(
            tools.path(),
            "ffmpeg",
            r#"for last in "$@"; do :; done
for i in 0 1 2; do printf x > "$(printf "$last" "$i")"; done"#,
        );
        let ffprobe = script(tools.path(), "ffprobe", "echo 30/1");

        let frames = TempDir::new().unwrap();
        for index in 0..8 {
            fs::write(frame_path(frames.path(), index), b"stale").unwrap();
        }

        let mut pipeline = Ffmpeg::new(ffmpeg, ffprobe);
        let extracted = pipeline
            .extract_frames(&frames.path().join("clip.mp4"), frames.path())
            .unwrap();

        assert_eq!(extracted.frame_count, 3);
        assert_eq!(extracted.frame_rate, FrameRate::per_second(30));
        assert_eq!(count_frames(frames.path()), 3);
        assert_eq!(fs::read(frame_path(frames.path(), 0)).unwrap(), b"x");
    }
}
