use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use log::info;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// JPEG quality for all generated covers
pub const JPEG_QUALITY: u8 = 90;

/// Largest accepted source image, in bytes
pub const MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;

/// Portrait card width (9:16)
pub const PORTRAIT_WIDTH: u32 = 900;

/// Portrait card height (9:16)
pub const PORTRAIT_HEIGHT: u32 = 1600;

/// Cover pipeline errors
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a recognized image file: {0}")]
    NotAnImage(PathBuf),

    #[error("Image is {size} bytes, over the {max} byte limit")]
    TooLarge { size: u64, max: u64 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check that a source file exists, is not oversized and looks like an image
pub fn validate_source(input: &Path) -> Result<(), CoverError> {
    if !input.exists() {
        return Err(CoverError::NotFound(input.to_path_buf()));
    }

    let size = fs::metadata(input)?.len();
    if size > MAX_SOURCE_BYTES {
        return Err(CoverError::TooLarge {
            size,
            max: MAX_SOURCE_BYTES,
        });
    }

    if image::ImageFormat::from_path(input).is_err() {
        return Err(CoverError::NotAnImage(input.to_path_buf()));
    }

    Ok(())
}

/// Resize an image to exactly `width` x `height`, cropping to fill.
///
/// The source is scaled until it covers the target box, then center-cropped.
/// Small sources are enlarged rather than padded.
pub fn resize_cover(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
) -> Result<PathBuf, CoverError> {
    validate_source(input)?;

    if let Some(parent) = output.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let img = image::open(input)?;
    let resized = img.resize_to_fill(width, height, FilterType::Lanczos3);

    write_jpeg(&resized.to_rgb8(), output)?;

    info!(
        "Resized cover ({}x{}) saved to {}",
        width,
        height,
        output.display()
    );
    Ok(output.to_path_buf())
}

/// Options for the orientation-aware resize
#[derive(Debug, Clone, Copy)]
pub struct ResizeOptions {
    pub portrait_width: u32,
    pub portrait_height: u32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            portrait_width: PORTRAIT_WIDTH,
            portrait_height: PORTRAIT_HEIGHT,
        }
    }
}

/// Orientation-aware entry point.
///
/// Landscape sources are cropped into the same portrait card shape as
/// portrait ones, so every cover lands on the configured 9:16 box.
pub fn smart_resize_cover(
    input: &Path,
    output: &Path,
    options: ResizeOptions,
) -> Result<PathBuf, CoverError> {
    resize_cover(input, output, options.portrait_width, options.portrait_height)
}

/// Resolutions generated for responsive cover sets
const RESPONSIVE_RESOLUTIONS: [(u32, u32, &str); 4] = [
    (900, 1600, "xl"),
    (675, 1200, "lg"),
    (450, 800, "md"),
    (270, 480, "sm"),
];

/// Generate the full set of responsive cover sizes next to `output_base`.
///
/// `game-cover.jpg` becomes `game-cover_xl.jpg` through `game-cover_sm.jpg`.
pub fn responsive_covers(input: &Path, output_base: &Path) -> Result<Vec<PathBuf>, CoverError> {
    let mut generated = Vec::with_capacity(RESPONSIVE_RESOLUTIONS.len());

    for (width, height, suffix) in RESPONSIVE_RESOLUTIONS {
        let output = suffixed_path(output_base, suffix);
        generated.push(resize_cover(input, &output, width, height)?);
    }

    Ok(generated)
}

/// `cover.jpg` + `xl` -> `cover_xl.jpg`
fn suffixed_path(base: &Path, suffix: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("cover");
    let ext = base
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("jpg");

    base.with_file_name(format!("{}_{}.{}", stem, suffix, ext))
}

/// Encode an RGB buffer as JPEG at the fixed cover quality
pub(crate) fn write_jpeg(rgb: &image::RgbImage, output: &Path) -> Result<(), CoverError> {
    let file = fs::File::create(output)?;
    let mut writer = BufWriter::new(file);

    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.encode_image(rgb)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_test_image(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 90, 160]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_resize_produces_exact_dimensions() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("source.png");
        let output = dir.path().join("out").join("cover.jpg");
        write_test_image(&input, 64, 64);

        let result = resize_cover(&input, &output, 90, 160).unwrap();

        assert_eq!(result, output);
        assert_eq!(image::image_dimensions(&output).unwrap(), (90, 160));
    }

    #[test]
    fn test_small_sources_are_enlarged() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tiny.png");
        let output = dir.path().join("tiny_cover.jpg");
        write_test_image(&input, 8, 8);

        resize_cover(&input, &output, 270, 480).unwrap();
        assert_eq!(image::image_dimensions(&output).unwrap(), (270, 480));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("nowhere.png");
        let output = dir.path().join("cover.jpg");

        match resize_cover(&input, &output, 90, 160) {
            Err(CoverError::NotFound(path)) => assert_eq!(path, input),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_non_image_input_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let output = dir.path().join("cover.jpg");
        fs::write(&input, "not an image").unwrap();

        match resize_cover(&input, &output, 90, 160) {
            Err(CoverError::NotAnImage(path)) => assert_eq!(path, input),
            other => panic!("Expected NotAnImage, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("huge.jpg");
        let output = dir.path().join("cover.jpg");
        fs::write(&input, vec![0u8; (MAX_SOURCE_BYTES + 1) as usize]).unwrap();

        match resize_cover(&input, &output, 90, 160) {
            Err(CoverError::TooLarge { size, max }) => {
                assert_eq!(size, MAX_SOURCE_BYTES + 1);
                assert_eq!(max, MAX_SOURCE_BYTES);
            }
            other => panic!("Expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_smart_resize_defaults_to_portrait_card() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("landscape.png");
        let output = dir.path().join("smart.jpg");
        write_test_image(&input, 320, 180);

        smart_resize_cover(&input, &output, ResizeOptions::default()).unwrap();
        assert_eq!(
            image::image_dimensions(&output).unwrap(),
            (PORTRAIT_WIDTH, PORTRAIT_HEIGHT)
        );
    }

    #[test]
    fn test_responsive_set_generates_all_variants() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("source.png");
        let base = dir.path().join("game-cover.jpg");
        write_test_image(&input, 64, 64);

        let generated = responsive_covers(&input, &base).unwrap();
        assert_eq!(generated.len(), 4);

        for suffix in ["xl", "lg", "md", "sm"] {
            let expected = dir.path().join(format!("game-cover_{}.jpg", suffix));
            assert!(expected.exists(), "missing variant {}", suffix);
        }

        assert_eq!(
            image::image_dimensions(dir.path().join("game-cover_sm.jpg")).unwrap(),
            (270, 480)
        );
    }
}
