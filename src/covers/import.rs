use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::resize::{validate_source, write_jpeg, CoverError};

/// Card cover width (3:4)
pub const CARD_WIDTH: u32 = 360;

/// Card cover height (3:4)
pub const CARD_HEIGHT: u32 = 480;

/// Background fill behind transparent sources
const CARD_BACKGROUND: Rgba<u8> = Rgba([0x2a, 0x2d, 0x37, 0xff]);

/// File name a processed cover is staged under while the editor is open
pub const STAGED_COVER: &str = "staged_cover.jpg";

/// Process a picked image into the 360x480 card cover.
///
/// The source is cover-fit center-cropped, transparent regions are flattened
/// onto a neutral background, and the result is written as JPEG.
pub fn process_card_cover(input: &Path, output: &Path) -> Result<PathBuf, CoverError> {
    validate_source(input)?;

    if let Some(parent) = output.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let img = image::open(input)?;
    let resized = img
        .resize_to_fill(CARD_WIDTH, CARD_HEIGHT, FilterType::Lanczos3)
        .to_rgba8();

    let mut canvas = RgbaImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, CARD_BACKGROUND);
    imageops::overlay(&mut canvas, &resized, 0, 0);

    write_jpeg(&image::DynamicImage::ImageRgba8(canvas).to_rgb8(), output)?;

    info!("Processed card cover saved to {}", output.display());
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_card_cover_has_card_dimensions() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("source.png");
        let output = dir.path().join("card.jpg");

        let img = image::RgbImage::from_pixel(800, 600, image::Rgb([200, 40, 40]));
        img.save(&input).unwrap();

        process_card_cover(&input, &output).unwrap();
        assert_eq!(
            image::image_dimensions(&output).unwrap(),
            (CARD_WIDTH, CARD_HEIGHT)
        );
    }

    #[test]
    fn test_transparent_source_is_flattened() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("transparent.png");
        let output = dir.path().join("card.jpg");

        let img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 0]));
        img.save(&input).unwrap();

        process_card_cover(&input, &output).unwrap();

        // Fully transparent input should come out close to the background fill
        let decoded = image::open(&output).unwrap().to_rgb8();
        let pixel = decoded.get_pixel(CARD_WIDTH / 2, CARD_HEIGHT / 2);
        assert!((pixel[0] as i32 - 0x2a).abs() < 8);
        assert!((pixel[1] as i32 - 0x2d).abs() < 8);
        assert!((pixel[2] as i32 - 0x37).abs() < 8);
    }

    #[test]
    fn test_rejects_non_image_source() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("save.dat");
        let output = dir.path().join("card.jpg");
        fs::write(&input, b"binary blob").unwrap();

        assert!(matches!(
            process_card_cover(&input, &output),
            Err(CoverError::NotAnImage(_))
        ));
    }
}
