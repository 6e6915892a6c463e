// Reads the source image into a frame buffer and writes rasters back out as PNG.
// Frames are 0x00RRGGBB so the same buffer can go straight to the window.

use crate::error::Error;
use crate::types::{FrameBuffer, RasterMask};
use image::{GrayImage, ImageBuffer, Rgb, RgbImage};
use std::path::Path;

/// Decode any format the `image` crate knows (PNG in practice) into 0x00RRGGBB pixels.
/// Alpha is dropped.
pub fn load_image(path: &Path) -> Result<FrameBuffer, Error> {
    let rgb_img = image::open(path)
        .map_err(|source| Error::ImageLoad { path: path.to_path_buf(), source })?
        .to_rgb8();

    let (w, h) = rgb_img.dimensions();
    let mut out = Vec::with_capacity((w as usize) * (h as usize));
    for (_x, _y, pixel) in rgb_img.enumerate_pixels() {
        let r = pixel[0] as u32;
        let g = pixel[1] as u32;
        let b = pixel[2] as u32;
        out.push((r << 16) | (g << 8) | b);
    }
    log::debug!("Loaded {} ({w}x{h})", path.display());

    Ok(FrameBuffer { width: w as usize, height: h as usize, pixels: out })
}

/// Unpack a frame into an RGB image.
pub fn frame_to_rgb(fb: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let px = fb.pixels[y as usize * fb.width + x as usize];
        Rgb([((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8])
    })
}

pub fn save_frame_png(fb: &FrameBuffer, path: &Path) -> Result<(), Error> {
    frame_to_rgb(fb)
        .save(path)
        .map_err(|source| Error::ImageSave { path: path.to_path_buf(), source })
}

/// Single-channel 8-bit PNG, 0 outside / 255 inside.
pub fn save_mask_png(mask: &RasterMask, path: &Path) -> Result<(), Error> {
    let img = GrayImage::from_fn(mask.width as u32, mask.height as u32, |x, y| {
        image::Luma([mask.cells[y as usize * mask.width + x as usize]])
    });
    img.save(path)
        .map_err(|source| Error::ImageSave { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let fb = FrameBuffer { width: 3, height: 2, pixels: vec![0x00FF0000, 0x0000FF00, 0x000000FF, 0, 0x00FFFFFF, 0x00123456] };
        save_frame_png(&fb, &path).unwrap();
        let back = load_image(&path).unwrap();
        assert_eq!((back.width, back.height), (3, 2));
        assert_eq!(back.pixels, fb.pixels);
    }

    #[test]
    fn test_mask_png_is_grayscale_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mask = RasterMask { width: 2, height: 2, cells: vec![0, 255, 255, 0] };
        save_mask_png(&mask, &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!(img.color(), image::ColorType::L8);
        let gray = img.to_luma8();
        assert_eq!(gray.as_raw(), &vec![0, 255, 255, 0]);
    }

    #[test]
    fn test_missing_image_is_load_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::ImageLoad { .. }));
    }
}
