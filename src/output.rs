//! Output artifacts for one annotated image.
//!
//! From `<dir>/<name>.png` we write `<name>_mask_target.png`,
//! `<name>_mask_distractors.png`, `<name>_annotated.png` and, in create mode,
//! `<name>_annotations.json`, all next to the source image.

use crate::config::Config;
use crate::draw::{self, Drawer};
use crate::error::Error;
use crate::image_io;
use crate::raster;
use crate::record::AnnotationSet;
use crate::types::{FrameBuffer, RasterMask};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub target_mask: PathBuf,
    pub distractor_mask: PathBuf,
    pub annotated: PathBuf,
    pub record: PathBuf,
}

impl ArtifactPaths {
    /// Paths derived from the source image path with its extension removed.
    pub fn for_image(image_path: &Path) -> Self {
        let base = image_path.with_extension("");
        let with_suffix = |suffix: &str| {
            let mut s = base.clone().into_os_string();
            s.push(suffix);
            PathBuf::from(s)
        };
        Self {
            target_mask: with_suffix("_mask_target.png"),
            distractor_mask: with_suffix("_mask_distractors.png"),
            annotated: with_suffix("_annotated.png"),
            record: with_suffix("_annotations.json"),
        }
    }
}

/// What `finalize` produced, kept in memory for the review window.
#[derive(Debug)]
pub struct Outputs {
    pub annotated: FrameBuffer,
    pub target_mask: RasterMask,
    pub distractor_mask: RasterMask,
}

/// Source image with the target outline in the target color and every
/// distractor outline in the distractor color.
pub fn annotate(image: &FrameBuffer, set: &AnnotationSet, config: &Config) -> FrameBuffer {
    let mut out = image.clone();
    for (polygon, role) in set.overlays() {
        if polygon.is_empty() {
            continue;
        }
        draw::draw_polyline(&mut out, &polygon.closed_loop(), config.line_width, config.palette.color(role));
    }
    out
}

/// Rasterize both masks and write masks + annotated preview.
pub fn finalize(
    image: &FrameBuffer,
    set: &AnnotationSet,
    paths: &ArtifactPaths,
    config: &Config,
) -> Result<Outputs, Error> {
    let (target_mask, distractor_mask) =
        raster::rasterize_annotation_set(set, image.height, image.width, config.tolerance);
    log::debug!(
        "target mask: {} px, distractor mask: {} px",
        target_mask.count_inside(),
        distractor_mask.count_inside()
    );

    image_io::save_mask_png(&target_mask, &paths.target_mask)?;
    log::info!("Mask saved: {}", paths.target_mask.display());
    image_io::save_mask_png(&distractor_mask, &paths.distractor_mask)?;
    log::info!("Mask saved: {}", paths.distractor_mask.display());

    let annotated = annotate(image, set, config);
    image_io::save_frame_png(&annotated, &paths.annotated)?;
    log::info!("Annotated image saved: {}", paths.annotated.display());

    Ok(Outputs { annotated, target_mask, distractor_mask })
}

/// Three panels, left to right: annotated image, target mask, distractor mask.
pub fn review_frame(outputs: &Outputs) -> FrameBuffer {
    let target = draw::mask_to_frame(&outputs.target_mask);
    let distractors = draw::mask_to_frame(&outputs.distractor_mask);
    let mut frame = draw::side_by_side(&[&outputs.annotated, &target, &distractors], 8);

    let w = outputs.annotated.width as i32 + 8;
    draw::draw_text_5x7(&mut frame, 8, 8, "Image + outlines", 0x00_FF_FF_FF);
    draw::draw_text_5x7(&mut frame, w + 8, 8, "Target mask", 0x00_FF_CC_33);
    draw::draw_text_5x7(&mut frame, 2 * w + 8, 8, "Distractor mask", 0x00_FF_CC_33);
    frame
}

/// Show the review panels until the window is closed or Esc is pressed.
pub fn show_review(outputs: &Outputs, config: &Config) -> Result<(), Error> {
    let frame = review_frame(outputs);
    let mut drawer =
        Drawer::new("Review (Esc to close)", frame.width, frame.height, config.target_fps, config.fit_screen)?;
    while drawer.is_open() && !drawer.esc_pressed() {
        drawer.present(&frame)?;
    }
    Ok(())
}
