// Polygon → binary mask.
// Every pixel (col, row) is sampled at its center (col, row); a pixel is inside the
// mask if any non-degenerate polygon contains it. Rows are filled in parallel, each
// worker owning one output row, so no locking is needed.

use crate::geometry::{self, DEFAULT_TOLERANCE};
use crate::record::AnnotationSet;
use crate::types::{Point, Polygon, RasterMask};
use rayon::prelude::*;

/// Rasterize with the default half-pixel boundary tolerance.
pub fn rasterize<'p>(
    height: usize,
    width: usize,
    polygons: impl IntoIterator<Item = &'p Polygon>,
) -> RasterMask {
    rasterize_with_tolerance(height, width, polygons, DEFAULT_TOLERANCE)
}

/// Union of all non-degenerate `polygons` on a `height` × `width` grid.
pub fn rasterize_with_tolerance<'p>(
    height: usize,
    width: usize,
    polygons: impl IntoIterator<Item = &'p Polygon>,
    tolerance: f64,
) -> RasterMask {
    let mut mask = RasterMask::empty(height, width);
    if width == 0 || height == 0 {
        return mask;
    }

    // Per polygon, only the pixels of its bounding box (grown by the tolerance)
    // can ever be inside; everything else stays outside.
    let spans: Vec<PixelSpan<'p>> = polygons
        .into_iter()
        .filter(|p| !p.is_degenerate())
        .filter_map(|p| PixelSpan::new(p, height, width, tolerance))
        .collect();
    if spans.is_empty() {
        return mask;
    }

    mask.cells
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, cells)| {
            for span in spans.iter().filter(|s| s.rows.contains(&row)) {
                for col in span.cols.clone() {
                    if cells[col] == RasterMask::INSIDE {
                        continue;
                    }
                    let pixel = Point::new(col as f64, row as f64);
                    if geometry::contains(span.polygon, pixel, tolerance) {
                        cells[col] = RasterMask::INSIDE;
                    }
                }
            }
        });

    mask
}

/// The two masks written for one image: (target, union of all distractors).
pub fn rasterize_annotation_set(
    set: &AnnotationSet,
    height: usize,
    width: usize,
    tolerance: f64,
) -> (RasterMask, RasterMask) {
    let target = rasterize_with_tolerance(height, width, [&set.target.polygon], tolerance);
    let distractors = rasterize_with_tolerance(
        height,
        width,
        set.distractors.iter().map(|d| &d.polygon),
        tolerance,
    );
    (target, distractors)
}

/// Pixel rows/cols a polygon can touch, clamped to the grid.
struct PixelSpan<'a> {
    polygon: &'a Polygon,
    rows: std::ops::RangeInclusive<usize>,
    cols: std::ops::RangeInclusive<usize>,
}

impl<'a> PixelSpan<'a> {
    fn new(polygon: &'a Polygon, height: usize, width: usize, tolerance: f64) -> Option<Self> {
        let (x0, y0, x1, y1) = polygon.bounding_box()?;
        let cols = pixel_range(x0 - tolerance, x1 + tolerance, width)?;
        let rows = pixel_range(y0 - tolerance, y1 + tolerance, height)?;
        Some(Self { polygon, rows, cols })
    }
}

/// Integer pixel centers in [lo, hi] that fall on a grid of `len` pixels.
fn pixel_range(lo: f64, hi: f64, len: usize) -> Option<std::ops::RangeInclusive<usize>> {
    let max = (len - 1) as f64;
    let first = lo.ceil().max(0.0);
    let last = hi.floor().min(max);
    if !(first <= last) {
        // also catches NaN coordinates
        return None;
    }
    Some(first as usize..=last as usize)
}
