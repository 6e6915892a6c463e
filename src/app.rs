// The two ways through the tool:
// • create: click the target, then any number of distractors, save the record, write outputs.
// • load:   read an existing record and go straight to the outputs.

use crate::capture::{background_for, PolygonSource, WindowCapture};
use crate::config::Config;
use crate::error::Error;
use crate::image_io;
use crate::output::{self, ArtifactPaths, Outputs};
use crate::prompt::Prompter;
use crate::record::{AnnotationSet, Region};
use crate::types::{FrameBuffer, Polygon};
use std::io::{BufRead, Write};
use std::path::Path;

/// Ask which mode to run, then run it.
pub fn run<R: BufRead, W: Write>(config: &Config, prompter: &mut Prompter<R, W>) -> Result<(), Error> {
    let has_record = prompter.ask_yes_no("Do you already have a JSON annotation file?")?;

    let name = prompter.ask_line("Image name (png, without extension): ")?;
    let image_path = config.image_path(name.trim());
    let image = image_io::load_image(&image_path)?;
    let paths = ArtifactPaths::for_image(&image_path);

    let outputs = if has_record {
        let record_name = prompter.ask_line("JSON name (without extension): ")?;
        let record_path = config.record_path(record_name.trim());
        render_from_record(&image, &record_path, &paths, config)?
    } else {
        let mut source = WindowCapture { image: &image, config };
        match create_annotations(&mut source, prompter)? {
            Some(set) => {
                set.save(&paths.record)?;
                output::finalize(&image, &set, &paths, config)?
            }
            None => {
                log::warn!("Nothing saved");
                return Ok(());
            }
        }
    };

    if config.show_review {
        output::show_review(&outputs, config)?;
    }
    Ok(())
}

/// Load mode: the record is fully read and checked before any artifact is written.
pub fn render_from_record(
    image: &FrameBuffer,
    record_path: &Path,
    paths: &ArtifactPaths,
    config: &Config,
) -> Result<Outputs, Error> {
    let set = AnnotationSet::load(record_path)?;
    output::finalize(image, &set, paths, config)
}

/// Create mode: interactive capture of the target and the distractors.
/// Returns None if the target capture was abandoned. An abandoned distractor is
/// left out and the user is asked again.
pub fn create_annotations<S: PolygonSource, R: BufRead, W: Write>(
    source: &mut S,
    prompter: &mut Prompter<R, W>,
) -> Result<Option<AnnotationSet>, Error> {
    log::info!("=== Target ===");
    let Some(target) = source.capture("Click to outline the TARGET (Enter to confirm)", "Target", Vec::new())? else {
        return Ok(None);
    };
    let target_description = prompter.ask_line("Target description: ")?;

    let mut polygons: Vec<Polygon> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();
    loop {
        if !prompter.ask_yes_no("\nAdd a distractor?")? {
            break;
        }
        let i = polygons.len() + 1;
        log::info!("=== Distractor {i} ===");

        let background = background_for(&target, &polygons);
        let captured = source.capture(
            &format!("Click to outline distractor {i} (Enter to confirm, Backspace/u to undo)"),
            &format!("Distractor {i}"),
            background,
        )?;
        let Some(polygon) = captured else {
            log::warn!("Distractor {i} not added");
            continue;
        };
        let description = prompter.ask_line(&format!("Distractor {i} description: "))?;
        polygons.push(polygon);
        descriptions.push(description);
    }

    let distractors = polygons
        .into_iter()
        .zip(descriptions)
        .map(|(p, d)| Region::new(p, d))
        .collect();
    Ok(Some(AnnotationSet::build(Region::new(target, target_description), distractors)))
}
