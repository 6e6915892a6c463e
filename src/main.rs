// What you get:
// • A yes/no question: do you already have a JSON record for this image?
// • No  → a window opens over the image. Left click adds a vertex, Backspace/U
//         removes the last one, Esc clears them all, Enter confirms. First the
//         target, then as many distractors as you want.
// • Yes → the record is loaded instead.
// • Either way: target mask, distractor mask and annotated image are written next
//   to the source image, then shown side by side.

use pixmask::app;
use pixmask::config::Config;
use pixmask::error::Error;
use pixmask::prompt::Prompter;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!("Working directory: {}", config.work_dir.display());

    let mut prompter = Prompter::stdio();
    app::run(&config, &mut prompter)
}
