// Interactive capture of one polygon.
// Visual: the image fills the window; polygons already committed are drawn behind
// in their role color, the polygon being clicked is drawn in blue with a dot on
// every vertex, and a HUD line shows what is being captured and the key bindings.

use crate::config::Config;
use crate::draw::{draw_crosshair, draw_marker, draw_polyline, draw_text_5x7, Drawer};
use crate::error::Error;
use crate::session::{Background, Bounds, Event, Phase, Preview, Session, Transition};
use crate::types::{FrameBuffer, Polygon, Role};

const MARKER_RADIUS: i32 = 3;
const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const CROSSHAIR_COLOR: u32 = 0x00_FF_CC_33;
const KEY_HINTS: &str = "Click: add  Enter: OK  U/Bksp: undo  Esc: clear";

/// Where create mode gets its polygons from.
pub trait PolygonSource {
    /// One polygon, or None when the capture was abandoned.
    fn capture(&mut self, title: &str, label: &str, background: Vec<Background<'_>>) -> Result<Option<Polygon>, Error>;
}

/// Captures every polygon in its own window over the same image.
pub struct WindowCapture<'a> {
    pub image: &'a FrameBuffer,
    pub config: &'a Config,
}

impl PolygonSource for WindowCapture<'_> {
    fn capture(&mut self, title: &str, label: &str, background: Vec<Background<'_>>) -> Result<Option<Polygon>, Error> {
        capture_polygon(self.image, title, label, background, self.config)
    }
}

/// Run one acquisition session over `image`.
/// Returns the committed polygon, or None if the window was closed first.
pub fn capture_polygon(
    image: &FrameBuffer,
    title: &str,
    label: &str,
    background: Vec<Background<'_>>,
    config: &Config,
) -> Result<Option<Polygon>, Error> {
    let mut drawer = Drawer::new(title, image.width, image.height, config.target_fps, config.fit_screen)?;
    let mut session = Session::with_background(Bounds::new(image.width, image.height), background);
    let mut screen = image.clone();

    log::info!("Capturing {label}: {KEY_HINTS}");

    /* ------------------------------ Event loop ------------------------------ */
    while session.is_active() {
        // 1) Redraw: base image, background polygons, live preview, HUD.
        let cursor = drawer.mouse_pos().map(|(x, y)| (x as i32, y as i32));
        render_capture_frame(&mut screen, image, &session, label, config, cursor);

        // 2) Present; minifb refreshes its input state here.
        drawer.present(&screen)?;

        if !drawer.is_open() {
            session.apply(Event::Exit);
            break;
        }

        // 3) Feed events one at a time; anything after a confirm is dropped by the session.
        for event in drawer.poll_events() {
            if session.apply(event) == Transition::Committed {
                break;
            }
        }
    }

    match session.phase() {
        Phase::Committed => Ok(session.into_polygon()),
        Phase::Abandoned | Phase::Active => {
            log::warn!("Capture of {label} abandoned (window closed without Enter)");
            Ok(None)
        }
    }
}

/// Compose one frame of the capture view into `screen`.
pub fn render_capture_frame(
    screen: &mut FrameBuffer,
    image: &FrameBuffer,
    session: &Session<'_>,
    label: &str,
    config: &Config,
    cursor: Option<(i32, i32)>,
) {
    screen.pixels.copy_from_slice(&image.pixels);
    let lw = config.line_width;

    for bg in session.background() {
        if bg.polygon.is_empty() {
            continue;
        }
        draw_polyline(screen, &bg.polygon.closed_loop(), lw, config.palette.color(bg.role));
    }

    let color = config.palette.color(Role::InProgress);
    match session.preview() {
        Preview::Empty => {}
        Preview::Markers(pts) => {
            for p in &pts {
                draw_marker(screen, p, MARKER_RADIUS, color);
            }
        }
        Preview::ClosedLoop(pts) => {
            draw_polyline(screen, &pts, lw, color);
            // last entry repeats the first vertex
            for p in &pts[..pts.len() - 1] {
                draw_marker(screen, p, MARKER_RADIUS, color);
            }
        }
    }

    if let Some((mx, my)) = cursor {
        draw_crosshair(screen, mx, my, 12, CROSSHAIR_COLOR);
    }

    let hud = format!("{label} | pts: {} | {KEY_HINTS}", session.points().len());
    draw_text_5x7(screen, 8, 8, &hud, HUD_COLOR);
}

/// Background for capturing a new distractor: the target plus every distractor so far.
pub fn background_for<'a>(target: &'a Polygon, distractors: &'a [Polygon]) -> Vec<Background<'a>> {
    std::iter::once(Background { polygon: target, role: Role::Target })
        .chain(distractors.iter().map(|p| Background { polygon: p, role: Role::Distractor }))
        .filter(|bg| !bg.polygon.is_empty())
        .collect()
}
