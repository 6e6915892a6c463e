// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the image being annotated.
// 2) Polygon outlines, vertex markers and a crosshair drawn into the frame.
// 3) A tiny 5x7 bitmap font to render HUD text on top of the image.

use crate::error::Error;
use crate::session::Event;
use crate::types::{FrameBuffer, Point, RasterMask};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Scale, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,      // the on-screen window you see
    width: usize,        // size of the frames we present, in image pixels
    height: usize,
    left_was_down: bool, // last frame's button state, to turn "held" into "clicked"
}

impl Drawer {
    /// Create a resizable window for `width` x `height` frames.
    /// With `fit_screen`, minifb shrinks the initial window to fit the screen; the
    /// frame is always stretched with its aspect ratio kept.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize, fit_screen: bool) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale: if fit_screen { Scale::FitScreen } else { Scale::X1 },
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);
        Ok(Self { window, width, height, left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in image pixel coordinates; None when the pointer is off the
    /// window or over the letterbox bars.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        let pos = self.window.get_unscaled_mouse_pos(MouseMode::Discard)?;
        window_to_image(pos, self.window.get_size(), (self.width, self.height))
    }

    /// Everything that happened since the last frame, in a fixed order:
    /// keys first, then a click if the left button went down this frame.
    pub fn poll_events(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(key_event)
            .collect();

        let left_down = self.window.get_mouse_down(MouseButton::Left);
        if left_down && !self.left_was_down {
            // Off-image clicks never reach the session.
            if let Some((x, y)) = self.mouse_pos() {
                events.push(Event::Primary(Point::new(x as f64, y as f64)));
            }
        }
        self.left_was_down = left_down;
        events
    }
}

/// Map a window-space pointer position to image pixels, for an image stretched to
/// the window with its aspect ratio kept and centred between bars.
pub fn window_to_image(pos: (f32, f32), window: (usize, usize), image: (usize, usize)) -> Option<(f32, f32)> {
    let (ww, wh) = (window.0 as f32, window.1 as f32);
    let (iw, ih) = (image.0 as f32, image.1 as f32);
    if ww <= 0.0 || wh <= 0.0 || iw <= 0.0 || ih <= 0.0 {
        return None;
    }
    let scale = (ww / iw).min(wh / ih);
    let x = (pos.0 - (ww - iw * scale) / 2.0) / scale;
    let y = (pos.1 - (wh - ih * scale) / 2.0) / scale;
    (x >= 0.0 && x < iw && y >= 0.0 && y < ih).then_some((x, y))
}

/// Key bindings: Enter confirms, Backspace/U undoes, Escape clears.
pub fn key_event(key: Key) -> Option<Event> {
    match key {
        Key::Enter | Key::NumPadEnter => Some(Event::Confirm),
        Key::Backspace | Key::U => Some(Event::Undo),
        Key::Escape => Some(Event::Clear),
        _ => None,
    }
}

/* ---------- Software drawing: pixels, lines, polygons, crosshair ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Filled square of side `size` centred on (x,y); size 1 is a single pixel.
fn put_dot(fb: &mut FrameBuffer, x: i32, y: i32, size: i32, color: u32) {
    let lo = -(size - 1) / 2;
    let hi = size / 2;
    for dy in lo..=hi {
        for dx in lo..=hi {
            put_pixel(fb, x + dx, y + dy, color);
        }
    }
}

/// Draw a line between (x0,y0) and (x1,y1), `width` pixels thick.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: u32) {
    let a = Point::new(x0 as f64, y0 as f64);
    let b = Point::new(x1 as f64, y1 as f64);
    draw_segment(fb, a, b, width, color);
}

/// Clip a→b to the frame grown by the pen size, then rasterize what is left.
fn draw_segment(fb: &mut FrameBuffer, a: Point, b: Point, width: i32, color: u32) {
    let width = width.max(1);
    let margin = width as f64 + 1.0;
    let Some((a, b)) = clip_segment(a, b, -margin, fb.width as f64 + margin, fb.height as f64 + margin) else {
        return;
    };
    let (x0, y0) = to_px(&a);
    let (x1, y1) = to_px(&b);
    bresenham(fb, x0, y0, x1, y1, width, color);
}

/// Liang-Barsky: the part of a→b inside [lo, hi_x] x [lo, hi_y], or None.
/// Non-finite endpoints are dropped.
fn clip_segment(a: Point, b: Point, lo: f64, hi_x: f64, hi_y: f64) -> Option<(Point, Point)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, a.x - lo), (dx, hi_x - a.x), (-dy, a.y - lo), (dy, hi_y - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 { return None; }
            t0 = t0.max(r);
        } else {
            if r < t0 { return None; }
            t1 = t1.min(r);
        }
    }
    Some((
        Point::new(a.x + t0 * dx, a.y + t0 * dy),
        Point::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

/// Bresenham between two endpoints already near the frame.
fn bresenham(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_dot(fb, x0, y0, width, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

#[inline]
fn to_px(p: &Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Connect consecutive points. Pass an already-closed list to get a loop.
pub fn draw_polyline(fb: &mut FrameBuffer, pts: &[Point], width: i32, color: u32) {
    for pair in pts.windows(2) {
        draw_segment(fb, pair[0], pair[1], width, color);
    }
}

/// Small filled circle with a dark rim, used for clicked vertices.
pub fn draw_marker(fb: &mut FrameBuffer, p: &Point, radius: i32, color: u32) {
    let r = radius as f64;
    let visible = p.x >= -r && p.y >= -r && p.x <= fb.width as f64 + r && p.y <= fb.height as f64 + r;
    if !visible {
        return;
    }
    let (cx, cy) = to_px(p);
    let r2 = radius * radius;
    let inner2 = (radius - 1) * (radius - 1);
    for y in -radius..=radius {
        for x in -radius..=radius {
            let d2 = x * x + y * y;
            if d2 > r2 { continue; }
            let c = if d2 > inner2 { 0x00000000 } else { color };
            put_pixel(fb, cx + x, cy + y, c);
        }
    }
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a "+" shape (with a tiny gap at the center) follows your mouse.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, 1, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, 1, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, 1, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, 1, color);
    put_pixel(fb, cx, cy, color);
}

/// Grayscale view of a mask: 255 → white, 0 → black.
pub fn mask_to_frame(mask: &RasterMask) -> FrameBuffer {
    let pixels = mask
        .cells
        .iter()
        .map(|&v| {
            let v = v as u32;
            (v << 16) | (v << 8) | v
        })
        .collect();
    FrameBuffer { width: mask.width, height: mask.height, pixels }
}

/// Lay frames out left to right with `gap` dark pixels between them.
/// Shorter frames are top-aligned.
pub fn side_by_side(panels: &[&FrameBuffer], gap: usize) -> FrameBuffer {
    let width = panels.iter().map(|p| p.width).sum::<usize>() + gap * panels.len().saturating_sub(1);
    let height = panels.iter().map(|p| p.height).max().unwrap_or(0);
    let mut out = FrameBuffer::filled(width, height, 0x00_20_20_20);
    let mut x0 = 0;
    for panel in panels {
        for y in 0..panel.height {
            let src = &panel.pixels[y * panel.width..(y + 1) * panel.width];
            let dst = y * width + x0;
            out.pixels[dst..dst + panel.width].copy_from_slice(src);
        }
        x0 += panel.width + gap;
    }
    out
}

/* ---------- 5x7 bitmap font (digits, A-Z, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y).
/// Visual: a tiny glyph appears with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass: offset by (1,1) in black to improve readability
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32 + 1, y + ry as i32 + 1, 0x00000000);
                }
            }
        }

        // Foreground pass: actual glyph in chosen color
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs. Lowercase is drawn as uppercase;
/// unknown characters leave a blank cell.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0x00_FF_00_00;

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_event(Key::Enter), Some(Event::Confirm));
        assert_eq!(key_event(Key::NumPadEnter), Some(Event::Confirm));
        assert_eq!(key_event(Key::Backspace), Some(Event::Undo));
        assert_eq!(key_event(Key::U), Some(Event::Undo));
        assert_eq!(key_event(Key::Escape), Some(Event::Clear));
        assert_eq!(key_event(Key::A), None);
    }

    #[test]
    fn test_line_endpoints_drawn() {
        let mut fb = FrameBuffer::filled(10, 10, 0);
        draw_line(&mut fb, 1, 1, 8, 5, 1, RED);
        assert_eq!(fb.pixels[1 * 10 + 1], RED);
        assert_eq!(fb.pixels[5 * 10 + 8], RED);
        assert_eq!(fb.pixels[9 * 10 + 0], 0);
    }

    #[test]
    fn test_thick_line() {
        let mut fb = FrameBuffer::filled(10, 10, 0);
        draw_line(&mut fb, 0, 5, 9, 5, 2, RED);
        // width 2 covers rows 5 and 6
        assert_eq!(fb.pixels[5 * 10 + 4], RED);
        assert_eq!(fb.pixels[6 * 10 + 4], RED);
        assert_eq!(fb.pixels[4 * 10 + 4], 0);
    }

    #[test]
    fn test_drawing_off_frame_is_clipped() {
        let mut fb = FrameBuffer::filled(4, 4, 0);
        draw_line(&mut fb, -10, -10, 20, 20, 3, RED);
        draw_marker(&mut fb, &Point::new(-5.0, 2.0), 3, RED);
        draw_text_5x7(&mut fb, 2, 2, "TARGET", RED);
        assert_eq!(fb.pixels.len(), 16);
    }

    #[test]
    fn test_far_off_frame_segment_is_clipped() {
        let mut fb = FrameBuffer::filled(8, 8, 0);
        let pts = vec![Point::new(-3e9, 0.0), Point::new(3e9, 0.0), Point::new(f64::NAN, 4.0)];
        draw_polyline(&mut fb, &pts, 1, RED);
        draw_marker(&mut fb, &Point::new(1e12, 3.0), 3, RED);
        draw_line(&mut fb, i32::MIN, 7, i32::MAX, 7, 1, RED);
        assert!(fb.pixels[..8].iter().all(|&p| p == RED));
        assert!(fb.pixels[7 * 8..].iter().all(|&p| p == RED));
        assert!(fb.pixels[8..7 * 8].iter().all(|&p| p == 0));
    }

    #[test]
    fn test_clip_keeps_inside_segment() {
        let (a, b) = (Point::new(1.0, 2.0), Point::new(5.0, 6.0));
        assert_eq!(clip_segment(a, b, -2.0, 10.0, 10.0), Some((a, b)));
        assert_eq!(clip_segment(Point::new(-5.0, 20.0), Point::new(-1.0, 30.0), -2.0, 10.0, 10.0), None);
    }

    #[test]
    fn test_window_to_image_mapping() {
        // same size
        assert_eq!(window_to_image((3.0, 4.0), (10, 10), (10, 10)), Some((3.0, 4.0)));
        // window shrunk to half
        assert_eq!(window_to_image((50.0, 25.0), (200, 100), (400, 200)), Some((100.0, 50.0)));
        // wide window: 100x100 image shown at 200x200 between two 100 px bars
        assert_eq!(window_to_image((150.0, 20.0), (400, 200), (100, 100)), Some((25.0, 10.0)));
        assert_eq!(window_to_image((50.0, 20.0), (400, 200), (100, 100)), None);
        assert_eq!(window_to_image((350.0, 20.0), (400, 200), (100, 100)), None);
        assert_eq!(window_to_image((1.0, 1.0), (0, 0), (100, 100)), None);
    }

    #[test]
    fn test_closed_polyline_touches_all_vertices() {
        let mut fb = FrameBuffer::filled(12, 12, 0);
        let pts = vec![
            Point::new(2.0, 2.0),
            Point::new(9.0, 2.0),
            Point::new(9.0, 9.0),
            Point::new(2.0, 2.0),
        ];
        draw_polyline(&mut fb, &pts, 1, RED);
        for (x, y) in [(2, 2), (9, 2), (9, 9), (5, 5)] {
            assert_eq!(fb.pixels[y * 12 + x], RED, "({x},{y})");
        }
    }

    #[test]
    fn test_mask_to_frame() {
        let mask = RasterMask { width: 2, height: 1, cells: vec![0, 255] };
        let fb = mask_to_frame(&mask);
        assert_eq!(fb.pixels, vec![0x00_00_00_00, 0x00_FF_FF_FF]);
    }

    #[test]
    fn test_side_by_side_layout() {
        let a = FrameBuffer { width: 2, height: 2, pixels: vec![1; 4] };
        let b = FrameBuffer { width: 1, height: 1, pixels: vec![2] };
        let out = side_by_side(&[&a, &b], 1);
        assert_eq!((out.width, out.height), (4, 2));
        assert_eq!(out.pixels[0], 1);
        assert_eq!(out.pixels[3], 2);
        assert_eq!(out.pixels[2], 0x00_20_20_20);
        assert_eq!(out.pixels[4 + 3], 0x00_20_20_20);
    }

    #[test]
    fn test_glyphs_cover_hud_text() {
        for ch in "Target | pts: 12 | Enter: OK  U/Bksp: undo  Esc: clear (0-9)".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
    }
}
