//! Polygon acquisition state machine.
//!
//! A [`Session`] collects the vertices of one polygon from a stream of discrete
//! input events. It starts `Active`, ends `Committed` (confirm) or `Abandoned`
//! (window closed). Invalid events are ignored without error; once the session has
//! ended every event is ignored.

use crate::types::{Point, Polygon, Role};

/// Input the dispatch loop feeds into a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Primary pointer action (left click) at image coordinates.
    Primary(Point),
    /// Drop the most recent point.
    Undo,
    /// Drop every point, keep capturing.
    Clear,
    /// Finish with the current points.
    Confirm,
    /// Surface closed without confirming.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Committed,
    Abandoned,
}

/// What an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Points changed; redraw the preview.
    Changed,
    /// Invalid or no-op event; nothing to do.
    Ignored,
    Committed,
    Abandoned,
}

/// Drawable area; a point must satisfy `0 <= x < width` and `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width: width as f64, height: height as f64 }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x.is_finite() && p.y.is_finite() && p.x >= 0.0 && p.y >= 0.0 && p.x < self.width && p.y < self.height
    }
}

/// How the in-progress polygon should be drawn right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Empty,
    /// A single point: draw as a marker only.
    Markers(Vec<Point>),
    /// Two or more points, first point repeated at the end.
    ClosedLoop(Vec<Point>),
}

/// A committed polygon shown behind the one being captured. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct Background<'a> {
    pub polygon: &'a Polygon,
    pub role: Role,
}

pub struct Session<'a> {
    points: Vec<Point>,
    phase: Phase,
    bounds: Bounds,
    background: Vec<Background<'a>>,
}

impl<'a> Session<'a> {
    pub fn new(bounds: Bounds) -> Self {
        Self { points: Vec::new(), phase: Phase::Active, bounds, background: Vec::new() }
    }

    /// Same, with already-committed polygons as drawing context.
    pub fn with_background(bounds: Bounds, background: Vec<Background<'a>>) -> Self {
        Self { background, ..Self::new(bounds) }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn background(&self) -> &[Background<'a>] {
        &self.background
    }

    /// Apply one event. Never fails; see [`Transition`] for what happened.
    pub fn apply(&mut self, event: Event) -> Transition {
        if self.phase != Phase::Active {
            log::trace!("{event:?} ignored: session is {:?}", self.phase);
            return Transition::Ignored;
        }

        match event {
            Event::Primary(p) => {
                if !self.bounds.contains(p) {
                    log::trace!("click at ({:.1}, {:.1}) outside the image", p.x, p.y);
                    return Transition::Ignored;
                }
                self.points.push(p);
                log::debug!("Point added at ({:.1}, {:.1}), total: {}", p.x, p.y, self.points.len());
                Transition::Changed
            }
            Event::Undo => match self.points.pop() {
                Some(_) => {
                    log::debug!("Last point removed, total: {}", self.points.len());
                    Transition::Changed
                }
                None => Transition::Ignored,
            },
            Event::Clear => {
                if self.points.is_empty() {
                    return Transition::Ignored;
                }
                self.points.clear();
                log::debug!("All points cleared");
                Transition::Changed
            }
            Event::Confirm => {
                self.phase = Phase::Committed;
                log::debug!("Polygon committed with {} points", self.points.len());
                Transition::Committed
            }
            Event::Exit => {
                self.phase = Phase::Abandoned;
                Transition::Abandoned
            }
        }
    }

    pub fn preview(&self) -> Preview {
        match self.points.len() {
            0 => Preview::Empty,
            1 => Preview::Markers(self.points.clone()),
            _ => {
                let mut pts = self.points.clone();
                pts.push(self.points[0]);
                Preview::ClosedLoop(pts)
            }
        }
    }

    /// The finished polygon, if the session was committed.
    pub fn into_polygon(self) -> Option<Polygon> {
        match self.phase {
            Phase::Committed => Some(Polygon::new(self.points)),
            Phase::Active | Phase::Abandoned => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<'static> {
        Session::new(Bounds::new(100, 80))
    }

    fn click(x: f64, y: f64) -> Event {
        Event::Primary(Point::new(x, y))
    }

    #[test]
    fn test_add_points_in_order() {
        let mut s = session();
        assert_eq!(s.apply(click(1.0, 2.0)), Transition::Changed);
        assert_eq!(s.apply(click(3.5, 4.25)), Transition::Changed);
        assert_eq!(s.points(), &[Point::new(1.0, 2.0), Point::new(3.5, 4.25)]);
    }

    #[test]
    fn test_out_of_bounds_click_ignored() {
        let mut s = session();
        for e in [click(-1.0, 5.0), click(100.0, 5.0), click(5.0, 80.0), click(f64::NAN, 1.0)] {
            assert_eq!(s.apply(e), Transition::Ignored);
        }
        assert!(s.points().is_empty());
        assert!(s.is_active());
    }

    #[test]
    fn test_undo_and_clear_on_empty_are_noops() {
        let mut s = session();
        assert_eq!(s.apply(Event::Undo), Transition::Ignored);
        assert_eq!(s.apply(Event::Clear), Transition::Ignored);
        assert!(s.points().is_empty());
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.preview(), Preview::Empty);
    }

    #[test]
    fn test_add_then_undo_restores() {
        let mut s = session();
        s.apply(click(10.0, 10.0));
        s.apply(click(20.0, 10.0));
        let before = s.points().to_vec();
        s.apply(click(15.0, 30.0));
        s.apply(Event::Undo);
        assert_eq!(s.points(), before.as_slice());
    }

    #[test]
    fn test_clear_keeps_session_active() {
        let mut s = session();
        s.apply(click(10.0, 10.0));
        s.apply(click(20.0, 10.0));
        assert_eq!(s.apply(Event::Clear), Transition::Changed);
        assert!(s.points().is_empty());
        assert!(s.is_active());
        assert_eq!(s.apply(click(5.0, 5.0)), Transition::Changed);
        assert_eq!(s.points().len(), 1);
    }

    #[test]
    fn test_commit_freezes_points() {
        let mut s = session();
        s.apply(click(1.0, 1.0));
        s.apply(click(9.0, 1.0));
        s.apply(click(5.0, 7.0));
        assert_eq!(s.apply(Event::Confirm), Transition::Committed);
        assert_eq!(s.apply(click(50.0, 50.0)), Transition::Ignored);
        assert_eq!(s.apply(Event::Undo), Transition::Ignored);
        assert_eq!(s.apply(Event::Clear), Transition::Ignored);
        assert_eq!(s.apply(Event::Exit), Transition::Ignored);
        let poly = s.into_polygon().unwrap();
        assert_eq!(poly, Polygon::from(vec![(1.0, 1.0), (9.0, 1.0), (5.0, 7.0)]));
    }

    #[test]
    fn test_commit_empty_or_degenerate() {
        let mut s = session();
        s.apply(Event::Confirm);
        assert_eq!(s.into_polygon(), Some(Polygon::default()));

        let mut s = session();
        s.apply(click(1.0, 1.0));
        s.apply(Event::Confirm);
        assert!(s.into_polygon().unwrap().is_degenerate());
    }

    #[test]
    fn test_exit_abandons() {
        let mut s = session();
        s.apply(click(1.0, 1.0));
        assert_eq!(s.apply(Event::Exit), Transition::Abandoned);
        assert_eq!(s.phase(), Phase::Abandoned);
        assert_eq!(s.apply(Event::Confirm), Transition::Ignored);
        assert_eq!(s.into_polygon(), None);
    }

    #[test]
    fn test_preview_shapes() {
        let mut s = session();
        s.apply(click(1.0, 1.0));
        assert_eq!(s.preview(), Preview::Markers(vec![Point::new(1.0, 1.0)]));
        s.apply(click(4.0, 1.0));
        assert_eq!(
            s.preview(),
            Preview::ClosedLoop(vec![Point::new(1.0, 1.0), Point::new(4.0, 1.0), Point::new(1.0, 1.0)])
        );
        s.apply(click(4.0, 4.0));
        match s.preview() {
            Preview::ClosedLoop(pts) => {
                assert_eq!(pts.len(), 4);
                assert_eq!(pts.first(), pts.last());
            }
            other => panic!("expected closed loop, got {other:?}"),
        }
        // preview never leaks into the stored points
        assert_eq!(s.points().len(), 3);
    }

    #[test]
    fn test_background_is_separate() {
        let target = Polygon::from(vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        let bg = vec![Background { polygon: &target, role: Role::Target }];
        let mut s = Session::with_background(Bounds::new(10, 10), bg);
        s.apply(click(7.0, 7.0));
        s.apply(Event::Clear);
        assert!(s.points().is_empty());
        assert_eq!(s.background().len(), 1);
        assert_eq!(s.background()[0].polygon.len(), 3);
        assert_eq!(target.len(), 3);
    }
}
