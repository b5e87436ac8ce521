use std::time::{Duration, Instant};

use crate::core::geo::LngLat;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 18.0;

fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// An in-flight animated recenter. Replaced wholesale when a newer pan is
/// issued before this one finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from_center: LngLat,
    pub from_zoom: f64,
    pub to_center: LngLat,
    pub to_zoom: f64,
    pub started: Instant,
    pub duration: Duration,
}

impl Transition {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn sample(&self, now: Instant) -> (LngLat, f64) {
        let t = ease_out_cubic(self.progress(now));
        let center = LngLat::new(
            self.from_center.lng + (self.to_center.lng - self.from_center.lng) * t,
            self.from_center.lat + (self.to_center.lat - self.from_center.lat) * t,
        );
        let zoom = self.from_zoom + (self.to_zoom - self.from_zoom) * t;
        (center, zoom)
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Center/zoom state an engine renders from.
///
/// The settled center and zoom always reflect the most recent target; the
/// transition only exists so a renderer can sample the eased path. Centers
/// are wrapped/clamped to the displayable world, zoom to [0, 18].
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    center: LngLat,
    zoom: f64,
    transition: Option<Transition>,
}

impl Camera {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self {
            center: center.normalized(),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            transition: None,
        }
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Recenters instantly, cancelling any in-flight transition.
    pub fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.center = center.normalized();
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.transition = None;
    }

    /// Starts an animated recenter. A later `fly_to` before this one settles
    /// supersedes it; the new transition starts from the current sampled
    /// position, not from the stale target.
    pub fn fly_to(&mut self, center: LngLat, zoom: f64, duration: Duration) {
        let now = Instant::now();
        let (from_center, from_zoom) = self.sample(now);

        let to_center = center.normalized();
        let to_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);

        self.transition = Some(Transition {
            from_center,
            from_zoom,
            to_center,
            to_zoom,
            started: now,
            duration,
        });
        self.center = to_center;
        self.zoom = to_zoom;
    }

    /// The eased position at `now`, for renderers; the settled target
    /// otherwise.
    pub fn sample(&self, now: Instant) -> (LngLat, f64) {
        match &self.transition {
            Some(transition) if !transition.is_done(now) => transition.sample(now),
            _ => (self.center, self.zoom),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|t| !t.is_done(now))
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }
}
