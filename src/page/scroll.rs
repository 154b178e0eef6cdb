// Scroll-linked effects, coalesced to one update per animation frame

/// Hero background moves at half the scroll speed, upwards.
pub const PARALLAX_RATE: f64 = -0.5;

const NAVBAR_BASE_ALPHA: f64 = 0.95;
const NAVBAR_FADE_DISTANCE: f64 = 100.0;

pub fn parallax_offset(scroll_offset: f64) -> f64 {
    scroll_offset * PARALLAX_RATE
}

/// Navbar background opacity: 0.95 at the top, fully opaque after 100 px.
pub fn navbar_background_alpha(scroll_offset: f64) -> f64 {
    let progress = (scroll_offset / NAVBAR_FADE_DISTANCE).min(1.0);
    NAVBAR_BASE_ALPHA + progress * (1.0 - NAVBAR_BASE_ALPHA)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    pub scroll_offset: f64,
    pub parallax_offset: f64,
    pub navbar_alpha: f64,
}

impl ScrollFrame {
    pub fn at(scroll_offset: f64) -> Self {
        Self {
            scroll_offset,
            parallax_offset: parallax_offset(scroll_offset),
            navbar_alpha: navbar_background_alpha(scroll_offset),
        }
    }
}

/// Scroll events only record the offset and ask for a frame; the effects are
/// computed once per frame from the latest offset.
#[derive(Debug, Default)]
pub struct ScrollEffects {
    latest: f64,
    frame_requested: bool,
}

impl ScrollEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the host must schedule an animation frame.
    pub fn on_scroll(&mut self, scroll_offset: f64) -> bool {
        self.latest = scroll_offset;
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    /// `None` if no scroll happened since the last frame.
    pub fn on_animation_frame(&mut self) -> Option<ScrollFrame> {
        if !self.frame_requested {
            return None;
        }
        self.frame_requested = false;
        Some(ScrollFrame::at(self.latest))
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }
}
