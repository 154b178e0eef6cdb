// Reveal-on-scroll triggers
//
// A vertical-only intersection model: targets are laid out in document
// coordinates and tested against the viewport, optionally shrunk at the
// bottom so elements reveal a little after they enter view.

use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the target that must be inside the root, 0.0 to 1.0
    pub threshold: f64,
    /// Pixels cut from the bottom of the viewport
    pub bottom_margin: f64,
}

impl RevealOptions {
    /// Program, hacker, feature and leaderboard cards
    pub fn cards() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            bottom_margin: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_offset: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_offset: f64, height: f64) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Fraction of `bounds` inside the viewport after applying the bottom margin.
pub fn visible_ratio(bounds: Bounds, viewport: Viewport, options: &RevealOptions) -> f64 {
    let root_top = viewport.scroll_offset;
    let root_bottom = viewport.scroll_offset + (viewport.height - options.bottom_margin).max(0.0);
    let bottom = bounds.top + bounds.height;

    if bounds.height <= 0.0 {
        return if bounds.top >= root_top && bounds.top < root_bottom {
            1.0
        } else {
            0.0
        };
    }

    let overlap = bottom.min(root_bottom) - bounds.top.max(root_top);
    (overlap.max(0.0) / bounds.height).min(1.0)
}

#[derive(Debug, Clone)]
struct Target {
    bounds: Bounds,
    options: RevealOptions,
    one_shot: bool,
    revealed: bool,
}

/// Tracks which page elements have been revealed.
///
/// Revealing is sticky: an element scrolled back out of view stays revealed.
/// One-shot targets are dropped from observation the first time they fire.
#[derive(Debug, Default)]
pub struct RevealTracker {
    targets: IndexMap<String, Target>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: impl Into<String>, bounds: Bounds, options: RevealOptions) {
        self.insert(id.into(), bounds, options, false);
    }

    /// Observe a target that fires once and is then unobserved.
    pub fn observe_once(&mut self, id: impl Into<String>, bounds: Bounds, options: RevealOptions) {
        self.insert(id.into(), bounds, options, true);
    }

    fn insert(&mut self, id: String, bounds: Bounds, options: RevealOptions, one_shot: bool) {
        self.targets.insert(
            id,
            Target {
                bounds,
                options,
                one_shot,
                revealed: false,
            },
        );
    }

    pub fn unobserve(&mut self, id: &str) -> bool {
        self.targets.shift_remove(id).is_some()
    }

    pub fn is_observed(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.targets.get(id).is_some_and(|target| target.revealed)
    }

    /// Ids that became visible at this viewport position, in observation order.
    pub fn on_viewport_change(&mut self, viewport: Viewport) -> Vec<String> {
        let mut newly_revealed = Vec::new();
        for (id, target) in self.targets.iter_mut() {
            if target.revealed {
                continue;
            }
            let ratio = visible_ratio(target.bounds, viewport, &target.options);
            if ratio > 0.0 && ratio >= target.options.threshold {
                target.revealed = true;
                newly_revealed.push(id.clone());
            }
        }

        self.targets
            .retain(|_, target| !(target.one_shot && target.revealed));

        if !newly_revealed.is_empty() {
            debug!(
                scroll_offset = viewport.scroll_offset,
                revealed = ?newly_revealed,
                "Elements revealed"
            );
        }
        newly_revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_reveal_needs_ten_percent_above_margin() {
        let options = RevealOptions::cards();
        let card = Bounds::new(1000.0, 200.0);

        // Viewport bottom at 1050, root bottom at 1000
        assert_eq!(visible_ratio(card, Viewport::new(250.0, 800.0), &options), 0.0);
        // 19 px inside the shrunk root
        assert!(visible_ratio(card, Viewport::new(269.0, 800.0), &options) < 0.1);
        // 20 px inside
        assert!(visible_ratio(card, Viewport::new(270.0, 800.0), &options) >= 0.1);
    }

    #[test]
    fn test_reveal_is_sticky() {
        let mut tracker = RevealTracker::new();
        tracker.observe("program-1", Bounds::new(1000.0, 200.0), RevealOptions::cards());

        assert!(tracker.on_viewport_change(Viewport::new(0.0, 800.0)).is_empty());
        assert_eq!(
            tracker.on_viewport_change(Viewport::new(400.0, 800.0)),
            vec!["program-1"]
        );
        assert!(tracker.on_viewport_change(Viewport::new(0.0, 800.0)).is_empty());
        assert!(tracker.on_viewport_change(Viewport::new(400.0, 800.0)).is_empty());

        assert!(tracker.is_revealed("program-1"));
        assert!(tracker.is_observed("program-1"));
    }

    #[test]
    fn test_one_shot_target_is_unobserved() {
        let mut tracker = RevealTracker::new();
        tracker.observe_once("hero-stats", Bounds::new(300.0, 100.0), RevealOptions::default());

        assert_eq!(
            tracker.on_viewport_change(Viewport::new(0.0, 800.0)),
            vec!["hero-stats"]
        );
        assert!(!tracker.is_observed("hero-stats"));
        assert!(tracker.on_viewport_change(Viewport::new(0.0, 800.0)).is_empty());
    }

    #[test]
    fn test_reveals_follow_observation_order() {
        let mut tracker = RevealTracker::new();
        tracker.observe("b", Bounds::new(100.0, 50.0), RevealOptions::default());
        tracker.observe("a", Bounds::new(10.0, 50.0), RevealOptions::default());
        tracker.observe("far", Bounds::new(5000.0, 50.0), RevealOptions::default());

        assert_eq!(
            tracker.on_viewport_change(Viewport::new(0.0, 600.0)),
            vec!["b", "a"]
        );
        assert!(tracker.unobserve("far"));
        assert!(!tracker.unobserve("far"));
    }
}
