// Page behaviors outside the report form
//
// Pure state for the navigation bar, scroll effects, reveal animations and
// stat counters. The host feeds in scroll offsets and clicks and applies
// the results.

pub mod counter;
pub mod navigation;
pub mod reveal;
pub mod scroll;

pub use counter::{format_thousands, CounterAnimation};
pub use navigation::{active_section, ClickOrigin, MobileMenu, Navigation, Section};
pub use reveal::{Bounds, RevealOptions, RevealTracker, Viewport};
pub use scroll::{navbar_background_alpha, parallax_offset, ScrollEffects, ScrollFrame};
