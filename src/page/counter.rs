// Hero stat counters: count up from zero to the number in the label

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

pub const COUNTER_STEPS: u32 = 100;
pub const COUNTER_TICK: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u64,
    suffix: String,
    step: u32,
}

impl CounterAnimation {
    /// The target is every digit in the label read as one number; the suffix
    /// is whatever is left once digits and separators are removed, so
    /// `"10,000+"` counts to 10000 and renders with `"+"`.
    ///
    /// Returns `None` when the label holds no usable number.
    pub fn from_label(label: &str) -> Option<Self> {
        let digits: String = label.chars().filter(char::is_ascii_digit).collect();
        let target = digits.parse::<u64>().ok()?;
        let suffix = label
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != ',')
            .collect();
        Some(Self {
            target,
            suffix,
            step: 0,
        })
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_finished(&self) -> bool {
        self.step >= COUNTER_STEPS
    }

    /// Advance one step and render it. `None` once the final frame was produced.
    pub fn tick(&mut self) -> Option<String> {
        if self.is_finished() {
            return None;
        }
        self.step += 1;
        let current = u128::from(self.target) * u128::from(self.step) / u128::from(COUNTER_STEPS);
        let current = current as u64;
        Some(format!("{}{}", format_thousands(current), self.suffix))
    }

    /// Drive the animation on a 20 ms timer, handing each frame to `render`.
    pub async fn run<F>(mut self, mut render: F)
    where
        F: FnMut(&str),
    {
        let mut ticker = interval_at(Instant::now() + COUNTER_TICK, COUNTER_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.is_finished() {
            ticker.tick().await;
            if let Some(frame) = self.tick() {
                render(&frame);
            }
        }
        debug!(value = self.target, "Counter finished");
    }
}

/// `1234567` → `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
