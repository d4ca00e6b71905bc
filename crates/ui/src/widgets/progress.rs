//! Text and fill for progress and cost bars.

use simulation::config::{COST_BAR_MAX, POWER_POINTS_PER_COST_STEP, TICKS_PER_SECOND};

use crate::controller::Progress;

/// `label m:ss` with the time left at the current rate, or just the label
/// when nothing is being added.
pub fn format_time(current: u32, total: u32, rate: u32, label: &str) -> String {
    if rate == 0 {
        return label.to_string();
    }
    let ticks = total.saturating_sub(current).div_ceil(rate);
    let seconds = ticks.div_ceil(TICKS_PER_SECOND);
    format!("{} {}:{:02}", label, seconds / 60, seconds % 60)
}

pub fn format_power(accrued: u32, needed: u32) -> String {
    format!("Power {}/{}", accrued, needed)
}

/// Steps of the cost bar on an option button.
pub fn cost_bar(cost: u32) -> u32 {
    (cost / POWER_POINTS_PER_COST_STEP).min(COST_BAR_MAX)
}

fn fraction(done: u32, total: u32) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (done as f32 / total as f32).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBarView {
    pub fraction: f32,
    pub text: String,
}

impl From<Progress> for ProgressBarView {
    fn from(progress: Progress) -> Self {
        match progress {
            Progress::Time {
                current,
                total,
                rate,
                label,
            } => Self {
                fraction: fraction(current, total),
                text: format_time(current, total, rate, label),
            },
            Progress::Power { accrued, needed } => Self {
                fraction: fraction(accrued, needed),
                text: format_power(accrued, needed),
            },
        }
    }
}
