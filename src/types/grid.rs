use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Teaching days per week (Monday through Friday, indices 0-4)
pub const DAYS_PER_WEEK: u8 = 5;

/// Human-readable day name for a 0-4 weekday index
pub fn day_name(day: u8) -> &'static str {
    match day {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        _ => "Unknown",
    }
}

/// Fixed discretisation of the teaching week.
///
/// The default grid runs 07:00-19:00 in one-hour slots: slot index `i`
/// names the hour starting at `start_hour + i`. A block of duration `d`
/// starting at index `s` covers indices `[s, s+d)` and is admissible only
/// when `s + d <= slots_per_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub start_hour: u8,
    pub slots_per_day: u8,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start_hour: 7,
            slots_per_day: 12,
        }
    }
}

impl TimeGrid {
    /// Clock time at which slot `idx` begins
    pub fn slot_start(&self, idx: u8) -> NaiveTime {
        NaiveTime::from_hms_opt((self.start_hour + idx) as u32, 0, 0)
            .expect("slot index within grid")
    }

    /// Clock time at which slot `idx` ends (one hour later)
    pub fn slot_end(&self, idx: u8) -> NaiveTime {
        self.slot_start(idx + 1)
    }

    /// Convert a clock time to its slot index, or `None` outside the grid
    pub fn time_to_idx(&self, t: NaiveTime) -> Option<u8> {
        use chrono::Timelike;
        let hour = t.hour() as u8;
        if hour >= self.start_hour && hour < self.start_hour + self.slots_per_day {
            Some(hour - self.start_hour)
        } else {
            None
        }
    }

    /// Whether a block of `duration` hours starting at `start` fits in the day
    pub fn fits(&self, start: u8, duration: u8) -> bool {
        start + duration <= self.slots_per_day
    }

    /// Whether a block starting at `start` with `duration` covers `hour_idx`
    pub fn covers(start: u8, duration: u8, hour_idx: u8) -> bool {
        start <= hour_idx && hour_idx < start + duration
    }

    /// Slot indices whose hour overlaps the clock window `[from, to)`
    pub fn window_indices(&self, from: NaiveTime, to: NaiveTime) -> Vec<u8> {
        (0..self.slots_per_day)
            .filter(|&i| self.slot_start(i) < to && from < self.slot_end(i))
            .collect()
    }

    /// First slot index touching 17:00, past which "late afternoon"
    /// preference penalties apply
    pub fn late_afternoon_threshold(&self) -> u8 {
        17u8.saturating_sub(self.start_hour).min(self.slots_per_day)
    }
}
