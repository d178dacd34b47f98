use std::time::Duration;

use serde::Serialize;

/// The three counters of a share-link expiry window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryField {
    Days,
    Hours,
    Minutes,
}

/// Expiry window for a shareable link: days [0,7], hours [0,23],
/// minutes [0,59].
///
/// Two coupling rules hold after every single-field change, applied in this
/// order:
///  - days at its maximum collapses hours and minutes to zero (the link is
///    valid for seven days flat);
///  - an all-zero window resets days to the maximum (a link never expires
///    immediately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpiryWindow {
    pub days: u16,
    pub hours: u16,
    pub minutes: u16,
}

impl Default for ExpiryWindow {
    fn default() -> Self {
        Self {
            days: 5,
            hours: 0,
            minutes: 0,
        }
    }
}

impl ExpiryWindow {
    pub const MAX_DAYS: u16 = 7;
    pub const MAX_HOURS: u16 = 23;
    pub const MAX_MINUTES: u16 = 59;

    fn bound(field: ExpiryField) -> u16 {
        match field {
            ExpiryField::Days => Self::MAX_DAYS,
            ExpiryField::Hours => Self::MAX_HOURS,
            ExpiryField::Minutes => Self::MAX_MINUTES,
        }
    }

    /// Current value of `field`, with anything out of range treated as 0.
    fn get(&self, field: ExpiryField) -> u16 {
        let raw = match field {
            ExpiryField::Days => self.days,
            ExpiryField::Hours => self.hours,
            ExpiryField::Minutes => self.minutes,
        };
        if raw > Self::bound(field) {
            0
        } else {
            raw
        }
    }

    fn set(&mut self, field: ExpiryField, value: u16) {
        match field {
            ExpiryField::Days => self.days = value,
            ExpiryField::Hours => self.hours = value,
            ExpiryField::Minutes => self.minutes = value,
        }
    }

    /// Bumps `field` by one, clamped at its upper bound.
    pub fn increment(&mut self, field: ExpiryField) {
        let value = self.get(field);
        if value != Self::bound(field) {
            self.set(field, value + 1);
        } else {
            self.set(field, value);
        }
        self.settle();
    }

    /// Drops `field` by one, clamped at zero.
    pub fn decrement(&mut self, field: ExpiryField) {
        let value = self.get(field);
        if value != 0 {
            self.set(field, value - 1);
        } else {
            self.set(field, value);
        }
        self.settle();
    }

    // Coupling rules, in order: max days zeroes the finer units, then an
    // all-zero window snaps back to max days.
    fn settle(&mut self) {
        if self.days == Self::MAX_DAYS {
            self.hours = 0;
            self.minutes = 0;
        }
        if u32::from(self.days) + u32::from(self.hours) + u32::from(self.minutes) == 0 {
            self.days = Self::MAX_DAYS;
        }
    }

    pub fn to_duration(&self) -> Duration {
        let secs =
            u64::from(self.days) * 86_400 + u64::from(self.hours) * 3_600 + u64::from(self.minutes) * 60;
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(days: u16, hours: u16, minutes: u16) -> ExpiryWindow {
        ExpiryWindow {
            days,
            hours,
            minutes,
        }
    }

    #[test]
    fn default_window_is_five_days() {
        assert_eq!(ExpiryWindow::default(), window(5, 0, 0));
    }

    #[test]
    fn max_days_collapses_finer_units() {
        let mut w = window(6, 12, 30);
        w.increment(ExpiryField::Days);
        assert_eq!(w, window(7, 0, 0));
    }

    #[test]
    fn days_clamp_at_maximum() {
        let mut w = window(7, 0, 0);
        w.increment(ExpiryField::Days);
        assert_eq!(w, window(7, 0, 0));
    }

    #[test]
    fn all_zero_window_resets_to_max_days() {
        let mut w = window(1, 0, 0);
        w.decrement(ExpiryField::Days);
        assert_eq!(w, window(7, 0, 0));

        let mut w = window(0, 0, 1);
        w.decrement(ExpiryField::Minutes);
        assert_eq!(w, window(7, 0, 0));

        let mut w = window(0, 1, 0);
        w.decrement(ExpiryField::Hours);
        assert_eq!(w, window(7, 0, 0));
    }

    #[test]
    fn hours_clamp_under_repeated_increments() {
        let mut w = window(0, 0, 1);
        for _ in 0..24 {
            w.increment(ExpiryField::Hours);
        }
        assert_eq!(w.hours, 23);
    }

    #[test]
    fn minutes_stay_within_bounds() {
        let mut w = window(0, 1, 0);
        for _ in 0..80 {
            w.increment(ExpiryField::Minutes);
        }
        assert_eq!(w.minutes, 59);

        for _ in 0..80 {
            w.decrement(ExpiryField::Minutes);
        }
        // hours=1 keeps the window non-zero, so minutes rest at 0
        assert_eq!(w.minutes, 0);
        assert_eq!(w.hours, 1);
    }

    #[test]
    fn out_of_range_value_treated_as_zero() {
        let mut w = window(99, 0, 1);
        w.increment(ExpiryField::Days);
        assert_eq!(w.days, 1);

        let mut w = window(2, 200, 0);
        w.decrement(ExpiryField::Hours);
        assert_eq!(w.hours, 0);
        assert_eq!(w.days, 2);
    }

    #[test]
    fn decrement_at_zero_keeps_other_fields() {
        let mut w = window(3, 0, 0);
        w.decrement(ExpiryField::Minutes);
        assert_eq!(w, window(3, 0, 0));
    }

    #[test]
    fn duration_sums_all_units() {
        assert_eq!(
            window(1, 2, 3).to_duration(),
            Duration::from_secs(86_400 + 2 * 3_600 + 3 * 60)
        );
        assert_eq!(ExpiryWindow::default().to_duration(), Duration::from_secs(5 * 86_400));
    }
}
