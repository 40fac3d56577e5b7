//! The five broad time-of-day periods that segment all output matrices.

use serde::{Deserialize, Serialize};

/// A broad model period. Trip records carry a half-hour departure-time code (1 is 3:00-3:30am);
/// fixed breakpoints collapse the codes into these five periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimePeriod {
    EarlyAm,
    AmPeak,
    Midday,
    PmPeak,
    Evening,
}

impl TimePeriod {
    pub const COUNT: usize = 5;

    pub fn all() -> Vec<TimePeriod> {
        vec![
            TimePeriod::EarlyAm,
            TimePeriod::AmPeak,
            TimePeriod::Midday,
            TimePeriod::PmPeak,
            TimePeriod::Evening,
        ]
    }

    pub fn index(self) -> usize {
        match self {
            TimePeriod::EarlyAm => 0,
            TimePeriod::AmPeak => 1,
            TimePeriod::Midday => 2,
            TimePeriod::PmPeak => 3,
            TimePeriod::Evening => 4,
        }
    }

    /// The short label used in matrix names, file names, and report headers.
    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::EarlyAm => "EA",
            TimePeriod::AmPeak => "AM",
            TimePeriod::Midday => "MD",
            TimePeriod::PmPeak => "PM",
            TimePeriod::Evening => "EV",
        }
    }

    /// Which period a half-hour departure code falls in.
    pub fn containing(depart_code: usize) -> TimePeriod {
        if depart_code <= 3 {
            TimePeriod::EarlyAm
        } else if depart_code <= 9 {
            TimePeriod::AmPeak
        } else if depart_code <= 22 {
            TimePeriod::Midday
        } else if depart_code <= 29 {
            TimePeriod::PmPeak
        } else {
            TimePeriod::Evening
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints() {
        assert_eq!(TimePeriod::containing(1), TimePeriod::EarlyAm);
        assert_eq!(TimePeriod::containing(3), TimePeriod::EarlyAm);
        assert_eq!(TimePeriod::containing(4), TimePeriod::AmPeak);
        assert_eq!(TimePeriod::containing(9), TimePeriod::AmPeak);
        assert_eq!(TimePeriod::containing(10), TimePeriod::Midday);
        assert_eq!(TimePeriod::containing(22), TimePeriod::Midday);
        assert_eq!(TimePeriod::containing(23), TimePeriod::PmPeak);
        assert_eq!(TimePeriod::containing(29), TimePeriod::PmPeak);
        assert_eq!(TimePeriod::containing(30), TimePeriod::Evening);
        assert_eq!(TimePeriod::containing(40), TimePeriod::Evening);
    }
}
