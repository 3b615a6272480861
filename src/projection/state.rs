//! Waiting-list state tracking for a single category

/// Outcome of advancing one category by one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStep {
    /// Cancellations applied this month
    pub cancellations: i64,
    /// Departures applied this month, after clamping
    pub departures: i64,
    /// Waiting list at the end of the month
    pub waiting_list: i64,
}

impl MonthStep {
    const EXHAUSTED: MonthStep = MonthStep {
        cancellations: 0,
        departures: 0,
        waiting_list: 0,
    };
}

/// State of one category's waiting list during a projection
#[derive(Debug, Clone)]
pub struct WaitingListState {
    /// Projection month about to be processed (0-indexed)
    pub month_index: u32,

    /// Waiting list after the last processed month
    pub waiting_list: i64,

    /// Set once the list has been observed empty at the start of a month
    pub exhausted: bool,
}

impl WaitingListState {
    pub fn new(initial_wl: i64) -> Self {
        Self {
            month_index: 0,
            waiting_list: initial_wl,
            exhausted: false,
        }
    }

    /// Apply one month of projected cancellations and scheduled departures.
    ///
    /// The first month only floors the balance at zero. Later months cap
    /// departures at whatever remains after cancellations, and once a month
    /// opens with an empty list every later month is all zeros.
    pub fn step(&mut self, cancellations: i64, departures: i64) -> MonthStep {
        let first_month = self.month_index == 0;
        self.month_index += 1;

        if !first_month && (self.exhausted || self.waiting_list == 0) {
            self.exhausted = true;
            self.waiting_list = 0;
            return MonthStep::EXHAUSTED;
        }

        let remaining = self.waiting_list.saturating_sub(cancellations);
        let departures = if first_month || departures <= remaining {
            departures
        } else {
            remaining.max(0)
        };

        self.waiting_list = remaining.saturating_sub(departures).max(0);

        MonthStep {
            cancellations,
            departures,
            waiting_list: self.waiting_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_month_floors_at_zero() {
        let mut state = WaitingListState::new(100);
        let step = state.step(30, 50);
        assert_eq!(step, MonthStep { cancellations: 30, departures: 50, waiting_list: 20 });

        let mut state = WaitingListState::new(100);
        let step = state.step(60, 60);
        // First month departures are not clamped
        assert_eq!(step.departures, 60);
        assert_eq!(step.waiting_list, 0);
    }

    #[test]
    fn test_departures_clamped_after_first_month() {
        let mut state = WaitingListState::new(100);
        state.step(10, 10);
        let step = state.step(30, 70);
        assert_eq!(step.departures, 50);
        assert_eq!(step.waiting_list, 0);
    }

    #[test]
    fn test_cancellations_exceeding_list_zero_departures() {
        let mut state = WaitingListState::new(10);
        state.step(0, 0);
        let step = state.step(25, 5);
        assert_eq!(step.cancellations, 25);
        assert_eq!(step.departures, 0);
        assert_eq!(step.waiting_list, 0);
    }

    #[test]
    fn test_exhausted_state_is_absorbing() {
        let mut state = WaitingListState::new(5);
        assert_eq!(state.step(2, 3).waiting_list, 0);
        for _ in 0..10 {
            assert_eq!(state.step(7, 9), MonthStep::EXHAUSTED);
        }
        assert!(state.exhausted);
    }

    #[test]
    fn test_extreme_counts_saturate() {
        let mut state = WaitingListState::new(10);
        let step = state.step(i64::MAX, 50);
        assert_eq!(step.cancellations, i64::MAX);
        assert_eq!(step.waiting_list, 0);

        let mut state = WaitingListState::new(i64::MAX);
        let step = state.step(i64::MIN, 0);
        assert_eq!(step.waiting_list, i64::MAX);
        let step = state.step(0, i64::MAX);
        assert_eq!(step.departures, i64::MAX);
        assert_eq!(step.waiting_list, 0);
    }

    #[test]
    fn test_empty_start_exhausts_from_second_month() {
        let mut state = WaitingListState::new(0);
        let first = state.step(3, 4);
        assert_eq!(first.cancellations, 3);
        assert_eq!(first.waiting_list, 0);
        assert_eq!(state.step(3, 4), MonthStep::EXHAUSTED);
    }
}
