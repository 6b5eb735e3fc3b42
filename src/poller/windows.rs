use std::ops::RangeInclusive;

/// An iterator over the height windows a tick has to query.
///
/// Given the last fully processed height and the current chain head, yields
/// inclusive `(last + 1)..=head` split into windows of at most `max_range`
/// heights. Windows are contiguous, non-overlapping and cover the span
/// exactly; the final window always ends at `head`.
///
/// If `head <= last` there is nothing to query and the iterator is empty.
/// The `head < last` anomaly is reported by the scheduler, not here.
#[derive(Debug, Clone)]
pub(crate) struct HeightWindows {
    current: u64,
    end: u64,
    window_size: u64,
    done: bool,
}

impl HeightWindows {
    /// Creates the window sequence for one tick.
    ///
    /// # Panics
    ///
    /// Panics if `max_range` is 0. The builder rejects that configuration
    /// before a poller can be constructed.
    #[must_use]
    pub(crate) fn new(last_height: u64, head_height: u64, max_range: u64) -> Self {
        assert!(max_range >= 1, "max_range must be at least 1");
        Self {
            current: last_height.saturating_add(1),
            end: head_height,
            window_size: max_range,
            done: head_height <= last_height,
        }
    }
}

impl Iterator for HeightWindows {
    type Item = RangeInclusive<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.current;
        let end = start.saturating_add(self.window_size - 1).min(self.end);

        match end.checked_add(1) {
            Some(next) if end < self.end => self.current = next,
            _ => self.done = true,
        }

        Some(start..=end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let span = self.end - self.current;
        let remaining = usize::try_from(span / self.window_size + 1).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_span_into_bounded_windows() {
        let mut windows = HeightWindows::new(100, 600, 250);
        assert_eq!(windows.next(), Some(101..=350));
        assert_eq!(windows.next(), Some(351..=600));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn head_equal_to_last_yields_nothing() {
        let mut windows = HeightWindows::new(100, 100, 250);
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn head_behind_last_yields_nothing() {
        let mut windows = HeightWindows::new(200, 100, 250);
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn single_window_when_span_fits() {
        let mut windows = HeightWindows::new(100, 120, 250);
        assert_eq!(windows.next(), Some(101..=120));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn exact_multiple_of_window_size() {
        let mut windows = HeightWindows::new(100, 200, 50);
        assert_eq!(windows.next(), Some(101..=150));
        assert_eq!(windows.next(), Some(151..=200));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn single_new_height() {
        let mut windows = HeightWindows::new(100, 101, 250);
        assert_eq!(windows.next(), Some(101..=101));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn window_size_one() {
        let mut windows = HeightWindows::new(10, 13, 1);
        assert_eq!(windows.next(), Some(11..=11));
        assert_eq!(windows.next(), Some(12..=12));
        assert_eq!(windows.next(), Some(13..=13));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn starting_from_zero() {
        let mut windows = HeightWindows::new(0, 100, 50);
        assert_eq!(windows.next(), Some(1..=50));
        assert_eq!(windows.next(), Some(51..=100));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn head_at_u64_max_terminates() {
        let mut windows = HeightWindows::new(u64::MAX - 2, u64::MAX, 250);
        assert_eq!(windows.next(), Some(u64::MAX - 1..=u64::MAX));
        assert_eq!(windows.next(), None);
    }

    #[test]
    fn coverage_is_total_and_exhaustive() {
        let last = 100;
        let head = 1337;
        let max_range = 99;

        let mut expected_next = last + 1;
        for window in HeightWindows::new(last, head, max_range) {
            assert_eq!(*window.start(), expected_next, "gap or overlap at window start");
            assert!(window.end() - window.start() + 1 <= max_range, "window exceeds max range");
            expected_next = window.end() + 1;
        }
        assert_eq!(expected_next, head + 1, "windows do not end at head");
    }

    #[test]
    fn size_hint_is_exact() {
        let windows = HeightWindows::new(100, 600, 250);
        assert_eq!(windows.size_hint(), (2, Some(2)));

        let windows = HeightWindows::new(100, 100, 250);
        assert_eq!(windows.size_hint(), (0, Some(0)));
    }

    #[test]
    #[should_panic(expected = "max_range must be at least 1")]
    fn zero_max_range_panics() {
        let _ = HeightWindows::new(100, 200, 0);
    }
}
