use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::domain::StepResult;

/// 24 h at a 5-minute cadence
pub const DEFAULT_HISTORY_CAPACITY: usize = 288;

/// Bounded, chronologically ordered window of step results.
///
/// One writer appends, any number of readers copy out. Every access takes the
/// same lock and holds it only for the append or the copy; readers get owned
/// data and never see the buffer itself.
#[derive(Debug)]
pub struct History {
    buffer: Mutex<VecDeque<StepResult>>,
    capacity: usize,
}

impl History {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a result, evicting the oldest once full.
    pub fn push(&self, result: StepResult) {
        let mut buffer = self.buffer.lock();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(result);
    }

    /// Oldest-first copy of the whole window
    pub fn snapshot(&self) -> Vec<StepResult> {
        self.buffer.lock().iter().cloned().collect()
    }

    /// Oldest-first copy of at most the `count` newest entries
    pub fn recent(&self, count: usize) -> Vec<StepResult> {
        let buffer = self.buffer.lock();
        let start = buffer.len().saturating_sub(count);
        buffer.iter().skip(start).cloned().collect()
    }

    /// Most recent result, `None` before the first step
    pub fn latest(&self) -> Option<StepResult> {
        self.buffer.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HvacMode;
    use chrono::Utc;
    use std::sync::Arc;

    fn result(step: u64) -> StepResult {
        StepResult {
            step,
            timestamp: Utc::now(),
            zone_temp_c: 20.0 + step as f64,
            wall_temp_c: 20.0,
            co2_ppm: 500.0,
            power_kw: 1.5,
            cumulative_energy_kwh: step as f64,
            hvac_mode: HvacMode::Cooling,
            occupants: 1,
            setpoint_c: 22.0,
        }
    }

    fn steps(results: &[StepResult]) -> Vec<u64> {
        results.iter().map(|r| r.step).collect()
    }

    #[test]
    fn test_empty() {
        let history = History::new(4);
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn test_evicts_oldest_first() {
        let history = History::new(4);
        for step in 1..=7 {
            history.push(result(step));
        }
        assert_eq!(history.len(), 4);
        assert_eq!(steps(&history.snapshot()), vec![4, 5, 6, 7]);
        assert_eq!(history.latest().map(|r| r.step), Some(7));
    }

    #[test]
    fn test_recent() {
        let history = History::new(10);
        for step in 1..=6 {
            history.push(result(step));
        }
        assert_eq!(steps(&history.recent(3)), vec![4, 5, 6]);
        assert_eq!(steps(&history.recent(100)), vec![1, 2, 3, 4, 5, 6]);
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let history = History::new(0);
        history.push(result(1));
        history.push(result(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(steps(&history.snapshot()), vec![2]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let history = History::new(3);
        history.push(result(1));
        let before = history.snapshot();
        history.push(result(2));
        assert_eq!(steps(&before), vec![1]);
    }

    #[test]
    fn test_concurrent_readers_see_ordered_windows() {
        let history = Arc::new(History::new(16));
        let writer = {
            let history = Arc::clone(&history);
            std::thread::spawn(move || {
                for step in 1..=2_000 {
                    history.push(result(step));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let history = Arc::clone(&history);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let window = history.snapshot();
                        assert!(window.len() <= 16);
                        assert!(window.windows(2).all(|w| w[1].step == w[0].step + 1));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(steps(&history.snapshot()), (1985..=2000).collect::<Vec<_>>());
    }
}
