//! Single-threaded timer queue. Callers schedule a payload to come due after
//! a delay and may cancel it by handle; cancelled entries never fire.
//!
//! Time is a [`Duration`] since some fixed origin chosen by the driver, so
//! tests can move the clock by hand.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler { next_id: 0, queue: BTreeMap::new(), deadlines: HashMap::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_after(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let deadline = now + delay;
        self.queue.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns the earliest timer due at `now`. Timers sharing a
    /// deadline come out in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let (deadline, id) = *self.queue.keys().next()?;
        if deadline > now {
            return None;
        }

        self.deadlines.remove(&id);
        self.queue.remove(&(deadline, id)).map(|payload| (id, payload))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut sched = Scheduler::new();
        sched.schedule_after(ms(0), ms(50), "late");
        sched.schedule_after(ms(0), ms(10), "early");
        sched.schedule_after(ms(5), ms(5), "tied");

        assert_eq!(sched.next_deadline(), Some(ms(10)));
        assert_eq!(sched.pop_due(ms(9)), None);
        assert_eq!(sched.pop_due(ms(10)).map(|(_, p)| p), Some("early"));
        assert_eq!(sched.pop_due(ms(10)).map(|(_, p)| p), Some("tied"));
        assert_eq!(sched.pop_due(ms(49)), None);
        assert_eq!(sched.pop_due(ms(100)).map(|(_, p)| p), Some("late"));
        assert!(sched.is_empty());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_after(ms(0), ms(10), 'a');
        let b = sched.schedule_after(ms(0), ms(20), 'b');

        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        assert!(!sched.is_pending(a));
        assert!(sched.is_pending(b));

        assert_eq!(sched.pop_due(ms(30)), Some((b, 'b')));
        assert!(!sched.cancel(b));
        assert_eq!(sched.next_deadline(), None);
    }
}
