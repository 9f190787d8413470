use std::collections::{BTreeMap, HashMap};

pub(crate) type Millis = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TimerId(u64);

/// Simulated millisecond clock with one-shot timers.
///
/// Timers fire in due-time order; timers due at the same instant fire in the
/// order they were scheduled. Nothing here touches the wall clock, so the app
/// loop decides how fast simulated time flows and tests can jump ahead freely.
pub(crate) struct Scheduler<E> {
    now: Millis,
    next_seq: u64,
    queue: BTreeMap<(Millis, u64), E>,
    due_by_seq: HashMap<u64, Millis>,
}

impl<E> Scheduler<E> {
    pub(crate) fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            due_by_seq: HashMap::new(),
        }
    }

    pub(crate) fn now(&self) -> Millis {
        self.now
    }

    pub(crate) fn after(&mut self, delay: Millis, event: E) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, seq), event);
        self.due_by_seq.insert(seq, due);
        TimerId(seq)
    }

    /// Returns false if the timer already fired or was cancelled.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_seq.remove(&id.0) {
            Some(due) => self.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    pub(crate) fn cancel_slot(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.cancel(id);
        }
    }

    pub(crate) fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_seq.contains_key(&id.0)
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its due time.
    pub(crate) fn pop_due(&mut self, until: Millis) -> Option<E> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let event = self.queue.remove(&(due, seq))?;
        self.due_by_seq.remove(&seq);
        self.now = self.now.max(due);
        Some(event)
    }

    /// Moves the clock forward once every due timer has been popped.
    pub(crate) fn settle(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.due_by_seq.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: Millis) -> Vec<(Millis, &'static str)> {
        let mut out = Vec::new();
        while let Some(ev) = s.pop_due(until) {
            out.push((s.now(), ev));
        }
        s.settle(until);
        out
    }

    #[test]
    fn fires_in_due_order_then_schedule_order() {
        let mut s = Scheduler::new();
        s.after(300, "c");
        s.after(100, "a");
        s.after(300, "d");
        s.after(200, "b");

        assert_eq!(drain(&mut s, 250), vec![(100, "a"), (200, "b")]);
        assert_eq!(s.now(), 250);
        assert_eq!(drain(&mut s, 1000), vec![(300, "c"), (300, "d")]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut s = Scheduler::new();
        s.settle(1000);
        s.after(500, "x");
        assert!(drain(&mut s, 1499).is_empty());
        assert_eq!(drain(&mut s, 1500), vec![(1500, "x")]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut s = Scheduler::new();
        let a = s.after(100, "a");
        let mut slot = Some(s.after(100, "b"));
        assert!(s.is_pending(a));
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        s.cancel_slot(&mut slot);
        assert!(slot.is_none());
        assert!(drain(&mut s, 1000).is_empty());
    }

    #[test]
    fn cancel_after_fire_is_a_no_op() {
        let mut s = Scheduler::new();
        let a = s.after(10, "a");
        assert_eq!(drain(&mut s, 10).len(), 1);
        assert!(!s.is_pending(a));
        assert!(!s.cancel(a));
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = Scheduler::new();
        s.after(1, "a");
        s.after(2, "b");
        s.clear();
        assert_eq!(s.pending(), 0);
        assert!(drain(&mut s, 10).is_empty());
    }
}
