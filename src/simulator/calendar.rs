use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::event::Event;

#[derive(Debug, Clone)]
struct Scheduled {
    sequence: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // BinaryHeap is a max-heap, so the earliest time (then the lowest
    // sequence number) has to compare as the greatest element
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .time()
            .total_cmp(&self.event.time())
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// The `Calendar` is the pending event set of a simulation - a binary
/// min-heap keyed by event time.  Events with equal times are returned in
/// the order they were scheduled (FIFO), so a fixed seed always replays the
/// same event sequence.  Scheduled events cannot be cancelled; a stale event
/// has to be recognized by the model when it is dequeued.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    events: BinaryHeap<Scheduled>,
    next_sequence: u64,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, event: Event) {
        self.events.push(Scheduled {
            sequence: self.next_sequence,
            event,
        });
        self.next_sequence += 1;
    }

    /// Removes and returns the earliest pending event.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop().map(|scheduled| scheduled.event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.events.peek().map(|scheduled| scheduled.event.time())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::event::{EventKind, Job};

    fn arrival(time: f64, id: usize) -> Event {
        Event::new(time, EventKind::Arrival(Job::new(id, 0, 0)))
    }

    fn job_id(event: &Event) -> Option<usize> {
        match event.kind() {
            EventKind::Arrival(job) | EventKind::Departure(job) => Some(job.id),
            _ => None,
        }
    }

    #[test]
    fn events_leave_in_time_order() {
        let mut calendar = Calendar::new();
        [5.0, 1.0, 3.0, 0.5, 4.0]
            .iter()
            .enumerate()
            .for_each(|(id, time)| calendar.schedule(arrival(*time, id)));
        let times: Vec<f64> = std::iter::from_fn(|| calendar.pop())
            .map(|event| event.time())
            .collect();
        assert_eq!(times, vec![0.5, 1.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn ties_leave_in_insertion_order() {
        let mut calendar = Calendar::new();
        calendar.schedule(arrival(2.0, 0));
        (1..6).for_each(|id| calendar.schedule(arrival(1.0, id)));
        calendar.schedule(Event::new(1.0, EventKind::Exit));
        let ids: Vec<Option<usize>> = std::iter::from_fn(|| calendar.pop())
            .map(|event| job_id(&event))
            .collect();
        assert_eq!(
            ids,
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(0)]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let mut calendar = Calendar::new();
        assert_eq!(calendar.peek_time(), None);
        calendar.schedule(arrival(7.0, 0));
        calendar.schedule(arrival(3.0, 1));
        assert_eq!(calendar.peek_time(), Some(3.0));
        assert_eq!(calendar.len(), 2);
        calendar.pop();
        assert_eq!(calendar.peek_time(), Some(7.0));
        calendar.pop();
        assert!(calendar.is_empty());
    }
}
