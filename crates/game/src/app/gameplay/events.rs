use engine::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GameEvent {
    /// The player crossed into another room; `transform` is applied to the
    /// player once the target room is loaded.
    LevelBoundaryTouched { transform: Vec2, target_level: usize },
    SaveRequested,
    GameFinished,
}

/// FIFO of events posted during a tick.
#[derive(Debug)]
pub(crate) struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Moves the pending events out; anything sent while the batch is being
    /// handled lands in the next batch.
    pub(crate) fn take_batch(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_preserves_send_order() {
        let mut queue = EventQueue::new();
        queue.send(GameEvent::SaveRequested);
        queue.send(GameEvent::GameFinished);
        assert_eq!(queue.len(), 2);

        let batch = queue.take_batch();
        assert_eq!(batch, vec![GameEvent::SaveRequested, GameEvent::GameFinished]);
        assert!(queue.is_empty());
    }

    #[test]
    fn events_sent_during_dispatch_wait_for_next_batch() {
        let mut queue = EventQueue::new();
        queue.send(1);
        for event in queue.take_batch() {
            queue.send(event + 1);
        }
        assert_eq!(queue.take_batch(), vec![2]);
    }
}
