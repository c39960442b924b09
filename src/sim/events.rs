//! Inbound game events and the observer registry that delivers them
//!
//! The publisher only holds weak handles to subscriber inboxes. A subscriber
//! stops receiving events as soon as its [`Subscription`] is dropped, so the
//! subscription lifetime is exactly the lifetime of the component holding it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Events consumed by the phase subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The run restarted (player death, new game)
    GameReset,
    /// The player entered (`true`) or left (`false`) the hazard region
    HazardZoneChanged(bool),
    /// The player hit an obstacle
    PlayerDied,
}

type Inbox = Rc<RefCell<VecDeque<GameEvent>>>;

/// Publisher side: fans every event out to all live subscriptions
#[derive(Debug, Default)]
pub struct Signals {
    subscribers: Vec<Weak<RefCell<VecDeque<GameEvent>>>>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let inbox: Inbox = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.push(Rc::downgrade(&inbox));
        Subscription { inbox }
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(inbox) => {
                inbox.borrow_mut().push_back(event);
                true
            }
            None => false,
        });
    }

    /// Number of subscriptions still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// Subscriber side: a queue of events published since the last drain
#[derive(Debug)]
pub struct Subscription {
    inbox: Inbox,
}

impl Subscription {
    /// Take all pending events in publish order
    pub fn drain(&self) -> Vec<GameEvent> {
        self.inbox.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.borrow().is_empty()
    }
}
