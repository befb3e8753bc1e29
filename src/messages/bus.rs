//! In-process message bus
//!
//! Delivery is synchronous on the posting thread, in subscription order.
//! A handler may post further messages; those are queued and delivered once
//! the current message has reached every subscriber. The bus is `!Send`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::types::{LoadoutId, Location};
use crate::messages::{ChangeKind, Message};

/// Handle returned by [`MessageBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Selects which messages a subscriber receives. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageFilter {
    pub loadout: Option<LoadoutId>,
    pub location: Option<Location>,
    pub kinds: Option<Vec<ChangeKind>>,
}

impl MessageFilter {
    /// Matches every message
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_loadout(loadout: LoadoutId) -> Self {
        Self {
            loadout: Some(loadout),
            ..Self::default()
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn kinds(mut self, kinds: &[ChangeKind]) -> Self {
        self.kinds = Some(kinds.to_vec());
        self
    }

    pub fn matches(&self, message: &Message) -> bool {
        if self.loadout.is_some_and(|id| id != message.loadout) {
            return false;
        }
        if self.location.is_some() && self.location != message.location {
            return false;
        }
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&message.kind) {
                return false;
            }
        }
        true
    }
}

type Handler = Rc<dyn Fn(&Message)>;

struct Subscriber {
    id: SubscriptionId,
    filter: MessageFilter,
    handler: Handler,
}

/// Publish/subscribe channel for loadout change notifications
#[derive(Default)]
pub struct MessageBus {
    subscribers: RefCell<Vec<Subscriber>>,
    queue: RefCell<VecDeque<Message>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("subscribers", &self.subscribers.borrow().len())
            .field("queued", &self.queue.borrow().len())
            .finish()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages accepted by `filter`
    pub fn subscribe<F>(&self, filter: MessageFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&Message) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            filter,
            handler: Rc::new(handler),
        });
        id
    }

    /// Returns whether the subscription existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver `message` to every matching subscriber
    pub fn post(&self, message: Message) {
        self.queue.borrow_mut().push_back(message);
        if self.dispatching.get() {
            return;
        }

        self.dispatching.set(true);
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(message) = next else {
                break;
            };

            // Snapshot so handlers may subscribe or unsubscribe while running
            let handlers: Vec<Handler> = self
                .subscribers
                .borrow()
                .iter()
                .filter(|s| s.filter.matches(&message))
                .map(|s| Rc::clone(&s.handler))
                .collect();

            tracing::trace!(
                "Delivering {:?} for {:?} to {} subscribers",
                message.kind,
                message.location,
                handlers.len()
            );
            for handler in handlers {
                handler(&message);
            }
        }
        self.dispatching.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(loadout: LoadoutId, location: Option<Location>, kind: ChangeKind) -> Message {
        Message {
            loadout,
            location,
            kind,
        }
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = MessageBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.subscribe(MessageFilter::all(), move |_| log.borrow_mut().push(name));
        }

        bus.post(message(LoadoutId::new(), None, ChangeKind::Renamed));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filter_by_loadout_location_and_kind() {
        let bus = MessageBus::new();
        let id = LoadoutId::new();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        bus.subscribe(
            MessageFilter::for_loadout(id)
                .at(Location::LeftArm)
                .kinds(&[ChangeKind::ItemAdded]),
            move |_| counter.set(counter.get() + 1),
        );

        bus.post(message(id, Some(Location::LeftArm), ChangeKind::ItemAdded));
        bus.post(message(id, Some(Location::RightArm), ChangeKind::ItemAdded));
        bus.post(message(id, Some(Location::LeftArm), ChangeKind::ArmorChanged));
        bus.post(message(LoadoutId::new(), Some(Location::LeftArm), ChangeKind::ItemAdded));

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_reentrant_post_is_queued() {
        let bus = Rc::new(MessageBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = LoadoutId::new();

        let inner_bus = Rc::downgrade(&bus);
        let first_log = Rc::clone(&log);
        bus.subscribe(MessageFilter::all(), move |msg| {
            first_log.borrow_mut().push(("a", msg.kind));
            if msg.kind == ChangeKind::ItemAdded {
                if let Some(bus) = inner_bus.upgrade() {
                    let follow_up = ChangeKind::ArmorDistributionUpdateRequest;
                    bus.post(message(msg.loadout, None, follow_up));
                }
            }
        });
        let second_log = Rc::clone(&log);
        bus.subscribe(MessageFilter::all(), move |msg| {
            second_log.borrow_mut().push(("b", msg.kind));
        });

        bus.post(message(id, Some(Location::Head), ChangeKind::ItemAdded));

        assert_eq!(
            *log.borrow(),
            vec![
                ("a", ChangeKind::ItemAdded),
                ("b", ChangeKind::ItemAdded),
                ("a", ChangeKind::ArmorDistributionUpdateRequest),
                ("b", ChangeKind::ArmorDistributionUpdateRequest),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let bus = MessageBus::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let sub = bus.subscribe(MessageFilter::all(), move |_| counter.set(counter.get() + 1));

        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        bus.post(message(LoadoutId::new(), None, ChangeKind::Renamed));
        assert_eq!(hits.get(), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
