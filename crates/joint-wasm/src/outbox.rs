//! Deferred listener deliveries.
//!
//! Bus handlers run while the canvas is mutably borrowed. JS listeners are
//! allowed to call back into the canvas, so handlers only enqueue here and
//! the bridge drains the queue once its borrow is released.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub struct Outbox<T> {
    queue: Rc<RefCell<VecDeque<T>>>,
}

impl<T> Clone for Outbox<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<T> Default for Outbox<T> {
    fn default() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<T> Outbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: T) {
        self.queue.borrow_mut().push_back(item);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Deliver queued items in order, including any pushed while
    /// delivering. No borrow of the queue is held across `deliver`.
    pub fn drain(&self, mut deliver: impl FnMut(T)) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(item) = next else {
                return delivered;
            };
            deliver(item);
            delivered += 1;
        }
    }
}
