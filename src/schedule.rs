//! Delayed continuations.
//!
//! The simulated form submission runs two continuations after the submit
//! event: one that completes the submission and one that hides the success
//! notice again. Both go through a [`Scheduler`] so the owner can cancel them
//! on teardown by dropping the returned handles. The browser backend uses
//! `gloo` timeouts, whose handles already clear the timer on drop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Runs a task once after a delay.
pub trait Scheduler: Clone + 'static {
    /// Dropping the handle before the task runs cancels it.
    type Handle: 'static;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Handles of continuations that may still be waiting to run.
///
/// Shared between the owner and the continuations themselves, since a running
/// continuation can schedule the next one. A continuation drops its own
/// handle when it starts, so only tasks that have not run yet are held.
pub struct PendingTasks<S: Scheduler> {
    handles: Rc<RefCell<Vec<(u64, S::Handle)>>>,
    next_id: Rc<Cell<u64>>,
}

impl<S: Scheduler> Clone for PendingTasks<S> {
    fn clone(&self) -> Self {
        Self {
            handles: Rc::clone(&self.handles),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<S: Scheduler> Default for PendingTasks<S> {
    fn default() -> Self {
        Self {
            handles: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }
}

impl<S: Scheduler> PendingTasks<S> {
    /// Schedule `task` and keep its handle until it runs.
    pub fn push(&self, scheduler: &S, delay: Duration, task: impl FnOnce() + 'static) {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        // Weak, so a stored handle never keeps its own list alive.
        let handles = Rc::downgrade(&self.handles);
        let handle = scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(handles) = handles.upgrade() {
                    let finished = {
                        let mut handles = handles.borrow_mut();
                        handles
                            .iter()
                            .position(|(pending, _)| *pending == id)
                            .map(|index| handles.remove(index))
                    };
                    drop(finished);
                }
                task();
            }),
        );
        self.handles.borrow_mut().push((id, handle));
    }

    /// Cancel everything that has not run yet.
    pub fn cancel_all(&self) {
        let handles = std::mem::take(&mut *self.handles.borrow_mut());
        drop(handles);
    }

    /// Continuations scheduled but not yet started.
    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
