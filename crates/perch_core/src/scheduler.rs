//! Cooperative event loop
//!
//! Widgets run on a single UI thread. Anything that completes "later"
//! (fade animations, remote content replies) is posted here as a task and
//! runs on a later turn, never re-entrantly inside the call that scheduled it.
//!
//! The loop keeps a virtual clock. The host advances it once per frame with
//! the elapsed time; tests advance it explicitly, which keeps timing fully
//! deterministic.
//!
//! ```rust
//! use perch_core::EventLoop;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let event_loop = EventLoop::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&log);
//! event_loop.post_after(100, move || sink.borrow_mut().push("late"));
//! let sink = Rc::clone(&log);
//! event_loop.post(move || sink.borrow_mut().push("soon"));
//!
//! event_loop.run_until_idle();
//! assert_eq!(*log.borrow(), vec!["soon"]);
//!
//! event_loop.advance(100);
//! assert_eq!(*log.borrow(), vec!["soon", "late"]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

/// Work scheduled on the loop
pub type Task = Box<dyn FnOnce()>;

new_key_type! {
    /// Handle to a scheduled task
    pub struct TaskId;
}

struct Scheduled {
    due_ms: u64,
    seq: u64,
    task: Task,
}

struct LoopInner {
    tasks: SlotMap<TaskId, Scheduled>,
    now_ms: u64,
    next_seq: u64,
}

impl LoopInner {
    /// Earliest task due at or before `limit_ms`, ties broken by scheduling order
    fn next_due(&self, limit_ms: u64) -> Option<TaskId> {
        self.tasks
            .iter()
            .filter(|(_, t)| t.due_ms <= limit_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(id, _)| id)
    }
}

/// Single-threaded task queue with a virtual clock
///
/// Clones share the same queue.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<RefCell<LoopInner>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(LoopInner {
                tasks: SlotMap::with_key(),
                now_ms: 0,
                next_seq: 0,
            })),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Queue `task` for the next turn
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        self.post_after(0, task)
    }

    /// Run `task` once `delay_ms` of virtual time has passed
    pub fn post_after<F>(&self, delay_ms: u64, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let due_ms = inner.now_ms.saturating_add(delay_ms);
        inner.tasks.insert(Scheduled {
            due_ms,
            seq,
            task: Box::new(task),
        })
    }

    /// Drop a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.borrow_mut().tasks.remove(id).is_some()
    }

    /// Is `id` still waiting to run?
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.inner.borrow().tasks.contains_key(id)
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.borrow().tasks.is_empty()
    }

    /// Run every task that is already due, including tasks they post
    ///
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let now = self.now_ms();
        self.run_due(now)
    }

    /// Move the clock forward by `ms`, running tasks as they fall due
    ///
    /// The clock is stepped to each task's due time before it runs, so a task
    /// sees `now_ms()` equal to the time it was scheduled for. Tasks posted
    /// while advancing run too if they fall inside the window.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms().saturating_add(ms);
        let ran = self.run_due(target);
        self.inner.borrow_mut().now_ms = target;
        ran
    }

    fn run_due(&self, limit_ms: u64) -> usize {
        let mut ran = 0;
        loop {
            // Take the task out before running it so it can use the loop.
            let task = {
                let mut inner = self.inner.borrow_mut();
                let Some(id) = inner.next_due(limit_ms) else {
                    break;
                };
                let Some(scheduled) = inner.tasks.remove(id) else {
                    break;
                };
                inner.now_ms = inner.now_ms.max(scheduled.due_ms);
                scheduled.task
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!("event loop ran {} task(s) up to {}ms", ran, limit_ms);
        }
        ran
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventLoop")
            .field("now_ms", &inner.now_ms)
            .field("pending", &inner.tasks.len())
            .finish()
    }
}
