//! Debounce and throttle wrappers over an injectable timer source.
//!
//! Timer mechanics belong to the host. The [`Scheduler`] trait is the whole
//! contract: a monotonic clock and one-shot timeouts that can be cancelled.
//! [`ManualScheduler`] is a deterministic implementation driven by
//! [`ManualScheduler::advance`], used by tests and by hosts that pump their
//! own event loop.


use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{Event, Listener};

/// Identifier of a scheduled timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One-shot task handed to [`Scheduler::set_timeout`].
pub struct Timeout(Box<dyn FnOnce()>);

impl Timeout {
    /// Wraps a closure to run once.
    #[must_use]
    pub fn new(task: impl FnOnce() + 'static) -> Self {
        Self(Box::new(task))
    }

    /// Runs the task.
    pub fn run(self) {
        (self.0)();
    }
}

impl fmt::Debug for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Timeout(..)")
    }
}

/// Timer source used by [`debounce`] and [`throttle`].
#[cfg_attr(test, mockall::automock)]
pub trait Scheduler {
    /// Time elapsed on the scheduler's monotonic clock.
    fn now(&self) -> Duration;

    /// Runs `task` once after `delay`. Deadlines past the end of the clock
    /// saturate.
    fn set_timeout(&self, delay: Duration, task: Timeout) -> TimerId;

    /// Cancels a pending timeout. Unknown or expired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

struct PendingTimer {
    id: TimerId,
    due: Duration,
    task: Timeout,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Scheduler whose clock only moves when [`advance`](Self::advance) is
/// called.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use cel::timing::{ManualScheduler, Scheduler, Timeout};
///
/// let scheduler = ManualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// scheduler.set_timeout(Duration::from_millis(10), Timeout::new(move || flag.set(true)));
///
/// scheduler.advance(Duration::from_millis(9));
/// assert!(!fired.get());
/// scheduler.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl ManualScheduler {
    /// Creates a scheduler at time zero with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timeouts waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Moves the clock forward, running due timeouts in deadline order.
    ///
    /// Tasks observe the clock at their own deadline and may schedule
    /// further timeouts; those run too if they fall inside the window.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now.saturating_add(by);
        let mut ran = 0;
        while let Some(timer) = self.pop_due(target) {
            timer.task.run();
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<PendingTimer> {
        let mut state = self.state.borrow_mut();
        let position = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= target)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(position, _)| position)?;
        let timer = state.pending.remove(position);
        state.now = timer.due;
        Some(timer)
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn set_timeout(&self, delay: Duration, task: Timeout) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId::new(state.next_id);
        state.next_id += 1;
        let due = state.now.saturating_add(delay);
        state.pending.push(PendingTimer { id, due, task });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.state.borrow_mut().pending.retain(|timer| timer.id != id);
    }
}

/// Wraps a listener so it runs once, `wait` after the last call in a burst,
/// with the most recent event.
#[must_use]
pub fn debounce(listener: Listener, wait: Duration, scheduler: Rc<dyn Scheduler>) -> Listener {
    let pending: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
    Rc::new(move |event: &Event| {
        if let Some(id) = pending.take() {
            scheduler.clear_timeout(id);
        }
        let listener = Rc::clone(&listener);
        let slot = Rc::clone(&pending);
        let event = event.clone();
        let id = scheduler.set_timeout(
            wait,
            Timeout::new(move || {
                slot.set(None);
                listener(&event);
            }),
        );
        pending.set(Some(id));
    })
}

#[derive(Default)]
struct ThrottleState {
    previous: Option<Duration>,
    timer: Option<TimerId>,
    trailing: Option<Event>,
}

/// Wraps a listener so it runs at most once per `wait`.
///
/// The first call runs immediately. Calls inside the window are collapsed
/// into one trailing call, made with the latest event when the window
/// closes.
#[must_use]
pub fn throttle(listener: Listener, wait: Duration, scheduler: Rc<dyn Scheduler>) -> Listener {
    let state = Rc::new(RefCell::new(ThrottleState::default()));
    Rc::new(move |event: &Event| {
        let now = scheduler.now();
        let elapsed = state
            .borrow()
            .previous
            .map(|previous| now.saturating_sub(previous));

        match elapsed {
            Some(elapsed) if elapsed < wait => {
                let mut current = state.borrow_mut();
                current.trailing = Some(event.clone());
                if current.timer.is_none() {
                    let remaining = wait.saturating_sub(elapsed);
                    current.timer = Some(schedule_trailing(
                        Rc::clone(&listener),
                        Rc::clone(&state),
                        Rc::clone(&scheduler),
                        remaining,
                    ));
                }
            }
            _ => {
                let stale = {
                    let mut current = state.borrow_mut();
                    current.previous = Some(now);
                    current.trailing = None;
                    current.timer.take()
                };
                if let Some(id) = stale {
                    scheduler.clear_timeout(id);
                }
                listener(event);
            }
        }
    })
}

fn schedule_trailing(
    listener: Listener,
    state: Rc<RefCell<ThrottleState>>,
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
) -> TimerId {
    let clock = Rc::clone(&scheduler);
    scheduler.set_timeout(
        delay,
        Timeout::new(move || {
            let trailing = {
                let mut current = state.borrow_mut();
                current.previous = Some(clock.now());
                current.timer = None;
                current.trailing.take()
            };
            if let Some(event) = trailing {
                listener(&event);
            }
        }),
    )
}
