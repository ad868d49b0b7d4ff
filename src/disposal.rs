//! Ordered release of heterogeneous owned resources.
//!
//! A [`ResourceBin`] collects everything an overlay must give back when it is
//! torn down: plain callbacks, signal subscriptions, scheduled tasks and
//! host objects. Each entry is a [`Disposable`] variant with its own release
//! action, so dispatch happens on the tag rather than by probing the value.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use rigsight::disposal::{Disposable, ResourceBin};
//!
//! let released = Rc::new(Cell::new(0));
//! let mut bin = ResourceBin::new();
//! let counter = Rc::clone(&released);
//! bin.add(Disposable::callback(move || counter.set(counter.get() + 1)));
//!
//! bin.destroy();
//! bin.destroy();
//! assert_eq!(released.get(), 1);
//! assert!(bin.is_empty());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use crate::error::ReleaseError;

/// An object with an explicit release operation.
pub trait Dispose {
    /// Releases the object. Releasing twice should report
    /// [`ReleaseError::AlreadyReleased`] rather than panic.
    ///
    /// # Errors
    /// Returns a [`ReleaseError`] when the host cannot release the object.
    fn dispose(&mut self) -> Result<(), ReleaseError>;
}

impl<T: Dispose + ?Sized> Dispose for Rc<RefCell<T>> {
    fn dispose(&mut self) -> Result<(), ReleaseError> {
        let mut inner = self.try_borrow_mut().map_err(|_| ReleaseError::Busy)?;
        inner.dispose()
    }
}

/// A cancellable signal subscription.
#[cfg_attr(test, mockall::automock)]
pub trait Subscription {
    /// Disconnects the subscription so its callback never fires again.
    ///
    /// # Errors
    /// Returns a [`ReleaseError`] when the signal source refuses.
    fn cancel(&mut self) -> Result<(), ReleaseError>;
}

/// A cancellable scheduled task.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduledTask {
    /// Cancels the task if it has not run yet.
    ///
    /// # Errors
    /// Returns a [`ReleaseError`] when the scheduler refuses.
    fn cancel(&mut self) -> Result<(), ReleaseError>;
}

/// One ownership record held by a [`ResourceBin`].
pub enum Disposable {
    /// Invoked once on release.
    Callback(Box<dyn FnOnce()>),
    /// Cancelled on release.
    Subscription(Box<dyn Subscription>),
    /// Cancelled on release.
    Task(Box<dyn ScheduledTask>),
    /// Disposed on release.
    Object(Box<dyn Dispose>),
}

impl Disposable {
    /// Wraps a zero-argument callback.
    pub fn callback(callback: impl FnOnce() + 'static) -> Self {
        Self::Callback(Box::new(callback))
    }

    /// Wraps a subscription handle.
    pub fn subscription(subscription: impl Subscription + 'static) -> Self {
        Self::Subscription(Box::new(subscription))
    }

    /// Wraps a scheduled-task handle.
    pub fn task(task: impl ScheduledTask + 'static) -> Self {
        Self::Task(Box::new(task))
    }

    /// Wraps a disposable object.
    pub fn object(object: impl Dispose + 'static) -> Self {
        Self::Object(Box::new(object))
    }

    /// Short name of the variant, used in log output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Callback(_) => "callback",
            Self::Subscription(_) => "subscription",
            Self::Task(_) => "task",
            Self::Object(_) => "object",
        }
    }

    fn release(self) -> Result<(), ReleaseError> {
        match self {
            Self::Callback(callback) => {
                callback();
                Ok(())
            }
            Self::Subscription(mut subscription) => subscription.cancel(),
            Self::Task(mut task) => task.cancel(),
            Self::Object(mut object) => object.dispose(),
        }
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Disposable").field(&self.kind()).finish()
    }
}

impl From<Box<dyn Subscription>> for Disposable {
    fn from(subscription: Box<dyn Subscription>) -> Self {
        Self::Subscription(subscription)
    }
}

impl From<Box<dyn ScheduledTask>> for Disposable {
    fn from(task: Box<dyn ScheduledTask>) -> Self {
        Self::Task(task)
    }
}

impl From<Box<dyn Dispose>> for Disposable {
    fn from(object: Box<dyn Dispose>) -> Self {
        Self::Object(object)
    }
}

/// Ordered collection of resources released together.
///
/// Entries are released in insertion order. A failing entry is logged and
/// does not stop the entries after it. Dropping the bin releases whatever is
/// still held.
#[derive(Debug, Default)]
pub struct ResourceBin {
    items: Vec<Disposable>,
}

impl ResourceBin {
    /// Creates an empty bin.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an ownership record.
    pub fn add(&mut self, item: impl Into<Disposable>) {
        self.items.push(item.into());
    }

    /// Number of entries still awaiting release.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether every entry has been released.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Releases every entry in insertion order and empties the bin.
    ///
    /// Calling this on an empty bin does nothing.
    pub fn destroy(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let items = std::mem::take(&mut self.items);
        let total = items.len();
        let mut failed = 0_usize;
        for item in items {
            let kind = item.kind();
            if let Err(err) = item.release() {
                failed += 1;
                warn!("failed to release {kind}: {err}");
            }
        }
        debug!("resource bin released {total} entries ({failed} failed)");
    }
}

impl Drop for ResourceBin {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl Dispose for Recorder {
        fn dispose(&mut self) -> Result<(), ReleaseError> {
            self.log.borrow_mut().push(self.name);
            if self.fail {
                Err(ReleaseError::Host("refused".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Recorder {
        Recorder {
            name,
            log: Rc::clone(log),
            fail: false,
        }
    }

    #[test]
    fn releases_in_insertion_order_across_kinds() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bin = ResourceBin::new();

        let cb_log = Rc::clone(&log);
        bin.add(Disposable::callback(move || cb_log.borrow_mut().push("callback")));
        bin.add(Disposable::object(recorder("first", &log)));

        let mut subscription = MockSubscription::new();
        let sub_log = Rc::clone(&log);
        subscription.expect_cancel().times(1).returning_st(move || {
            sub_log.borrow_mut().push("subscription");
            Ok(())
        });
        bin.add(Disposable::subscription(subscription));

        let mut task = MockScheduledTask::new();
        let task_log = Rc::clone(&log);
        task.expect_cancel().times(1).returning_st(move || {
            task_log.borrow_mut().push("task");
            Ok(())
        });
        bin.add(Disposable::task(task));
        bin.add(Disposable::object(recorder("last", &log)));

        assert_eq!(bin.len(), 5);
        bin.destroy();

        assert!(bin.is_empty());
        assert_eq!(
            *log.borrow(),
            vec!["callback", "first", "subscription", "task", "last"]
        );
    }

    #[test]
    fn second_destroy_is_a_no_op() {
        let calls = Rc::new(Cell::new(0));
        let mut bin = ResourceBin::new();
        let counter = Rc::clone(&calls);
        bin.add(Disposable::callback(move || counter.set(counter.get() + 1)));
        let mut subscription = MockSubscription::new();
        subscription.expect_cancel().times(1).returning(|| Ok(()));
        bin.add(Disposable::subscription(subscription));

        bin.destroy();
        bin.destroy();

        assert_eq!(calls.get(), 1);
        assert!(bin.is_empty());
    }

    #[test]
    fn failing_entry_does_not_block_later_entries() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bin = ResourceBin::new();
        bin.add(Disposable::object(Recorder {
            name: "broken",
            log: Rc::clone(&log),
            fail: true,
        }));
        let mut task = MockScheduledTask::new();
        task.expect_cancel()
            .times(1)
            .returning(|| Err(ReleaseError::AlreadyReleased));
        bin.add(Disposable::task(task));
        bin.add(Disposable::object(recorder("after", &log)));

        bin.destroy();

        assert_eq!(*log.borrow(), vec!["broken", "after"]);
        assert!(bin.is_empty());
    }

    #[test]
    fn shared_object_reports_busy_while_borrowed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let shared = Rc::new(RefCell::new(recorder("shared", &log)));
        let mut handle = Rc::clone(&shared);

        let guard = shared.borrow_mut();
        assert_eq!(handle.dispose(), Err(ReleaseError::Busy));
        drop(guard);

        assert_eq!(handle.dispose(), Ok(()));
        assert_eq!(*log.borrow(), vec!["shared"]);
    }

    #[test]
    fn dropping_the_bin_releases_remaining_entries() {
        let calls = Rc::new(Cell::new(0));
        {
            let mut bin = ResourceBin::new();
            let counter = Rc::clone(&calls);
            bin.add(Disposable::callback(move || counter.set(counter.get() + 1)));
        }
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    #[case::callback(Disposable::callback(|| {}), "callback")]
    #[case::object(Disposable::object(Recorder { name: "x", log: Rc::default(), fail: false }), "object")]
    fn kind_names_the_variant(#[case] item: Disposable, #[case] expected: &str) {
        assert_eq!(item.kind(), expected);
        assert_eq!(format!("{item:?}"), format!("Disposable({expected:?})"));
    }

    #[test]
    fn empty_bin_reports_empty() {
        let bin = ResourceBin::new();
        assert!(bin.is_empty());
        assert_eq!(bin.len(), 0);
    }
}
