//! Thread-safe wrapper for a headless overlay session used by rspec suites.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use test_utils::SessionFixture;

/// Wrapper that forwards `Send` and `Sync` because access is mutex-guarded.
pub struct ThreadSafeSession(pub SessionFixture);

impl Deref for ThreadSafeSession {
    type Target = SessionFixture;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: rspec fixtures must implement `Clone + Send + Sync`, but the suite
// runs serially on the test thread. The session's `Rc` handles never leave
// the mutex, so no two threads can touch them.
unsafe impl Send for ThreadSafeSession {}
unsafe impl Sync for ThreadSafeSession {}

/// Shared pointer type for the wrapped session.
pub type SharedSession = Arc<Mutex<ThreadSafeSession>>;

/// Wraps a session for sharing across rspec closures.
pub fn share(session: SessionFixture) -> SharedSession {
    Arc::new(Mutex::new(ThreadSafeSession(session)))
}

/// Locks the shared session, recovering from a poisoned mutex.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, ThreadSafeSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
