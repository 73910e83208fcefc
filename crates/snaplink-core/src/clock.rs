use jiff::Timestamp;

#[cfg(any(test, feature = "test-util"))]
pub use self::manual::ManualClock;

pub trait Clock: Send + Sync + 'static {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Only built for tests and for dependents enabling the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
mod manual {
    use super::Clock;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::{Arc, Mutex};

    /// A clock that only moves when told to.
    ///
    /// Clones share the same instant, so a test can keep a handle and advance
    /// the time seen by a service that owns another clone.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<Timestamp>>,
    }

    impl ManualClock {
        pub fn new(now: Timestamp) -> Self {
            Self {
                now: Arc::new(Mutex::new(now)),
            }
        }

        pub fn set(&self, now: Timestamp) {
            *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
        }

        pub fn advance(&self, by: SignedDuration) {
            let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
            *now = *now + by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            *self.now.lock().unwrap_or_else(|e| e.into_inner())
        }
    }
}
