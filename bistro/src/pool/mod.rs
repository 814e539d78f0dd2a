//! Bounded connection pool with background idle eviction.
//!
//! The pool keeps at most `max_size` sessions open. Idle sessions sit in a
//! mutex-guarded deque; callers that find it empty and the ceiling reached
//! wait on a condition variable until a session is released or the acquire
//! timeout passes. A reaper thread periodically closes sessions that have
//! been idle past the threshold. It only ever touches the idle deque, so a
//! session on loan is never closed underneath its borrower.
//!
//! # Examples
//!
//! ```no_run
//! use bistro::database::{Database, DatabaseConfig};
//! use bistro::pool::{ConnectionPool, PoolConfig};
//!
//! let pool = ConnectionPool::open(DatabaseConfig::new("/tmp/bistro.db"), PoolConfig::default())
//!     .unwrap();
//! {
//!     let db = pool.acquire().unwrap();
//!     let tables = Database::list_tables(db.connection()).unwrap();
//!     println!("{} tables", tables.len());
//! } // returned to the pool here
//! assert_eq!(pool.state().idle, 1);
//! pool.shutdown();
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use serde::Serialize;

use crate::database::DatabaseConfig;
use crate::error::{Error, Result};

mod config;
mod guard;
mod manager;
mod reaper;

#[cfg(test)]
mod proptests;

pub use config::{
    PoolConfig, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_IDLE, DEFAULT_MAX_SIZE,
    DEFAULT_REAP_INTERVAL,
};
pub use guard::PooledConnection;
pub use manager::{ConnectionManager, SqliteConnectionManager};

use reaper::Reaper;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolState {
    /// Sessions currently open, loaned plus idle.
    pub open: usize,
    /// Sessions waiting in the idle set.
    pub idle: usize,
    /// Sessions on loan.
    pub loaned: usize,
}

struct IdleConnection<C> {
    id: u64,
    conn: C,
    last_used: Instant,
}

struct Inner<C> {
    idle: VecDeque<IdleConnection<C>>,
    open: usize,
    closed: bool,
}

/// State shared between the pool handle, its guards and the reaper.
pub(crate) struct Shared<M: ConnectionManager> {
    manager: M,
    config: PoolConfig,
    inner: Mutex<Inner<M::Connection>>,
    available: Condvar,
    next_id: AtomicU64,
}

impl<M: ConnectionManager> Shared<M> {
    fn connect(self: &Arc<Self>) -> Result<PooledConnection<M>> {
        match self.manager.connect() {
            Ok(conn) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                log::debug!("Opened pooled connection {id}");
                Ok(PooledConnection::new(id, conn, Arc::clone(self)))
            }
            Err(e) => {
                self.inner.lock().open -= 1;
                self.available.notify_one();
                log::warn!("Failed to open pooled connection: {e}");
                Err(e)
            }
        }
    }

    pub(crate) fn give_back(&self, id: u64, conn: M::Connection, broken: bool) {
        let mut inner = self.inner.lock();
        if inner.closed || broken || inner.idle.len() >= self.config.max_idle {
            inner.open -= 1;
            drop(inner);
            self.available.notify_one();
            log::debug!("Closing pooled connection {id}");
            self.manager.disconnect(conn);
            return;
        }

        inner.idle.push_back(IdleConnection {
            id,
            conn,
            last_used: Instant::now(),
        });
        drop(inner);
        self.available.notify_one();
    }

    fn reap_idle(&self) -> usize {
        let timeout = self.config.idle_timeout;
        let stale: Vec<IdleConnection<M::Connection>> = {
            let mut inner = self.inner.lock();
            let (stale, fresh): (Vec<_>, Vec<_>) = std::mem::take(&mut inner.idle)
                .into_iter()
                .partition(|c| c.last_used.elapsed() >= timeout);
            inner.idle = fresh.into();
            inner.open -= stale.len();
            stale
        };

        let reaped = stale.len();
        if reaped > 0 {
            self.available.notify_all();
            log::debug!("Reaped {reaped} idle connection(s)");
        }
        for idle in stale {
            self.manager.disconnect(idle.conn);
        }
        reaped
    }
}

/// A bounded pool of sessions created by a [`ConnectionManager`].
///
/// # Type Parameters
///
/// * `M` - Opens and checks sessions (defaults to [`SqliteConnectionManager`])
pub struct ConnectionPool<M: ConnectionManager = SqliteConnectionManager> {
    shared: Arc<Shared<M>>,
    reaper: Mutex<Option<Reaper>>,
}

impl ConnectionPool<SqliteConnectionManager> {
    /// Creates a pool of `SQLite` sessions against one store file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the reaper
    /// thread cannot be started.
    pub fn open(database: DatabaseConfig, config: PoolConfig) -> Result<Self> {
        Self::new(SqliteConnectionManager::new(database), config)
    }
}

impl<M: ConnectionManager> ConnectionPool<M> {
    /// Creates a pool. No session is opened until the first `acquire`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the reaper
    /// thread cannot be started.
    pub fn new(manager: M, config: PoolConfig) -> Result<Self> {
        config.validate()?;
        let shared = Arc::new(Shared {
            manager,
            config,
            inner: Mutex::new(Inner {
                idle: VecDeque::with_capacity(config.max_idle.min(config.max_size)),
                open: 0,
                closed: false,
            }),
            available: Condvar::new(),
            next_id: AtomicU64::new(1),
        });

        let reaper = match config.reap_interval {
            Some(interval) => {
                let weak: Weak<Shared<M>> = Arc::downgrade(&shared);
                Some(Reaper::spawn(interval, move || match weak.upgrade() {
                    Some(shared) => {
                        shared.reap_idle();
                        true
                    }
                    None => false,
                })?)
            }
            None => None,
        };

        Ok(Self {
            shared,
            reaper: Mutex::new(reaper),
        })
    }

    /// Returns the pool configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// Returns the session manager.
    #[must_use]
    pub fn manager(&self) -> &M {
        &self.shared.manager
    }

    /// Borrows a session.
    ///
    /// Reuses the most recently released idle session if it still passes
    /// validation, opens a new one while below the ceiling, and otherwise
    /// waits up to the acquire timeout for a release.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolExhausted`] if no session became free in time
    /// - [`Error::PoolClosed`] after [`shutdown`](Self::shutdown)
    /// - [`Error::Connection`] if a new session could not be opened
    pub fn acquire(&self) -> Result<PooledConnection<M>> {
        let shared = &self.shared;
        let deadline = Instant::now() + shared.config.acquire_timeout;
        let mut inner = shared.inner.lock();

        loop {
            if inner.closed {
                return Err(Error::PoolClosed);
            }

            if let Some(mut idle) = inner.idle.pop_back() {
                drop(inner);
                if shared.manager.is_valid(&mut idle.conn) {
                    return Ok(PooledConnection::new(idle.id, idle.conn, Arc::clone(shared)));
                }
                log::debug!("Discarding invalid idle connection {}", idle.id);
                shared.manager.disconnect(idle.conn);
                inner = shared.inner.lock();
                inner.open -= 1;
                continue;
            }

            if inner.open < shared.config.max_size {
                inner.open += 1;
                drop(inner);
                return shared.connect();
            }

            if shared.available.wait_until(&mut inner, deadline).timed_out()
                && !inner.closed
                && inner.idle.is_empty()
                && inner.open >= shared.config.max_size
            {
                let waited = shared.config.acquire_timeout.as_millis();
                log::warn!("Connection pool exhausted after {waited}ms");
                return Err(Error::PoolExhausted {
                    max_size: shared.config.max_size,
                    waited_ms: u64::try_from(waited).unwrap_or(u64::MAX),
                });
            }
        }
    }

    /// Returns a session to the pool.
    ///
    /// Equivalent to dropping the guard.
    pub fn release(&self, conn: PooledConnection<M>) {
        drop(conn);
    }

    /// Closes idle sessions unused for at least the idle timeout.
    ///
    /// Returns how many were closed.
    pub fn reap_idle(&self) -> usize {
        self.shared.reap_idle()
    }

    /// Returns a snapshot of pool occupancy.
    #[must_use]
    pub fn state(&self) -> PoolState {
        let inner = self.shared.inner.lock();
        PoolState {
            open: inner.open,
            idle: inner.idle.len(),
            loaned: inner.open - inner.idle.len(),
        }
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.inner.lock().closed
    }

    /// Stops the reaper and closes every idle session.
    ///
    /// Sessions on loan are closed when they are released. Waiting callers
    /// fail with [`Error::PoolClosed`]. Calling this twice is harmless.
    pub fn shutdown(&self) {
        drop(self.reaper.lock().take());

        let (drained, was_closed) = {
            let mut inner = self.shared.inner.lock();
            let was_closed = inner.closed;
            inner.closed = true;
            let drained = std::mem::take(&mut inner.idle);
            inner.open -= drained.len();
            (drained, was_closed)
        };
        self.shared.available.notify_all();

        if !was_closed {
            log::debug!("Connection pool shut down, closing {} idle", drained.len());
        }
        for idle in drained {
            self.shared.manager.disconnect(idle.conn);
        }
    }
}

impl<M: ConnectionManager> Drop for ConnectionPool<M> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<M: ConnectionManager> std::fmt::Debug for ConnectionPool<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("config", &self.shared.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::ConnectionManager;
    use crate::error::{Error, Result};

    /// A stand-in session that records its serial number.
    #[derive(Debug)]
    pub struct FakeConnection {
        pub serial: usize,
    }

    /// Counts connects and disconnects; can be told to fail or go stale.
    #[derive(Debug, Default, Clone)]
    pub struct FakeManager {
        pub connects: Arc<AtomicUsize>,
        pub disconnects: Arc<AtomicUsize>,
        pub refuse: Arc<AtomicBool>,
        pub stale: Arc<AtomicBool>,
    }

    impl ConnectionManager for FakeManager {
        type Connection = FakeConnection;

        fn connect(&self) -> Result<FakeConnection> {
            if self.refuse.load(Ordering::SeqCst) {
                return Err(Error::Connection {
                    details: "store unreachable".into(),
                });
            }
            let serial = self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(FakeConnection { serial })
        }

        fn is_valid(&self, _conn: &mut FakeConnection) -> bool {
            !self.stale.load(Ordering::SeqCst)
        }

        fn disconnect(&self, conn: FakeConnection) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            drop(conn);
        }
    }

    impl FakeManager {
        pub fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }

        pub fn disconnects(&self) -> usize {
            self.disconnects.load(Ordering::SeqCst)
        }
    }
}
