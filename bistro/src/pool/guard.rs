//! The loan guard returned by [`ConnectionPool::acquire`](super::ConnectionPool::acquire).

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::manager::{ConnectionManager, SqliteConnectionManager};
use super::Shared;

/// A connection on loan from the pool.
///
/// Dereferences to the session. Dropping the guard returns the session to
/// the pool, so every exit path, including `?` and panics, gives it back.
pub struct PooledConnection<M: ConnectionManager = SqliteConnectionManager> {
    id: u64,
    conn: Option<M::Connection>,
    broken: bool,
    pool: Arc<Shared<M>>,
}

impl<M: ConnectionManager> PooledConnection<M> {
    pub(super) fn new(id: u64, conn: M::Connection, pool: Arc<Shared<M>>) -> Self {
        Self {
            id,
            conn: Some(conn),
            broken: false,
            pool,
        }
    }

    /// Pool-wide identifier of the underlying session.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Marks the session as unusable; it is closed instead of recycled.
    pub fn invalidate(&mut self) {
        self.broken = true;
    }

    /// Returns `true` if [`invalidate`](Self::invalidate) was called.
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.broken
    }
}

impl<M: ConnectionManager> Deref for PooledConnection<M> {
    type Target = M::Connection;

    fn deref(&self) -> &M::Connection {
        self.conn
            .as_ref()
            .expect("pooled connection is present until drop")
    }
}

impl<M: ConnectionManager> DerefMut for PooledConnection<M> {
    fn deref_mut(&mut self) -> &mut M::Connection {
        self.conn
            .as_mut()
            .expect("pooled connection is present until drop")
    }
}

impl<M: ConnectionManager> Drop for PooledConnection<M> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.give_back(self.id, conn, self.broken);
        }
    }
}

impl<M: ConnectionManager> fmt::Debug for PooledConnection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("id", &self.id)
            .field("broken", &self.broken)
            .finish_non_exhaustive()
    }
}
