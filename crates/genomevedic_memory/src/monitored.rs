//! # Monitored Pool
//!
//! Count-only instrumentation around any [`ObjectPool`].

use parking_lot::Mutex;

use crate::pool::ObjectPool;
use crate::stats::PoolStats;

/// Wraps a pool and counts `get`/`put` calls.
///
/// `reuses` goes up on every `put`, matching the counters the monitoring
/// endpoint already reports. It measures returns, not cache hits.
#[derive(Debug)]
pub struct MonitoredPool<P> {
    inner: P,
    stats: Mutex<PoolStats>,
}

impl<P: ObjectPool> MonitoredPool<P> {
    /// Wraps `inner` with zeroed counters.
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            stats: Mutex::new(PoolStats::default()),
        }
    }

    /// The wrapped pool.
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        *self.stats.lock()
    }

    /// Zeroes the counters. Pool contents are untouched.
    pub fn reset_stats(&self) {
        *self.stats.lock() = PoolStats::default();
    }
}

impl<P: ObjectPool> ObjectPool for MonitoredPool<P> {
    type Item = P::Item;

    fn get(&self) -> P::Item {
        self.stats.lock().gets += 1;
        self.inner.get()
    }

    fn put(&self, item: P::Item) {
        {
            let mut stats = self.stats.lock();
            stats.puts += 1;
            stats.reuses += 1;
        }
        self.inner.put(item);
    }
}
