//! Epoch clock used to throttle cancellation checks.
//!
//! A background ticker increments a counter every [`EPOCH_DURATION`]. The
//! counter is replicated into one cache-padded shard per CPU so that readers
//! on different threads never contend on the same cache line; reading the
//! clock is a single relaxed atomic load instead of a syscall.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::thread;
use std::time::Duration;

use crossbeam_utils::CachePadded;

/// Interval between epoch ticks.
pub const EPOCH_DURATION: Duration = Duration::from_millis(10);

static GLOBAL: LazyLock<EpochProvider> = LazyLock::new(EpochProvider::new);

static NEXT_SLOT: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    // Fixed on first use so a thread keeps reading the same shard.
    static SLOT: usize = NEXT_SLOT.fetch_add(1, Ordering::Relaxed);
}

/// The process-wide epoch provider shared by every [`Context`](crate::core::Context).
pub fn global() -> &'static EpochProvider {
    &GLOBAL
}

/// A sharded, periodically ticking counter.
///
/// The ticker thread holds only a weak reference to the shards and exits on
/// the first tick after the provider is dropped.
#[derive(Debug)]
pub struct EpochProvider {
    shards: Arc<[CachePadded<AtomicU64>]>,
    tick: Duration,
}

impl Default for EpochProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EpochProvider {
    /// Creates a provider ticking every [`EPOCH_DURATION`].
    pub fn new() -> Self {
        Self::with_tick(EPOCH_DURATION)
    }

    /// Creates a provider with a custom tick interval.
    pub fn with_tick(tick: Duration) -> Self {
        let shard_count = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let shards: Arc<[CachePadded<AtomicU64>]> = (0..shard_count)
            .map(|_| CachePadded::new(AtomicU64::new(0)))
            .collect();

        let weak = Arc::downgrade(&shards);
        let spawned = thread::Builder::new()
            .name("arbordb-epoch".to_string())
            .spawn(move || {
                loop {
                    thread::sleep(tick);
                    let Some(shards) = weak.upgrade() else {
                        break;
                    };
                    for shard in shards.iter() {
                        shard.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        match spawned {
            Ok(_) => tracing::debug!(shards = shard_count, ?tick, "Epoch ticker started"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start epoch ticker; epoch will not advance")
            }
        }

        Self { shards, tick }
    }

    /// Current epoch as seen from the calling thread's shard.
    pub fn current(&self) -> u64 {
        let slot = SLOT.with(|slot| *slot);
        self.shards[slot % self.shards.len()].load(Ordering::Relaxed)
    }

    /// Wall-clock length of one epoch.
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Number of shards the counter is replicated into.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}
