//! Per-operation ambient state: physical store handle, running cost, and
//! cooperative cancellation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::core::{CoreError, Cost, TransformStep, epoch};
use crate::storage::PhysicalStorage;

/// Cancellation predicate. Returning `false` asks the running operation to stop.
pub type YieldFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// How often a [`Context::yield_point`] actually consults the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum YieldPolicy {
    /// Every yield point checks.
    #[default]
    Always,
    /// Every `every`-th yield point checks.
    Quota { every: u32 },
    /// A yield point checks once at least `interval_ms` has elapsed on the
    /// epoch clock since the last check.
    Interval { interval_ms: u64 },
}

/// Ambient state threaded explicitly through every operation.
#[derive(Clone, Default)]
pub struct Context {
    storage: Option<Arc<dyn PhysicalStorage>>,
    /// Running cost accumulated by transforms.
    pub cost: Cost,
    yield_fn: Option<YieldFn>,
    policy: YieldPolicy,
    calls: u64,
    last_check_epoch: u64,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("storage", &self.storage)
            .field("cost", &self.cost)
            .field("cancellable", &self.yield_fn.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Context {
    /// A context with no store and no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context bound to a physical store.
    pub fn with_storage(storage: Arc<dyn PhysicalStorage>) -> Self {
        Self {
            storage: Some(storage),
            ..Self::default()
        }
    }

    /// Installs a cancellation predicate.
    pub fn with_yield(mut self, yield_fn: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.yield_fn = Some(Arc::new(yield_fn));
        self
    }

    /// Cancels once `flag` is set to `true`.
    pub fn with_cancel_flag(self, flag: Arc<AtomicBool>) -> Self {
        self.with_yield(move || !flag.load(Ordering::Relaxed))
    }

    /// Sets the throttling policy for yield checks.
    pub fn with_policy(mut self, policy: YieldPolicy) -> Self {
        self.policy = policy;
        if let YieldPolicy::Interval { .. } = policy {
            self.last_check_epoch = epoch::global().current();
        }
        self
    }

    /// The physical store, if one is attached.
    pub fn storage(&self) -> Option<&Arc<dyn PhysicalStorage>> {
        self.storage.as_ref()
    }

    pub fn policy(&self) -> YieldPolicy {
        self.policy
    }

    /// Folds a transform step's cost into the running total.
    pub fn record(&mut self, step: TransformStep) {
        self.cost.merge(step.cost);
    }

    /// Cooperative cancellation point.
    ///
    /// Called periodically by long-running loops. Fails with
    /// [`CoreError::Canceled`] when the policy decides to check and the
    /// predicate reports stop. Work already done is not rolled back.
    pub fn yield_point(&mut self) -> Result<()> {
        let Some(yield_fn) = &self.yield_fn else {
            return Ok(());
        };

        let due = match self.policy {
            YieldPolicy::Always => true,
            YieldPolicy::Quota { every } => {
                self.calls += 1;
                self.calls % u64::from(every.max(1)) == 0
            }
            YieldPolicy::Interval { interval_ms } => {
                let provider = epoch::global();
                let tick_ms = provider.tick().as_millis().max(1) as u64;
                let needed = interval_ms.div_ceil(tick_ms);
                let now = provider.current();
                if now.saturating_sub(self.last_check_epoch) >= needed {
                    self.last_check_epoch = now;
                    true
                } else {
                    false
                }
            }
        };

        if due && !yield_fn() {
            tracing::debug!(policy = ?self.policy, "Operation canceled at yield point");
            return Err(CoreError::Canceled.into());
        }
        Ok(())
    }
}
