//! Core abstractions shared by every other module: expressions, identifiers,
//! transforms, cost accounting, and the per-operation [`Context`].

mod arena;
pub mod canonical;
mod context;
mod cost;
pub mod epoch;
pub mod errors;
mod expression;
mod identifier;
mod identity;
mod transform;

pub use arena::{Arena, ArenaNode, Handle, NodeId};
pub use canonical::{CanonicalList, CanonicalVisit};
pub use context::{Context, YieldFn, YieldPolicy};
pub use cost::Cost;
pub use errors::CoreError;
pub use expression::{AsAny, Expression, RefKey, TransformKind};
pub use identifier::Identifier;
pub use identity::{ToCanonicalId, ToLogicalId, ToPhysicalId, canonical_id, logical_id, physical_id};
pub use transform::{Transform, TransformStep};
