//! The expression model: what a storable value is and how it advertises
//! the operations it supports.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::Result;
use crate::core::{CanonicalList, Context, Identifier};
use crate::dshash::StructuralHash;

/// Operations an expression may be asked about through [`Expression::can_apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Resolve a logical identifier.
    LogicalId,
    /// Resolve a physical identifier.
    PhysicalId,
    /// Resolve a canonical identifier.
    CanonicalId,
    /// Collapse an associative value into a flat `Map`.
    DictToMap,
    /// Collapse a sequential value into a flat `Array`.
    ListToArray,
}

/// Reference identity of a node that can take part in cycles.
///
/// `space` identifies the arena (or other owner) and `index` the slot within
/// it, so two handles to the same slot compare equal without comparing
/// memory addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefKey {
    pub space: u64,
    pub index: usize,
}

/// Helper supertrait giving trait objects access to `Any`.
///
/// Blanket-implemented for every `Send + Sync + 'static` type; there is no
/// need to implement it by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Any immutable value admitted into the store.
///
/// Every expression has a stable textual form (`Display`) and a structural
/// encoding (`StructuralHash`). The remaining methods are optional
/// capabilities; the defaults report "not supported" and the identity
/// resolvers fall back to structural hashing.
pub trait Expression: StructuralHash + AsAny + fmt::Display + fmt::Debug {
    /// Capability query: can `transform` be applied to this value?
    ///
    /// The default answer is derived from the optional identity hooks below.
    fn can_apply(&self, transform: TransformKind) -> bool {
        match transform {
            TransformKind::LogicalId => self.logical_id().is_some(),
            TransformKind::PhysicalId => self.physical_id().is_some(),
            TransformKind::CanonicalId => self.canonical_form().is_some() || !self.is_opaque(),
            TransformKind::DictToMap | TransformKind::ListToArray => false,
        }
    }

    /// Identity of the value as the user sees it.
    fn logical_id(&self) -> Option<Identifier> {
        None
    }

    /// Identity of the value's stored representation.
    fn physical_id(&self) -> Option<Identifier> {
        None
    }

    /// Identity derived from logical shape, when the value can answer directly.
    fn canonical_id(&self, _ctx: &mut Context) -> Result<Option<Identifier>> {
        Ok(None)
    }

    /// List-like canonical form, used for recursive canonical identity.
    fn canonical_form(&self) -> Option<&dyn CanonicalList> {
        None
    }

    /// Reference identity for nodes that may be shared or self-referencing.
    fn ref_key(&self) -> Option<RefKey> {
        None
    }
}
