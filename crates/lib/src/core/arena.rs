//! Arena-and-index ownership for self-referential or DAG-shaped values.
//!
//! Nodes live in an [`Arena`] and refer to each other by [`NodeId`]. A
//! [`Handle`] pairs a shared arena with one node and is the expression that
//! takes part in hashing; its [`RefKey`] (arena id, node index) plays the
//! role an address would play in cycle detection.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Result;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression, RefKey};
use crate::dshash::{Encoder, StructuralHash};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Index of a node within its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Growable node storage with a process-unique identity.
#[derive(Debug)]
pub struct Arena<T> {
    id: u64,
    nodes: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    /// Unique identity of this arena.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Adds a node and returns its index.
    pub fn alloc(&mut self, node: T) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0)
    }

    /// Mutable access, used to close cycles before the arena is shared.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freezes the arena and returns a handle to `root`.
    pub fn into_handle(self, root: NodeId) -> Handle<T> {
        Handle::new(Arc::new(self), root)
    }
}

/// A node type stored in an arena.
pub trait ArenaNode: fmt::Debug + Send + Sync + Sized + 'static {
    /// Encodes the node. Child references should be encoded through
    /// [`Handle::child`] so cycle detection sees them.
    fn encode_node(node: &Handle<Self>, enc: &mut Encoder) -> Result<()>;

    /// Children forming the node's canonical form, if it has one.
    fn canonical_children(&self) -> Option<Vec<NodeId>> {
        None
    }
}

/// A shared reference to one node of a frozen arena.
pub struct Handle<T> {
    arena: Arc<Arena<T>>,
    id: NodeId,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            arena: Arc::clone(&self.arena),
            id: self.id,
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("arena", &self.arena.id)
            .field("node", &self.id.0)
            .finish()
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena{}{}", self.arena.id, self.id)
    }
}

impl<T> Handle<T> {
    pub fn new(arena: Arc<Arena<T>>, id: NodeId) -> Self {
        Self { arena, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node this handle points at; `None` for a dangling index.
    pub fn node(&self) -> Option<&T> {
        self.arena.get(self.id)
    }

    /// A handle to another node in the same arena.
    pub fn child(&self, id: NodeId) -> Self {
        Self {
            arena: Arc::clone(&self.arena),
            id,
        }
    }

    pub fn key(&self) -> RefKey {
        RefKey {
            space: self.arena.id,
            index: self.id.0,
        }
    }
}

impl<T: ArenaNode> StructuralHash for Handle<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.reference(self.key(), |enc| match self.node() {
            Some(_) => T::encode_node(self, enc),
            None => {
                enc.nil();
                Ok(())
            }
        })
    }
}

impl<T: ArenaNode> Expression for Handle<T> {
    fn canonical_form(&self) -> Option<&dyn CanonicalList> {
        self.node()?.canonical_children()?;
        Some(self)
    }

    fn ref_key(&self) -> Option<RefKey> {
        Some(self.key())
    }
}

impl<T: ArenaNode> CanonicalList for Handle<T> {
    fn iter_canonical(&self, ctx: &mut Context, visit: &mut CanonicalVisit<'_>) -> Result<()> {
        let Some(children) = self.node().and_then(T::canonical_children) else {
            return Ok(());
        };
        for id in children {
            visit(ctx, &self.child(id))?;
        }
        Ok(())
    }
}
