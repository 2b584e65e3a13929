use std::sync::Arc;

use arbordb::{
    collection::{self, Array, Dict, List, ListAppend, Map},
    core::{Arena, ArenaNode, Context, Handle, NodeId},
    dshash::{self, Encoder, StructuralHash},
    kvdb::{DB, DbConfig},
    scalar::{Int, Str},
    storage::InMemory,
};

/// Lower-case hex structural digest of `value`.
pub fn digest_hex<T: StructuralHash + ?Sized>(value: &T) -> String {
    dshash::hash(value).expect("hashing should succeed").to_hex()
}

/// A fresh database over its own in-memory store.
pub fn setup_db() -> (DB, Arc<InMemory>) {
    setup_db_with_config(DbConfig::default())
}

pub fn setup_db_with_config(config: DbConfig) -> (DB, Arc<InMemory>) {
    let storage = Arc::new(InMemory::new());
    let db = DB::with_config(storage.clone(), config);
    (db, storage)
}

/// A flat `Map<Str, Int>` from string/int pairs.
pub fn str_int_map(entries: &[(&str, i64)]) -> Map<Str, Int> {
    entries.iter().map(|&(k, v)| (Str::from(k), Int(v))).collect()
}

/// `Map<Str, Int>` as a dict trait object.
pub fn dict(entries: &[(&str, i64)]) -> Arc<dyn Dict<Str, Int>> {
    Arc::new(str_int_map(entries))
}

/// A chain of `depth` sets of `k{i}` -> `i` over an empty map.
pub fn deep_chain(depth: usize) -> Arc<dyn Dict<Str, Int>> {
    let mut chain: Arc<dyn Dict<Str, Int>> = Arc::new(Map::new());
    for i in 0..depth {
        chain = collection::set(chain, Str::from(format!("k{i}")), Int(i as i64));
    }
    chain
}

/// A chain of `depth` appends of `0..depth` over an empty array.
pub fn deep_list(depth: usize) -> Arc<dyn List<Int>> {
    let mut ctx = Context::background();
    let mut list: Arc<dyn List<Int>> = Arc::new(Array::new());
    for i in 0..depth {
        list = Arc::new(ListAppend::new(&mut ctx, list, Int(i as i64)).expect("append"));
    }
    list
}

pub fn strs(items: &[&str]) -> Array<Str> {
    items.iter().map(|&s| Str::from(s)).collect()
}

/// Graph node used to exercise reference identity.
#[derive(Debug)]
pub enum Node {
    Leaf(i64),
    Branch(Vec<NodeId>),
}

impl ArenaNode for Node {
    fn encode_node(node: &Handle<Self>, enc: &mut Encoder) -> arbordb::Result<()> {
        match node.node() {
            Some(Node::Leaf(value)) => enc.int(*value),
            Some(Node::Branch(children)) => {
                enc.list_start();
                for &id in children {
                    node.child(id).encode(enc)?;
                }
                enc.list_end();
            }
            None => enc.nil(),
        }
        Ok(())
    }

    fn canonical_children(&self) -> Option<Vec<NodeId>> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(children) => Some(children.clone()),
        }
    }
}

/// A branch whose only child is itself.
pub fn self_loop() -> Handle<Node> {
    let mut arena = Arena::new();
    let root = arena.alloc(Node::Branch(Vec::new()));
    if let Some(Node::Branch(children)) = arena.get_mut(root) {
        children.push(root);
    }
    arena.into_handle(root)
}

/// A branch with no children.
pub fn empty_branch() -> Handle<Node> {
    let mut arena = Arena::new();
    let root = arena.alloc(Node::Branch(Vec::new()));
    arena.into_handle(root)
}

/// A branch referencing one shared leaf twice.
pub fn shared_pair(value: i64) -> Handle<Node> {
    let mut arena = Arena::new();
    let leaf = arena.alloc(Node::Leaf(value));
    let root = arena.alloc(Node::Branch(vec![leaf, leaf]));
    arena.into_handle(root)
}

/// A branch referencing two distinct, equal leaves.
pub fn distinct_pair(value: i64) -> Handle<Node> {
    let mut arena = Arena::new();
    let left = arena.alloc(Node::Leaf(value));
    let right = arena.alloc(Node::Leaf(value));
    let root = arena.alloc(Node::Branch(vec![left, right]));
    arena.into_handle(root)
}
