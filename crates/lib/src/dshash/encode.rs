use std::any::TypeId;
use std::collections::HashSet;

use sha2::{Digest as _, Sha256};

use super::{Digest, StructuralHash, record};
use crate::Result;
use crate::core::RefKey;

/// One-byte tags prefixing every encoded item.
pub mod tag {
    pub const NIL: u8 = 10;
    pub const BOOL: u8 = 20;
    pub const INT: u8 = 30;
    pub const UINT: u8 = 40;
    pub const FLOAT: u8 = 50;
    pub const STRING: u8 = 60;
    pub const LIST: u8 = 70;
    pub const LIST_END: u8 = 75;
    pub const MAP: u8 = 80;
    pub const MAP_END: u8 = 85;
    pub const CYCLE: u8 = 90;
}

/// Streaming structural encoder.
///
/// Holds the running SHA-256 state and the set of references on the current
/// traversal path.
pub struct Encoder {
    state: Sha256,
    on_path: HashSet<RefKey>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
            on_path: HashSet::new(),
        }
    }

    /// Consumes the encoder and returns the digest.
    pub fn finish(self) -> Digest {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.state.finalize());
        Digest(out)
    }

    fn tag(&mut self, tag: u8) {
        self.state.update([tag]);
    }

    pub fn nil(&mut self) {
        self.tag(tag::NIL);
    }

    pub fn bool(&mut self, value: bool) {
        self.tag(tag::BOOL);
        self.state.update([u8::from(value)]);
    }

    /// Signed integers of every width share one tag.
    pub fn int(&mut self, value: i64) {
        self.tag(tag::INT);
        self.state.update(value.to_le_bytes());
    }

    /// Unsigned integers of every width share one tag.
    pub fn uint(&mut self, value: u64) {
        self.tag(tag::UINT);
        self.state.update(value.to_le_bytes());
    }

    pub fn float(&mut self, value: f64) {
        self.tag(tag::FLOAT);
        self.state.update(value.to_le_bytes());
    }

    /// Length-prefixed raw bytes. Strings and byte buffers share a tag.
    pub fn bytes(&mut self, value: &[u8]) {
        self.tag(tag::STRING);
        self.state.update((value.len() as i64).to_le_bytes());
        self.state.update(value);
    }

    pub fn str(&mut self, value: &str) {
        self.bytes(value.as_bytes());
    }

    pub fn list_start(&mut self) {
        self.tag(tag::LIST);
    }

    pub fn list_end(&mut self) {
        self.tag(tag::LIST_END);
    }

    /// Encodes a list from its elements, in order.
    pub fn list<'a, I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a dyn StructuralHash>,
    {
        self.list_start();
        for item in items {
            item.encode(self)?;
        }
        self.list_end();
        Ok(())
    }

    /// Encodes an associative structure.
    ///
    /// Entries are ordered by the digest of their key, computed on a nested
    /// state that shares this encoder's path set. Ties keep input order.
    pub fn map<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a dyn StructuralHash, &'a dyn StructuralHash)>,
    {
        let mut keyed = Vec::new();
        for (key, value) in entries {
            let digest = self.nested_digest(key)?;
            keyed.push((digest, key, value));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        self.tag(tag::MAP);
        for (_, key, value) in keyed {
            key.encode(self)?;
            value.encode(self)?;
        }
        self.tag(tag::MAP_END);
        Ok(())
    }

    /// Encodes a record of named fields.
    ///
    /// Fields are written in name order as `(name, value)` pairs; zero and
    /// opaque fields are left out. The name ordering is computed once per
    /// record type `T`.
    pub fn record<T: 'static>(&mut self, fields: &[(&str, &dyn StructuralHash)]) -> Result<()> {
        let order = record::layout(TypeId::of::<T>(), fields);
        self.tag(tag::MAP);
        for &index in order.iter() {
            let (name, value) = fields[index];
            if value.is_zero() || value.is_opaque() {
                continue;
            }
            self.str(name);
            value.encode(self)?;
        }
        self.tag(tag::MAP_END);
        Ok(())
    }

    /// Encodes a node reachable by reference.
    ///
    /// If `key` is already on the current path the cycle tag is written
    /// instead of calling `f`. The key leaves the path once `f` returns, so
    /// a node shared by two parents is encoded in full both times.
    pub fn reference<F>(&mut self, key: RefKey, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if !self.on_path.insert(key) {
            self.tag(tag::CYCLE);
            return Ok(());
        }
        let result = f(self);
        self.on_path.remove(&key);
        result
    }

    fn nested_digest(&mut self, value: &dyn StructuralHash) -> Result<Digest> {
        let mut nested = Encoder {
            state: Sha256::new(),
            on_path: std::mem::take(&mut self.on_path),
        };
        let result = value.encode(&mut nested);
        self.on_path = std::mem::take(&mut nested.on_path);
        result?;
        Ok(nested.finish())
    }
}
