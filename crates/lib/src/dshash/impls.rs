//! [`StructuralHash`] for standard library and serde types.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_bytes::{ByteBuf, Bytes};
use serde_json::Value;

use super::{Encoder, StructuralHash};
use crate::Result;
use crate::core::Expression;

macro_rules! impl_int {
    ($method:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl StructuralHash for $t {
                fn encode(&self, enc: &mut Encoder) -> Result<()> {
                    enc.$method(*self as $wide);
                    Ok(())
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_int!(int as i64: i8, i16, i32, i64, isize);
impl_int!(uint as u64: u8, u16, u32, u64, usize);

impl StructuralHash for f64 {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.float(*self);
        Ok(())
    }

    // Bit pattern, so -0.0 counts as set.
    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl StructuralHash for f32 {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.float(f64::from(*self));
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl StructuralHash for bool {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.bool(*self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl StructuralHash for str {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.str(self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl StructuralHash for String {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.str(self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl StructuralHash for () {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.nil();
        Ok(())
    }

    fn is_zero(&self) -> bool {
        true
    }
}

impl<T: StructuralHash> StructuralHash for Option<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Some(value) => value.encode(enc),
            None => {
                enc.nil();
                Ok(())
            }
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn is_opaque(&self) -> bool {
        self.as_ref().is_some_and(StructuralHash::is_opaque)
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for &T {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        (**self).encode(enc)
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn is_opaque(&self) -> bool {
        (**self).is_opaque()
    }
}

// Owning pointers hash as their target. Like any set pointer they are
// never zero themselves.
macro_rules! impl_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: StructuralHash + ?Sized> StructuralHash for $ptr<T> {
                fn encode(&self, enc: &mut Encoder) -> Result<()> {
                    (**self).encode(enc)
                }

                fn is_opaque(&self) -> bool {
                    (**self).is_opaque()
                }
            }
        )*
    };
}

impl_pointer!(Box, Arc, Rc);

impl<T: StructuralHash> StructuralHash for [T] {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.list(self.iter().map(|item| item as &dyn StructuralHash))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: StructuralHash, const N: usize> StructuralHash for [T; N] {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        self.as_slice().encode(enc)
    }

    fn is_zero(&self) -> bool {
        self.iter().all(StructuralHash::is_zero)
    }
}

impl<T: StructuralHash> StructuralHash for Vec<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        self.as_slice().encode(enc)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: StructuralHash> StructuralHash for VecDeque<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.list(self.iter().map(|item| item as &dyn StructuralHash))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K: StructuralHash, V: StructuralHash, S> StructuralHash for HashMap<K, V, S> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.map(
            self.iter()
                .map(|(k, v)| (k as &dyn StructuralHash, v as &dyn StructuralHash)),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K: StructuralHash, V: StructuralHash> StructuralHash for BTreeMap<K, V> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.map(
            self.iter()
                .map(|(k, v)| (k as &dyn StructuralHash, v as &dyn StructuralHash)),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl StructuralHash for ByteBuf {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.bytes(self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl StructuralHash for Bytes {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.bytes(self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// JSON numbers that fit `i64` use the signed tag, larger positive integers
/// the unsigned tag, everything else the float tag.
impl StructuralHash for Value {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Value::Null => enc.nil(),
            Value::Bool(b) => enc.bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    enc.int(i);
                } else if let Some(u) = n.as_u64() {
                    enc.uint(u);
                } else {
                    enc.float(n.as_f64().unwrap_or(f64::NAN));
                }
            }
            Value::String(s) => enc.str(s),
            Value::Array(items) => return items.as_slice().encode(enc),
            Value::Object(map) => {
                return enc.map(
                    map.iter()
                        .map(|(k, v)| (k as &dyn StructuralHash, v as &dyn StructuralHash)),
                );
            }
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !*b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.to_bits() == 0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }
}

/// Wrapper marking a value with no structural encoding.
///
/// Encodes as nil and is omitted from records, the same treatment function
/// pointers get.
#[derive(Debug, Clone, Copy, Default)]
pub struct Opaque<T>(pub T);

impl<T> StructuralHash for Opaque<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.nil();
        Ok(())
    }

    fn is_opaque(&self) -> bool {
        true
    }
}

impl<T> fmt::Display for Opaque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque")
    }
}

impl<T: fmt::Debug + Send + Sync + 'static> Expression for Opaque<T> {}

macro_rules! impl_fn_pointer {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> StructuralHash for fn($($arg),*) -> R {
            fn encode(&self, enc: &mut Encoder) -> Result<()> {
                enc.nil();
                Ok(())
            }

            fn is_opaque(&self) -> bool {
                true
            }
        }
    };
}

impl_fn_pointer!();
impl_fn_pointer!(A);
impl_fn_pointer!(A, B);
impl_fn_pointer!(A, B, C);
