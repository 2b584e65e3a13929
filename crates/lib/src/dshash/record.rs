//! Record field layouts.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::StructuralHash;

static LAYOUTS: LazyLock<RwLock<HashMap<TypeId, Arc<[usize]>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Field visiting order for the record type `type_id`: declaration indices
/// sorted by field name.
pub(super) fn layout(type_id: TypeId, fields: &[(&str, &dyn StructuralHash)]) -> Arc<[usize]> {
    if let Some(order) = LAYOUTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
    {
        if order.len() == fields.len() {
            return Arc::clone(order);
        }
    }

    let order = sorted_order(fields);
    LAYOUTS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(type_id, Arc::clone(&order));
    order
}

fn sorted_order(fields: &[(&str, &dyn StructuralHash)]) -> Arc<[usize]> {
    let mut order: Vec<usize> = (0..fields.len()).collect();
    order.sort_by(|&a, &b| fields[a].0.cmp(fields[b].0));
    order.into()
}

/// Implements [`StructuralHash`](crate::dshash::StructuralHash) for a struct
/// as a record.
///
/// Each field is listed with the name it is hashed under; the short form
/// uses the Rust field name. The record is zero when every field is zero.
///
/// ```
/// use arbordb::structural_record;
///
/// #[derive(Debug, Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
/// structural_record!(Point { x => "X", y => "Y" });
///
/// let a = arbordb::dshash::hash(&Point { x: 1, y: 2 }).unwrap();
/// let b = arbordb::dshash::hash(&Point { x: 1, y: 3 }).unwrap();
/// assert_ne!(a, b);
/// ```
#[macro_export]
macro_rules! structural_record {
    ($ty:ty { $($field:ident => $name:expr),* $(,)? }) => {
        impl $crate::dshash::StructuralHash for $ty {
            fn encode(&self, enc: &mut $crate::dshash::Encoder) -> $crate::Result<()> {
                enc.record::<Self>(&[
                    $(($name, &self.$field as &dyn $crate::dshash::StructuralHash)),*
                ])
            }

            fn is_zero(&self) -> bool {
                true $(&& $crate::dshash::StructuralHash::is_zero(&self.$field))*
            }
        }
    };
    ($ty:ty { $($field:ident),* $(,)? }) => {
        $crate::structural_record!($ty { $($field => stringify!($field)),* });
    };
}
