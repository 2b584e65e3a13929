//! Materialization transforms: collapse any dict or list into its flat form.

use super::{Array, Dict, DictKey, Element, List, Map, chain, list_chain};
use crate::Result;
use crate::core::{Context, Cost, Transform, TransformStep};

/// Collapses a dict (typically a delta chain) into a flat [`Map`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DictToMap;

/// Collapses a list into a flat [`Array`], reusing the target's buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListToArray;

impl<K: DictKey, V: Element> Transform<dyn Dict<K, V>, Map<K, V>> for DictToMap {
    fn estimate_cost(&self, _ctx: &Context, _from: &dyn Dict<K, V>) -> Result<Cost> {
        Ok(Cost::default())
    }

    fn apply(&self, ctx: &mut Context, from: &dyn Dict<K, V>, to: &mut Map<K, V>) -> Result<()> {
        chain::materialize(ctx, from, to)
    }
}

impl<T: Element> Transform<dyn List<T>, Array<T>> for ListToArray {
    fn estimate_cost(&self, _ctx: &Context, _from: &dyn List<T>) -> Result<Cost> {
        Ok(Cost::default())
    }

    fn apply(&self, ctx: &mut Context, from: &dyn List<T>, to: &mut Array<T>) -> Result<()> {
        list_chain::materialize(ctx, from, &mut to.0)
    }
}

/// Runs [`DictToMap`] and records its cost.
pub fn to_map<K: DictKey, V: Element>(
    ctx: &mut Context,
    from: &dyn Dict<K, V>,
) -> Result<Map<K, V>> {
    let cost = DictToMap.estimate_cost(ctx, from)?;
    let mut map = Map::new();
    DictToMap.apply(ctx, from, &mut map)?;
    ctx.record(TransformStep { cost });
    Ok(map)
}

/// Runs [`ListToArray`] and records its cost.
pub fn to_array<T: Element>(ctx: &mut Context, from: &dyn List<T>) -> Result<Array<T>> {
    let cost = ListToArray.estimate_cost(ctx, from)?;
    let mut array = Array::new();
    ListToArray.apply(ctx, from, &mut array)?;
    ctx.record(TransformStep { cost });
    Ok(array)
}
