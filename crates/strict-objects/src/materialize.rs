//! Conversion between abstract values and the concrete values they stand for.
//!
//! Immutable containers memoize their conversion for good; mutable ones are
//! rebuilt on every request because their payload may have changed since.
//! A failure anywhere in a nested conversion surfaces as an error and no
//! partially built container escapes.

use once_cell::unsync::OnceCell;

use crate::context::CallerContext;
use crate::error::{Error, Result};
use crate::host::{HostObjects, HostValue};
use crate::object::{ObjRef, Payload};

pub fn materialize(value: &ObjRef, host: &dyn HostObjects) -> Result<HostValue> {
    let built = match value.payload() {
        Payload::None => host.none(),
        Payload::NotImplemented => host.not_implemented(),
        Payload::Bool(b) => host.bool(*b),
        Payload::Int(i) => host.int(*i),
        Payload::Str(s) => host.str(s),
        Payload::Slice(_) => Err(eyre::eyre!("slice objects have no concrete counterpart")),
        Payload::List(data) => {
            let items = data.borrow().to_vec();
            let items = materialize_all(&items, host)?;
            host.list(items)
        }
        Payload::Set(data) => {
            let items: Vec<ObjRef> = data.borrow().iter().cloned().collect();
            let items = materialize_all(&items, host)?;
            host.set(items)
        }
        Payload::Tuple(frozen) => {
            return memoized(value, &frozen.materialized, || {
                let items = materialize_all(&frozen.data, host)?;
                host.tuple(items).map_err(|source| failure(value, source))
            });
        }
        Payload::FrozenSet(frozen) => {
            return memoized(value, &frozen.materialized, || {
                let items: Vec<ObjRef> = frozen.data.iter().cloned().collect();
                let items = materialize_all(&items, host)?;
                host.frozenset(items).map_err(|source| failure(value, source))
            });
        }
    };
    built.map_err(|source| failure(value, source))
}

fn materialize_all(items: &[ObjRef], host: &dyn HostObjects) -> Result<Vec<HostValue>> {
    items.iter().map(|item| materialize(item, host)).collect()
}

fn memoized(
    value: &ObjRef,
    cache: &OnceCell<HostValue>,
    build: impl FnOnce() -> Result<HostValue>,
) -> Result<HostValue> {
    if let Some(cached) = cache.get() {
        return Ok(cached.clone());
    }
    let built = cache.get_or_try_init(build)?;
    tracing::debug!("cached concrete value for {}", value.type_name());
    Ok(built.clone())
}

fn failure(value: &ObjRef, source: eyre::Report) -> Error {
    tracing::debug!("materializing {} failed: {}", value.type_name(), source);
    Error::materialization(value.type_name(), source)
}

/// Turns a concrete value back into fresh abstract values owned by the
/// caller's module.
pub fn abstract_value(ctx: &CallerContext, value: &HostValue) -> Result<ObjRef> {
    let abstracted = match value {
        HostValue::None => ctx.none(),
        HostValue::NotImplemented => ctx.not_implemented(),
        HostValue::Bool(b) => ctx.make_bool(*b),
        HostValue::Int(i) => ctx.make_int(*i),
        HostValue::Str(s) => ctx.make_str(s.to_string()),
        HostValue::List(_) => ctx.make_list(abstract_items(ctx, value)?),
        HostValue::Tuple(_) => ctx.make_tuple(abstract_items(ctx, value)?),
        HostValue::Set(_) => ctx.make_set(abstract_items(ctx, value)?)?,
        HostValue::FrozenSet(_) => ctx.make_frozenset(abstract_items(ctx, value)?)?,
    };
    Ok(abstracted)
}

fn abstract_items(ctx: &CallerContext, value: &HostValue) -> Result<Vec<ObjRef>> {
    let Some(items) = value.items() else {
        raise!(ctx, Type, "'{}' object is not iterable", value.type_name());
    };
    items.iter().map(|item| abstract_value(ctx, item)).collect()
}
