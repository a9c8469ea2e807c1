//! Deduplicated containers shared by `set` and `frozenset`: hashed
//! membership and set algebra. Results always take the left operand's type.

use std::cell::RefCell;
use std::rc::Rc;

use crate::collections::HashedSet;
use crate::context::CallerContext;
use crate::dispatch::{MethodTable, OpResult, DUNDER_CONTAINS, DUNDER_EQ, DUNDER_LEN};
use crate::error::Result;
use crate::iterable::add_iterable_methods;
use crate::module::ModuleRef;
use crate::object::{Frozen, ObjRef, Payload, StrictObject, TypeKind, TypeRef};
use crate::scalars::make_bool;

/// Builds a fresh set or frozenset of type `ty`. `ty` must be a set-like type.
pub(crate) fn make_set_like(ty: &TypeRef, creator: &ModuleRef, data: HashedSet) -> ObjRef {
    debug_assert!(ty.kind().is_set_like());
    let payload = match ty.kind() {
        TypeKind::Set => Payload::Set(RefCell::new(data)),
        _ => Payload::FrozenSet(Frozen::new(data)),
    };
    StrictObject::new(ty.clone(), Rc::downgrade(creator), payload)
}

pub(crate) fn ensure_hashable(ctx: &CallerContext, item: &ObjRef) -> Result<()> {
    if !item.is_hashable() {
        raise!(ctx, Type, "unhashable type: '{}'", item.type_name());
    }
    Ok(())
}

/// Collects `items` into a member set, rejecting unhashable ones.
pub(crate) fn hashed_members(ctx: &CallerContext, items: Vec<ObjRef>) -> Result<HashedSet> {
    let mut data = HashedSet::with_capacity(items.len());
    for item in items {
        ensure_hashable(ctx, &item)?;
        data.insert(item);
    }
    Ok(data)
}

fn members(receiver: &ObjRef) -> HashedSet {
    receiver
        .set_like()
        .map(|data| HashedSet::clone(&data))
        .unwrap_or_default()
}

fn set_contains(receiver: &ObjRef, ctx: &CallerContext, item: &ObjRef) -> Result<ObjRef> {
    ensure_hashable(ctx, item)?;
    let found = receiver
        .set_like()
        .is_some_and(|data| data.contains(item));
    Ok(make_bool(found))
}

fn set_len(receiver: &ObjRef, ctx: &CallerContext) -> Result<ObjRef> {
    let count = receiver.set_like().map_or(0, |data| data.len());
    Ok(ctx.make_index(count))
}

fn set_eq(receiver: &ObjRef, _ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    if rhs.set_like().is_none() {
        return Ok(OpResult::NotApplicable);
    }
    if !receiver.has_type(rhs.ty()) {
        return Ok(OpResult::Value(make_bool(false)));
    }
    let lhs = members(receiver);
    let rhs = members(rhs);
    let equal = lhs.len() == rhs.len() && lhs.iter().all(|item| rhs.contains(item));
    Ok(OpResult::Value(make_bool(equal)))
}

fn set_and(receiver: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    if rhs.set_like().is_none() {
        return Ok(OpResult::NotApplicable);
    }
    let lhs = members(receiver);
    let result = members(rhs)
        .iter()
        .filter(|item| lhs.contains(item))
        .cloned()
        .collect();
    Ok(OpResult::Value(make_set_like(
        receiver.ty(),
        ctx.caller(),
        result,
    )))
}

fn set_or(receiver: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    if rhs.set_like().is_none() {
        return Ok(OpResult::NotApplicable);
    }
    let mut result = members(receiver);
    for item in members(rhs).iter() {
        result.insert(item.clone());
    }
    Ok(OpResult::Value(make_set_like(
        receiver.ty(),
        ctx.caller(),
        result,
    )))
}

fn set_xor(receiver: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    if rhs.set_like().is_none() {
        return Ok(OpResult::NotApplicable);
    }
    let lhs = members(receiver);
    let rhs = members(rhs);
    let mut result = HashedSet::new();
    for item in rhs.iter().filter(|item| !lhs.contains(item)) {
        result.insert(item.clone());
    }
    for item in lhs.iter().filter(|item| !rhs.contains(item)) {
        result.insert(item.clone());
    }
    Ok(OpResult::Value(make_set_like(
        receiver.ty(),
        ctx.caller(),
        result,
    )))
}

pub(crate) fn add_set_like_methods(table: &mut MethodTable) {
    add_iterable_methods(table);
    table.binary(DUNDER_CONTAINS, set_contains);
    table.unary(DUNDER_LEN, set_len);
    table.operator(DUNDER_EQ, set_eq);
    table.operator("__and__", set_and);
    table.operator("__or__", set_or);
    table.operator("__xor__", set_xor);
}
