//! Positional containers shared by `list` and `tuple`: concatenation,
//! repetition, indexing and element-wise equality.

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::CallerContext;
use crate::dispatch::{objects_eq, MethodTable, OpResult, DUNDER_EQ, DUNDER_GETITEM, DUNDER_LEN};
use crate::error::Result;
use crate::iterable::add_iterable_methods;
use crate::module::ModuleRef;
use crate::object::{Frozen, ObjRef, Payload, StrictObject, TypeKind, TypeRef};
use crate::scalars::make_bool;

/// Builds a fresh list or tuple of type `ty`. `ty` must be a sequence type.
pub(crate) fn make_sequence(ty: &TypeRef, creator: &ModuleRef, items: Vec<ObjRef>) -> ObjRef {
    debug_assert!(ty.kind().is_sequence());
    let payload = match ty.kind() {
        TypeKind::List => Payload::List(RefCell::new(items)),
        _ => Payload::Tuple(Frozen::new(items)),
    };
    StrictObject::new(ty.clone(), Rc::downgrade(creator), payload)
}

pub(crate) fn normalize_index(index: i64, len: usize) -> i64 {
    if index < 0 {
        index.saturating_add(len as i64)
    } else {
        index
    }
}

/// Selects the out-of-range message.
pub(crate) enum IndexAccess {
    Read,
    Write,
}

/// Resolves `index` to a position in a sequence of `len` elements. An
/// out-of-range integer, a non-integer and a slice each raise exactly one
/// error.
pub(crate) fn resolve_index(
    ctx: &CallerContext,
    receiver: &ObjRef,
    index: &ObjRef,
    len: usize,
    access: IndexAccess,
) -> Result<usize> {
    if let Some(raw) = index.as_int() {
        let normalized = normalize_index(raw, len);
        return match usize::try_from(normalized) {
            Ok(position) if position < len => Ok(position),
            _ => match access {
                IndexAccess::Read => raise!(
                    ctx,
                    Index,
                    "{} index out of range: {}",
                    receiver.type_name(),
                    normalized
                ),
                IndexAccess::Write => raise!(
                    ctx,
                    Index,
                    "{} assignment index out of range: {}",
                    receiver.type_name(),
                    normalized
                ),
            },
        };
    }
    if index.as_slice().is_some() {
        raise!(
            ctx,
            Unsupported,
            "slice indexing of {} is not supported",
            receiver.type_name()
        );
    }
    raise!(
        ctx,
        Type,
        "{} indices must be integers or slices, not {}",
        receiver.type_name(),
        index.type_name()
    )
}

fn ensure_len(ctx: &CallerContext, receiver: &ObjRef, len: Option<usize>) -> Result<usize> {
    match len {
        Some(len) if ctx.options().allows_len(len) => Ok(len),
        _ => raise!(
            ctx,
            ResourceLimit,
            "{} result would exceed the configured sequence length",
            receiver.type_name()
        ),
    }
}

fn snapshot(receiver: &ObjRef) -> Vec<ObjRef> {
    receiver
        .sequence()
        .map(|items| items.to_vec())
        .unwrap_or_default()
}

fn sequence_len(receiver: &ObjRef, ctx: &CallerContext) -> Result<ObjRef> {
    let count = receiver.sequence().map_or(0, |items| items.len());
    Ok(ctx.make_index(count))
}

fn sequence_eq(receiver: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    if !receiver.has_type(rhs.ty()) || rhs.sequence().is_none() {
        return Ok(OpResult::Value(make_bool(false)));
    }
    let lhs_items = snapshot(receiver);
    let rhs_items = snapshot(rhs);
    if lhs_items.len() != rhs_items.len() {
        return Ok(OpResult::Value(make_bool(false)));
    }
    for (l, r) in lhs_items.iter().zip(&rhs_items) {
        if !objects_eq(ctx, l, r)? {
            return Ok(OpResult::Value(make_bool(false)));
        }
    }
    Ok(OpResult::Value(make_bool(true)))
}

fn sequence_add(receiver: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    if !receiver.has_type(rhs.ty()) || rhs.sequence().is_none() {
        return Ok(OpResult::NotApplicable);
    }
    let mut items = snapshot(receiver);
    let tail = snapshot(rhs);
    ensure_len(ctx, receiver, items.len().checked_add(tail.len()))?;
    items.extend(tail);
    Ok(OpResult::Value(make_sequence(receiver.ty(), ctx.caller(), items)))
}

fn repeat(receiver: &ObjRef, ctx: &CallerContext, factor: &ObjRef) -> Result<OpResult> {
    let Some(count) = factor.as_int() else {
        return Ok(OpResult::NotApplicable);
    };
    let items = snapshot(receiver);
    let count = usize::try_from(count).unwrap_or(0);
    let total = ensure_len(ctx, receiver, items.len().checked_mul(count))?;
    let result = items.iter().cycle().take(total).cloned().collect();
    Ok(OpResult::Value(make_sequence(receiver.ty(), ctx.caller(), result)))
}

fn sequence_mul(receiver: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    repeat(receiver, ctx, rhs)
}

fn sequence_rmul(receiver: &ObjRef, ctx: &CallerContext, lhs: &ObjRef) -> Result<OpResult> {
    repeat(receiver, ctx, lhs)
}

fn sequence_getitem(receiver: &ObjRef, ctx: &CallerContext, index: &ObjRef) -> Result<ObjRef> {
    let items = snapshot(receiver);
    let position = resolve_index(ctx, receiver, index, items.len(), IndexAccess::Read)?;
    Ok(items[position].clone())
}

pub(crate) fn add_sequence_methods(table: &mut MethodTable) {
    add_iterable_methods(table);
    table.unary(DUNDER_LEN, sequence_len);
    table.operator(DUNDER_EQ, sequence_eq);
    table.operator("__add__", sequence_add);
    table.operator("__mul__", sequence_mul);
    table.operator("__rmul__", sequence_rmul);
    table.binary(DUNDER_GETITEM, sequence_getitem);
}
