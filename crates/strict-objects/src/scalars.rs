//! Scalar abstract values the containers lean on: `None`, `NotImplemented`,
//! `bool`, `int`, `str` and `slice`. Only the operations the container
//! protocol needs are registered.

use std::rc::{Rc, Weak};

use crate::context::CallerContext;
use crate::dispatch::{MethodTable, OpResult, DUNDER_CONTAINS, DUNDER_EQ, DUNDER_LEN};
use crate::error::Result;
use crate::module::ModuleRef;
use crate::object::{
    bool_type, int_type, none_type, not_implemented_type, slice_type, str_type, ObjRef, Payload,
    SliceBounds, StrictObject,
};

thread_local! {
    static NONE: ObjRef = StrictObject::new(none_type(), Weak::new(), Payload::None);
    static NOT_IMPLEMENTED: ObjRef =
        StrictObject::new(not_implemented_type(), Weak::new(), Payload::NotImplemented);
    static TRUE: ObjRef = StrictObject::new(bool_type(), Weak::new(), Payload::Bool(true));
    static FALSE: ObjRef = StrictObject::new(bool_type(), Weak::new(), Payload::Bool(false));
}

pub fn none() -> ObjRef {
    NONE.with(Rc::clone)
}

/// The shared not-applicable sentinel as a value.
pub fn not_implemented() -> ObjRef {
    NOT_IMPLEMENTED.with(Rc::clone)
}

pub fn make_bool(value: bool) -> ObjRef {
    if value {
        TRUE.with(Rc::clone)
    } else {
        FALSE.with(Rc::clone)
    }
}

pub fn make_int(creator: &ModuleRef, value: i64) -> ObjRef {
    StrictObject::new(int_type(), Rc::downgrade(creator), Payload::Int(value))
}

pub fn make_str(creator: &ModuleRef, value: impl Into<String>) -> ObjRef {
    StrictObject::new(str_type(), Rc::downgrade(creator), Payload::Str(value.into()))
}

pub fn make_slice(creator: &ModuleRef, bounds: SliceBounds) -> ObjRef {
    StrictObject::new(slice_type(), Rc::downgrade(creator), Payload::Slice(bounds))
}

fn none_eq(_self: &ObjRef, _ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    Ok(OpResult::Value(make_bool(rhs.is_none())))
}

pub(crate) fn add_none_methods(table: &mut MethodTable) {
    table.operator(DUNDER_EQ, none_eq);
}

fn int_eq(lhs: &ObjRef, _ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    match (lhs.as_int(), rhs.as_int()) {
        (Some(l), Some(r)) => Ok(OpResult::Value(make_bool(l == r))),
        _ => Ok(OpResult::NotApplicable),
    }
}

fn int_add(lhs: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    let (Some(l), Some(r)) = (lhs.as_int(), rhs.as_int()) else {
        return Ok(OpResult::NotApplicable);
    };
    match l.checked_add(r) {
        Some(sum) => Ok(OpResult::Value(ctx.make_int(sum))),
        None => raise!(ctx, Unsupported, "integer result out of range: {} + {}", l, r),
    }
}

fn int_mul(lhs: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    let (Some(l), Some(r)) = (lhs.as_int(), rhs.as_int()) else {
        return Ok(OpResult::NotApplicable);
    };
    match l.checked_mul(r) {
        Some(product) => Ok(OpResult::Value(ctx.make_int(product))),
        None => raise!(ctx, Unsupported, "integer result out of range: {} * {}", l, r),
    }
}

/// Shared by `int` and `bool`.
pub(crate) fn add_int_methods(table: &mut MethodTable) {
    table.operator(DUNDER_EQ, int_eq);
    table.operator("__add__", int_add);
    table.operator("__radd__", int_add);
    table.operator("__mul__", int_mul);
    table.operator("__rmul__", int_mul);
}

fn str_eq(lhs: &ObjRef, _ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    match (lhs.as_str(), rhs.as_str()) {
        (Some(l), Some(r)) => Ok(OpResult::Value(make_bool(l == r))),
        _ => Ok(OpResult::NotApplicable),
    }
}

fn str_add(lhs: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    match (lhs.as_str(), rhs.as_str()) {
        (Some(l), Some(r)) => Ok(OpResult::Value(ctx.make_str(format!("{}{}", l, r)))),
        _ => Ok(OpResult::NotApplicable),
    }
}

fn str_mul(lhs: &ObjRef, ctx: &CallerContext, rhs: &ObjRef) -> Result<OpResult> {
    let (Some(text), Some(count)) = (lhs.as_str(), rhs.as_int()) else {
        return Ok(OpResult::NotApplicable);
    };
    let count = usize::try_from(count).unwrap_or(0);
    let total = text.len().checked_mul(count);
    match total {
        Some(total) if ctx.options().allows_len(total) => {
            Ok(OpResult::Value(ctx.make_str(text.repeat(count))))
        }
        _ => raise!(
            ctx,
            ResourceLimit,
            "str repetition of length {} by {} exceeds the sequence limit",
            text.len(),
            count
        ),
    }
}

fn str_len(receiver: &ObjRef, ctx: &CallerContext) -> Result<ObjRef> {
    let length = receiver.as_str().map_or(0, |s| s.chars().count());
    Ok(ctx.make_index(length))
}

fn str_contains(receiver: &ObjRef, ctx: &CallerContext, item: &ObjRef) -> Result<ObjRef> {
    let haystack = receiver.as_str().unwrap_or_default();
    match item.as_str() {
        Some(needle) => Ok(make_bool(haystack.contains(needle))),
        None => raise!(
            ctx,
            Type,
            "'in <string>' requires string as left operand, not {}",
            item.type_name()
        ),
    }
}

pub(crate) fn add_str_methods(table: &mut MethodTable) {
    table.operator(DUNDER_EQ, str_eq);
    table.operator("__add__", str_add);
    table.operator("__mul__", str_mul);
    table.operator("__rmul__", str_mul);
    table.unary(DUNDER_LEN, str_len);
    table.binary(DUNDER_CONTAINS, str_contains);
}
