use crate::context::CallerContext;
use crate::dispatch::MethodTable;
use crate::error::Result;
use crate::guard::check_external_modification;
use crate::object::{frozenset_type, set_type, ObjRef, Payload};
use crate::setlike::{add_set_like_methods, ensure_hashable, hashed_members, make_set_like};

pub fn make_set(ctx: &CallerContext, items: Vec<ObjRef>) -> Result<ObjRef> {
    let data = hashed_members(ctx, items)?;
    Ok(make_set_like(&set_type(), ctx.caller(), data))
}

pub fn make_frozenset(ctx: &CallerContext, items: Vec<ObjRef>) -> Result<ObjRef> {
    let data = hashed_members(ctx, items)?;
    Ok(make_set_like(&frozenset_type(), ctx.caller(), data))
}

/// Inserts unless an equal member exists; the existing member is kept.
fn set_add(receiver: &ObjRef, ctx: &CallerContext, item: &ObjRef) -> Result<ObjRef> {
    check_external_modification(receiver, ctx)?;
    ensure_hashable(ctx, item)?;
    if let Payload::Set(data) = receiver.payload() {
        data.borrow_mut().insert(item.clone());
    }
    Ok(ctx.none())
}

pub(crate) fn add_set_methods(table: &mut MethodTable) {
    add_set_like_methods(table);
    table.binary("add", set_add);
}

pub(crate) fn add_frozenset_methods(table: &mut MethodTable) {
    add_set_like_methods(table);
}
