use crate::context::CallerContext;
use crate::dispatch::{objects_eq, MethodTable, DUNDER_CONTAINS, DUNDER_LEN};
use crate::error::Result;
use crate::object::ObjRef;
use crate::scalars::make_bool;

/// Linear membership by dispatch equality.
pub(crate) fn contains_by_scan(ctx: &CallerContext, items: &[ObjRef], item: &ObjRef) -> Result<bool> {
    for elem in items {
        if objects_eq(ctx, item, elem)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn iterable_contains(receiver: &ObjRef, ctx: &CallerContext, item: &ObjRef) -> Result<ObjRef> {
    let items = receiver.elements().unwrap_or_default();
    Ok(make_bool(contains_by_scan(ctx, &items, item)?))
}

fn iterable_len(receiver: &ObjRef, ctx: &CallerContext) -> Result<ObjRef> {
    let count = receiver.elements().map_or(0, |items| items.len());
    Ok(ctx.make_index(count))
}

/// Base capability of every container.
pub(crate) fn add_iterable_methods(table: &mut MethodTable) {
    table.binary(DUNDER_CONTAINS, iterable_contains);
    table.unary(DUNDER_LEN, iterable_len);
}
