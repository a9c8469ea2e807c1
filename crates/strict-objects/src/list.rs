use crate::context::CallerContext;
use crate::dispatch::{MethodTable, DUNDER_SETITEM};
use crate::error::Result;
use crate::guard::check_external_modification;
use crate::module::ModuleRef;
use crate::object::{list_type, ObjRef, Payload};
use crate::sequence::{add_sequence_methods, make_sequence, resolve_index, IndexAccess};

pub fn make_list(creator: &ModuleRef, items: Vec<ObjRef>) -> ObjRef {
    make_sequence(&list_type(), creator, items)
}

fn list_append(receiver: &ObjRef, ctx: &CallerContext, item: &ObjRef) -> Result<ObjRef> {
    check_external_modification(receiver, ctx)?;
    if let Payload::List(data) = receiver.payload() {
        data.borrow_mut().push(item.clone());
    }
    Ok(ctx.none())
}

/// Shallow copy: a new builtin list aliasing the same elements.
fn list_copy(receiver: &ObjRef, ctx: &CallerContext) -> Result<ObjRef> {
    let items = receiver
        .sequence()
        .map(|items| items.to_vec())
        .unwrap_or_default();
    Ok(make_list(ctx.caller(), items))
}

fn list_setitem(
    receiver: &ObjRef,
    ctx: &CallerContext,
    index: &ObjRef,
    value: &ObjRef,
) -> Result<ObjRef> {
    check_external_modification(receiver, ctx)?;
    if let Payload::List(data) = receiver.payload() {
        let len = data.borrow().len();
        let position = resolve_index(ctx, receiver, index, len, IndexAccess::Write)?;
        data.borrow_mut()[position] = value.clone();
    }
    Ok(ctx.none())
}

pub(crate) fn add_list_methods(table: &mut MethodTable) {
    add_sequence_methods(table);
    table.binary("append", list_append);
    table.unary("copy", list_copy);
    table.ternary(DUNDER_SETITEM, list_setitem);
}
