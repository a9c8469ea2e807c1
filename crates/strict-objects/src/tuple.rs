use crate::context::CallerContext;
use crate::dispatch::{objects_eq, MethodTable};
use crate::error::Result;
use crate::module::ModuleRef;
use crate::object::{tuple_type, ObjRef};
use crate::sequence::{add_sequence_methods, make_sequence};

pub fn make_tuple(creator: &ModuleRef, items: Vec<ObjRef>) -> ObjRef {
    make_sequence(&tuple_type(), creator, items)
}

fn tuple_index(receiver: &ObjRef, ctx: &CallerContext, item: &ObjRef) -> Result<ObjRef> {
    let items = receiver
        .sequence()
        .map(|items| items.to_vec())
        .unwrap_or_default();
    for (position, elem) in items.iter().enumerate() {
        if objects_eq(ctx, item, elem)? {
            return Ok(ctx.make_index(position));
        }
    }
    raise!(ctx, Value, "tuple.index(x): x not in tuple")
}

pub(crate) fn add_tuple_methods(table: &mut MethodTable) {
    add_sequence_methods(table);
    table.binary("index", tuple_index);
}
