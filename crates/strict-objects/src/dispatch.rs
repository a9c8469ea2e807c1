//! Name-keyed dispatch tables and the generic operation protocol.
//!
//! Each type carries a [`MethodTable`] filled once by layered registrars. The
//! evaluator reaches every container operation through the entry points here:
//! [`call_method`], [`binary_op`] (two-sided with the not-applicable
//! fallback), [`objects_eq`], [`contains`], [`len`], [`get_item`] and
//! [`set_item`].

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use crate::context::CallerContext;
use crate::error::Result;
use crate::object::{ObjRef, Payload};

pub const DUNDER_CONTAINS: &str = "__contains__";
pub const DUNDER_LEN: &str = "__len__";
pub const DUNDER_EQ: &str = "__eq__";
pub const DUNDER_GETITEM: &str = "__getitem__";
pub const DUNDER_SETITEM: &str = "__setitem__";

pub type UnaryFn = fn(&ObjRef, &CallerContext) -> Result<ObjRef>;
pub type BinaryFn = fn(&ObjRef, &CallerContext, &ObjRef) -> Result<ObjRef>;
pub type TernaryFn = fn(&ObjRef, &CallerContext, &ObjRef, &ObjRef) -> Result<ObjRef>;
pub type OperatorFn = fn(&ObjRef, &CallerContext, &ObjRef) -> Result<OpResult>;

/// A bound operation. The receiver and context are always passed; the variant
/// fixes how many operands follow.
#[derive(Clone, Copy)]
pub enum Method {
    Unary(UnaryFn),
    Binary(BinaryFn),
    Ternary(TernaryFn),
    /// A binary operator that may decline with [`OpResult::NotApplicable`].
    Operator(OperatorFn),
}

impl Method {
    pub fn arity(&self) -> usize {
        match self {
            Method::Unary(_) => 0,
            Method::Binary(_) | Method::Operator(_) => 1,
            Method::Ternary(_) => 2,
        }
    }
}

impl Debug for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Unary(_) => f.write_str("Method::Unary"),
            Method::Binary(_) => f.write_str("Method::Binary"),
            Method::Ternary(_) => f.write_str("Method::Ternary"),
            Method::Operator(_) => f.write_str("Method::Operator"),
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct MethodTable {
    methods: HashMap<&'static str, Method>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `method` under `name`, replacing what a more general layer put
    /// there.
    pub fn insert(&mut self, name: &'static str, method: Method) {
        self.methods.insert(name, method);
    }

    pub fn unary(&mut self, name: &'static str, method: UnaryFn) {
        self.insert(name, Method::Unary(method));
    }

    pub fn binary(&mut self, name: &'static str, method: BinaryFn) {
        self.insert(name, Method::Binary(method));
    }

    pub fn ternary(&mut self, name: &'static str, method: TernaryFn) {
        self.insert(name, Method::Ternary(method));
    }

    pub fn operator(&mut self, name: &'static str, method: OperatorFn) {
        self.insert(name, Method::Operator(method));
    }

    pub fn get(&self, name: &str) -> Option<Method> {
        self.methods.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }
}

/// Outcome of one side of a binary operator.
#[derive(Debug, Clone)]
pub enum OpResult {
    Value(ObjRef),
    /// Not an error: the caller should try the reflected operator.
    NotApplicable,
}

impl OpResult {
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, OpResult::NotApplicable)
    }

    /// Collapses the sentinel into the shared `NotImplemented` value, for
    /// callers that invoked the operator as a plain method.
    pub fn into_object(self) -> ObjRef {
        match self {
            OpResult::Value(value) => value,
            OpResult::NotApplicable => crate::scalars::not_implemented(),
        }
    }

    pub fn value(self) -> Option<ObjRef> {
        match self {
            OpResult::Value(value) => Some(value),
            OpResult::NotApplicable => None,
        }
    }
}

impl From<ObjRef> for OpResult {
    fn from(value: ObjRef) -> Self {
        if value.is_not_implemented() {
            OpResult::NotApplicable
        } else {
            OpResult::Value(value)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BinOp {
    #[display("+")]
    Add,
    #[display("*")]
    Mul,
    #[display("&")]
    And,
    #[display("|")]
    Or,
    #[display("^")]
    Xor,
}

impl BinOp {
    pub fn dunder(self) -> &'static str {
        match self {
            BinOp::Add => "__add__",
            BinOp::Mul => "__mul__",
            BinOp::And => "__and__",
            BinOp::Or => "__or__",
            BinOp::Xor => "__xor__",
        }
    }

    pub fn reflected(self) -> &'static str {
        match self {
            BinOp::Add => "__radd__",
            BinOp::Mul => "__rmul__",
            BinOp::And => "__rand__",
            BinOp::Or => "__ror__",
            BinOp::Xor => "__rxor__",
        }
    }
}

/// Invokes a named method on `receiver` with positional `args`.
pub fn call_method(
    ctx: &CallerContext,
    receiver: &ObjRef,
    name: &str,
    args: &[ObjRef],
) -> Result<ObjRef> {
    let Some(method) = receiver.ty().lookup(name) else {
        raise!(
            ctx,
            Attribute,
            "'{}' object has no attribute '{}'",
            receiver.type_name(),
            name
        );
    };
    raise_unless!(
        args.len() == method.arity(),
        ctx,
        Type,
        "{}.{}() takes exactly {} argument(s) ({} given)",
        receiver.type_name(),
        name,
        method.arity(),
        args.len()
    );
    match method {
        Method::Unary(f) => f(receiver, ctx),
        Method::Binary(f) => f(receiver, ctx, &args[0]),
        Method::Ternary(f) => f(receiver, ctx, &args[0], &args[1]),
        Method::Operator(f) => Ok(f(receiver, ctx, &args[0])?.into_object()),
    }
}

/// One side of a binary operator. A missing entry is not-applicable.
pub fn call_operator(
    ctx: &CallerContext,
    receiver: &ObjRef,
    name: &str,
    operand: &ObjRef,
) -> Result<OpResult> {
    match receiver.ty().lookup(name) {
        Some(Method::Operator(f)) => f(receiver, ctx, operand),
        Some(Method::Binary(f)) => Ok(f(receiver, ctx, operand)?.into()),
        Some(_) | None => Ok(OpResult::NotApplicable),
    }
}

/// Two-sided dispatch: the left operand's operator, then the right operand's
/// reflected operator, then a type error naming both operand types.
pub fn binary_op(ctx: &CallerContext, op: BinOp, lhs: &ObjRef, rhs: &ObjRef) -> Result<ObjRef> {
    if let OpResult::Value(value) = call_operator(ctx, lhs, op.dunder(), rhs)? {
        return Ok(value);
    }
    tracing::trace!(
        "{} {} {}: left operand declined, trying {}",
        lhs.type_name(),
        op,
        rhs.type_name(),
        op.reflected()
    );
    if let OpResult::Value(value) = call_operator(ctx, rhs, op.reflected(), lhs)? {
        return Ok(value);
    }
    tracing::debug!(
        "binary dispatch exhausted for {} {} {}",
        lhs.type_name(),
        op,
        rhs.type_name()
    );
    raise!(
        ctx,
        Type,
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op,
        lhs.type_name(),
        rhs.type_name()
    )
}

/// Domain equality through dispatch: identity, then `__eq__` on the left and
/// the right operand, then the truthiness of whichever answered.
pub fn objects_eq(ctx: &CallerContext, lhs: &ObjRef, rhs: &ObjRef) -> Result<bool> {
    if Rc::ptr_eq(lhs, rhs) {
        return Ok(true);
    }
    let answer = match call_operator(ctx, lhs, DUNDER_EQ, rhs)? {
        OpResult::Value(answer) => answer,
        OpResult::NotApplicable => match call_operator(ctx, rhs, DUNDER_EQ, lhs)? {
            OpResult::Value(answer) => answer,
            OpResult::NotApplicable => return Ok(false),
        },
    };
    is_truthy(ctx, &answer)
}

pub fn is_truthy(ctx: &CallerContext, value: &ObjRef) -> Result<bool> {
    let truthy = match value.payload() {
        Payload::None => false,
        Payload::NotImplemented | Payload::Slice(_) => true,
        Payload::Bool(b) => *b,
        Payload::Int(i) => *i != 0,
        Payload::Str(s) => !s.is_empty(),
        Payload::List(_) | Payload::Tuple(_) | Payload::Set(_) | Payload::FrozenSet(_) => {
            len(ctx, value)? != 0
        }
    };
    Ok(truthy)
}

/// Domain hash, or a type error for unhashable values.
pub fn hash(ctx: &CallerContext, value: &ObjRef) -> Result<u64> {
    raise_unless!(
        value.is_hashable(),
        ctx,
        Type,
        "unhashable type: '{}'",
        value.type_name()
    );
    Ok(value.domain_hash())
}

pub fn contains(ctx: &CallerContext, container: &ObjRef, item: &ObjRef) -> Result<bool> {
    if !container.ty().methods().contains(DUNDER_CONTAINS) {
        raise!(
            ctx,
            Type,
            "argument of type '{}' is not iterable",
            container.type_name()
        );
    }
    let answer = call_method(ctx, container, DUNDER_CONTAINS, std::slice::from_ref(item))?;
    is_truthy(ctx, &answer)
}

pub fn len(ctx: &CallerContext, value: &ObjRef) -> Result<i64> {
    if !value.ty().methods().contains(DUNDER_LEN) {
        raise!(ctx, Type, "object of type '{}' has no len()", value.type_name());
    }
    let answer = call_method(ctx, value, DUNDER_LEN, &[])?;
    match answer.as_int() {
        Some(length) => Ok(length),
        None => raise!(
            ctx,
            Type,
            "'{}' object cannot be interpreted as an integer",
            answer.type_name()
        ),
    }
}

pub fn get_item(ctx: &CallerContext, container: &ObjRef, index: &ObjRef) -> Result<ObjRef> {
    if !container.ty().methods().contains(DUNDER_GETITEM) {
        raise!(
            ctx,
            Type,
            "'{}' object is not subscriptable",
            container.type_name()
        );
    }
    call_method(ctx, container, DUNDER_GETITEM, std::slice::from_ref(index))
}

pub fn set_item(
    ctx: &CallerContext,
    container: &ObjRef,
    index: &ObjRef,
    value: &ObjRef,
) -> Result<()> {
    if !container.ty().methods().contains(DUNDER_SETITEM) {
        raise!(
            ctx,
            Type,
            "'{}' object does not support item assignment",
            container.type_name()
        );
    }
    call_method(ctx, container, DUNDER_SETITEM, &[index.clone(), value.clone()])?;
    Ok(())
}
