//! Abstract container values for a side-effect checker that symbolically
//! evaluates module-level code.
//!
//! Lists, tuples, sets and frozensets are modelled with host-compatible
//! equality, hashing and operator fallback. On top of that, in-place mutation
//! of a value that may be observed elsewhere is rejected instead of applied,
//! and values convert lazily into concrete runtime values through a
//! [`HostObjects`] capability.

#[macro_use]
pub mod macros;

pub mod collections;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod host;
mod iterable;
pub mod list;
pub mod materialize;
pub mod module;
pub mod object;
pub mod scalars;
mod sequence;
pub mod set;
mod setlike;
pub mod tuple;

pub use tracing;

pub use config::ObjectModelOptions;
pub use context::CallerContext;
pub use dispatch::{
    binary_op, call_method, contains, get_item, hash, is_truthy, len, objects_eq, set_item, BinOp,
    OpResult,
};
pub use error::{Error, ErrorKind, Location};
pub use guard::check_external_modification;
pub use host::{HostObjects, HostValue, NativeHost};
pub use materialize::{abstract_value, materialize};
pub use module::{ModuleRef, StrictModule};
pub use object::{ObjRef, SliceBounds, StrictObject, StrictType, TypeKind, TypeRef};

pub type Result<T> = crate::error::Result<T>;
