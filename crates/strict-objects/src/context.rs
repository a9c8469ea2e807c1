use crate::config::{default_options, ObjectModelOptions};
use crate::error::{Error, Location, Raised};
use crate::module::ModuleRef;
use crate::object::{ObjRef, SliceBounds, TypeRef};
use crate::sequence::make_sequence;
use crate::setlike::{hashed_members, make_set_like};
use crate::{list, scalars, set, tuple};

/// Ambient evaluation context handed to every operation: who is calling
/// (module attribution and the mutation guard), where (error locations), and
/// the object-model options. Also the factory for primitive values.
#[derive(Debug, Clone)]
pub struct CallerContext {
    caller: ModuleRef,
    lineno: u32,
    col: u32,
    options: ObjectModelOptions,
}

impl CallerContext {
    pub fn new(caller: ModuleRef) -> Self {
        Self {
            caller,
            lineno: 0,
            col: 0,
            options: default_options(),
        }
    }

    pub fn at(mut self, lineno: u32, col: u32) -> Self {
        self.lineno = lineno;
        self.col = col;
        self
    }

    pub fn with_options(mut self, options: ObjectModelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn caller(&self) -> &ModuleRef {
        &self.caller
    }

    pub fn options(&self) -> &ObjectModelOptions {
        &self.options
    }

    pub fn location(&self) -> Location {
        Location {
            module: self.caller.name().to_string(),
            filename: self.caller.filename().to_string(),
            lineno: self.lineno,
            col: self.col,
        }
    }

    /// Builds a raised error of the given variant, located at the caller.
    pub fn raise(&self, variant: fn(Raised) -> Error, message: impl Into<String>) -> Error {
        variant(Raised {
            message: message.into(),
            location: self.location(),
        })
    }

    pub fn none(&self) -> ObjRef {
        scalars::none()
    }

    pub fn not_implemented(&self) -> ObjRef {
        scalars::not_implemented()
    }

    pub fn make_bool(&self, value: bool) -> ObjRef {
        scalars::make_bool(value)
    }

    pub fn make_int(&self, value: i64) -> ObjRef {
        scalars::make_int(&self.caller, value)
    }

    /// Lengths and positions come in as `usize`.
    pub fn make_index(&self, value: usize) -> ObjRef {
        self.make_int(i64::try_from(value).unwrap_or(i64::MAX))
    }

    pub fn make_str(&self, value: impl Into<String>) -> ObjRef {
        scalars::make_str(&self.caller, value)
    }

    pub fn make_slice(&self, bounds: SliceBounds) -> ObjRef {
        scalars::make_slice(&self.caller, bounds)
    }

    pub fn make_list(&self, items: Vec<ObjRef>) -> ObjRef {
        list::make_list(&self.caller, items)
    }

    pub fn make_tuple(&self, items: Vec<ObjRef>) -> ObjRef {
        tuple::make_tuple(&self.caller, items)
    }

    /// Deduplicates `items`; unhashable members are a type error.
    pub fn make_set(&self, items: Vec<ObjRef>) -> crate::Result<ObjRef> {
        set::make_set(self, items)
    }

    pub fn make_frozenset(&self, items: Vec<ObjRef>) -> crate::Result<ObjRef> {
        set::make_frozenset(self, items)
    }

    /// Type factory for container types, builtin or derived. Set-like types
    /// deduplicate `items`; scalar types cannot be built from elements.
    pub fn make_instance(&self, ty: &TypeRef, items: Vec<ObjRef>) -> crate::Result<ObjRef> {
        let kind = ty.kind();
        if kind.is_sequence() {
            return Ok(make_sequence(ty, &self.caller, items));
        }
        if kind.is_set_like() {
            let data = hashed_members(self, items)?;
            return Ok(make_set_like(ty, &self.caller, data));
        }
        raise!(self, Type, "cannot build '{}' from elements", ty.name())
    }
}
