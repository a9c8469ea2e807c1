use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};

use crate::dispatch::{Method, MethodTable};
use crate::{list, scalars, set, tuple};

/// Concrete variant tag shared by a type and every instance of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TypeKind {
    #[display("NoneType")]
    NoneType,
    #[display("NotImplementedType")]
    NotImplementedType,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("str")]
    Str,
    #[display("slice")]
    Slice,
    #[display("list")]
    List,
    #[display("tuple")]
    Tuple,
    #[display("set")]
    Set,
    #[display("frozenset")]
    FrozenSet,
}

impl TypeKind {
    pub fn is_sequence(self) -> bool {
        matches!(self, TypeKind::List | TypeKind::Tuple)
    }

    pub fn is_set_like(self) -> bool {
        matches!(self, TypeKind::Set | TypeKind::FrozenSet)
    }

    pub fn is_container(self) -> bool {
        self.is_sequence() || self.is_set_like()
    }
}

/// Type descriptor: display name, variant tag and the dispatch table.
pub struct StrictType {
    name: String,
    kind: TypeKind,
    base: Option<TypeRef>,
    methods: MethodTable,
}

pub type TypeRef = Arc<StrictType>;

impl StrictType {
    fn builtin(kind: TypeKind, register: fn(&mut MethodTable)) -> TypeRef {
        let mut methods = MethodTable::new();
        register(&mut methods);
        Arc::new(Self {
            name: kind.to_string(),
            kind,
            base: None,
            methods,
        })
    }

    /// Derives a user-level subclass of `base`. The subclass shares the base's
    /// variant tag and starts from a copy of its dispatch table, but is a
    /// distinct type for every identity-based comparison.
    pub fn subclass(name: impl Into<String>, base: &TypeRef) -> TypeRef {
        Arc::new(Self {
            name: name.into(),
            kind: base.kind,
            base: Some(base.clone()),
            methods: base.methods.clone(),
        })
    }

    /// Like [`StrictType::subclass`], with extra or overriding entries.
    pub fn subclass_with(
        name: impl Into<String>,
        base: &TypeRef,
        overrides: impl IntoIterator<Item = (&'static str, Method)>,
    ) -> TypeRef {
        let mut methods = base.methods.clone();
        for (name, method) in overrides {
            methods.insert(name, method);
        }
        Arc::new(Self {
            name: name.into(),
            kind: base.kind,
            base: Some(base.clone()),
            methods,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn base(&self) -> Option<&TypeRef> {
        self.base.as_ref()
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn lookup(&self, name: &str) -> Option<Method> {
        self.methods.get(name)
    }

    pub fn is_builtin(&self) -> bool {
        self.base.is_none()
    }
}

impl Debug for StrictType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrictType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Types are singletons per definition, so identity is type equality.
pub fn same_type(lhs: &TypeRef, rhs: &TypeRef) -> bool {
    Arc::ptr_eq(lhs, rhs)
}

struct Builtins {
    none_type: TypeRef,
    not_implemented_type: TypeRef,
    bool_type: TypeRef,
    int_type: TypeRef,
    str_type: TypeRef,
    slice_type: TypeRef,
    list_type: TypeRef,
    tuple_type: TypeRef,
    set_type: TypeRef,
    frozenset_type: TypeRef,
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(|| Builtins {
    none_type: StrictType::builtin(TypeKind::NoneType, scalars::add_none_methods),
    not_implemented_type: StrictType::builtin(TypeKind::NotImplementedType, |_| {}),
    bool_type: StrictType::builtin(TypeKind::Bool, scalars::add_int_methods),
    int_type: StrictType::builtin(TypeKind::Int, scalars::add_int_methods),
    str_type: StrictType::builtin(TypeKind::Str, scalars::add_str_methods),
    slice_type: StrictType::builtin(TypeKind::Slice, |_| {}),
    list_type: StrictType::builtin(TypeKind::List, list::add_list_methods),
    tuple_type: StrictType::builtin(TypeKind::Tuple, tuple::add_tuple_methods),
    set_type: StrictType::builtin(TypeKind::Set, set::add_set_methods),
    frozenset_type: StrictType::builtin(TypeKind::FrozenSet, set::add_frozenset_methods),
});

pub fn none_type() -> TypeRef {
    BUILTINS.none_type.clone()
}

pub fn not_implemented_type() -> TypeRef {
    BUILTINS.not_implemented_type.clone()
}

pub fn bool_type() -> TypeRef {
    BUILTINS.bool_type.clone()
}

pub fn int_type() -> TypeRef {
    BUILTINS.int_type.clone()
}

pub fn str_type() -> TypeRef {
    BUILTINS.str_type.clone()
}

pub fn slice_type() -> TypeRef {
    BUILTINS.slice_type.clone()
}

pub fn list_type() -> TypeRef {
    BUILTINS.list_type.clone()
}

pub fn tuple_type() -> TypeRef {
    BUILTINS.tuple_type.clone()
}

pub fn set_type() -> TypeRef {
    BUILTINS.set_type.clone()
}

pub fn frozenset_type() -> TypeRef {
    BUILTINS.frozenset_type.clone()
}

