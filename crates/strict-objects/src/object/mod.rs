//! Abstract values manipulated by the purity checker.
//!
//! Every value is a reference-counted [`StrictObject`]: a type descriptor, a
//! non-owning handle to the module that created it, an escape flag and a
//! payload. Container payloads hold shared element references, so aliasing
//! across containers is normal and construction never deep-copies.

mod types;

pub use types::*;

use std::cell::{Cell, Ref, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::{Rc, Weak};

use itertools::Itertools;
use once_cell::unsync::OnceCell;

use crate::collections::HashedSet;
use crate::host::HostValue;
use crate::module::{ModuleRef, WeakModuleRef};

pub type ObjRef = Rc<StrictObject>;

const NONE_HASH: u64 = 0xfca8_6420;

/// Bounds of a slice literal. Slices only exist so that indexing with one can
/// be reported as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceBounds {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

/// Payload of an immutable container with its memoized derived values.
pub(crate) struct Frozen<T> {
    pub(crate) data: T,
    pub(crate) materialized: OnceCell<HostValue>,
    pub(crate) display: OnceCell<String>,
}

impl<T> Frozen<T> {
    pub(crate) fn new(data: T) -> Self {
        Self {
            data,
            materialized: OnceCell::new(),
            display: OnceCell::new(),
        }
    }
}

pub(crate) enum Payload {
    None,
    NotImplemented,
    Bool(bool),
    Int(i64),
    Str(String),
    Slice(SliceBounds),
    List(RefCell<Vec<ObjRef>>),
    Tuple(Frozen<Vec<ObjRef>>),
    Set(RefCell<HashedSet>),
    FrozenSet(Frozen<HashedSet>),
}

pub struct StrictObject {
    ty: TypeRef,
    creator: WeakModuleRef,
    escaped: Cell<bool>,
    payload: Payload,
}

/// Read access to the elements of a list or tuple.
pub enum SeqView<'a> {
    Mutable(Ref<'a, Vec<ObjRef>>),
    Frozen(&'a [ObjRef]),
}

impl Deref for SeqView<'_> {
    type Target = [ObjRef];

    fn deref(&self) -> &[ObjRef] {
        match self {
            SeqView::Mutable(data) => data,
            SeqView::Frozen(data) => data,
        }
    }
}

/// Read access to the members of a set or frozenset.
pub enum SetView<'a> {
    Mutable(Ref<'a, HashedSet>),
    Frozen(&'a HashedSet),
}

impl Deref for SetView<'_> {
    type Target = HashedSet;

    fn deref(&self) -> &HashedSet {
        match self {
            SetView::Mutable(data) => data,
            SetView::Frozen(data) => data,
        }
    }
}

impl StrictObject {
    pub(crate) fn new(ty: TypeRef, creator: WeakModuleRef, payload: Payload) -> ObjRef {
        debug_assert!(
            payload_matches(&payload, ty.kind()),
            "payload does not match type {}",
            ty.name()
        );
        Rc::new(Self {
            ty,
            creator,
            escaped: Cell::new(false),
            payload,
        })
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn kind(&self) -> TypeKind {
        self.ty.kind()
    }

    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    pub fn has_type(&self, ty: &TypeRef) -> bool {
        same_type(&self.ty, ty)
    }

    pub(crate) fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The module that created this value, if it is still alive.
    pub fn creator(&self) -> Option<ModuleRef> {
        self.creator.upgrade()
    }

    pub fn is_created_by(&self, module: &ModuleRef) -> bool {
        Weak::ptr_eq(&self.creator, &Rc::downgrade(module))
    }

    pub fn is_escaped(&self) -> bool {
        self.escaped.get()
    }

    /// Flags this value, and everything reachable from it, as visible outside
    /// the current analysis scope. Escape is permanent.
    pub fn mark_escaped(&self) {
        if self.escaped.replace(true) {
            return;
        }
        if let Some(items) = self.sequence() {
            items.iter().for_each(|item| item.mark_escaped());
        } else if let Some(items) = self.set_like() {
            items.iter().for_each(|item| item.mark_escaped());
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.payload, Payload::None)
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self.payload, Payload::NotImplemented)
    }

    /// Integer view; booleans count as integers.
    pub fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(value) => Some(value),
            Payload::Bool(value) => Some(value as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<SliceBounds> {
        match self.payload {
            Payload::Slice(bounds) => Some(bounds),
            _ => None,
        }
    }

    pub fn sequence(&self) -> Option<SeqView<'_>> {
        match &self.payload {
            Payload::List(data) => Some(SeqView::Mutable(data.borrow())),
            Payload::Tuple(frozen) => Some(SeqView::Frozen(&frozen.data)),
            _ => None,
        }
    }

    pub fn set_like(&self) -> Option<SetView<'_>> {
        match &self.payload {
            Payload::Set(data) => Some(SetView::Mutable(data.borrow())),
            Payload::FrozenSet(frozen) => Some(SetView::Frozen(&frozen.data)),
            _ => None,
        }
    }

    /// Snapshot of the elements of any container, in iteration order.
    pub fn elements(&self) -> Option<Vec<ObjRef>> {
        if let Some(items) = self.sequence() {
            return Some(items.to_vec());
        }
        self.set_like().map(|items| items.iter().cloned().collect())
    }

    pub fn is_hashable(&self) -> bool {
        match &self.payload {
            Payload::None
            | Payload::NotImplemented
            | Payload::Bool(_)
            | Payload::Int(_)
            | Payload::Str(_)
            | Payload::FrozenSet(_) => true,
            Payload::Tuple(frozen) => frozen.data.iter().all(|item| item.is_hashable()),
            Payload::Slice(_) | Payload::List(_) | Payload::Set(_) => false,
        }
    }

    /// Domain hash. Only meaningful for hashable values; equal values hash
    /// identically.
    pub fn domain_hash(&self) -> u64 {
        match &self.payload {
            Payload::Int(value) => *value as u64,
            Payload::Bool(value) => *value as u64,
            Payload::None => NONE_HASH,
            Payload::Str(value) => {
                let mut hasher = DefaultHasher::new();
                value.hash(&mut hasher);
                hasher.finish()
            }
            Payload::Tuple(frozen) => tuple_hash(&frozen.data),
            Payload::FrozenSet(frozen) => frozenset_hash(&frozen.data),
            Payload::NotImplemented | Payload::Slice(_) | Payload::List(_) | Payload::Set(_) => {
                self as *const StrictObject as u64
            }
        }
    }

    /// Domain equality, independent of dispatch. Containers only compare equal
    /// to containers of the exact same type.
    pub fn domain_eq(&self, other: &StrictObject) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if let (Some(lhs), Some(rhs)) = (self.as_int(), other.as_int()) {
            return lhs == rhs;
        }
        match (&self.payload, &other.payload) {
            (Payload::None, Payload::None) => true,
            (Payload::NotImplemented, Payload::NotImplemented) => true,
            (Payload::Str(lhs), Payload::Str(rhs)) => lhs == rhs,
            (Payload::Slice(lhs), Payload::Slice(rhs)) => lhs == rhs,
            (Payload::List(_) | Payload::Tuple(_), Payload::List(_) | Payload::Tuple(_)) => {
                if !self.has_type(other.ty()) {
                    return false;
                }
                match (self.sequence(), other.sequence()) {
                    (Some(lhs), Some(rhs)) => symmetric_elementwise_eq(&lhs, &rhs),
                    _ => false,
                }
            }
            (
                Payload::Set(_) | Payload::FrozenSet(_),
                Payload::Set(_) | Payload::FrozenSet(_),
            ) => {
                if !self.has_type(other.ty()) {
                    return false;
                }
                match (self.set_like(), other.set_like()) {
                    (Some(lhs), Some(rhs)) => {
                        lhs.len() == rhs.len() && lhs.iter().all(|item| rhs.contains(item))
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Host-style repr used in diagnostics.
    pub fn display_name(&self) -> String {
        match &self.payload {
            Payload::None => "None".to_string(),
            Payload::NotImplemented => "NotImplemented".to_string(),
            Payload::Bool(true) => "True".to_string(),
            Payload::Bool(false) => "False".to_string(),
            Payload::Int(value) => value.to_string(),
            Payload::Str(value) => format!("'{}'", value),
            Payload::Slice(bounds) => format!(
                "slice({}, {}, {})",
                optional_bound(bounds.start),
                optional_bound(bounds.stop),
                optional_bound(bounds.step)
            ),
            Payload::List(data) => format!("[{}]", join_names(data.borrow().iter())),
            Payload::Tuple(frozen) => frozen
                .display
                .get_or_init(|| match frozen.data.as_slice() {
                    [single] => format!("({},)", single.display_name()),
                    items => format!("({})", join_names(items.iter())),
                })
                .clone(),
            Payload::Set(data) => {
                let data = data.borrow();
                if data.is_empty() {
                    return "set()".to_string();
                }
                format!("{{{}}}", join_names(data.iter()))
            }
            Payload::FrozenSet(frozen) => frozen
                .display
                .get_or_init(|| {
                    if frozen.data.is_empty() {
                        return "frozenset()".to_string();
                    }
                    format!("frozenset({{{}}})", join_names(frozen.data.iter()))
                })
                .clone(),
        }
    }
}

fn payload_matches(payload: &Payload, kind: TypeKind) -> bool {
    matches!(
        (payload, kind),
        (Payload::None, TypeKind::NoneType)
            | (Payload::NotImplemented, TypeKind::NotImplementedType)
            | (Payload::Bool(_), TypeKind::Bool)
            | (Payload::Int(_), TypeKind::Int)
            | (Payload::Str(_), TypeKind::Str)
            | (Payload::Slice(_), TypeKind::Slice)
            | (Payload::List(_), TypeKind::List)
            | (Payload::Tuple(_), TypeKind::Tuple)
            | (Payload::Set(_), TypeKind::Set)
            | (Payload::FrozenSet(_), TypeKind::FrozenSet)
    )
}

fn symmetric_elementwise_eq(lhs: &[ObjRef], rhs: &[ObjRef]) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs)
            .all(|(l, r)| l.domain_eq(r) || r.domain_eq(l))
}

/// boost::hash_combine over the elements, seeded with the length.
pub(crate) fn tuple_hash(items: &[ObjRef]) -> u64 {
    let mut h = items.len() as u64;
    for item in items {
        h ^= item
            .domain_hash()
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(h << 6)
            .wrapping_add(h >> 2);
    }
    h
}

/// Order-independent: members are mixed individually and folded with XOR.
fn frozenset_hash(items: &HashedSet) -> u64 {
    let folded = items.iter().fold(0u64, |acc, item| {
        let h = item.domain_hash();
        acc ^ (h ^ (h << 16) ^ 0x5b4d_9ed3).wrapping_mul(0x0d99_3c2d)
    });
    folded ^ (items.len() as u64).wrapping_add(1).wrapping_mul(0x72e6_c1f5)
}

fn optional_bound(bound: Option<i64>) -> String {
    bound.map_or_else(|| "None".to_string(), |value| value.to_string())
}

fn join_names<'a>(items: impl Iterator<Item = &'a ObjRef>) -> String {
    items.map(|item| item.display_name()).join(", ")
}

impl Display for StrictObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl Debug for StrictObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrictObject")
            .field("type", &self.type_name())
            .field("value", &self.display_name())
            .field("escaped", &self.is_escaped())
            .finish()
    }
}
