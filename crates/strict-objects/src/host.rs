//! Concrete runtime values and the capability that builds them.
//!
//! The checker never allocates host objects itself; it asks a [`HostObjects`]
//! implementation, which may refuse (allocation failure, unhashable member).
//! [`NativeHost`] is the in-process implementation used by default.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use eyre::bail;
use itertools::Itertools;

#[derive(Clone)]
pub enum HostValue {
    None,
    NotImplemented,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<HostValue>>>),
    Tuple(Rc<[HostValue]>),
    Set(Rc<RefCell<Vec<HostValue>>>),
    FrozenSet(Rc<[HostValue]>),
}

impl HostValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::None => "NoneType",
            HostValue::NotImplemented => "NotImplementedType",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Str(_) => "str",
            HostValue::List(_) => "list",
            HostValue::Tuple(_) => "tuple",
            HostValue::Set(_) => "set",
            HostValue::FrozenSet(_) => "frozenset",
        }
    }

    /// Host identity: shared allocations compare by address, immediates by value.
    pub fn is(&self, other: &HostValue) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::NotImplemented, HostValue::NotImplemented) => true,
            (HostValue::Bool(l), HostValue::Bool(r)) => l == r,
            (HostValue::Int(l), HostValue::Int(r)) => l == r,
            (HostValue::Str(l), HostValue::Str(r)) => Rc::ptr_eq(l, r),
            (HostValue::List(l), HostValue::List(r)) => Rc::ptr_eq(l, r),
            (HostValue::Tuple(l), HostValue::Tuple(r)) => Rc::ptr_eq(l, r),
            (HostValue::Set(l), HostValue::Set(r)) => Rc::ptr_eq(l, r),
            (HostValue::FrozenSet(l), HostValue::FrozenSet(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(value) => Some(*value),
            HostValue::Bool(value) => Some(*value as i64),
            _ => None,
        }
    }

    /// Snapshot of the members of a container, in storage order.
    pub fn items(&self) -> Option<Vec<HostValue>> {
        match self {
            HostValue::List(items) | HostValue::Set(items) => Some(items.borrow().clone()),
            HostValue::Tuple(items) | HostValue::FrozenSet(items) => Some(items.to_vec()),
            _ => None,
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            HostValue::List(items) | HostValue::Set(items) => Some(items.borrow().len()),
            HostValue::Tuple(items) | HostValue::FrozenSet(items) => Some(items.len()),
            HostValue::Str(text) => Some(text.chars().count()),
            _ => None,
        }
    }

    pub fn is_hashable(&self) -> bool {
        match self {
            HostValue::List(_) | HostValue::Set(_) => false,
            HostValue::Tuple(items) => items.iter().all(HostValue::is_hashable),
            _ => true,
        }
    }

    pub fn host_hash(&self) -> Option<u64> {
        let hash = match self {
            HostValue::None => 0xfca8_6420,
            HostValue::NotImplemented => 0x4e49_4d50,
            HostValue::Bool(value) => *value as u64,
            HostValue::Int(value) => *value as u64,
            HostValue::Str(text) => {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                hasher.finish()
            }
            HostValue::Tuple(items) => {
                let mut hasher = DefaultHasher::new();
                for item in items.iter() {
                    item.host_hash()?.hash(&mut hasher);
                }
                hasher.finish()
            }
            HostValue::FrozenSet(items) => {
                let mut acc = items.len() as u64;
                for item in items.iter() {
                    acc ^= item.host_hash()?.wrapping_mul(0x9e37_79b9_7f4a_7c15);
                }
                acc
            }
            HostValue::List(_) | HostValue::Set(_) => return None,
        };
        Some(hash)
    }

    fn set_members_eq(lhs: &[HostValue], rhs: &[HostValue]) -> bool {
        lhs.len() == rhs.len() && lhs.iter().all(|item| rhs.contains(item))
    }
}

/// Host equality: numbers across int/bool, lists and tuples element-wise,
/// sets and frozensets by membership.
impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(l), Some(r)) = (self.as_int(), other.as_int()) {
            return l == r;
        }
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::NotImplemented, HostValue::NotImplemented) => true,
            (HostValue::Str(l), HostValue::Str(r)) => l == r,
            (HostValue::List(l), HostValue::List(r)) => *l.borrow() == *r.borrow(),
            (HostValue::Tuple(l), HostValue::Tuple(r)) => l == r,
            (
                HostValue::Set(_) | HostValue::FrozenSet(_),
                HostValue::Set(_) | HostValue::FrozenSet(_),
            ) => match (self.items(), other.items()) {
                (Some(l), Some(r)) => HostValue::set_members_eq(&l, &r),
                _ => false,
            },
            _ => false,
        }
    }
}

impl Debug for HostValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HostValue::None => f.write_str("None"),
            HostValue::NotImplemented => f.write_str("NotImplemented"),
            HostValue::Bool(true) => f.write_str("True"),
            HostValue::Bool(false) => f.write_str("False"),
            HostValue::Int(value) => write!(f, "{}", value),
            HostValue::Str(text) => write!(f, "'{}'", text),
            HostValue::List(items) => write!(f, "[{:?}]", items.borrow().iter().format(", ")),
            HostValue::Tuple(items) if items.len() == 1 => write!(f, "({:?},)", items[0]),
            HostValue::Tuple(items) => write!(f, "({:?})", items.iter().format(", ")),
            HostValue::Set(items) if items.borrow().is_empty() => f.write_str("set()"),
            HostValue::Set(items) => write!(f, "{{{:?}}}", items.borrow().iter().format(", ")),
            HostValue::FrozenSet(items) if items.is_empty() => f.write_str("frozenset()"),
            HostValue::FrozenSet(items) => {
                write!(f, "frozenset({{{:?}}})", items.iter().format(", "))
            }
        }
    }
}

/// Deduplicates `items` by host equality, rejecting unhashable members.
fn host_members(items: Vec<HostValue>) -> eyre::Result<Vec<HostValue>> {
    let mut members: Vec<(u64, HostValue)> = Vec::with_capacity(items.len());
    for item in items {
        let Some(hash) = item.host_hash() else {
            bail!("unhashable type: '{}'", item.type_name());
        };
        if !members.iter().any(|(h, member)| *h == hash && *member == item) {
            members.push((hash, item));
        }
    }
    Ok(members.into_iter().map(|(_, member)| member).collect())
}

/// Constructors for concrete runtime values, fed already-materialized members.
pub trait HostObjects {
    fn none(&self) -> eyre::Result<HostValue> {
        Ok(HostValue::None)
    }

    fn not_implemented(&self) -> eyre::Result<HostValue> {
        Ok(HostValue::NotImplemented)
    }

    fn bool(&self, value: bool) -> eyre::Result<HostValue> {
        Ok(HostValue::Bool(value))
    }

    fn int(&self, value: i64) -> eyre::Result<HostValue> {
        Ok(HostValue::Int(value))
    }

    fn str(&self, value: &str) -> eyre::Result<HostValue> {
        Ok(HostValue::Str(Rc::from(value)))
    }

    fn list(&self, items: Vec<HostValue>) -> eyre::Result<HostValue> {
        Ok(HostValue::List(Rc::new(RefCell::new(items))))
    }

    fn tuple(&self, items: Vec<HostValue>) -> eyre::Result<HostValue> {
        Ok(HostValue::Tuple(Rc::from(items)))
    }

    fn set(&self, items: Vec<HostValue>) -> eyre::Result<HostValue> {
        let members = host_members(items)?;
        Ok(HostValue::Set(Rc::new(RefCell::new(members))))
    }

    fn frozenset(&self, items: Vec<HostValue>) -> eyre::Result<HostValue> {
        let members = host_members(items)?;
        Ok(HostValue::FrozenSet(Rc::from(members)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeHost;

impl HostObjects for NativeHost {}
