//! Shared collection abstractions used by the set-like containers.
//!
//! `HashedSet` keys its members by the domain hash and domain equality of
//! abstract values instead of Rust's `Hash`/`Eq`, and keeps insertion order so
//! display names and materialization are deterministic.

use std::hash::{Hash, Hasher};

use indexmap::IndexSet;

use crate::object::ObjRef;

/// Set key with domain semantics. Only hashable values may be wrapped.
#[derive(Clone)]
struct Member(ObjRef);

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.domain_hash());
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.0.domain_eq(&other.0)
    }
}

impl Eq for Member {}

#[derive(Clone, Default)]
pub struct HashedSet {
    members: IndexSet<Member>,
}

impl HashedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: IndexSet::with_capacity(capacity),
        }
    }

    /// Callers must only pass hashable values.
    pub fn contains(&self, item: &ObjRef) -> bool {
        debug_assert!(item.is_hashable());
        self.members.contains(&Member(item.clone()))
    }

    /// Inserts `item` unless an equal member is already present. The first
    /// inserted member keeps its identity. Returns whether `item` was added.
    pub fn insert(&mut self, item: ObjRef) -> bool {
        debug_assert!(item.is_hashable());
        self.members.insert(Member(item))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter(self.members.iter())
    }
}

/// Members of a [`HashedSet`] in insertion order.
pub struct Iter<'a>(indexmap::set::Iter<'a, Member>);

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ObjRef;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|member| &member.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HashedSet {
    type Item = &'a ObjRef;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ObjRef> for HashedSet {
    fn from_iter<I: IntoIterator<Item = ObjRef>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(Member).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalars::{make_int, make_str};
    use crate::StrictModule;
    use std::rc::Rc;

    #[test]
    fn first_inserted_member_wins() {
        let module = StrictModule::new("m", "m.py");
        let first = make_int(&module, 7);
        let second = make_int(&module, 7);
        let mut set = HashedSet::new();
        assert!(set.insert(first.clone()));
        assert!(!set.insert(second.clone()));
        assert_eq!(set.len(), 1);
        assert!(Rc::ptr_eq(&set.iter().next().cloned().unwrap(), &first));
        assert!(set.contains(&second));
    }

    #[test]
    fn keeps_insertion_order() {
        let module = StrictModule::new("m", "m.py");
        let set: HashedSet = ["b", "a", "c", "a"]
            .into_iter()
            .map(|s| make_str(&module, s))
            .collect();
        let names: Vec<_> = set
            .iter()
            .map(|item| item.as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn lookup_uses_domain_hash_and_equality() {
        let module = StrictModule::new("m", "m.py");
        let pair = |a, b| {
            crate::tuple::make_tuple(&module, vec![make_int(&module, a), make_int(&module, b)])
        };
        let set: HashedSet = [make_int(&module, 1), pair(2, 3)].into_iter().collect();

        assert!(set.contains(&crate::scalars::make_bool(true)));
        assert!(set.contains(&pair(2, 3)));
        assert!(!set.contains(&pair(3, 2)));
        assert_eq!(set.iter().len(), 2);
    }
}
