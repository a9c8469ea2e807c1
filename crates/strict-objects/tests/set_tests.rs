mod common;

use std::rc::Rc;

use common::{ctx, ints, sorted_members};
use pretty_assertions::assert_eq;
use strict_objects::object::set_type;
use strict_objects::{
    binary_op, call_method, contains, hash, len, objects_eq, BinOp, CallerContext, ErrorKind,
    ObjRef, StrictType,
};

fn set_of(ctx: &CallerContext, values: &[i64]) -> ObjRef {
    ctx.make_set(ints(ctx, values)).unwrap()
}

fn frozenset_of(ctx: &CallerContext, values: &[i64]) -> ObjRef {
    ctx.make_frozenset(ints(ctx, values)).unwrap()
}

#[test]
fn construction_deduplicates_keeping_first_member() {
    let ctx = ctx();
    let first = ctx.make_int(1);
    let set = ctx
        .make_set(vec![first.clone(), ctx.make_bool(true), ctx.make_int(2)])
        .unwrap();

    assert_eq!(len(&ctx, &set).unwrap(), 2);
    let members = set.elements().unwrap();
    assert!(Rc::ptr_eq(&members[0], &first));
    assert_eq!(set.to_string(), "{1, 2}");
}

#[test]
fn intersection_and_symmetric_difference() {
    let ctx = ctx();
    let a = set_of(&ctx, &[1, 2]);
    let b = set_of(&ctx, &[2, 3]);

    let both = binary_op(&ctx, BinOp::And, &a, &b).unwrap();
    assert_eq!(sorted_members(&both), vec![2]);

    let either = binary_op(&ctx, BinOp::Xor, &a, &b).unwrap();
    assert_eq!(sorted_members(&either), vec![1, 3]);

    let union = binary_op(&ctx, BinOp::Or, &a, &b).unwrap();
    assert_eq!(sorted_members(&union), vec![1, 2, 3]);
}

#[test]
fn set_algebra_membership_laws() {
    let ctx = ctx();
    let a = set_of(&ctx, &[1, 2, 3, 4]);
    let b = set_of(&ctx, &[3, 4, 5]);

    let and = binary_op(&ctx, BinOp::And, &a, &b).unwrap();
    let or = binary_op(&ctx, BinOp::Or, &a, &b).unwrap();
    let xor = binary_op(&ctx, BinOp::Xor, &a, &b).unwrap();

    for item in and.elements().unwrap() {
        assert!(contains(&ctx, &a, &item).unwrap());
        assert!(contains(&ctx, &b, &item).unwrap());
    }
    for item in a.elements().unwrap().iter().chain(&b.elements().unwrap()) {
        assert!(contains(&ctx, &or, item).unwrap());
    }
    assert_eq!(len(&ctx, &or).unwrap(), 5);

    let mut expected: Vec<i64> = sorted_members(&or)
        .into_iter()
        .filter(|value| !sorted_members(&and).contains(value))
        .collect();
    expected.sort_unstable();
    assert_eq!(sorted_members(&xor), expected);
}

#[test]
fn results_take_the_left_operand_variant() {
    let ctx = ctx();
    let set = set_of(&ctx, &[1, 2]);
    let frozen = frozenset_of(&ctx, &[2, 3]);

    assert_eq!(
        binary_op(&ctx, BinOp::And, &frozen, &set).unwrap().type_name(),
        "frozenset"
    );
    assert_eq!(
        binary_op(&ctx, BinOp::Or, &set, &frozen).unwrap().type_name(),
        "set"
    );
    assert_eq!(
        binary_op(&ctx, BinOp::Xor, &frozen, &set).unwrap().type_name(),
        "frozenset"
    );
}

#[test]
fn set_algebra_with_non_set_is_a_type_error() {
    let ctx = ctx();
    let set = set_of(&ctx, &[1]);
    let list = ctx.make_list(ints(&ctx, &[1]));

    let err = binary_op(&ctx, BinOp::And, &set, &list).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(
        err.message(),
        "unsupported operand type(s) for &: 'set' and 'list'"
    );
}

#[test]
fn add_is_a_no_op_for_equal_members() {
    let ctx = ctx();
    let set = set_of(&ctx, &[1]);
    let original = set.elements().unwrap()[0].clone();

    call_method(&ctx, &set, "add", &[ctx.make_bool(true)]).unwrap();
    call_method(&ctx, &set, "add", &[ctx.make_int(1)]).unwrap();
    assert_eq!(len(&ctx, &set).unwrap(), 1);
    assert!(Rc::ptr_eq(&set.elements().unwrap()[0], &original));

    call_method(&ctx, &set, "add", &[ctx.make_int(3)]).unwrap();
    assert_eq!(sorted_members(&set), vec![1, 3]);
}

#[test]
fn unhashable_members_are_type_errors() {
    let ctx = ctx();
    let list = ctx.make_list(vec![]);

    let err = ctx.make_frozenset(vec![list.clone()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.message(), "unhashable type: 'list'");

    let set = set_of(&ctx, &[1]);
    let err = call_method(&ctx, &set, "add", &[list.clone()]).unwrap_err();
    assert_eq!(err.message(), "unhashable type: 'list'");
    assert_eq!(len(&ctx, &set).unwrap(), 1);

    let err = contains(&ctx, &set, &set_of(&ctx, &[])).unwrap_err();
    assert_eq!(err.message(), "unhashable type: 'set'");
}

#[test]
fn equality_is_by_membership_within_one_variant() {
    let ctx = ctx();
    let a = set_of(&ctx, &[1, 2]);
    let b = set_of(&ctx, &[2, 1]);
    let frozen = frozenset_of(&ctx, &[1, 2]);

    assert!(objects_eq(&ctx, &a, &b).unwrap());
    assert!(!objects_eq(&ctx, &a, &frozen).unwrap());
    assert!(!objects_eq(&ctx, &a, &set_of(&ctx, &[1, 2, 3])).unwrap());
}

#[test]
fn frozenset_hash_ignores_insertion_order() {
    let ctx = ctx();
    let forward = frozenset_of(&ctx, &[1, 2, 3]);
    let backward = frozenset_of(&ctx, &[3, 2, 1]);

    assert_eq!(hash(&ctx, &forward).unwrap(), hash(&ctx, &backward).unwrap());
    assert!(objects_eq(&ctx, &forward, &backward).unwrap());

    let nested = ctx.make_set(vec![forward.clone(), backward.clone()]).unwrap();
    assert_eq!(len(&ctx, &nested).unwrap(), 1);
    assert!(contains(&ctx, &nested, &frozenset_of(&ctx, &[2, 1, 3])).unwrap());
}

#[test]
fn frozenset_has_no_mutators() {
    let ctx = ctx();
    let frozen = frozenset_of(&ctx, &[1]);
    let err = call_method(&ctx, &frozen, "add", &[ctx.make_int(2)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Attribute);
    assert_eq!(err.message(), "'frozenset' object has no attribute 'add'");
}

#[test]
fn subclass_equality_and_algebra_keep_identity() {
    let ctx = ctx();
    let my_set = StrictType::subclass("MySet", &set_type());
    let derived = ctx.make_instance(&my_set, ints(&ctx, &[1, 1, 2])).unwrap();
    let base = set_of(&ctx, &[1, 2]);

    assert_eq!(len(&ctx, &derived).unwrap(), 2);
    assert!(!objects_eq(&ctx, &derived, &base).unwrap());

    let union = binary_op(&ctx, BinOp::Or, &derived, &base).unwrap();
    assert!(union.has_type(&my_set));
}

#[test]
fn display_follows_host_repr() {
    let ctx = ctx();
    assert_eq!(set_of(&ctx, &[]).to_string(), "set()");
    assert_eq!(set_of(&ctx, &[1, 2]).to_string(), "{1, 2}");
    assert_eq!(frozenset_of(&ctx, &[]).to_string(), "frozenset()");
    assert_eq!(frozenset_of(&ctx, &[1, 2]).to_string(), "frozenset({1, 2})");
}
