mod common;

use common::{ctx, elements_as_ints, ints};
use eyre::bail;
use pretty_assertions::assert_eq;
use strict_objects::{
    abstract_value, call_method, materialize, objects_eq, ErrorKind, HostObjects, HostValue,
    NativeHost, SliceBounds,
};

/// Host that cannot allocate tuples.
struct TupleStarvedHost;

impl HostObjects for TupleStarvedHost {
    fn tuple(&self, _items: Vec<HostValue>) -> eyre::Result<HostValue> {
        bail!("out of memory")
    }
}

#[test]
fn tuple_round_trip_is_structurally_equal() {
    let ctx = ctx();
    let tuple = ctx.make_tuple(ints(&ctx, &[1, 2, 3]));

    let host = materialize(&tuple, &NativeHost).unwrap();
    assert_eq!(format!("{:?}", host), "(1, 2, 3)");

    let back = abstract_value(&ctx, &host).unwrap();
    assert_eq!(back.type_name(), "tuple");
    assert_eq!(elements_as_ints(&back), vec![1, 2, 3]);
    assert!(objects_eq(&ctx, &tuple, &back).unwrap());
    assert!(back.is_created_by(ctx.caller()));
}

#[test]
fn immutable_containers_materialize_once() {
    let ctx = ctx();
    let frozen = ctx.make_frozenset(ints(&ctx, &[1, 2])).unwrap();
    let first = materialize(&frozen, &NativeHost).unwrap();
    let second = materialize(&frozen, &NativeHost).unwrap();
    assert!(first.is(&second));

    let tuple = ctx.make_tuple(vec![frozen.clone()]);
    let first = materialize(&tuple, &NativeHost).unwrap();
    let second = materialize(&tuple, &TupleStarvedHost).unwrap();
    assert!(first.is(&second));
}

#[test]
fn mutable_containers_rematerialize_every_time() {
    let ctx = ctx();
    let set = ctx.make_set(ints(&ctx, &[1, 2])).unwrap();
    let before = materialize(&set, &NativeHost).unwrap();

    call_method(&ctx, &set, "add", &[ctx.make_int(3)]).unwrap();
    let after = materialize(&set, &NativeHost).unwrap();

    assert!(!before.is(&after));
    assert_eq!(before.len(), Some(2));
    assert_eq!(after.len(), Some(3));
    assert!(after.items().unwrap().contains(&HostValue::Int(3)));

    let list = ctx.make_list(ints(&ctx, &[1]));
    let first = materialize(&list, &NativeHost).unwrap();
    let second = materialize(&list, &NativeHost).unwrap();
    assert_eq!(first, second);
    assert!(!first.is(&second));
}

#[test]
fn nested_failure_propagates_without_caching() {
    let ctx = ctx();
    let inner = ctx.make_tuple(ints(&ctx, &[1]));
    let list = ctx.make_list(vec![ctx.make_int(0), inner.clone()]);

    let err = materialize(&list, &TupleStarvedHost).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Materialization);
    assert_eq!(err.to_string(), "cannot materialize tuple: out of memory");

    let host = materialize(&list, &NativeHost).unwrap();
    assert_eq!(format!("{:?}", host), "[0, (1,)]");
}

#[test]
fn slices_have_no_concrete_value() {
    let ctx = ctx();
    let slice = ctx.make_slice(SliceBounds::default());
    let err = materialize(&slice, &NativeHost).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Materialization);
    assert_eq!(
        err.to_string(),
        "cannot materialize slice: slice objects have no concrete counterpart"
    );
}

#[test]
fn scalars_and_sentinel_materialize_to_host_singletons() {
    let ctx = ctx();
    let values = ctx.make_tuple(vec![
        ctx.none(),
        ctx.not_implemented(),
        ctx.make_bool(false),
        ctx.make_str("x"),
    ]);
    let host = materialize(&values, &NativeHost).unwrap();
    assert_eq!(format!("{:?}", host), "(None, NotImplemented, False, 'x')");
}

#[test]
fn abstraction_builds_fresh_values_for_the_caller() {
    let ctx = ctx();
    let host = NativeHost
        .set(vec![
            NativeHost.int(1).unwrap(),
            NativeHost
                .frozenset(vec![HostValue::Int(2), HostValue::Int(2)])
                .unwrap(),
        ])
        .unwrap();

    let set = abstract_value(&ctx, &host).unwrap();
    assert_eq!(set.type_name(), "set");
    assert_eq!(set.to_string(), "{1, frozenset({2})}");
    assert!(!set.is_escaped());

    call_method(&ctx, &set, "add", &[ctx.make_int(5)]).unwrap();
    assert_eq!(host.len(), Some(2));
}
