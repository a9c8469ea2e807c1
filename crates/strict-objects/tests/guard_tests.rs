mod common;

use common::{ctx, elements_as_ints, ints, module};
use pretty_assertions::assert_eq;
use strict_objects::{
    call_method, check_external_modification, len, set_item, CallerContext, ErrorKind,
};

#[test]
fn append_to_escaped_list_is_rejected() {
    let ctx = ctx();
    let list = ctx.make_list(ints(&ctx, &[1, 2]));
    list.mark_escaped();

    let err = call_method(&ctx, &list, "append", &[ctx.make_int(3)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    assert_eq!(
        err.message(),
        "list object may be observed outside main and cannot be modified"
    );
    assert_eq!(len(&ctx, &list).unwrap(), 2);
}

#[test]
fn every_mutation_path_is_guarded() {
    let ctx = ctx();
    let list = ctx.make_list(ints(&ctx, &[1]));
    let set = ctx.make_set(ints(&ctx, &[1])).unwrap();
    list.mark_escaped();
    set.mark_escaped();

    let err = set_item(&ctx, &list, &ctx.make_int(0), &ctx.make_int(5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    assert_eq!(elements_as_ints(&list), vec![1]);

    let err = call_method(&ctx, &set, "add", &[ctx.make_int(2)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    assert_eq!(len(&ctx, &set).unwrap(), 1);
}

#[test]
fn escape_reaches_nested_containers() {
    let ctx = ctx();
    let inner = ctx.make_list(ints(&ctx, &[1]));
    let outer = ctx.make_tuple(vec![inner.clone()]);
    outer.mark_escaped();

    assert!(inner.is_escaped());
    let err = call_method(&ctx, &inner, "append", &[ctx.none()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
}

#[test]
fn copy_of_escaped_list_is_mutable() {
    let ctx = ctx();
    let list = ctx.make_list(ints(&ctx, &[1]));
    list.mark_escaped();

    let copy = call_method(&ctx, &list, "copy", &[]).unwrap();
    assert!(!copy.is_escaped());
    call_method(&ctx, &copy, "append", &[ctx.make_int(2)]).unwrap();
    assert_eq!(elements_as_ints(&copy), vec![1, 2]);
    assert_eq!(elements_as_ints(&list), vec![1]);
}

#[test]
fn mutation_from_another_module_is_rejected() {
    let owner = CallerContext::new(module("owner"));
    let intruder = CallerContext::new(module("intruder"));
    let list = owner.make_list(ints(&owner, &[1]));

    let err = call_method(&intruder, &list, "append", &[intruder.make_int(2)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    assert_eq!(
        err.message(),
        "list object created in module owner cannot be modified from module intruder"
    );
    assert_eq!(len(&owner, &list).unwrap(), 1);

    call_method(&owner, &list, "append", &[owner.make_int(2)]).unwrap();
    assert_eq!(len(&owner, &list).unwrap(), 2);
}

#[test]
fn dropped_creator_counts_as_foreign() {
    let survivor = ctx();
    let list = {
        let transient = CallerContext::new(module("transient"));
        transient.make_list(vec![])
    };

    assert!(list.creator().is_none());
    let err = check_external_modification(&list, &survivor).unwrap_err();
    assert_eq!(
        err.message(),
        "list object created in module <unknown> cannot be modified from module main"
    );
}

#[test]
fn rejection_carries_the_caller_location() {
    let ctx = CallerContext::new(module("pkg")).at(12, 4);
    let list = ctx.make_list(vec![]);
    list.mark_escaped();

    let err = check_external_modification(&list, &ctx).unwrap_err();
    let raised = err.raised_payload().unwrap();
    assert_eq!(raised.location.to_string(), "pkg (pkg.py:12:4)");
    assert_eq!(
        err.to_string(),
        "mutation rejected: list object may be observed outside pkg and cannot be modified at pkg (pkg.py:12:4)"
    );
}
