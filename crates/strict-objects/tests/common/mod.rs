#![allow(dead_code)]

use std::sync::Once;

use strict_objects::{CallerContext, ModuleRef, ObjRef, StrictModule};

/// Routes crate logs to the test harness, filtered by `RUST_LOG`.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let formatter = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_test_writer();
        let _ = tracing_subscriber::registry()
            .with(formatter)
            .with(filter)
            .try_init();
    });
}

pub fn module(name: &str) -> ModuleRef {
    StrictModule::new(name, format!("{}.py", name))
}

pub fn ctx() -> CallerContext {
    init_logging();
    CallerContext::new(module("main")).at(1, 0)
}

pub fn ints(ctx: &CallerContext, values: &[i64]) -> Vec<ObjRef> {
    values.iter().map(|value| ctx.make_int(*value)).collect()
}

pub fn int_values(items: &[ObjRef]) -> Vec<i64> {
    items
        .iter()
        .map(|item| item.as_int().expect("int element"))
        .collect()
}

/// Integer members of any container, in iteration order.
pub fn elements_as_ints(value: &ObjRef) -> Vec<i64> {
    int_values(&value.elements().expect("container"))
}

/// Integer members of a set-like, sorted for order-insensitive comparison.
pub fn sorted_members(value: &ObjRef) -> Vec<i64> {
    let mut members = elements_as_ints(value);
    members.sort_unstable();
    members
}
