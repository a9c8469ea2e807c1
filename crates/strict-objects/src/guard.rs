use crate::context::CallerContext;
use crate::error::Result;
use crate::object::ObjRef;

/// Precondition of every in-place structural change.
///
/// A value may only be mutated by the module that created it, and only while
/// it has not escaped. Anything else would be a side effect the checker cannot
/// see, so it is reported rather than applied.
pub fn check_external_modification(target: &ObjRef, ctx: &CallerContext) -> Result<()> {
    if target.is_escaped() {
        tracing::debug!(
            "rejecting mutation of escaped {} in {}",
            target.type_name(),
            ctx.caller().name()
        );
        raise!(
            ctx,
            MutationRejected,
            "{} object may be observed outside {} and cannot be modified",
            target.type_name(),
            ctx.caller().name()
        );
    }
    if !target.is_created_by(ctx.caller()) {
        let owner = target
            .creator()
            .map_or_else(|| "<unknown>".to_string(), |module| module.name().to_string());
        tracing::debug!(
            "rejecting mutation of {} owned by {} from {}",
            target.type_name(),
            owner,
            ctx.caller().name()
        );
        raise!(
            ctx,
            MutationRejected,
            "{} object created in module {} cannot be modified from module {}",
            target.type_name(),
            owner,
            ctx.caller().name()
        );
    }
    Ok(())
}
