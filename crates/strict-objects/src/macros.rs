/// Return early with an error raised through the ambient context.
///
/// `raise!(ctx, Type, "list indices must be integers, not {}", name)`
#[macro_export]
macro_rules! raise {
    ($ctx:expr, $kind:ident, $($arg:tt)*) => {
        return Err($ctx.raise($crate::error::Error::$kind, format!($($arg)*)))
    };
}

/// Ensure a condition holds, or raise through the ambient context.
#[macro_export]
macro_rules! raise_unless {
    ($cond:expr, $ctx:expr, $kind:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::raise!($ctx, $kind, $($arg)*);
        }
    };
}
