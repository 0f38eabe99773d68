use std::backtrace::Backtrace;

/// Captures the current call site if `RUST_BACKTRACE=1` is set.
///
/// This module only exists in builds with `cfg(debug_assertions)`, so release builds carry no
/// diagnostic state at all.
pub(crate) fn capture_backtrace() -> Backtrace {
    Backtrace::capture()
}
