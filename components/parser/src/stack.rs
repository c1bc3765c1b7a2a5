//! Stack growth for deep recursive descent.
//!
//! The grammar engine bounds nesting with a configurable depth limit, but
//! even an allowed depth can recurse through many frames per level. Each
//! recursive entry point runs through [`ensure_sufficient_stack`], which
//! grows the stack on demand instead of overflowing it.

/// Remaining stack below which we grow (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Stack allocated per growth (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
