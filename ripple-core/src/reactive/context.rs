//! Effect Execution Stack
//!
//! The stack tracks which effect is currently running. This enables
//! automatic dependency tracking: when a reactive view is read, the effect
//! on top of the stack is the one that gets subscribed.
//!
//! # Implementation
//!
//! A thread-local stack holds the running effects. An effect is pushed
//! immediately before its function body runs and popped unconditionally
//! afterward, including when the body panics; the pop lives in a drop guard
//! so the stack always returns to its pre-call state.
//!
//! The stack is also the re-entrancy guard: an effect already present
//! anywhere on the stack is not pushed again, and its nested run is
//! silently skipped.

use std::cell::RefCell;

use super::effect::Effect;

thread_local! {
    static EFFECT_STACK: RefCell<Vec<Effect>> = RefCell::new(Vec::new());
}

/// Introspection over the thread's effect execution stack.
pub struct EffectStack;

impl EffectStack {
    /// Check if any effect is currently running on this thread.
    pub fn is_active() -> bool {
        EFFECT_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// The number of effects currently running (nested runs included).
    pub fn depth() -> usize {
        EFFECT_STACK.with(|stack| stack.borrow().len())
    }

    /// The effect currently on top of the stack, if any.
    ///
    /// Reads performed right now attribute themselves to this effect.
    pub fn current() -> Option<Effect> {
        EFFECT_STACK.with(|stack| stack.borrow().last().cloned())
    }
}

/// Guard that pops the effect stack when dropped.
///
/// Holding the pop in a destructor keeps the stack correct on every exit
/// path; a panic inside the effect body unwinds through the guard and the
/// stack still returns to its pre-call state.
pub(crate) struct RunGuard {
    effect_id: u64,
}

impl RunGuard {
    /// Push `effect` onto the stack, or return `None` if it is already
    /// running anywhere on the stack (re-entrant run, suppressed).
    pub(crate) fn enter(effect: &Effect) -> Option<Self> {
        EFFECT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|running| running.id() == effect.id()) {
                return None;
            }
            stack.push(effect.clone());
            Some(Self {
                effect_id: effect.id(),
            })
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        EFFECT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Catch mismatched push/pop pairs early in debug builds.
            if let Some(effect) = popped {
                debug_assert_eq!(
                    effect.id(),
                    self.effect_id,
                    "effect stack mismatch: expected {}, got {}",
                    self.effect_id,
                    effect.id()
                );
            }
        });
    }
}
