use std::sync::atomic::{AtomicU8, Ordering};

/// Where the poll loop currently is within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    Extracting = 1,
    Delivering = 2,
}

impl Phase {
    fn from_u8(raw: u8) -> Phase {
        match raw {
            1 => Phase::Extracting,
            2 => Phase::Delivering,
            _ => Phase::Idle,
        }
    }
}

/// Single-slot token owned by one poll loop. At most one tick holds it.
#[derive(Debug)]
pub struct PhaseToken {
    state: AtomicU8,
}

impl PhaseToken {
    pub fn new() -> Self {
        PhaseToken {
            state: AtomicU8::new(Phase::Idle as u8),
        }
    }

    pub fn current(&self) -> Phase {
        Phase::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Moves `Idle -> Extracting` without blocking. `None` when a tick is
    /// already running.
    pub fn try_begin(&self) -> Option<PhaseGuard<'_>> {
        self.state
            .compare_exchange(
                Phase::Idle as u8,
                Phase::Extracting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()
            .map(|_| PhaseGuard { token: self })
    }
}

impl Default for PhaseToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one tick; returns the token to `Idle` on every
/// exit path, unwinding included.
#[derive(Debug)]
pub struct PhaseGuard<'a> {
    token: &'a PhaseToken,
}

impl PhaseGuard<'_> {
    pub fn enter(&self, phase: Phase) {
        self.token.state.store(phase as u8, Ordering::Release);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.token.state.store(Phase::Idle as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_until_guard_drops() {
        let token = PhaseToken::new();
        let guard = token.try_begin().unwrap();
        assert_eq!(token.current(), Phase::Extracting);
        assert!(token.try_begin().is_none());

        guard.enter(Phase::Delivering);
        assert_eq!(token.current(), Phase::Delivering);
        assert!(token.try_begin().is_none());

        drop(guard);
        assert_eq!(token.current(), Phase::Idle);
        assert!(token.try_begin().is_some());
    }

    #[test]
    fn panic_releases_the_token() {
        let token = PhaseToken::new();
        let result = std::panic::catch_unwind(|| {
            let _guard = token.try_begin().unwrap();
            panic!("tick blew up");
        });
        assert!(result.is_err());
        assert_eq!(token.current(), Phase::Idle);
    }
}
