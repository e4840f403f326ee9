//! Re-authentication timer for elevated sessions.
//!
//! The timer compares the session's last full authentication with a grace
//! window. While the caller stays active the window slides forward in small
//! steps, at most [`EXTENSION_CAP_MS`] at a time.
use crate::auth::SessionMeta;

/// Largest single extension of the authentication timestamp
pub const EXTENSION_CAP_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Recently authenticated
    Fresh,
    /// Grace window elapsed, a password login is required
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloginTimer {
    grace_ms: i64,
}

impl ReloginTimer {
    pub fn from_millis(grace_ms: i64) -> Self {
        Self {
            grace_ms: grace_ms.max(0),
        }
    }

    pub fn grace_ms(&self) -> i64 {
        self.grace_ms
    }

    /// A zero grace window disables forced re-login
    pub fn is_disabled(&self) -> bool {
        self.grace_ms == 0
    }

    /// Size of one sliding step
    pub fn step_ms(&self) -> i64 {
        EXTENSION_CAP_MS.min(self.grace_ms)
    }

    pub fn evaluate(&self, meta: Option<&SessionMeta>, now_ms: i64) -> TimerState {
        if self.is_disabled() {
            return TimerState::Fresh;
        }
        let login_time = meta.map_or(0, |m| m.datetime);
        if login_time != 0 && login_time > now_ms.saturating_sub(self.grace_ms) {
            TimerState::Fresh
        } else {
            TimerState::Stale
        }
    }

    /// Slide the window forward when less than one step is left.
    /// Returns whether the timestamp moved. It never moves backwards.
    pub fn extend(&self, meta: Option<&mut SessionMeta>, now_ms: i64) -> bool {
        let Some(meta) = meta else {
            return false;
        };
        let step = self.step_ms();
        let time_left = meta.datetime - now_ms.saturating_sub(self.grace_ms);
        if step > 0 && time_left < step {
            meta.datetime = meta.datetime.saturating_add(step);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn meta(datetime: i64) -> SessionMeta {
        SessionMeta { datetime }
    }

    #[test]
    fn test_disabled_timer_is_always_fresh() {
        let timer = ReloginTimer::from_millis(0);
        assert!(timer.is_disabled());
        assert_eq!(timer.evaluate(None, NOW), TimerState::Fresh);
        assert_eq!(timer.evaluate(Some(&meta(0)), NOW), TimerState::Fresh);
        assert_eq!(timer.evaluate(Some(&meta(1)), NOW), TimerState::Fresh);
    }

    #[test]
    fn test_missing_timestamp_is_stale() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        assert_eq!(timer.evaluate(None, NOW), TimerState::Stale);
        assert_eq!(timer.evaluate(Some(&meta(0)), NOW), TimerState::Stale);
    }

    #[test]
    fn test_window_boundary() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        assert_eq!(timer.evaluate(Some(&meta(NOW - 599_999)), NOW), TimerState::Fresh);
        // exactly at the edge the window has elapsed
        assert_eq!(timer.evaluate(Some(&meta(NOW - 600_000)), NOW), TimerState::Stale);
    }

    #[test]
    fn test_stale_after_grace() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        assert_eq!(timer.evaluate(Some(&meta(NOW - 700_000)), NOW), TimerState::Stale);
    }

    #[test]
    fn test_extend_near_expiry() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        let mut m = meta(NOW - 595_000);
        assert_eq!(timer.evaluate(Some(&m), NOW), TimerState::Fresh);

        assert!(timer.extend(Some(&mut m), NOW));
        assert_eq!(m.datetime, NOW - 595_000 + 60_000);
        // no further elapsed time: still fresh, and far enough from expiry to stay put
        assert_eq!(timer.evaluate(Some(&m), NOW), TimerState::Fresh);
        assert!(!timer.extend(Some(&mut m), NOW));
        assert_eq!(m.datetime, NOW - 535_000);
    }

    #[test]
    fn test_no_extend_with_time_to_spare() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        let mut m = meta(NOW - 60_000);
        assert!(!timer.extend(Some(&mut m), NOW));
        assert_eq!(m.datetime, NOW - 60_000);
    }

    #[test]
    fn test_extend_at_exact_step_boundary() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        // exactly one step left is not less than one step
        let mut m = meta(NOW - 540_000);
        assert!(!timer.extend(Some(&mut m), NOW));
        let mut m = meta(NOW - 540_001);
        assert!(timer.extend(Some(&mut m), NOW));
        assert_eq!(m.datetime, NOW - 480_001);
    }

    #[test]
    fn test_short_grace_window_steps_by_whole_window() {
        let timer = ReloginTimer::from_millis(30_000);
        assert_eq!(timer.step_ms(), 30_000);
        let mut m = meta(NOW - 10_000);
        assert!(timer.extend(Some(&mut m), NOW));
        assert_eq!(m.datetime, NOW + 20_000);
        // never further than one grace window ahead of now
        assert!(m.datetime <= NOW + timer.grace_ms());
    }

    #[test]
    fn test_extend_without_meta_is_noop() {
        let timer = ReloginTimer::from_millis(10 * 60_000);
        assert!(!timer.extend(None, NOW));
    }

    #[test]
    fn test_disabled_timer_never_moves_timestamp() {
        let timer = ReloginTimer::from_millis(0);
        let mut m = meta(NOW - 10_000_000);
        assert!(!timer.extend(Some(&mut m), NOW));
        assert_eq!(m.datetime, NOW - 10_000_000);
    }

    #[test]
    fn test_extension_is_monotonic() {
        let timer = ReloginTimer::from_millis(60_000);
        for offset in [0, 1, 30_000, 59_999, 60_000] {
            let before = NOW - offset;
            let mut m = meta(before);
            timer.extend(Some(&mut m), NOW);
            assert!(m.datetime >= before);
            assert!(m.datetime - before == 0 || m.datetime - before == timer.step_ms());
        }
    }
}
