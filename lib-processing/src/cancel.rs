use core::sync::atomic::{AtomicBool, Ordering};

/// Caller initiated abort signal for the calibration routines. Calibration blocks the calling task
/// for seconds (or indefinitely while an operator fails to hold a pose), so the token is meant to
/// be flipped from somewhere else: an interrupt handler, another task, or a `static`.
/// 
/// ```
/// use lib_processing::CancelToken;
/// 
/// static CALIBRATION_ABORT: CancelToken = CancelToken::new();
/// 
/// CALIBRATION_ABORT.cancel();
/// assert!(CALIBRATION_ABORT.is_cancelled());
/// ```
/// 
#[derive(Debug, Default)]
pub struct CancelToken
{
    cancelled: AtomicBool,
}

impl CancelToken
{
    pub const fn new() -> Self {
        CancelToken { cancelled: AtomicBool::new(false) }
    }

    /// Request any calibration currently polling this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clears a previous cancel request so the token can be reused for the next calibration run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}
