//! Transient status message with a fixed auto-hide delay.
//!
//! Each `show` schedules its own hide. A later `show` does not cancel an
//! earlier pending hide, so an older timer can hide a newer message early.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use super::model::ToastView;

pub const TOAST_DURATION: Duration = Duration::from_millis(2200);

#[derive(Clone, Debug, Default)]
pub struct Toast {
    inner: Arc<Mutex<ToastView>>,
}

impl Toast {
    /// Replace the message, make it visible and schedule the hide.
    ///
    /// Outside a tokio runtime the message stays visible until the next call.
    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "toast");
        {
            let mut view = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            view.message = message;
            view.visible = true;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        // Deadline is fixed at call time, not when the task first runs.
        let hide = tokio::time::sleep(TOAST_DURATION);
        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            hide.await;
            inner.lock().unwrap_or_else(PoisonError::into_inner).visible = false;
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> ToastView {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
#[path = "toast_test.rs"]
mod tests;
