use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// At most one repeating timer. Arming replaces the previous timer; the
/// first tick fires immediately.
#[derive(Default)]
pub struct Poller {
    token: Option<CancellationToken>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from inside a tokio runtime.
    pub fn arm<F>(&mut self, interval: Duration, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.disarm();
        let token = CancellationToken::new();
        let child = token.clone();
        let period = interval.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => on_tick(),
                }
            }
        });
        self.token = Some(token);
    }

    pub fn disarm(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.token.is_some()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.disarm();
    }
}
