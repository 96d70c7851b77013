//! Fixed-interval refresh that stops when its owner goes away.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest period a poller runs at; zero would tick without pause.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Runs `fetch` on every tick and publishes the result. Dropping the poller
/// cancels it; a fetch already in flight finishes but its result is
/// discarded.
pub struct Poller<T> {
	rx: watch::Receiver<Option<T>>,
	cancel: CancellationToken,
	handle: JoinHandle<()>,
}

impl<T> Poller<T>
where
	T: Send + Sync + 'static,
{
	pub fn spawn<F, Fut>(name: &'static str, interval: Duration, mut fetch: F) -> Self
	where
		F: FnMut() -> Fut + Send + 'static,
		Fut: Future<Output = T> + Send,
	{
		let interval = interval.max(MIN_INTERVAL);
		let (tx, rx) = watch::channel(None);
		let cancel = CancellationToken::new();
		let token = cancel.clone();
		let handle = tokio::spawn(async move {
			tracing::debug!(poller = name, interval_ms = interval.as_millis() as u64, "poller started");
			let mut ticker = tokio::time::interval(interval);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
			loop {
				tokio::select! {
					biased;
					_ = token.cancelled() => break,
					_ = ticker.tick() => {
						let value = fetch().await;
						if token.is_cancelled() {
							tracing::debug!(poller = name, "discarding result fetched after teardown");
							break;
						}
						if tx.send(Some(value)).is_err() {
							break;
						}
					}
				}
			}
			tracing::debug!(poller = name, "poller stopped");
		});
		Poller { rx, cancel, handle }
	}

	/// Waits for the next published result. `false` once the poller is gone.
	pub async fn changed(&mut self) -> bool {
		self.rx.changed().await.is_ok()
	}

	pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
		self.rx.clone()
	}

	pub fn stop(&self) {
		self.cancel.cancel();
	}

	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}

impl<T: Clone> Poller<T> {
	pub fn latest(&self) -> Option<T> {
		self.rx.borrow().clone()
	}
}

impl<T> Drop for Poller<T> {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}
