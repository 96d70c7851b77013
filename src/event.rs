/// Fan-out of a value to every subscribed handler.
pub struct Event<A> {
	subscribers: Vec<Box<dyn Fn(&A) + Send + Sync>>,
}

impl<A> Event<A> {
	pub fn new() -> Self {
		Event {
			subscribers: vec![],
		}
	}

	pub fn call(&self, arg: &A) {
		for f in &self.subscribers {
			f(arg);
		}
	}

	pub fn sub(&mut self, handler: impl Fn(&A) + Send + Sync + 'static) {
		self.subscribers.push(Box::new(handler));
	}
}

impl<A> Default for Event<A> {
	fn default() -> Self {
		Self::new()
	}
}

impl<A> std::fmt::Debug for Event<A> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Event")
			.field("subscribers", &self.subscribers.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	#[test]
	fn every_subscriber_is_called() {
		let hits = Arc::new(AtomicUsize::new(0));
		let mut event = Event::<u32>::new();
		for _ in 0..2 {
			let hits = hits.clone();
			event.sub(move |n| {
				hits.fetch_add(*n as usize, Ordering::SeqCst);
			});
		}
		event.call(&3);
		assert_eq!(hits.load(Ordering::SeqCst), 6);
	}
}
