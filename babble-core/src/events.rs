/// Callback invoked with the text of each observed utterance.
pub type UtteranceHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Ordered fan-out of observed utterances to feature subscribers.
///
/// Subscribers are registered once at start-up and invoked in registration
/// order on every publish. Each feature module (learning, autonomous
/// chatter, ...) registers its own handler instead of composing onto a
/// single callback slot.
#[derive(Default)]
pub struct UtteranceBus {
	handlers: Vec<UtteranceHandler>,
}

impl UtteranceBus {
	pub fn new() -> Self {
		Self { handlers: Vec::new() }
	}

	/// Appends a subscriber. Earlier subscribers see each utterance first.
	pub fn subscribe<F>(&mut self, handler: F)
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.handlers.push(Box::new(handler));
	}

	/// Delivers one utterance to every subscriber, in registration order.
	pub fn publish(&self, text: &str) {
		for handler in &self.handlers {
			handler(text);
		}
	}

	/// Number of registered subscribers.
	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	#[test]
	fn subscribers_run_in_registration_order() {
		let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
		let mut bus = UtteranceBus::new();

		for name in ["first", "second", "third"] {
			let seen = Arc::clone(&seen);
			bus.subscribe(move |text| {
				seen.lock().unwrap().push(format!("{name}:{text}"));
			});
		}

		bus.publish("hi");

		assert_eq!(bus.len(), 3);
		assert_eq!(
			*seen.lock().unwrap(),
			["first:hi", "second:hi", "third:hi"]
		);
	}

	#[test]
	fn publish_without_subscribers_is_a_no_op() {
		let bus = UtteranceBus::new();
		assert!(bus.is_empty());
		bus.publish("nobody listens");
	}
}
