//! In-process history for native targets and tests.

use super::backend::{HistoryBackend, NavigationKind, Notifier};
use crate::error::NavigationError;
use sentier_urls::Location;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryState {
	entries: Vec<Location>,
	notifier: Option<Notifier>,
}

impl MemoryState {
	fn current(&self) -> Location {
		self.entries.last().cloned().unwrap_or_default()
	}
}

/// A history kept in memory.
///
/// Clones share the same entries, so a test can keep a handle after giving
/// one to [`init_with`](super::init_with). Calling [`push`](HistoryBackend::push)
/// on any handle notifies subscribers, the same way an intercepted
/// `history.pushState` does in a browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
	state: Rc<RefCell<MemoryState>>,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial`.
	pub fn new(initial: &str) -> Self {
		Self {
			state: Rc::new(RefCell::new(MemoryState {
				entries: vec![Location::parse(initial)],
				notifier: None,
			})),
		}
	}

	/// Number of entries pushed so far, including the initial one.
	pub fn len(&self) -> usize {
		self.state.borrow().entries.len()
	}

	/// Returns whether the history has no entries.
	pub fn is_empty(&self) -> bool {
		self.state.borrow().entries.is_empty()
	}

	/// Stands in for a back/forward button press that landed on `url`.
	///
	/// The current entry becomes `url` and a [`NavigationKind::Pop`]
	/// notification is sent.
	pub fn simulate_pop(&self, url: &str) {
		let location = Location::parse(url);
		let notifier = {
			let mut state = self.state.borrow_mut();
			match state.entries.last_mut() {
				Some(entry) => *entry = location.clone(),
				None => state.entries.push(location.clone()),
			}
			state.notifier
		};
		if let Some(notifier) = notifier {
			notifier.notify(NavigationKind::Pop, location);
		}
	}

	fn navigate(&self, url: &str, kind: NavigationKind) {
		let location = Location::parse(url);
		let notifier = {
			let mut state = self.state.borrow_mut();
			match (kind, state.entries.last_mut()) {
				(NavigationKind::Replace, Some(entry)) => *entry = location.clone(),
				_ => state.entries.push(location.clone()),
			}
			state.notifier
		};
		// The borrow is released before notifying: handlers read the location.
		if let Some(notifier) = notifier {
			notifier.notify(kind, location);
		}
	}
}

impl HistoryBackend for MemoryHistory {
	fn location(&self) -> Location {
		self.state.borrow().current()
	}

	fn push(&self, url: &str) -> Result<(), NavigationError> {
		self.navigate(url, NavigationKind::Push);
		Ok(())
	}

	fn replace(&self, url: &str) -> Result<(), NavigationError> {
		self.navigate(url, NavigationKind::Replace);
		Ok(())
	}

	fn install(&self, notifier: Notifier) -> Result<(), NavigationError> {
		self.state.borrow_mut().notifier = Some(notifier);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_push_and_replace_without_notifier() {
		let history = MemoryHistory::new("/");
		history.push("/a?x=1").unwrap();
		assert_eq!(history.location(), Location::new("/a", "x=1"));
		assert_eq!(history.len(), 2);

		history.replace("/b").unwrap();
		assert_eq!(history.location(), Location::new("/b", ""));
		assert_eq!(history.len(), 2);
	}

	#[rstest]
	fn test_clones_share_entries() {
		let history = MemoryHistory::new("/start");
		let handle = history.clone();
		handle.push("/next").unwrap();
		assert_eq!(history.location().pathname, "/next");
	}

	#[rstest]
	fn test_simulate_pop_sets_location() {
		let history = MemoryHistory::new("/a");
		history.push("/b").unwrap();
		history.simulate_pop("/a");
		assert_eq!(history.location().pathname, "/a");
		assert_eq!(history.len(), 2);
	}

	#[rstest]
	fn test_default_is_empty() {
		let history = MemoryHistory::default();
		assert!(history.is_empty());
		assert_eq!(history.location(), Location::default());
	}
}
