//! The seam between the observer and the host history API.

use crate::error::NavigationError;
use sentier_urls::Location;
use std::fmt;

/// What kind of navigation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKind {
	/// A new history entry was pushed.
	Push,
	/// The current history entry was replaced.
	Replace,
	/// The browser moved through history (back/forward).
	Pop,
}

impl fmt::Display for NavigationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Push => write!(f, "push"),
			Self::Replace => write!(f, "replace"),
			Self::Pop => write!(f, "pop"),
		}
	}
}

/// A single "navigation occurred" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
	/// The source of the navigation.
	pub kind: NavigationKind,
	/// The location after the navigation completed.
	pub location: Location,
}

impl NavigationEvent {
	/// Creates a new event.
	pub fn new(kind: NavigationKind, location: Location) -> Self {
		Self { kind, location }
	}
}

/// Handle a backend uses to feed the navigation channel.
///
/// Only the observer hands these out, through [`HistoryBackend::install`].
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
	_private: (),
}

impl Notifier {
	pub(crate) fn new() -> Self {
		Self { _private: () }
	}

	/// Broadcasts a navigation to every subscriber.
	pub fn notify(&self, kind: NavigationKind, location: Location) {
		super::dispatch(NavigationEvent::new(kind, location));
	}
}

/// A host history implementation.
///
/// A backend is responsible for calling [`Notifier::notify`] exactly once per
/// completed navigation, whichever way it was triggered.
pub trait HistoryBackend {
	/// Returns the current location.
	fn location(&self) -> Location;

	/// Returns whether navigation is possible at all.
	fn is_navigable(&self) -> bool {
		true
	}

	/// Pushes a new history entry.
	fn push(&self, url: &str) -> Result<(), NavigationError>;

	/// Replaces the current history entry.
	fn replace(&self, url: &str) -> Result<(), NavigationError>;

	/// Hooks the backend up to the navigation channel. Called once.
	fn install(&self, notifier: Notifier) -> Result<(), NavigationError>;
}

/// Backend for environments without a navigable document.
///
/// It reports a fixed location and never notifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticHistory {
	location: Location,
}

impl StaticHistory {
	/// Creates a backend that always reports `location`.
	pub fn new(location: impl Into<Location>) -> Self {
		Self {
			location: location.into(),
		}
	}
}

impl HistoryBackend for StaticHistory {
	fn location(&self) -> Location {
		self.location.clone()
	}

	fn is_navigable(&self) -> bool {
		false
	}

	fn push(&self, url: &str) -> Result<(), NavigationError> {
		Err(NavigationError::NotNavigable(url.to_string()))
	}

	fn replace(&self, url: &str) -> Result<(), NavigationError> {
		Err(NavigationError::NotNavigable(url.to_string()))
	}

	fn install(&self, _notifier: Notifier) -> Result<(), NavigationError> {
		Ok(())
	}
}
