//! Navigation observer.
//!
//! The host history API only reports back/forward navigation on its own.
//! The observer intercepts programmatic `push`/`replace` as well, so every
//! navigation reaches subscribers as one [`NavigationEvent`] on a single
//! channel.
//!
//! The observer is installed once per UI thread with [`init`] or
//! [`init_with`]; later calls are no-ops. Until a backend is installed the
//! channel stays silent and [`current_location`] returns the empty
//! placeholder location.
//!
//! ## Example
//!
//! ```
//! use sentier_pages::navigation::{self, MemoryHistory, NavigationKind};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! navigation::init_with(MemoryHistory::new("/")).unwrap();
//!
//! let seen = Rc::new(Cell::new(0));
//! let counter = seen.clone();
//! let subscription = navigation::on_navigate(move |event| {
//!     assert_eq!(event.kind, NavigationKind::Push);
//!     counter.set(counter.get() + 1);
//! });
//!
//! navigation::push_state("/users/1").unwrap();
//! assert_eq!(seen.get(), 1);
//!
//! subscription.unsubscribe();
//! navigation::push_state("/users/2").unwrap();
//! assert_eq!(seen.get(), 1);
//! ```

mod backend;
#[cfg(target_arch = "wasm32")]
mod browser;
mod memory;

pub use backend::{HistoryBackend, NavigationEvent, NavigationKind, Notifier, StaticHistory};
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;
pub use memory::MemoryHistory;

use crate::error::NavigationError;
use sentier_urls::Location;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Handler = Rc<RefCell<Box<dyn FnMut(&NavigationEvent)>>>;

#[derive(Default)]
struct Observer {
	backend: Option<Rc<dyn HistoryBackend>>,
	handlers: Vec<(u64, Handler)>,
	next_id: u64,
	queue: VecDeque<NavigationEvent>,
	dispatching: bool,
}

thread_local! {
	static OBSERVER: RefCell<Observer> = RefCell::new(Observer::default());
}

/// Ends a dispatch, also when a handler panics. Notifications still queued
/// at that point belong to the aborted dispatch and are discarded.
struct DispatchGuard;

impl Drop for DispatchGuard {
	fn drop(&mut self) {
		let _ = OBSERVER.try_with(|observer| {
			let mut observer = observer.borrow_mut();
			observer.dispatching = false;
			observer.queue.clear();
		});
	}
}

/// Installs the observer on top of `backend`.
///
/// Returns `Ok(true)` when the observer was installed by this call and
/// `Ok(false)` when it was already installed, in which case `backend` is
/// dropped untouched.
pub fn init_with<B>(backend: B) -> Result<bool, NavigationError>
where
	B: HistoryBackend + 'static,
{
	if is_installed() {
		tracing::debug!("navigation observer already installed");
		return Ok(false);
	}

	let backend: Rc<dyn HistoryBackend> = Rc::new(backend);
	backend.install(Notifier::new())?;
	OBSERVER.with(|observer| observer.borrow_mut().backend = Some(backend));
	tracing::debug!("navigation observer installed");
	Ok(true)
}

/// Installs the observer on the browser history.
#[cfg(target_arch = "wasm32")]
pub fn init() -> Result<bool, NavigationError> {
	if is_installed() {
		return Ok(false);
	}
	init_with(BrowserHistory::new()?)
}

/// Non-WASM version of `init`.
///
/// There is no document to observe, so nothing is installed. Use
/// [`init_with`] to install a [`MemoryHistory`] or [`StaticHistory`].
#[cfg(not(target_arch = "wasm32"))]
pub fn init() -> Result<bool, NavigationError> {
	Ok(false)
}

/// Returns whether a backend has been installed on this thread.
pub fn is_installed() -> bool {
	OBSERVER.with(|observer| observer.borrow().backend.is_some())
}

/// Returns whether the installed backend can navigate.
pub fn is_navigable() -> bool {
	backend().is_some_and(|backend| backend.is_navigable())
}

/// Returns the current location, or the empty placeholder when no backend
/// is installed.
pub fn current_location() -> Location {
	backend()
		.map(|backend| backend.location())
		.unwrap_or_default()
}

/// Navigates to `url`, adding a history entry.
pub fn push_state(url: &str) -> Result<(), NavigationError> {
	tracing::debug!(url, "push_state");
	backend().ok_or(NavigationError::NotInstalled)?.push(url)
}

/// Navigates to `url`, replacing the current history entry.
pub fn replace_state(url: &str) -> Result<(), NavigationError> {
	tracing::debug!(url, "replace_state");
	backend().ok_or(NavigationError::NotInstalled)?.replace(url)
}

/// Subscribes `handler` to navigation notifications.
///
/// The handler stays subscribed until the returned [`Subscription`] is
/// dropped or [`Subscription::unsubscribe`] is called.
#[must_use = "dropping the subscription unsubscribes the handler"]
pub fn on_navigate<F>(handler: F) -> Subscription
where
	F: FnMut(&NavigationEvent) + 'static,
{
	let handler: Box<dyn FnMut(&NavigationEvent)> = Box::new(handler);
	let handler: Handler = Rc::new(RefCell::new(handler));
	let id = OBSERVER.with(|observer| {
		let mut observer = observer.borrow_mut();
		let id = observer.next_id;
		observer.next_id += 1;
		observer.handlers.push((id, handler));
		id
	});
	Subscription { id }
}

/// Number of handlers currently subscribed.
pub fn subscriber_count() -> usize {
	OBSERVER.with(|observer| observer.borrow().handlers.len())
}

/// A live navigation subscription.
#[derive(Debug)]
pub struct Subscription {
	id: u64,
}

impl Subscription {
	/// Removes the handler from the channel.
	pub fn unsubscribe(self) {
		drop(self);
	}

	/// Returns whether the handler is still subscribed.
	pub fn is_active(&self) -> bool {
		OBSERVER.with(|observer| {
			observer
				.borrow()
				.handlers
				.iter()
				.any(|(id, _)| *id == self.id)
		})
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		let id = self.id;
		let _ = OBSERVER.try_with(|observer| {
			observer
				.borrow_mut()
				.handlers
				.retain(|(handler_id, _)| *handler_id != id);
		});
	}
}

/// Runs `f` with notifications held back, then delivers whatever it raised.
///
/// Inside a dispatch this just runs `f`: the running dispatch picks the
/// queued notifications up.
pub(crate) fn hold_notifications<R>(f: impl FnOnce() -> R) -> R {
	let started = OBSERVER.with(|observer| {
		let mut observer = observer.borrow_mut();
		!std::mem::replace(&mut observer.dispatching, true)
	});
	if !started {
		return f();
	}

	let _guard = DispatchGuard;
	let result = f();
	drain();
	result
}

fn backend() -> Option<Rc<dyn HistoryBackend>> {
	OBSERVER.with(|observer| observer.borrow().backend.clone())
}

fn dispatch(event: NavigationEvent) {
	tracing::debug!(kind = %event.kind, location = %event.location, "navigation");
	let started = OBSERVER.with(|observer| {
		let mut observer = observer.borrow_mut();
		observer.queue.push_back(event);
		!std::mem::replace(&mut observer.dispatching, true)
	});
	if !started {
		return;
	}

	let _guard = DispatchGuard;
	drain();
}

/// Delivers queued events in order. Events raised by handlers are appended
/// to the queue and delivered after the current one.
fn drain() {
	while let Some(event) = OBSERVER.with(|observer| observer.borrow_mut().queue.pop_front()) {
		let handlers: Vec<(u64, Handler)> =
			OBSERVER.with(|observer| observer.borrow().handlers.clone());

		for (id, handler) in handlers {
			// Skip handlers removed by an earlier handler of this event.
			let subscribed = OBSERVER.with(|observer| {
				observer
					.borrow()
					.handlers
					.iter()
					.any(|(handler_id, _)| *handler_id == id)
			});
			if !subscribed {
				continue;
			}
			if let Ok(mut handler) = handler.try_borrow_mut() {
				(*handler)(&event);
			}
		}
	}
}
