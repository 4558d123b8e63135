//! Route evaluator.
//!
//! Binds a [`RouteTable`] to the navigation channel and a render callback.
//!
//! ```text
//! Uninitialized --mount--> Bound --unmount--> Unbound
//!                           ^  |
//!                           +--+ navigation: re-evaluate
//! ```

use super::core::{RouteOutcome, RouteTable};
use crate::error::RouterError;
use crate::navigation::{self, NavigationEvent, Subscription};
use crate::settings::RouterSettings;
use sentier_urls::{Location, ParameterMap};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Lifecycle state of a [`RouteEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluatorState {
	/// Created, not yet mounted.
	Uninitialized,
	/// Mounted and re-evaluating on every navigation.
	Bound,
	/// Torn down. Terminal.
	Unbound,
}

type RenderFn<V> = Box<dyn FnMut(&RouteOutcome<V>)>;

struct Inner<V> {
	table: RouteTable<V>,
	settings: RefCell<RouterSettings>,
	render: RefCell<RenderFn<V>>,
	state: Cell<EvaluatorState>,
	static_location: RefCell<Option<Location>>,
	subscription: RefCell<Option<Subscription>>,
	last_params: RefCell<Option<ParameterMap>>,
	last_error: RefCell<Option<RouterError>>,
	/// Locations visited by the redirect chain in progress, origin first.
	redirect_chain: RefCell<Vec<String>>,
}

/// Re-runs route resolution on mount and after every navigation, and hands
/// each outcome to a render callback.
///
/// # Example
///
/// ```
/// use sentier_pages::navigation::{self, MemoryHistory};
/// use sentier_pages::{EvaluatorState, RouteEvaluator, RouteTable};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// navigation::init_with(MemoryHistory::new("/user/1")).unwrap();
///
/// let rendered = Rc::new(RefCell::new(Vec::new()));
/// let sink = rendered.clone();
/// let table = RouteTable::new().route("/user/:id", |params| params.get("id").unwrap_or_default().to_string());
/// let evaluator = RouteEvaluator::new(table, move |outcome| {
///     sink.borrow_mut().push(outcome.content().cloned());
/// });
///
/// evaluator.mount();
/// navigation::push_state("/user/2").unwrap();
/// assert_eq!(*rendered.borrow(), vec![Some("1".to_string()), Some("2".to_string())]);
///
/// evaluator.unmount();
/// assert_eq!(evaluator.state(), EvaluatorState::Unbound);
/// ```
pub struct RouteEvaluator<V: 'static> {
	inner: Rc<Inner<V>>,
}

impl<V: 'static> fmt::Debug for RouteEvaluator<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteEvaluator")
			.field("state", &self.inner.state.get())
			.field("table", &self.inner.table)
			.field("last_params", &self.inner.last_params.borrow())
			.field("last_error", &self.inner.last_error.borrow())
			.finish()
	}
}

impl<V: 'static> RouteEvaluator<V> {
	/// Creates an evaluator with default settings.
	pub fn new<F>(table: RouteTable<V>, render: F) -> Self
	where
		F: FnMut(&RouteOutcome<V>) + 'static,
	{
		Self {
			inner: Rc::new(Inner {
				table,
				settings: RefCell::new(RouterSettings::default()),
				render: RefCell::new(Box::new(render)),
				state: Cell::new(EvaluatorState::Uninitialized),
				static_location: RefCell::new(None),
				subscription: RefCell::new(None),
				last_params: RefCell::new(None),
				last_error: RefCell::new(None),
				redirect_chain: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Replaces the settings.
	pub fn with_settings(self, settings: RouterSettings) -> Self {
		*self.inner.settings.borrow_mut() = settings;
		self
	}

	/// Evaluates `location` once on mount instead of following the
	/// navigation channel. Used where the location is supplied by the
	/// request, as in server-side rendering.
	pub fn with_location(self, location: impl Into<Location>) -> Self {
		*self.inner.static_location.borrow_mut() = Some(location.into());
		self
	}

	/// Evaluates the current location and starts following navigation.
	///
	/// Only the first call has an effect.
	pub fn mount(&self) {
		if self.inner.state.get() != EvaluatorState::Uninitialized {
			tracing::debug!(state = ?self.inner.state.get(), "mount ignored");
			return;
		}

		// Redirects requested by the first evaluation are delivered after
		// it returns, once the subscription is in place.
		navigation::hold_notifications(|| {
			let location = match self.inner.static_location.borrow().clone() {
				Some(location) => location,
				None => {
					let weak = Rc::downgrade(&self.inner);
					let subscription = navigation::on_navigate(move |event| on_navigation(&weak, event));
					*self.inner.subscription.borrow_mut() = Some(subscription);
					navigation::current_location()
				}
			};

			self.inner.state.set(EvaluatorState::Bound);
			tracing::debug!(%location, "route evaluator mounted");
			self.inner.evaluate(location);
		});
	}

	/// Stops following navigation. The evaluator cannot be mounted again.
	pub fn unmount(&self) {
		if self.inner.state.replace(EvaluatorState::Unbound) == EvaluatorState::Unbound {
			return;
		}
		self.inner.subscription.borrow_mut().take();
		self.inner.redirect_chain.borrow_mut().clear();
		tracing::debug!("route evaluator unmounted");
	}

	/// Re-evaluates the current location without a navigation.
	pub fn refresh(&self) {
		if self.inner.state.get() != EvaluatorState::Bound {
			return;
		}
		let location = self
			.inner
			.static_location
			.borrow()
			.clone()
			.unwrap_or_else(navigation::current_location);
		navigation::hold_notifications(|| self.inner.evaluate(location));
	}

	/// Returns the lifecycle state.
	pub fn state(&self) -> EvaluatorState {
		self.inner.state.get()
	}

	/// Parameters of the last matched route, `None` after an unmatched
	/// evaluation.
	pub fn last_params(&self) -> Option<ParameterMap> {
		self.inner.last_params.borrow().clone()
	}

	/// The error from the last evaluation, if any.
	pub fn last_error(&self) -> Option<RouterError> {
		self.inner.last_error.borrow().clone()
	}

	/// Returns the route table.
	pub fn table(&self) -> &RouteTable<V> {
		&self.inner.table
	}

	/// Returns a copy of the settings.
	pub fn settings(&self) -> RouterSettings {
		self.inner.settings.borrow().clone()
	}
}

impl<V: 'static> Drop for RouteEvaluator<V> {
	fn drop(&mut self) {
		self.unmount();
	}
}

fn on_navigation<V>(weak: &Weak<Inner<V>>, event: &NavigationEvent) {
	let Some(inner) = weak.upgrade() else {
		return;
	};
	if inner.state.get() != EvaluatorState::Bound {
		return;
	}
	// A later navigation is already queued and will be evaluated in turn.
	if !is_current(&event.location) {
		tracing::debug!(location = %event.location, "stale navigation skipped");
		inner.redirect_chain.borrow_mut().clear();
		return;
	}
	inner.evaluate(event.location.clone());
}

/// Returns whether `location` is still the current entry of a navigable
/// history. Locations in a non-navigable environment never go stale.
fn is_current(location: &Location) -> bool {
	!navigation::is_navigable() || navigation::current_location() == *location
}

impl<V> Inner<V> {
	fn evaluate(&self, mut location: Location) {
		let settings = self.settings.borrow().clone();

		loop {
			let outcome = self.table.resolve(&location);
			let RouteOutcome::Redirect { to, replace, .. } = &outcome else {
				self.redirect_chain.borrow_mut().clear();
				*self.last_error.borrow_mut() = None;
				self.deliver(outcome);
				return;
			};

			if !settings.follow_redirects {
				tracing::debug!(%location, to = to.as_str(), "redirect not followed");
				self.redirect_chain.borrow_mut().clear();
				*self.last_error.borrow_mut() = None;
				self.deliver(self.table.unmatched());
				return;
			}

			let live = self.static_location.borrow().is_none() && navigation::is_navigable();

			// Another subscriber navigated since `location` was read. Its
			// notification re-evaluates, and so does every other evaluator,
			// so one redirect is issued per navigation.
			if live && !is_current(&location) {
				tracing::debug!(%location, to = to.as_str(), "stale redirect skipped");
				self.redirect_chain.borrow_mut().clear();
				return;
			}

			if let Err(err) = self.record_hop(&location, to, settings.max_redirect_hops) {
				tracing::error!(error = %err, "redirect loop cut off");
				self.fail(err);
				return;
			}

			if live {
				let result = if *replace {
					navigation::replace_state(to)
				} else {
					navigation::push_state(to)
				};
				match result {
					// The resulting notification triggers the next evaluation.
					Ok(()) => return,
					Err(err) => {
						tracing::warn!(error = %err, to = to.as_str(), "redirect navigation failed");
						self.fail(err.into());
						return;
					}
				}
			}

			tracing::debug!(to = to.as_str(), "following redirect statically");
			location = Location::parse(to);
		}
	}

	/// Adds `to` to the redirect chain, or reports a loop.
	fn record_hop(&self, from: &Location, to: &str, max_hops: usize) -> Result<(), RouterError> {
		let mut chain = self.redirect_chain.borrow_mut();
		if chain.is_empty() {
			chain.push(from.to_uri());
		}

		let hops = chain.len() - 1;
		if hops >= max_hops || chain.iter().any(|visited| visited == to) {
			let mut visited = std::mem::take(&mut *chain);
			visited.push(to.to_string());
			return Err(RouterError::RedirectLoop {
				hops: hops + 1,
				chain: visited,
			});
		}

		chain.push(to.to_string());
		Ok(())
	}

	fn fail(&self, err: RouterError) {
		self.redirect_chain.borrow_mut().clear();
		*self.last_error.borrow_mut() = Some(err);
		self.deliver(self.table.unmatched());
	}

	fn deliver(&self, outcome: RouteOutcome<V>) {
		*self.last_params.borrow_mut() = outcome.params().cloned();

		match self.render.try_borrow_mut() {
			Ok(mut render) => (*render)(&outcome),
			Err(_) => tracing::warn!("render callback re-entered, outcome dropped"),
		}
	}
}
