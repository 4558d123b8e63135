//! Browser history interception (WASM only).
//!
//! `history.pushState` and `history.replaceState` are replaced in place by
//! wrappers that call the original and then notify. A marker property on the
//! `history` object keeps the wrappers from being stacked twice. When more
//! than one copy of this crate runs on the page, only the first one can
//! install; the others get [`NavigationError::AlreadyIntercepted`].

use super::backend::{HistoryBackend, NavigationKind, Notifier};
use crate::error::NavigationError;
use js_sys::{Function, Reflect};
use sentier_urls::Location;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, History, Window};

const INSTALLED_MARKER: &str = "__sentierNavigationObserver";

/// Backend over `window.history`.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
	window: Window,
}

impl BrowserHistory {
	/// Creates a backend for the current window.
	pub fn new() -> Result<Self, NavigationError> {
		web_sys::window()
			.map(|window| Self { window })
			.ok_or(NavigationError::NoWindow)
	}

	fn history(&self) -> Result<History, NavigationError> {
		self.window.history().map_err(js_error)
	}

	/// Calls the method currently installed on `history`, which is the
	/// wrapper once the observer is installed.
	fn call(&self, method: &str, url: &str) -> Result<(), NavigationError> {
		let history = self.history()?;
		let function = history_method(&history, method)?;
		function
			.call3(
				&history,
				&JsValue::NULL,
				&JsValue::from_str(""),
				&JsValue::from_str(url),
			)
			.map(|_| ())
			.map_err(js_error)
	}
}

impl HistoryBackend for BrowserHistory {
	fn location(&self) -> Location {
		read_location(&self.window)
	}

	fn push(&self, url: &str) -> Result<(), NavigationError> {
		self.call("pushState", url)
	}

	fn replace(&self, url: &str) -> Result<(), NavigationError> {
		self.call("replaceState", url)
	}

	fn install(&self, notifier: Notifier) -> Result<(), NavigationError> {
		let history = self.history()?;
		let marker = JsValue::from_str(INSTALLED_MARKER);
		if Reflect::has(&history, &marker).unwrap_or(false) {
			tracing::warn!("history is already intercepted by another observer");
			return Err(NavigationError::AlreadyIntercepted);
		}

		wrap_method(&history, "pushState", NavigationKind::Push, notifier, &self.window)?;
		wrap_method(
			&history,
			"replaceState",
			NavigationKind::Replace,
			notifier,
			&self.window,
		)?;
		Reflect::set(&history, &marker, &JsValue::TRUE).map_err(js_error)?;

		let window = self.window.clone();
		let popstate_handler = Closure::wrap(Box::new(move |_event: Event| {
			notifier.notify(NavigationKind::Pop, read_location(&window));
		}) as Box<dyn FnMut(_)>);

		self.window
			.add_event_listener_with_callback("popstate", popstate_handler.as_ref().unchecked_ref())
			.map_err(js_error)?;
		// The listener lives as long as the page.
		popstate_handler.forget();

		Ok(())
	}
}

fn wrap_method(
	history: &History,
	method: &str,
	kind: NavigationKind,
	notifier: Notifier,
	window: &Window,
) -> Result<(), NavigationError> {
	let original = history_method(history, method)?;
	let target = history.clone();
	let window = window.clone();

	let wrapper = Closure::wrap(Box::new(
		move |state: JsValue, title: JsValue, url: JsValue| -> Result<JsValue, JsValue> {
			let result = original.call3(&target, &state, &title, &url)?;
			notifier.notify(kind, read_location(&window));
			Ok(result)
		},
	) as Box<dyn FnMut(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>);

	Reflect::set(history, &JsValue::from_str(method), wrapper.as_ref()).map_err(js_error)?;
	wrapper.forget();
	Ok(())
}

fn history_method(history: &History, method: &str) -> Result<Function, NavigationError> {
	Reflect::get(history, &JsValue::from_str(method))
		.map_err(js_error)?
		.dyn_into::<Function>()
		.map_err(|_| NavigationError::History(format!("history.{method} is not a function")))
}

fn read_location(window: &Window) -> Location {
	let location = window.location();
	Location::new(
		location.pathname().unwrap_or_else(|_| "/".to_string()),
		location.search().unwrap_or_default(),
	)
}

fn js_error(value: JsValue) -> NavigationError {
	NavigationError::History(
		value
			.as_string()
			.unwrap_or_else(|| format!("{value:?}")),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::navigation;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn test_foreign_interception_is_reported() {
		let backend = BrowserHistory::new().unwrap();
		let history = backend.history().unwrap();
		Reflect::set(&history, &JsValue::from_str(INSTALLED_MARKER), &JsValue::TRUE).unwrap();

		assert_eq!(
			backend.install(Notifier::new()),
			Err(NavigationError::AlreadyIntercepted)
		);
		assert_eq!(navigation::init(), Err(NavigationError::AlreadyIntercepted));
		assert!(!navigation::is_installed());
	}
}
