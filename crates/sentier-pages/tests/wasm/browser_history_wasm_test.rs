//! Browser history interception tests
//!
//! Run with `wasm-pack test --headless --chrome crates/sentier-pages`.

#![cfg(target_arch = "wasm32")]

use sentier_pages::navigation::{self, NavigationKind};
use sentier_pages::{RouteEvaluator, RouteTable};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn history() -> web_sys::History {
	web_sys::window().unwrap().history().unwrap()
}

fn kinds() -> (Rc<RefCell<Vec<NavigationKind>>>, navigation::Subscription) {
	let kinds = Rc::new(RefCell::new(Vec::new()));
	let sink = kinds.clone();
	let subscription = navigation::on_navigate(move |event| sink.borrow_mut().push(event.kind));
	(kinds, subscription)
}

#[wasm_bindgen_test]
fn test_init_is_idempotent() {
	navigation::init().unwrap();
	assert!(navigation::is_installed());
	assert_eq!(navigation::init(), Ok(false));
}

#[wasm_bindgen_test]
fn test_programmatic_navigation_notifies_once() {
	navigation::init().unwrap();
	let (kinds, _subscription) = kinds();

	history()
		.push_state_with_url(&JsValue::NULL, "", Some("/wasm/pushed?x=1"))
		.unwrap();
	history()
		.replace_state_with_url(&JsValue::NULL, "", Some("/wasm/replaced"))
		.unwrap();

	assert_eq!(*kinds.borrow(), vec![NavigationKind::Push, NavigationKind::Replace]);
	assert_eq!(navigation::current_location().pathname, "/wasm/replaced");
}

#[wasm_bindgen_test]
fn test_observer_api_notifies_once() {
	navigation::init().unwrap();
	let (kinds, _subscription) = kinds();

	navigation::push_state("/wasm/api").unwrap();
	assert_eq!(*kinds.borrow(), vec![NavigationKind::Push]);
	assert_eq!(navigation::current_location().pathname, "/wasm/api");
}

#[wasm_bindgen_test]
fn test_evaluator_follows_browser_navigation() {
	navigation::init().unwrap();
	navigation::replace_state("/wasm/start").unwrap();

	let rendered = Rc::new(RefCell::new(Vec::new()));
	let sink = rendered.clone();
	let table = RouteTable::new()
		.redirect("/wasm/old", "/wasm/new")
		.route("/wasm/:page", |params| params.get("page").unwrap_or_default().to_string());
	let evaluator = RouteEvaluator::new(table, move |outcome| {
		sink.borrow_mut().push(outcome.content().cloned());
	});
	evaluator.mount();

	navigation::push_state("/wasm/next").unwrap();
	navigation::push_state("/wasm/old").unwrap();
	assert_eq!(
		*rendered.borrow(),
		vec![
			Some("start".to_string()),
			Some("next".to_string()),
			Some("new".to_string())
		]
	);
	assert_eq!(navigation::current_location().pathname, "/wasm/new");
}
