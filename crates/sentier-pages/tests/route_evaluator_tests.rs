//! Integration tests for the route evaluator
//!
//! These tests verify:
//! 1. Re-evaluation on every navigation source
//! 2. Redirect handling and loop detection against a live history
//! 3. Independent evaluators on one channel
//! 4. Lifecycle and settings

use rstest::{fixture, rstest};
use sentier_pages::navigation::{self, HistoryBackend, MemoryHistory};
use sentier_pages::{
	EvaluatorState, ParameterMap, RouteEvaluator, RouteOutcome, RouteTable, RouterError,
	RouterSettings,
};
use std::cell::RefCell;
use std::rc::Rc;

type Rendered = Rc<RefCell<Vec<Option<String>>>>;

#[fixture]
fn history() -> MemoryHistory {
	let history = MemoryHistory::new("/");
	navigation::init_with(history.clone()).unwrap();
	history
}

fn describe(params: &ParameterMap) -> String {
	let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
	pairs.sort();
	pairs.join(",")
}

fn user_table() -> RouteTable<String> {
	RouteTable::new()
		.route("/user/:id?", |params| format!("user[{}]", describe(params)))
		.route("/:type/:id", |params| format!("item[{}]", describe(params)))
		.not_found(|| "none".to_string())
}

fn mount(table: RouteTable<String>) -> (RouteEvaluator<String>, Rendered) {
	let rendered: Rendered = Rc::new(RefCell::new(Vec::new()));
	let sink = rendered.clone();
	let evaluator = RouteEvaluator::new(table, move |outcome: &RouteOutcome<String>| {
		sink.borrow_mut().push(outcome.content().cloned());
	});
	evaluator.mount();
	(evaluator, rendered)
}

fn rendered(log: &Rendered) -> Vec<String> {
	log.borrow().iter().map(|c| c.clone().unwrap_or_default()).collect()
}

#[rstest]
fn test_every_navigation_source_re_evaluates(history: MemoryHistory) {
	let (evaluator, log) = mount(user_table());

	navigation::push_state("/user/123").unwrap();
	navigation::replace_state("/type/123").unwrap();
	history.simulate_pop("/person/1?id=wrong&tab=a");
	history.simulate_pop("/a/b/c");

	assert_eq!(
		rendered(&log),
		vec![
			"none",
			"user[id=123]",
			"item[id=123,type=type]",
			"item[id=1,tab=a,type=person]",
			"none",
		]
	);
	assert_eq!(evaluator.last_params(), None);
	assert_eq!(evaluator.state(), EvaluatorState::Bound);
}

#[rstest]
fn test_refresh_is_idempotent(#[from(history)] _history: MemoryHistory) {
	navigation::push_state("/post/9?tab=comments").unwrap();
	let (evaluator, log) = mount(user_table());
	let first = evaluator.last_params();

	evaluator.refresh();
	assert_eq!(evaluator.last_params(), first);
	let log = rendered(&log);
	assert_eq!(log.len(), 2);
	assert_eq!(log[0], log[1]);
}

#[rstest]
fn test_unmounted_evaluator_stops_rendering(#[from(history)] _history: MemoryHistory) {
	let (evaluator, log) = mount(user_table());
	navigation::push_state("/user/1").unwrap();
	evaluator.unmount();
	navigation::push_state("/user/2").unwrap();
	evaluator.refresh();

	assert_eq!(rendered(&log), vec!["none", "user[id=1]"]);
	assert_eq!(navigation::subscriber_count(), 0);
}

#[rstest]
fn test_independent_evaluators(#[from(history)] _history: MemoryHistory) {
	let (_users, users_log) = mount(user_table());
	let (_docs, docs_log) = mount(
		RouteTable::new()
			.route("/docs/:page", |params| describe(params))
			.not_found(|| "-".to_string()),
	);

	navigation::push_state("/docs/intro").unwrap();

	assert_eq!(rendered(&users_log), vec!["none", "item[id=intro,type=docs]"]);
	assert_eq!(rendered(&docs_log), vec!["-", "page=intro"]);
}

#[rstest]
fn test_redirect_on_navigation(history: MemoryHistory) {
	let table = RouteTable::new()
		.redirect("/old/:id", "/new/:id")
		.route("/new/:id", |params| format!("new {}", describe(params)))
		.route_with("/", "home".to_string());
	let (evaluator, log) = mount(table);

	navigation::push_state("/old/5").unwrap();

	assert_eq!(rendered(&log), vec!["home", "new id=5"]);
	assert_eq!(history.location().pathname, "/new/5");
	// The redirect replaced the pushed entry.
	assert_eq!(history.len(), 2);
	assert_eq!(evaluator.last_error(), None);
}

#[rstest]
fn test_push_redirect_adds_entry(history: MemoryHistory) {
	let table = RouteTable::new()
		.add(
			sentier_pages::Route::redirect(
				"/start",
				sentier_pages::Redirect::new("/welcome").unwrap().replace(false),
			)
			.unwrap(),
		)
		.route_with("/welcome", "welcome".to_string())
		.not_found(String::new);
	let (_evaluator, log) = mount(table);

	navigation::push_state("/start").unwrap();

	assert_eq!(rendered(&log), vec!["", "welcome"]);
	assert_eq!(history.len(), 3);
}

#[rstest]
fn test_live_redirect_loop_is_cut_off(history: MemoryHistory) {
	let table = RouteTable::new()
		.redirect("/a", "/b")
		.redirect("/b", "/a")
		.not_found(|| "loop".to_string());
	let (evaluator, log) = mount(table);

	navigation::push_state("/a").unwrap();

	assert_eq!(rendered(&log), vec!["loop", "loop"]);
	assert_eq!(
		evaluator.last_error(),
		Some(RouterError::RedirectLoop {
			hops: 2,
			chain: vec!["/a".to_string(), "/b".to_string(), "/a".to_string()],
		})
	);
	assert_eq!(history.location().pathname, "/b");

	// A fresh navigation starts a fresh chain.
	navigation::push_state("/elsewhere").unwrap();
	assert_eq!(evaluator.last_error(), None);
}

#[rstest]
fn test_hop_limit_from_settings(#[from(history)] _history: MemoryHistory) {
	let settings = RouterSettings::from_toml_str("max_redirect_hops = 1").unwrap();
	let table = RouteTable::new()
		.redirect("/1", "/2")
		.redirect("/2", "/3")
		.route_with("/3", "three".to_string())
		.not_found(|| "cut".to_string());

	let rendered_log: Rendered = Rc::new(RefCell::new(Vec::new()));
	let sink = rendered_log.clone();
	let evaluator = RouteEvaluator::new(table, move |outcome: &RouteOutcome<String>| {
		sink.borrow_mut().push(outcome.content().cloned());
	})
	.with_settings(settings);
	evaluator.mount();

	navigation::push_state("/1").unwrap();
	assert_eq!(rendered(&rendered_log), vec!["cut", "cut"]);
	assert!(matches!(
		evaluator.last_error(),
		Some(RouterError::RedirectLoop { hops: 2, .. })
	));
}

#[rstest]
fn test_redirect_yields_to_newer_navigation(history: MemoryHistory) {
	let table = RouteTable::new()
		.redirect("/a", "/b")
		.route_with("/b", "b".to_string())
		.route_with("/c", "c".to_string())
		.route_with("/", "home".to_string());

	for subscriber_first in [true, false] {
		navigation::replace_state("/").unwrap();
		let start = history.len();
		let follow = || {
			navigation::on_navigate(|event| {
				if event.location.pathname == "/a" {
					navigation::push_state("/c").unwrap();
				}
			})
		};

		let early = subscriber_first.then(follow);
		let (evaluator, log) = mount(table.clone());
		let late = (!subscriber_first).then(follow);

		navigation::push_state("/a").unwrap();

		assert_eq!(rendered(&log), vec!["home", "c"], "subscriber first: {subscriber_first}");
		assert_eq!(history.location().pathname, "/c");
		assert_eq!(history.len(), start + 2);
		assert_eq!(evaluator.last_error(), None);
		drop((early, late, evaluator));
	}
}

#[rstest]
fn test_render_callback_may_navigate(history: MemoryHistory) {
	let rendered_log: Rendered = Rc::new(RefCell::new(Vec::new()));
	let sink = rendered_log.clone();
	let table = RouteTable::new()
		.route_with("/", "home".to_string())
		.route_with("/login", "login".to_string());

	let evaluator = RouteEvaluator::new(table, move |outcome: &RouteOutcome<String>| {
		let content = outcome.content().cloned();
		if content.as_deref() == Some("home") {
			// Stands in for a link click handled during rendering.
			navigation::push_state("/login").unwrap();
		}
		sink.borrow_mut().push(content);
	});
	evaluator.mount();

	assert_eq!(rendered(&rendered_log), vec!["home", "login"]);
	assert_eq!(history.location().pathname, "/login");
}
