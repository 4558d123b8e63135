//! Integration tests for the facade crate
//!
//! These tests verify that the re-exported matching and routing APIs work
//! together through the `sentier` paths.

use rstest::rstest;
use sentier::prelude::*;

#[rstest]
#[case("/user/123", Some("/user/:id?"))]
#[case("/post/123", Some("/:type/:id"))]
#[case("/user", Some("/user/:id?"))]
#[case("/a/b/c", None)]
fn test_select_through_facade(#[case] uri: &str, #[case] expected: Option<&str>) {
	let templates = ["/user/:id?", "/:type/:id"];
	assert_eq!(select(uri, &templates), expected);
}

#[cfg(feature = "pages")]
#[rstest]
fn test_route_table_through_facade() {
	let table = RouteTable::new()
		.route("/:type/:id", |params: &ParameterMap| {
			params.get("type").unwrap_or_default().to_string()
		})
		.not_found(|| "unknown".to_string());

	let outcome = table.resolve(&Location::parse("/person/1?type=fake"));
	assert_eq!(outcome.content().map(String::as_str), Some("person"));
	assert!(matches!(
		table.resolve(&Location::parse("/")),
		RouteOutcome::Unmatched { fallback: Some(_) }
	));
}

#[cfg(feature = "pages")]
#[rstest]
fn test_navigation_through_facade() {
	navigation::init_with(navigation::StaticHistory::new("/ssr")).unwrap();
	assert_eq!(navigation::current_location().pathname, "/ssr");
	assert!(!navigation::is_navigable());
}
