//! Integration tests for URI template matching and selection
//!
//! These tests verify:
//! 1. The documented matching examples
//! 2. Literal-only templates match exactly their own path
//! 3. N mandatory segments plus one trailing optional segment
//! 4. First-match-wins selection

use proptest::prelude::*;
use rstest::rstest;
use sentier_urls::{Location, ParameterMap, TemplateSelector, UriTemplate, parse_uri, select};

fn params(pairs: &[(&str, &str)]) -> ParameterMap {
	pairs.iter().copied().collect()
}

#[rstest]
fn test_type_and_id_are_extracted() {
	assert_eq!(
		parse_uri("/user/123", "/:type/:id"),
		Some(params(&[("type", "user"), ("id", "123")]))
	);
}

#[rstest]
fn test_literal_prefix_with_optional_rejects_other_prefix() {
	assert_eq!(parse_uri("/type/123", "/user/:id?"), None);
	assert_eq!(
		select("/type/123", &["/user/:id?", "/:type/:id"]),
		Some("/:type/:id")
	);
}

#[rstest]
fn test_wildcard_query_constraint() {
	assert_eq!(
		parse_uri("/some/path?foo=1", "/some/path?foo=*"),
		Some(params(&[("foo", "1")]))
	);
	assert_eq!(parse_uri("/some/path?bar=2", "/some/path?foo=*"), None);
}

#[rstest]
fn test_path_values_override_query_values() {
	assert_eq!(
		parse_uri("/person/123?id=wrong&type=fake", "/:type/:id"),
		Some(params(&[("type", "person"), ("id", "123")]))
	);
}

#[rstest]
#[case("/")]
#[case("/user/123")]
#[case("/a/b/c?d=e")]
fn test_select_on_empty_list(#[case] uri: &str) {
	assert_eq!(select(uri, &[] as &[&str]), None);
}

#[rstest]
fn test_repeated_evaluation_is_identical() {
	let selector = TemplateSelector::new(["/user/:id?", "/:type/:id"]).unwrap();
	let location = Location::parse("/type/123?tab=posts");

	let first = selector.select_location(&location).map(|s| s.params);
	let second = selector.select_location(&location).map(|s| s.params);
	assert_eq!(first, second);
	assert_eq!(
		first,
		Some(params(&[("type", "type"), ("id", "123"), ("tab", "posts")]))
	);
}

#[rstest]
fn test_reverse_then_match() {
	let template = UriTemplate::new("/orgs/:org/repos/:repo?").unwrap();
	let uri = template
		.reverse(&params(&[("org", "acme"), ("repo", "widgets")]))
		.unwrap();
	assert_eq!(uri, "/orgs/acme/repos/widgets");
	assert_eq!(
		template.matches(&uri),
		Some(params(&[("org", "acme"), ("repo", "widgets")]))
	);
}

fn segment() -> impl Strategy<Value = String> {
	"[a-z0-9_-]{1,8}"
}

proptest! {
	#[test]
	fn prop_literal_template_matches_iff_equal(
		template_segments in prop::collection::vec(segment(), 0..6),
		uri_segments in prop::collection::vec(segment(), 0..6),
	) {
		let template = format!("/{}", template_segments.join("/"));
		let uri = format!("/{}", uri_segments.join("/"));

		let matched = parse_uri(&uri, &template).is_some();
		prop_assert_eq!(matched, template_segments == uri_segments);
	}

	#[test]
	fn prop_literal_template_ignores_outer_slashes(
		segments in prop::collection::vec(segment(), 1..6),
	) {
		let template = format!("/{}", segments.join("/"));
		let uri = format!("{}/", segments.join("/"));
		prop_assert!(parse_uri(&uri, &template).is_some());
	}

	#[test]
	fn prop_trailing_optional_accepts_n_or_n_plus_one(
		mandatory in 0usize..6,
		uri_len in 0usize..9,
	) {
		let mut template = String::new();
		for index in 0..mandatory {
			template.push_str(&format!("/:p{index}"));
		}
		template.push_str("/:tail?");

		let uri = if uri_len == 0 {
			"/".to_string()
		} else {
			(0..uri_len).map(|i| format!("/v{i}")).collect::<String>()
		};

		let matched = parse_uri(&uri, &template).is_some();
		prop_assert_eq!(matched, uri_len == mandatory || uri_len == mandatory + 1);
	}

	#[test]
	fn prop_select_equals_first_matching_template(
		uri_segments in prop::collection::vec(prop::sample::select(vec!["a", "b", "1"]), 0..4),
	) {
		let templates = ["/a/:id?", "/:x/:y", "/b", "/:only", "/"];
		let uri = format!("/{}", uri_segments.join("/"));

		let expected = templates
			.iter()
			.copied()
			.find(|template| parse_uri(&uri, template).is_some());
		prop_assert_eq!(select(&uri, &templates), expected);
	}
}
