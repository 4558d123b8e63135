//! Query string decoding and query-template constraints.

use crate::error::TemplateError;
use std::collections::HashMap;

/// A value declared for a key in a template's query part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryConstraint {
	/// The URI must carry exactly this value.
	Literal(String),
	/// The URI must carry the key; any value is accepted.
	Wildcard,
}

impl QueryConstraint {
	fn accepts(&self, value: &str) -> bool {
		match self {
			Self::Literal(expected) => expected == value,
			Self::Wildcard => true,
		}
	}
}

/// Decodes `key=value&key2=value2` pairs in order.
///
/// Percent escapes and `+` are decoded. A bare key (`flag`) decodes to an
/// empty value. Returns `None` when the input cannot be decoded.
pub(crate) fn decode_pairs(search: &str) -> Option<Vec<(String, String)>> {
	let search = search.strip_prefix('?').unwrap_or(search);
	if search.is_empty() {
		return Some(Vec::new());
	}
	serde_urlencoded::from_str::<Vec<(String, String)>>(search).ok()
}

/// Decodes a URI query string into a map. The last occurrence of a key wins.
pub(crate) fn parse_query(search: &str) -> Option<HashMap<String, String>> {
	decode_pairs(search).map(|pairs| pairs.into_iter().collect())
}

/// Compiles the query part of a template.
///
/// Declaration order is kept for reverse URL generation. A key declared twice
/// keeps its position and takes the later value.
pub(crate) fn compile_constraints(
	query_template: &str,
) -> Result<Vec<(String, QueryConstraint)>, TemplateError> {
	let pairs = decode_pairs(query_template).ok_or_else(|| TemplateError::InvalidQuery {
		query: query_template.to_string(),
	})?;

	let mut constraints: Vec<(String, QueryConstraint)> = Vec::with_capacity(pairs.len());
	for (key, value) in pairs {
		if key.is_empty() {
			return Err(TemplateError::EmptyQueryKey);
		}
		let constraint = if value == "*" {
			QueryConstraint::Wildcard
		} else {
			QueryConstraint::Literal(value)
		};
		match constraints.iter_mut().find(|(k, _)| *k == key) {
			Some(slot) => slot.1 = constraint,
			None => constraints.push((key, constraint)),
		}
	}
	Ok(constraints)
}

/// Checks every declared constraint against the decoded URI query.
pub(crate) fn satisfies(
	constraints: &[(String, QueryConstraint)],
	query: &HashMap<String, String>,
) -> bool {
	constraints.iter().all(|(key, constraint)| {
		query
			.get(key)
			.is_some_and(|value| constraint.accepts(value))
	})
}
