//! URI template compilation and matching.
//!
//! A template is a path of `/`-separated segments followed by an optional
//! query part:
//!
//! - `users` - literal segment, matched exactly (case-sensitive)
//! - `:id` - named parameter, captures one non-empty segment
//! - `:id?` - optional parameter, only allowed among the trailing segments
//! - `?tab=posts` - the URI must carry `tab` with exactly this value
//! - `?tab=*` - the URI must carry `tab`, any value is accepted
//!
//! A `?` directly after a parameter name that is followed by `/`, `?` or the
//! end of the template marks the parameter optional. Any other `?` starts the
//! query part, so an optional trailing parameter with query constraints is
//! written `/:id??tab=*` or `/:id?/?tab=*`.
//!
//! Query keys present in the URI are always captured, declared or not. Path
//! parameters win over query keys of the same name.

use crate::error::TemplateError;
use crate::location::Location;
use crate::params::ParameterMap;
use crate::query::{self, QueryConstraint};
use std::fmt;

/// Maximum allowed length for a template string in bytes.
pub const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a template.
pub const MAX_TEMPLATE_SEGMENTS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param { name: String, optional: bool },
}

/// A compiled URI template.
///
/// Compile once with [`UriTemplate::new`] and match as often as needed.
/// Two templates are equal when their source strings are equal.
///
/// # Example
///
/// ```
/// use sentier_urls::UriTemplate;
///
/// let template = UriTemplate::new("/:type/:id?").unwrap();
///
/// let params = template.matches("/user/123").unwrap();
/// assert_eq!(params.get("type"), Some("user"));
/// assert_eq!(params.get("id"), Some("123"));
///
/// assert!(template.matches("/user").is_some());
/// assert!(template.matches("/user/123/extra").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct UriTemplate {
	/// The original template string.
	source: String,
	/// Path segments in order.
	segments: Vec<Segment>,
	/// Number of leading segments that must be present.
	required: usize,
	/// Whether the path part ends with `/`.
	trailing_slash: bool,
	/// Declared query constraints in declaration order.
	query: Vec<(String, QueryConstraint)>,
}

impl UriTemplate {
	/// Compiles a template string.
	///
	/// # Errors
	///
	/// Returns a [`TemplateError`] when the template is empty, too long, has
	/// too many segments, an empty interior segment, an unnamed or duplicate
	/// parameter, an optional parameter before a mandatory segment, or an
	/// invalid query part.
	pub fn new(template: &str) -> Result<Self, TemplateError> {
		if template.is_empty() {
			return Err(TemplateError::Empty);
		}
		if template.len() > MAX_TEMPLATE_LENGTH {
			return Err(TemplateError::TooLong {
				len: template.len(),
				max: MAX_TEMPLATE_LENGTH,
			});
		}

		let (path, query_template) = split_template(template);
		let segments = compile_path(path)?;
		let required = segments
			.iter()
			.take_while(|segment| !matches!(segment, Segment::Param { optional: true, .. }))
			.count();
		let query = match query_template {
			Some(q) => query::compile_constraints(q)?,
			None => Vec::new(),
		};

		Ok(Self {
			source: template.to_string(),
			trailing_slash: !segments.is_empty() && path.ends_with('/'),
			segments,
			required,
			query,
		})
	}

	/// Returns the original template string.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Returns the path parameter names in declaration order.
	pub fn param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| match segment {
				Segment::Param { name, .. } => Some(name.as_str()),
				Segment::Literal(_) => None,
			})
			.collect()
	}

	/// Returns the declared query keys in declaration order.
	pub fn query_keys(&self) -> Vec<&str> {
		self.query.iter().map(|(key, _)| key.as_str()).collect()
	}

	/// Returns whether the template has no parameters and no query constraints.
	pub fn is_exact(&self) -> bool {
		self.query.is_empty()
			&& self
				.segments
				.iter()
				.all(|segment| matches!(segment, Segment::Literal(_)))
	}

	/// Returns the number of path segments, optional ones included.
	pub fn segment_count(&self) -> usize {
		self.segments.len()
	}

	/// Returns the number of trailing optional segments.
	pub fn optional_count(&self) -> usize {
		self.segments.len() - self.required
	}

	/// Matches a URI (`/path?query#fragment`) against this template.
	pub fn matches(&self, uri: &str) -> Option<ParameterMap> {
		self.matches_location(&Location::parse(uri))
	}

	/// Matches a location against this template.
	///
	/// Returns the captured parameters, or `None` when the location does not
	/// fit. Never fails otherwise.
	pub fn matches_location(&self, location: &Location) -> Option<ParameterMap> {
		let path_params = self.match_path(&location.pathname)?;

		let uri_query = query::parse_query(&location.search)?;
		if !query::satisfies(&self.query, &uri_query) {
			return None;
		}

		let mut params = ParameterMap::from(uri_query);
		params.extend(path_params);
		Some(params)
	}

	/// Checks whether the URI matches without building the parameter map.
	pub fn is_match(&self, uri: &str) -> bool {
		self.matches(uri).is_some()
	}

	fn match_path<'a>(&'a self, pathname: &'a str) -> Option<Vec<(&'a str, &'a str)>> {
		let actual = split_path(pathname);
		if actual.len() > self.segments.len() || actual.len() < self.required {
			return None;
		}

		let mut captured = Vec::new();
		for (index, segment) in self.segments.iter().enumerate() {
			match (segment, actual.get(index)) {
				(Segment::Literal(expected), Some(value)) if expected == value => {}
				(Segment::Param { name, .. }, Some(value)) if !value.is_empty() => {
					captured.push((name.as_str(), *value));
				}
				(Segment::Param { optional: true, .. }, None) => {}
				_ => return None,
			}
		}
		Some(captured)
	}

	/// Generates a URI from this template and the given parameters.
	///
	/// Trailing optional parameters missing from `params` are left out.
	/// Literal query constraints are emitted as declared; wildcard ones take
	/// their value from `params`. Returns `None` when a mandatory parameter or
	/// a wildcard query value is missing.
	///
	/// # Example
	///
	/// ```
	/// use sentier_urls::{ParameterMap, UriTemplate};
	///
	/// let template = UriTemplate::new("/users/:id/?tab=*").unwrap();
	/// let params: ParameterMap = [("id", "42"), ("tab", "posts")].into_iter().collect();
	/// assert_eq!(template.reverse(&params).as_deref(), Some("/users/42/?tab=posts"));
	/// ```
	pub fn reverse(&self, params: &ParameterMap) -> Option<String> {
		let mut uri = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(literal) => {
					uri.push('/');
					uri.push_str(literal);
				}
				Segment::Param { name, optional } => match params.get(name) {
					Some(value) => {
						uri.push('/');
						uri.push_str(value);
					}
					// Everything after the first optional segment is optional too.
					None if *optional => break,
					None => return None,
				},
			}
		}
		if uri.is_empty() || self.trailing_slash {
			uri.push('/');
		}

		if !self.query.is_empty() {
			let mut pairs = Vec::with_capacity(self.query.len());
			for (key, constraint) in &self.query {
				let value = match constraint {
					QueryConstraint::Literal(value) => value.as_str(),
					QueryConstraint::Wildcard => params.get(key)?,
				};
				pairs.push((key.as_str(), value));
			}
			let encoded = serde_urlencoded::to_string(&pairs).ok()?;
			uri.push('?');
			uri.push_str(&encoded);
		}

		Some(uri)
	}
}

impl PartialEq for UriTemplate {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for UriTemplate {}

impl fmt::Display for UriTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

impl std::str::FromStr for UriTemplate {
	type Err = TemplateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Matches `uri` against `template` in one call.
///
/// This is the string-level entry point. A malformed template never matches
/// and is logged; compile it with [`UriTemplate::new`] to get the error.
///
/// # Example
///
/// ```
/// use sentier_urls::parse_uri;
///
/// let params = parse_uri("/person/123?id=wrong&type=fake", "/:type/:id").unwrap();
/// assert_eq!(params.get("type"), Some("person"));
/// assert_eq!(params.get("id"), Some("123"));
///
/// assert!(parse_uri("/type/123", "/user/:id?").is_none());
/// ```
pub fn parse_uri(uri: &str, template: &str) -> Option<ParameterMap> {
	match UriTemplate::new(template) {
		Ok(compiled) => compiled.matches(uri),
		Err(err) => {
			tracing::warn!(template, error = %err, "Malformed URI template never matches");
			None
		}
	}
}

/// Splits a template into its path part and its query part.
fn split_template(template: &str) -> (&str, Option<&str>) {
	let mut segment_start = 0;
	for (index, ch) in template.char_indices() {
		match ch {
			'/' => segment_start = index + 1,
			'?' => {
				let segment = &template[segment_start..index];
				let next = template[index + 1..].chars().next();
				let marks_optional = segment.len() > 1
					&& segment.starts_with(':')
					&& !segment.contains('?')
					&& matches!(next, None | Some('/') | Some('?'));
				if !marks_optional {
					return (&template[..index], Some(&template[index + 1..]));
				}
			}
			_ => {}
		}
	}
	(template, None)
}

/// Splits a concrete path into segments, ignoring leading and trailing slashes.
fn split_path(path: &str) -> Vec<&str> {
	let trimmed = path.trim_matches('/');
	if trimmed.is_empty() {
		Vec::new()
	} else {
		trimmed.split('/').collect()
	}
}

fn compile_path(path: &str) -> Result<Vec<Segment>, TemplateError> {
	let raw_segments = split_path(path);
	if raw_segments.len() > MAX_TEMPLATE_SEGMENTS {
		return Err(TemplateError::TooManySegments {
			count: raw_segments.len(),
			max: MAX_TEMPLATE_SEGMENTS,
		});
	}

	let mut segments: Vec<Segment> = Vec::with_capacity(raw_segments.len());
	let mut first_optional: Option<String> = None;

	for (position, raw) in raw_segments.into_iter().enumerate() {
		if raw.is_empty() {
			return Err(TemplateError::EmptySegment { position });
		}

		let segment = match raw.strip_prefix(':') {
			Some(param) => {
				let (name, optional) = match param.strip_suffix('?') {
					Some(name) => (name, true),
					None => (param, false),
				};
				if name.is_empty() {
					return Err(TemplateError::EmptyParameterName { position });
				}
				if let Some(ch) = name
					.chars()
					.find(|c| !(c.is_alphanumeric() || *c == '_' || *c == '-'))
				{
					return Err(TemplateError::InvalidCharacter {
						segment: raw.to_string(),
						ch,
					});
				}
				let duplicate = segments.iter().any(
					|segment| matches!(segment, Segment::Param { name: existing, .. } if existing == name),
				);
				if duplicate {
					return Err(TemplateError::DuplicateParameter {
						name: name.to_string(),
					});
				}
				Segment::Param {
					name: name.to_string(),
					optional,
				}
			}
			None => {
				if let Some(ch) = raw.chars().find(|c| matches!(c, '#' | '?')) {
					return Err(TemplateError::InvalidCharacter {
						segment: raw.to_string(),
						ch,
					});
				}
				Segment::Literal(raw.to_string())
			}
		};

		let is_optional = matches!(segment, Segment::Param { optional: true, .. });
		match (&first_optional, is_optional) {
			(Some(name), false) => {
				return Err(TemplateError::OptionalNotTrailing { name: name.clone() });
			}
			(None, true) => {
				if let Segment::Param { name, .. } = &segment {
					first_optional = Some(name.clone());
				}
			}
			_ => {}
		}
		segments.push(segment);
	}

	Ok(segments)
}
