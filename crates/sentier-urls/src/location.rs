//! The location value that templates are matched against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location split into its path and query parts.
///
/// The default value (both fields empty) is the placeholder used where no
/// navigable document exists, such as during server-side rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
	/// The path part, e.g. `/users/42`.
	pub pathname: String,
	/// The query part without the leading `?`, e.g. `tab=posts`.
	pub search: String,
}

impl Location {
	/// Creates a location from its parts.
	///
	/// A leading `?` on `search` is stripped, so values read straight from
	/// `window.location.search` can be passed as-is.
	pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
		let search = search.into();
		let search = match search.strip_prefix('?') {
			Some(rest) => rest.to_string(),
			None => search,
		};
		Self {
			pathname: pathname.into(),
			search,
		}
	}

	/// Splits a URI into pathname and search.
	///
	/// The fragment is dropped. An absolute URL (`https://host/path?q`) has
	/// its scheme and authority removed first.
	///
	/// # Example
	///
	/// ```
	/// use sentier_urls::Location;
	///
	/// let location = Location::parse("/some/path?foo=1#top");
	/// assert_eq!(location.pathname, "/some/path");
	/// assert_eq!(location.search, "foo=1");
	/// ```
	pub fn parse(uri: &str) -> Self {
		let uri = strip_origin(uri);
		let uri = uri.split_once('#').map_or(uri, |(before, _)| before);

		match uri.split_once('?') {
			Some((pathname, search)) => Self {
				pathname: pathname.to_string(),
				search: search.to_string(),
			},
			None => Self {
				pathname: uri.to_string(),
				search: String::new(),
			},
		}
	}

	/// Joins the location back into a URI string.
	pub fn to_uri(&self) -> String {
		if self.search.is_empty() {
			self.pathname.clone()
		} else {
			format!("{}?{}", self.pathname, self.search)
		}
	}

	/// Returns whether both parts are empty.
	pub fn is_empty(&self) -> bool {
		self.pathname.is_empty() && self.search.is_empty()
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_uri())
	}
}

impl From<&str> for Location {
	fn from(uri: &str) -> Self {
		Self::parse(uri)
	}
}

/// Removes `scheme://authority` from an absolute URL.
fn strip_origin(uri: &str) -> &str {
	let Some(scheme_end) = uri.find("://") else {
		return uri;
	};
	// Only a scheme when "://" comes before any path, query or fragment delimiter.
	if uri.find(['/', '?', '#']) != Some(scheme_end + 1) {
		return uri;
	}
	let after = &uri[scheme_end + 3..];
	match after.find(['/', '?', '#']) {
		Some(index) => &after[index..],
		None => "",
	}
}
