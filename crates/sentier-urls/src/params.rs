//! Parameter maps produced by a successful match.

use crate::error::ParamError;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt::Display;
use std::str::FromStr;

/// Mapping from parameter name to the string value captured for it.
///
/// Keys come from matched path parameters and from the query string. When a
/// path parameter and a query key share a name, the path value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(HashMap<String, String>);

impl ParameterMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the value captured for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Parses the value captured for `name` as `T`.
	///
	/// # Example
	///
	/// ```
	/// use sentier_urls::parse_uri;
	///
	/// let params = parse_uri("/user/123", "/:type/:id").unwrap();
	/// let id: u64 = params.get_as("id").unwrap();
	/// assert_eq!(id, 123);
	/// ```
	pub fn get_as<T>(&self, name: &str) -> Result<T, ParamError>
	where
		T: FromStr,
		T::Err: Display,
	{
		let raw = self.get(name).ok_or_else(|| ParamError::Missing {
			name: name.to_string(),
		})?;

		raw.parse::<T>().map_err(|e| ParamError::Parse {
			name: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.to_string(),
			message: e.to_string(),
		})
	}

	/// Returns whether a value was captured for `name`.
	pub fn contains_key(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Inserts a value, returning the previous one.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	/// Returns the number of captured parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns whether nothing was captured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(name, value)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Consumes the map and returns the underlying `HashMap`.
	pub fn into_inner(self) -> HashMap<String, String> {
		self.0
	}
}

impl From<HashMap<String, String>> for ParameterMap {
	fn from(map: HashMap<String, String>) -> Self {
		Self(map)
	}
}

impl<K, V> FromIterator<(K, V)> for ParameterMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

impl<K, V> Extend<(K, V)> for ParameterMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		self.0
			.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
	}
}

impl IntoIterator for ParameterMap {
	type Item = (String, String);
	type IntoIter = hash_map::IntoIter<String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
