//! Error types for URI template compilation and parameter access.

/// Error returned when a template string cannot be compiled.
///
/// These are configuration errors in a route table. Matching a concrete
/// URI never produces one: a URI that does not fit a template is simply
/// a non-match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
	/// The template string is empty.
	#[error("Template is empty")]
	Empty,
	/// The template exceeds the maximum allowed length.
	#[error("Template length {len} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		len: usize,
		/// Maximum length in bytes.
		max: usize,
	},
	/// The template has more path segments than allowed.
	#[error("Template has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Number of segments found.
		count: usize,
		/// Maximum number of segments.
		max: usize,
	},
	/// An interior path segment is empty (`/a//b`).
	#[error("Empty path segment at position {position}")]
	EmptySegment {
		/// Zero-based segment index.
		position: usize,
	},
	/// A `:` parameter marker without a name.
	#[error("Parameter at position {position} has no name")]
	EmptyParameterName {
		/// Zero-based segment index.
		position: usize,
	},
	/// An optional parameter is followed by a mandatory segment.
	#[error("Optional parameter ':{name}?' must be among the trailing segments")]
	OptionalNotTrailing {
		/// Name of the misplaced optional parameter.
		name: String,
	},
	/// The same parameter name is declared twice in the path.
	#[error("Parameter ':{name}' is declared more than once")]
	DuplicateParameter {
		/// The repeated name.
		name: String,
	},
	/// A query constraint has an empty key (`?=value`).
	#[error("Query constraint has an empty key")]
	EmptyQueryKey,
	/// The query part cannot be decoded.
	#[error("Query template '{query}' cannot be decoded")]
	InvalidQuery {
		/// The raw query part.
		query: String,
	},
	/// A segment contains a character that is not allowed there.
	#[error("Segment '{segment}' contains invalid character '{ch}'")]
	InvalidCharacter {
		/// The offending segment.
		segment: String,
		/// The offending character.
		ch: char,
	},
}

/// Error returned by typed parameter access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
	/// The parameter is not present in the map.
	#[error("Missing parameter: {name}")]
	Missing {
		/// Name of the requested parameter.
		name: String,
	},
	/// The parameter value could not be parsed as the requested type.
	#[error("Failed to parse parameter '{name}' value '{raw_value}' as {param_type}: {message}")]
	Parse {
		/// Name of the parameter.
		name: String,
		/// Expected type name.
		param_type: &'static str,
		/// Raw string value that failed to parse.
		raw_value: String,
		/// Error message from parsing.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_template_error_display() {
		assert_eq!(
			TemplateError::OptionalNotTrailing {
				name: "id".to_string()
			}
			.to_string(),
			"Optional parameter ':id?' must be among the trailing segments"
		);
		assert_eq!(
			TemplateError::TooLong { len: 2000, max: 1024 }.to_string(),
			"Template length 2000 exceeds maximum allowed length of 1024 bytes"
		);
	}

	#[rstest]
	fn test_param_error_display() {
		let err = ParamError::Parse {
			name: "id".to_string(),
			param_type: "i64",
			raw_value: "abc".to_string(),
			message: "invalid digit found in string".to_string(),
		};
		assert!(err.to_string().contains("'id'"));
		assert!(err.to_string().contains("abc"));
		assert!(err.to_string().contains("i64"));
	}
}
