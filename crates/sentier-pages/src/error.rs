//! Error types for navigation and route evaluation.

use sentier_urls::TemplateError;

/// Error type for history operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
	/// No history backend has been installed.
	#[error("Navigation observer is not installed")]
	NotInstalled,
	/// The environment cannot navigate (server-side rendering).
	#[error("Environment is not navigable: cannot navigate to {0}")]
	NotNavigable(String),
	/// Another observer already intercepts the host history.
	#[error("History is already intercepted by another navigation observer")]
	AlreadyIntercepted,
	/// The browser `window` object is unavailable.
	#[error("No window object available")]
	NoWindow,
	/// The host history API rejected the operation.
	#[error("History operation failed: {0}")]
	History(String),
}

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// A route template could not be compiled.
	#[error("Invalid route template '{template}': {source}")]
	InvalidTemplate {
		/// The template as written in the route table.
		template: String,
		/// The compilation error.
		source: TemplateError,
	},
	/// A chain of redirects did not settle.
	#[error("Redirect loop after {hops} hops: {}", chain.join(" -> "))]
	RedirectLoop {
		/// Number of redirects followed before giving up.
		hops: usize,
		/// Targets in the order they were visited.
		chain: Vec<String>,
	},
	/// Invalid route name.
	#[error("Invalid route name: {0}")]
	InvalidRouteName(String),
	/// Missing parameter for reverse URL.
	#[error("Missing parameter for template: {0}")]
	MissingParameter(String),
	/// Navigation failed.
	#[error("Navigation failed: {0}")]
	Navigation(#[from] NavigationError),
}

impl RouterError {
	pub(crate) fn invalid_template(template: &str, source: TemplateError) -> Self {
		Self::InvalidTemplate {
			template: template.to_string(),
			source,
		}
	}
}

/// Error type for router settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
	/// The settings source could not be parsed.
	#[error("Failed to parse settings: {0}")]
	Parse(String),
	/// A setting has an unusable value.
	#[error("Invalid setting: {0}")]
	ValidationError(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_router_error_display() {
		assert_eq!(
			RouterError::InvalidRouteName("test".to_string()).to_string(),
			"Invalid route name: test"
		);
		assert_eq!(
			RouterError::RedirectLoop {
				hops: 2,
				chain: vec!["/a".to_string(), "/b".to_string()],
			}
			.to_string(),
			"Redirect loop after 2 hops: /a -> /b"
		);
	}

	#[rstest]
	fn test_invalid_template_display() {
		let err = RouterError::invalid_template("/:id?/edit", TemplateError::OptionalNotTrailing {
			name: "id".to_string(),
		});
		assert!(err.to_string().contains("/:id?/edit"));
		assert!(err.to_string().contains("':id?'"));
	}

	#[rstest]
	fn test_navigation_error_converts() {
		let err: RouterError = NavigationError::NotInstalled.into();
		assert_eq!(
			err.to_string(),
			"Navigation failed: Navigation observer is not installed"
		);
	}
}
