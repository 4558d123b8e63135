//! # Sentier
//!
//! Client-side URI template routing for Rust frontends.
//!
//! Sentier matches the current location against an ordered list of route
//! templates, extracts path and query parameters, and keeps a rendering
//! callback in sync with browser navigation.
//!
//! ## Feature Flags
//!
//! - `minimal` - Template matching only ([`urls`])
//! - `pages` - Navigation observer and route evaluator ([`pages`])
//! - `full` (default) - All features enabled
//!
//! ## Template Syntax
//!
//! | Template | Matches |
//! |----------|---------|
//! | `/users` | exactly `/users` |
//! | `/:type/:id` | any two segments |
//! | `/user/:id?` | `/user` and `/user/42` |
//! | `/search?q=*` | `/search` with a `q` query parameter |
//!
//! ## Quick Example
//!
//! ```rust
//! use sentier::prelude::*;
//!
//! assert_eq!(
//!     select("/type/123", &["/user/:id?", "/:type/:id"]),
//!     Some("/:type/:id")
//! );
//!
//! let params = parse_uri("/person/123?id=wrong", "/:type/:id").unwrap();
//! assert_eq!(params.get("id"), Some("123"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "pages")]
pub mod pages;
pub mod urls;

pub use sentier_urls::{
	Location, ParamError, ParameterMap, Selection, TemplateError, TemplateSelector, UriTemplate,
	parse_uri, select,
};

#[cfg(feature = "pages")]
pub use sentier_pages::{
	EvaluatorState, NavigationError, NavigationEvent, NavigationKind, Redirect, Route,
	RouteEvaluator, RouteMatch, RouteOutcome, RouteTable, RouterError, RouterSettings,
	SettingsError, Subscription,
};

/// Prelude module for convenient imports
///
/// Import commonly used types with:
/// ```rust
/// use sentier::prelude::*;
/// ```
pub mod prelude {
	// Template matching - always available
	pub use crate::{Location, ParameterMap, TemplateSelector, UriTemplate, parse_uri, select};

	#[cfg(feature = "pages")]
	pub use crate::pages::navigation::{self, on_navigate};

	#[cfg(feature = "pages")]
	pub use crate::{
		Redirect, RouteEvaluator, RouteOutcome, RouteTable, RouterError, RouterSettings,
	};
}
