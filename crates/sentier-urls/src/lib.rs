//! URI template matching for sentier.
//!
//! This crate holds the pure, synchronous part of the router: compiling
//! route templates, matching a location against one template, and picking
//! the first matching template out of an ordered list.
//!
//! ## Template Syntax
//!
//! - `/users` - literal segments
//! - `/:type/:id` - named parameters
//! - `/user/:id?` - trailing optional parameter
//! - `/search?q=*&lang=en` - query constraints (`*` accepts any value)
//!
//! ## Example
//!
//! ```
//! use sentier_urls::{parse_uri, select};
//!
//! let params = parse_uri("/user/123", "/:type/:id").unwrap();
//! assert_eq!(params.get("type"), Some("user"));
//! assert_eq!(params.get("id"), Some("123"));
//!
//! assert_eq!(
//!     select("/type/123", &["/user/:id?", "/:type/:id"]),
//!     Some("/:type/:id")
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod location;
mod params;
mod query;
mod selector;
mod template;

pub use error::{ParamError, TemplateError};
pub use location::Location;
pub use params::ParameterMap;
pub use selector::{Selection, TemplateSelector, select};
pub use template::{MAX_TEMPLATE_LENGTH, MAX_TEMPLATE_SEGMENTS, UriTemplate, parse_uri};
