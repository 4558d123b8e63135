//! URI template matching
//!
//! ```rust
//! use sentier::urls::{TemplateSelector, parse_uri};
//!
//! let params = parse_uri("/some/path?foo=1", "/some/path?foo=*").unwrap();
//! assert_eq!(params.get("foo"), Some("1"));
//!
//! let selector = TemplateSelector::new(["/user/:id?", "/:type/:id"]).unwrap();
//! assert_eq!(selector.select("/type/123").map(|s| s.index), Some(1));
//! ```

pub use sentier_urls::*;
