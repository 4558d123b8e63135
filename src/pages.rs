//! Navigation observer and reactive route evaluation
//!
//! This module provides access to sentier-pages.
//!
//! ## Architecture
//!
//! - **Navigation Observer**: one notification channel for push, replace and back/forward
//! - **Route Table**: ordered routes with guards, named routes and redirects
//! - **Route Evaluator**: re-resolves the location on every navigation
//!
//! ## Example
//!
//! ```rust
//! use sentier::pages::navigation::{self, MemoryHistory};
//! use sentier::pages::{RouteEvaluator, RouteTable};
//!
//! navigation::init_with(MemoryHistory::new("/posts/7")).unwrap();
//!
//! let table = RouteTable::new()
//!     .route("/posts/:id", |params| format!("post {}", params.get("id").unwrap_or_default()))
//!     .not_found(|| "not found".to_string());
//!
//! let evaluator = RouteEvaluator::new(table, |outcome| {
//!     if let Some(content) = outcome.content() {
//!         println!("{content}");
//!     }
//! });
//! evaluator.mount();
//! ```

// Re-export all sentier-pages functionality
pub use sentier_pages::*;
