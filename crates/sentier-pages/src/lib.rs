//! Navigation-reactive routing for sentier.
//!
//! This crate connects the template matching of `sentier-urls` to a live
//! history:
//!
//! - [`navigation`]: the navigation observer. It unifies `push`, `replace`
//!   and back/forward into one notification channel.
//! - [`router`]: route tables, redirects and the [`RouteEvaluator`] that
//!   re-resolves the location after every navigation.
//! - [`RouterSettings`]: redirect handling configuration.
//!
//! Browser support is compiled for `wasm32` targets only. Native builds use
//! [`MemoryHistory`](navigation::MemoryHistory) or
//! [`StaticHistory`](navigation::StaticHistory).

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod navigation;
pub mod router;
pub mod settings;

pub use error::{NavigationError, RouterError, SettingsError};
pub use navigation::{NavigationEvent, NavigationKind, Subscription, on_navigate};
pub use router::{
	EvaluatorState, Redirect, Route, RouteEvaluator, RouteMatch, RouteOutcome, RouteTable,
};
pub use sentier_urls::{Location, ParameterMap};
pub use settings::RouterSettings;
