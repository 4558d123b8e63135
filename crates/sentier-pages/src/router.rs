//! Client-side router.
//!
//! [`RouteTable`] holds the ordered routes and resolves a location to a
//! [`RouteOutcome`]. [`RouteEvaluator`] keeps that outcome in sync with the
//! navigation channel.

mod core;
mod evaluator;

pub use self::core::{Redirect, Route, RouteMatch, RouteOutcome, RouteTable};
pub use evaluator::{EvaluatorState, RouteEvaluator};
