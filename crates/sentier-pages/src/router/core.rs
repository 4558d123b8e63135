//! Route table and resolution.
//!
//! A [`RouteTable`] is an ordered list of routes. Resolution runs the
//! template selector over the route templates, applies guards, and turns
//! the first accepted route into a [`RouteOutcome`].

use crate::error::RouterError;
use sentier_urls::{Location, ParameterMap, TemplateSelector, UriTemplate};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Type alias for route guard functions.
pub(super) type RouteGuard = Rc<dyn Fn(&ParameterMap) -> bool>;

type Producer<V> = Rc<dyn Fn(&ParameterMap) -> V>;

/// A redirect target.
///
/// The target is itself a template: `:name` segments and `*` query values
/// are filled from the parameters of the route that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	/// The destination template.
	to: UriTemplate,
	/// Whether to replace the current history entry.
	replace: bool,
}

impl Redirect {
	/// Creates a new redirect that replaces the current history entry.
	pub fn new(to: &str) -> Result<Self, RouterError> {
		let to = UriTemplate::new(to).map_err(|e| RouterError::invalid_template(to, e))?;
		Ok(Self { to, replace: true })
	}

	/// Sets whether to use replace navigation.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Returns the destination template.
	pub fn to(&self) -> &UriTemplate {
		&self.to
	}

	/// Returns whether replace navigation is used.
	pub fn is_replace(&self) -> bool {
		self.replace
	}

	/// Builds the concrete target from matched parameters.
	pub fn target(&self, params: &ParameterMap) -> Option<String> {
		self.to.reverse(params)
	}
}

enum RouteTarget<V> {
	Content(Producer<V>),
	Redirect(Redirect),
}

impl<V> Clone for RouteTarget<V> {
	fn clone(&self) -> Self {
		match self {
			Self::Content(producer) => Self::Content(producer.clone()),
			Self::Redirect(redirect) => Self::Redirect(redirect.clone()),
		}
	}
}

/// A single route definition.
pub struct Route<V> {
	/// The path template.
	template: UriTemplate,
	/// Optional route name for reverse lookups.
	name: Option<String>,
	/// Content producer or redirect.
	target: RouteTarget<V>,
	/// Optional guard function.
	guard: Option<RouteGuard>,
}

impl<V> Clone for Route<V> {
	fn clone(&self) -> Self {
		Self {
			template: self.template.clone(),
			name: self.name.clone(),
			target: self.target.clone(),
			guard: self.guard.clone(),
		}
	}
}

impl<V> fmt::Debug for Route<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("template", &self.template.as_str())
			.field("name", &self.name)
			.field("redirect", &self.redirect_target())
			.field("has_guard", &self.guard.is_some())
			.finish()
	}
}

impl<V> Route<V> {
	/// Creates a route whose content is produced from the matched parameters.
	pub fn new<F>(template: &str, producer: F) -> Result<Self, RouterError>
	where
		F: Fn(&ParameterMap) -> V + 'static,
	{
		Ok(Self {
			template: compile(template)?,
			name: None,
			target: RouteTarget::Content(Rc::new(producer)),
			guard: None,
		})
	}

	/// Creates a route with fixed content.
	pub fn with_content(template: &str, content: V) -> Result<Self, RouterError>
	where
		V: Clone + 'static,
	{
		Self::new(template, move |_| content.clone())
	}

	/// Creates a route that redirects instead of producing content.
	pub fn redirect(template: &str, redirect: Redirect) -> Result<Self, RouterError> {
		let template = compile(template)?;
		check_redirect_params(&template, &redirect)?;
		Ok(Self {
			template,
			name: None,
			target: RouteTarget::Redirect(redirect),
			guard: None,
		})
	}

	/// Sets the route name.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Adds a guard. A route whose guard returns false falls through to the
	/// next route.
	pub fn with_guard<G>(mut self, guard: G) -> Self
	where
		G: Fn(&ParameterMap) -> bool + 'static,
	{
		self.guard = Some(Rc::new(guard));
		self
	}

	/// Returns the route name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the route template.
	pub fn template(&self) -> &UriTemplate {
		&self.template
	}

	/// Returns the redirect, if this is a redirect route.
	pub fn redirect_target(&self) -> Option<&Redirect> {
		match &self.target {
			RouteTarget::Redirect(redirect) => Some(redirect),
			RouteTarget::Content(_) => None,
		}
	}

	/// Returns whether this route redirects.
	pub fn is_redirect(&self) -> bool {
		self.redirect_target().is_some()
	}

	/// Checks the guard against matched parameters.
	pub fn check_guard(&self, params: &ParameterMap) -> bool {
		self.guard.as_ref().is_none_or(|guard| guard(params))
	}

	/// Produces the content for matched parameters. Redirect routes have none.
	pub fn render(&self, params: &ParameterMap) -> Option<V> {
		match &self.target {
			RouteTarget::Content(producer) => Some(producer(params)),
			RouteTarget::Redirect(_) => None,
		}
	}
}

/// A matched content route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<V> {
	/// Source of the matched template.
	pub template: String,
	/// Name of the matched route.
	pub name: Option<String>,
	/// Extracted parameters.
	pub params: ParameterMap,
	/// Content produced for the parameters.
	pub content: V,
}

/// The result of resolving a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome<V> {
	/// A content route matched.
	Matched(RouteMatch<V>),
	/// A redirect route matched.
	Redirect {
		/// Source of the matched redirect template.
		from: String,
		/// Concrete target URI.
		to: String,
		/// Whether to replace the current history entry.
		replace: bool,
	},
	/// No route matched.
	Unmatched {
		/// Content of the not-found handler, if one is set.
		fallback: Option<V>,
	},
}

impl<V> RouteOutcome<V> {
	/// Returns whether a content route matched.
	pub fn is_matched(&self) -> bool {
		matches!(self, Self::Matched(_))
	}

	/// Returns the matched parameters.
	pub fn params(&self) -> Option<&ParameterMap> {
		match self {
			Self::Matched(route_match) => Some(&route_match.params),
			_ => None,
		}
	}

	/// Returns the content to render: the matched content or the fallback.
	pub fn content(&self) -> Option<&V> {
		match self {
			Self::Matched(route_match) => Some(&route_match.content),
			Self::Unmatched { fallback } => fallback.as_ref(),
			Self::Redirect { .. } => None,
		}
	}
}

/// An ordered route table.
///
/// Declaration order is precedence: the first route whose template matches
/// and whose guard accepts wins.
///
/// # Example
///
/// ```
/// use sentier_pages::{Location, RouteOutcome, RouteTable};
///
/// let table = RouteTable::new()
///     .route("/user/:id?", |params| format!("user {:?}", params.get("id")))
///     .route("/:type/:id", |params| format!("{} {}", params.get("type").unwrap(), params.get("id").unwrap()))
///     .redirect("/", "/user");
///
/// match table.resolve(&Location::parse("/type/123")) {
///     RouteOutcome::Matched(m) => assert_eq!(m.content, "type 123"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub struct RouteTable<V> {
	routes: Vec<Route<V>>,
	selector: TemplateSelector,
	named_routes: HashMap<String, usize>,
	not_found: Option<Rc<dyn Fn() -> V>>,
}

impl<V> fmt::Debug for RouteTable<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteTable")
			.field("routes", &self.routes)
			.field("has_not_found", &self.not_found.is_some())
			.finish()
	}
}

impl<V> Default for RouteTable<V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V> Clone for RouteTable<V> {
	fn clone(&self) -> Self {
		Self {
			routes: self.routes.clone(),
			selector: self.selector.clone(),
			named_routes: self.named_routes.clone(),
			not_found: self.not_found.clone(),
		}
	}
}

impl<V> RouteTable<V> {
	/// Creates an empty route table.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			selector: TemplateSelector::default(),
			named_routes: HashMap::new(),
			not_found: None,
		}
	}

	/// Appends a route, failing on an empty or duplicate route name.
	pub fn try_add(mut self, route: Route<V>) -> Result<Self, RouterError> {
		if let Some(name) = route.name() {
			if name.is_empty() || self.named_routes.contains_key(name) {
				return Err(RouterError::InvalidRouteName(name.to_string()));
			}
			self.named_routes.insert(name.to_string(), self.routes.len());
		}
		self.selector.push(route.template.clone());
		self.routes.push(route);
		Ok(self)
	}

	/// Appends a route.
	///
	/// # Panics
	///
	/// Panics on an empty or duplicate route name. Use [`try_add`](Self::try_add)
	/// to handle the error.
	pub fn add(self, route: Route<V>) -> Self {
		self.try_add(route).unwrap_or_else(|e| panic!("{e}"))
	}

	/// Adds a route whose content is produced from the matched parameters.
	pub fn try_route<F>(self, template: &str, producer: F) -> Result<Self, RouterError>
	where
		F: Fn(&ParameterMap) -> V + 'static,
	{
		self.try_add(Route::new(template, producer)?)
	}

	/// Adds a route to the table.
	///
	/// # Panics
	///
	/// Panics if `template` is malformed.
	pub fn route<F>(self, template: &str, producer: F) -> Self
	where
		F: Fn(&ParameterMap) -> V + 'static,
	{
		self.try_route(template, producer)
			.unwrap_or_else(|e| panic!("{e}"))
	}

	/// Adds a route with fixed content.
	pub fn try_route_with(self, template: &str, content: V) -> Result<Self, RouterError>
	where
		V: Clone + 'static,
	{
		self.try_add(Route::with_content(template, content)?)
	}

	/// Adds a route with fixed content.
	///
	/// # Panics
	///
	/// Panics if `template` is malformed.
	pub fn route_with(self, template: &str, content: V) -> Self
	where
		V: Clone + 'static,
	{
		self.try_route_with(template, content)
			.unwrap_or_else(|e| panic!("{e}"))
	}

	/// Adds a named route.
	pub fn try_named_route<F>(
		self,
		name: &str,
		template: &str,
		producer: F,
	) -> Result<Self, RouterError>
	where
		F: Fn(&ParameterMap) -> V + 'static,
	{
		self.try_add(Route::new(template, producer)?.named(name))
	}

	/// Adds a named route to the table.
	///
	/// # Panics
	///
	/// Panics if `template` is malformed or `name` is empty or already used.
	pub fn named_route<F>(self, name: &str, template: &str, producer: F) -> Self
	where
		F: Fn(&ParameterMap) -> V + 'static,
	{
		self.try_named_route(name, template, producer)
			.unwrap_or_else(|e| panic!("{e}"))
	}

	/// Adds a route with a guard.
	pub fn try_guarded_route<F, G>(
		self,
		template: &str,
		producer: F,
		guard: G,
	) -> Result<Self, RouterError>
	where
		F: Fn(&ParameterMap) -> V + 'static,
		G: Fn(&ParameterMap) -> bool + 'static,
	{
		self.try_add(Route::new(template, producer)?.with_guard(guard))
	}

	/// Adds a route with a guard.
	///
	/// # Panics
	///
	/// Panics if `template` is malformed.
	pub fn guarded_route<F, G>(self, template: &str, producer: F, guard: G) -> Self
	where
		F: Fn(&ParameterMap) -> V + 'static,
		G: Fn(&ParameterMap) -> bool + 'static,
	{
		self.try_guarded_route(template, producer, guard)
			.unwrap_or_else(|e| panic!("{e}"))
	}

	/// Adds a redirect route that replaces the current history entry.
	pub fn try_redirect(self, template: &str, to: &str) -> Result<Self, RouterError> {
		self.try_add(Route::redirect(template, Redirect::new(to)?)?)
	}

	/// Adds a redirect route that replaces the current history entry.
	///
	/// # Panics
	///
	/// Panics if either template is malformed, or if `to` needs a parameter
	/// that `template` never captures.
	pub fn redirect(self, template: &str, to: &str) -> Self {
		self.try_redirect(template, to)
			.unwrap_or_else(|e| panic!("{e}"))
	}

	/// Sets the not found handler.
	pub fn not_found<F>(mut self, producer: F) -> Self
	where
		F: Fn() -> V + 'static,
	{
		self.not_found = Some(Rc::new(producer));
		self
	}

	/// Returns the routes in precedence order.
	pub fn routes(&self) -> &[Route<V>] {
		&self.routes
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.routes.len()
	}

	/// Checks if a route name exists.
	pub fn has_route(&self, name: &str) -> bool {
		self.named_routes.contains_key(name)
	}

	/// Finds the first route that matches `location` and passes its guard.
	pub fn match_location(&self, location: &Location) -> Option<(&Route<V>, ParameterMap)> {
		let selection = self
			.selector
			.select_where(location, |index, params| self.routes[index].check_guard(params))?;
		Some((&self.routes[selection.index], selection.params))
	}

	/// Resolves `location` to an outcome.
	pub fn resolve(&self, location: &Location) -> RouteOutcome<V> {
		let Some((route, params)) = self.match_location(location) else {
			tracing::debug!(%location, "no route matched");
			return self.unmatched();
		};

		match &route.target {
			RouteTarget::Content(producer) => RouteOutcome::Matched(RouteMatch {
				template: route.template.as_str().to_string(),
				name: route.name.clone(),
				content: producer(&params),
				params,
			}),
			RouteTarget::Redirect(redirect) => match redirect.target(&params) {
				Some(to) => RouteOutcome::Redirect {
					from: route.template.as_str().to_string(),
					to,
					replace: redirect.replace,
				},
				None => {
					tracing::warn!(
						from = route.template.as_str(),
						to = redirect.to.as_str(),
						"redirect target is missing a parameter"
					);
					self.unmatched()
				}
			},
		}
	}

	/// Returns the unmatched outcome, with the not-found content if set.
	pub fn unmatched(&self) -> RouteOutcome<V> {
		RouteOutcome::Unmatched {
			fallback: self.not_found.as_ref().map(|producer| producer()),
		}
	}

	/// Generates a URL by route name with parameters.
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
		let index = self
			.named_routes
			.get(name)
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;

		let template = &self.routes[*index].template;
		let params: ParameterMap = params.iter().copied().collect();

		template
			.reverse(&params)
			.ok_or_else(|| RouterError::MissingParameter(template.as_str().to_string()))
	}
}

fn compile(template: &str) -> Result<UriTemplate, RouterError> {
	UriTemplate::new(template).map_err(|e| RouterError::invalid_template(template, e))
}

/// Every parameter the target needs must be one the source template captures.
fn check_redirect_params(template: &UriTemplate, redirect: &Redirect) -> Result<(), RouterError> {
	let captured: Vec<&str> = template
		.param_names()
		.into_iter()
		.chain(template.query_keys())
		.collect();

	match redirect
		.to
		.param_names()
		.into_iter()
		.find(|name| !captured.contains(name))
	{
		Some(_) => Err(RouterError::MissingParameter(redirect.to.as_str().to_string())),
		None => Ok(()),
	}
}
