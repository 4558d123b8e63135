//! First-match-wins template selection.
//!
//! Precedence is declaration order and nothing else: the first template
//! that matches is selected, no "most specific" heuristic is applied.

use crate::error::TemplateError;
use crate::location::Location;
use crate::params::ParameterMap;
use crate::template::{UriTemplate, parse_uri};

/// Returns the first template in `templates` that matches `uri`.
///
/// Malformed templates are skipped, the same way [`parse_uri`] treats them.
///
/// # Example
///
/// ```
/// use sentier_urls::select;
///
/// let templates = ["/user/:id?", "/:type/:id"];
/// assert_eq!(select("/type/123", &templates), Some("/:type/:id"));
/// assert_eq!(select("/anything", &[] as &[&str]), None);
/// ```
pub fn select<'a, T>(uri: &str, templates: &'a [T]) -> Option<&'a str>
where
	T: AsRef<str>,
{
	templates
		.iter()
		.map(AsRef::as_ref)
		.find(|template| parse_uri(uri, template).is_some())
}

/// The template picked by a [`TemplateSelector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
	/// Position of the template in declaration order.
	pub index: usize,
	/// The selected template.
	pub template: &'a UriTemplate,
	/// Parameters captured by the template.
	pub params: ParameterMap,
}

/// An ordered list of compiled templates.
///
/// Building the selector compiles every template up front, so a malformed
/// route table is reported once at setup instead of silently never matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSelector {
	templates: Vec<UriTemplate>,
}

impl TemplateSelector {
	/// Compiles `templates` in order.
	///
	/// # Errors
	///
	/// Returns the first [`TemplateError`] encountered.
	pub fn new<I, S>(templates: I) -> Result<Self, TemplateError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let templates = templates
			.into_iter()
			.map(|template| UriTemplate::new(template.as_ref()))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { templates })
	}

	/// Appends an already compiled template, giving it the lowest precedence.
	pub fn push(&mut self, template: UriTemplate) {
		self.templates.push(template);
	}

	/// Returns the templates in precedence order.
	pub fn templates(&self) -> &[UriTemplate] {
		&self.templates
	}

	/// Returns the number of templates.
	pub fn len(&self) -> usize {
		self.templates.len()
	}

	/// Returns whether the selector has no templates.
	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}

	/// Selects the first template matching `uri`.
	pub fn select(&self, uri: &str) -> Option<Selection<'_>> {
		self.select_location(&Location::parse(uri))
	}

	/// Selects the first template matching `location`.
	pub fn select_location(&self, location: &Location) -> Option<Selection<'_>> {
		self.select_where(location, |_, _| true)
	}

	/// Selects the first template that matches `location` and is accepted by
	/// `accept`. Rejected matches fall through to the next template.
	pub fn select_where<F>(&self, location: &Location, mut accept: F) -> Option<Selection<'_>>
	where
		F: FnMut(usize, &ParameterMap) -> bool,
	{
		self.templates
			.iter()
			.enumerate()
			.find_map(|(index, template)| {
				let params = template.matches_location(location)?;
				accept(index, &params).then_some(Selection {
					index,
					template,
					params,
				})
			})
	}
}
