//! Router settings
//!
//! Settings can be built in code, parsed from TOML, or read from
//! environment variables.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Default limit for chained redirects.
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 8;

/// Settings for route evaluation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSettings {
	/// Maximum number of redirects followed in one chain
	#[serde(default = "default_max_redirect_hops")]
	pub max_redirect_hops: usize,

	/// Whether redirect routes navigate. When false they are treated as unmatched.
	#[serde(default = "default_follow_redirects")]
	pub follow_redirects: bool,
}

fn default_max_redirect_hops() -> usize {
	DEFAULT_MAX_REDIRECT_HOPS
}

fn default_follow_redirects() -> bool {
	true
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			max_redirect_hops: DEFAULT_MAX_REDIRECT_HOPS,
			follow_redirects: true,
		}
	}
}

impl RouterSettings {
	/// Create new settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the redirect hop limit.
	pub fn with_max_redirect_hops(mut self, hops: usize) -> Self {
		self.max_redirect_hops = hops;
		self
	}

	/// Sets whether redirect routes navigate.
	pub fn with_follow_redirects(mut self, follow: bool) -> Self {
		self.follow_redirects = follow;
		self
	}

	/// Validate settings
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.max_redirect_hops == 0 {
			return Err(SettingsError::ValidationError(
				"max_redirect_hops must be at least 1".to_string(),
			));
		}
		Ok(())
	}

	/// Parses and validates settings from a TOML document.
	///
	/// # Example
	///
	/// ```
	/// use sentier_pages::RouterSettings;
	///
	/// let settings = RouterSettings::from_toml_str("max_redirect_hops = 3").unwrap();
	/// assert_eq!(settings.max_redirect_hops, 3);
	/// assert!(settings.follow_redirects);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self =
			toml::from_str(source).map_err(|e| SettingsError::Parse(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from environment variables
	///
	/// Reads `SENTIER_MAX_REDIRECT_HOPS` and `SENTIER_FOLLOW_REDIRECTS`.
	pub fn from_env() -> Result<Self, SettingsError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds settings from a key lookup, using the `from_env` variable names.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();

		if let Some(hops) = lookup("SENTIER_MAX_REDIRECT_HOPS") {
			settings.max_redirect_hops = hops.trim().parse().map_err(|_| {
				SettingsError::Parse(format!("SENTIER_MAX_REDIRECT_HOPS is not a number: {hops}"))
			})?;
		}

		if let Some(follow) = lookup("SENTIER_FOLLOW_REDIRECTS") {
			settings.follow_redirects = follow.to_lowercase() == "true" || follow == "1";
		}

		settings.validate()?;
		Ok(settings)
	}
}
