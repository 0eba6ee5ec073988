//! Options for the paginator, filter compiler and ordering applier

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::defaults;
use crate::error::{Error, Result};
use crate::predicate::{CaseSensitivity, OrderClause};
use crate::sort::SortSpec;

/// Paging behavior that callers may tune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingOptions {
    /// Ordering applied when a request has no usable sort.
    ///
    /// A numeric literal such as `"0"` means a constant key (source order);
    /// anything else is read as a sort string, e.g. `"Id"` or `"Name desc"`.
    #[serde(default = "default_order_by")]
    pub default_order_by: String,

    /// Case handling for string set membership filters
    #[serde(default)]
    pub set_case: CaseSensitivity,
}

fn default_order_by() -> String {
    defaults::DEFAULT_ORDER_BY.to_string()
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            default_order_by: default_order_by(),
            set_case: CaseSensitivity::default(),
        }
    }
}

impl PagingOptions {
    /// Options with the given default ordering.
    pub fn with_default_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.default_order_by = order_by.into();
        self
    }

    /// Options with the given set membership case handling.
    pub fn with_set_case(mut self, case: CaseSensitivity) -> Self {
        self.set_case = case;
        self
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse paging options: {e}")))
    }

    /// Load options from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load options using config-rs (file + environment variables).
    ///
    /// Environment variables use the `PAGING_` prefix, e.g.
    /// `PAGING_DEFAULT_ORDER_BY=Id`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let options: PagingOptions = builder.build()?.try_deserialize()?;
        options.validate()?;
        Ok(options)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.default_order_by.trim().is_empty() {
            return Err(Error::Config("default_order_by must not be empty".into()));
        }
        self.default_order_clause()
            .map(|_| ())
            .map_err(|e| Error::Config(format!("default_order_by is invalid: {e}")))
    }

    /// The ordering clause described by `default_order_by`.
    pub fn default_order_clause(&self) -> Result<OrderClause> {
        let expr = self.default_order_by.trim();
        if expr.is_empty() || expr.parse::<f64>().is_ok() {
            return Ok(OrderClause::Constant);
        }
        let spec = SortSpec::parse(Some(expr))?;
        if spec.is_empty() {
            Ok(OrderClause::Constant)
        } else {
            Ok(OrderClause::By(spec))
        }
    }
}
