//! Default option values - single source of truth

/// Default ordering expression: a constant key, i.e. source order
pub const DEFAULT_ORDER_BY: &str = "0";

/// Environment variable prefix read by `PagingOptions::load`
pub const ENV_PREFIX: &str = "PAGING";

/// File name probed by `PagingOptions::load` when no path is given
pub const CONFIG_FILE: &str = "paging";
