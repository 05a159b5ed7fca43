//! Task constants and aliases.

use std::collections::HashMap;

/// Initial value written for every phone entry at task creation.
///
/// A worker overwrites it exactly once with either a resolution string
/// (`"Country: Carrier"`) or an error marker (`"Error: ..."`). A caller
/// must never see it in a fetched result.
pub const PLACEHOLDER: &str = "0";

/// Phone number (as submitted) -> resolution result or error marker.
pub type ResultMap = HashMap<String, String>;
