//! Built-in tools.

mod search;

pub use search::{SEARCH_TOOL_NAME, SearchParams, SearchTool};
