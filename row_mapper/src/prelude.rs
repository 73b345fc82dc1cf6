//! Convenience re-exports for common row-mapper usage

// Capabilities
pub use crate::traits::{Binder, ExecResult, Execer, Ext, Queryer};

// Cursor sessions
pub use crate::cursor::{BufferedCursor, Cursor};
pub use crate::rows::{Row, Rows};

// Error types
pub use crate::errors::MapError;

// Query functions
pub use crate::facade::{get, query_row, queryx, select};
pub use crate::named::{named_exec, named_exec_map, named_query, named_query_map};

// Bindvars
pub use crate::bind::BindType;

// Record shapes
pub use field_map::{Element, Params, Record, Value};
