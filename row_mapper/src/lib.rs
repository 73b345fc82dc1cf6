//! Row Mapper - maps query results onto records
//!
//! This crate resolves result columns to record fields, scans rows through
//! the field handles generated for each record, and provides `select`/`get`
//! style query functions over any collaborator implementing the capability
//! traits.

pub mod bind;
pub mod cursor;
pub mod errors;
pub mod exec;
pub mod facade;
pub mod materialize;
pub mod memory;
pub mod named;
pub mod prelude;
pub mod resolver;
pub mod rows;
pub mod scanner;
pub mod traits;

pub use bind::{bind_map, bind_params, compile_named, rebind, BindType, CompiledQuery};
pub use cursor::{BufferedCursor, Cursor};
pub use errors::MapError;
pub use exec::{
    exec_or_exit, exec_or_log, exec_verbose, load_file, must_exec, select_or_exit, select_verbose,
};
pub use facade::{get, query_row, queryx, select};
pub use materialize::materialize_all;
pub use memory::{MemoryDb, ResultSet};
pub use named::{named_exec, named_exec_map, named_query, named_query_map};
pub use resolver::resolve;
pub use rows::{Row, Rows};
pub use scanner::scan_record;
pub use traits::{Binder, ExecResult, Execer, Ext, Queryer};

pub use field_map::Value;

/// Build a positional argument list, converting each item into a [`Value`]
///
/// ```rust,ignore
/// select(&db, &mut people, "SELECT * FROM person WHERE age > $1 AND name <> $2", args![30, "Ann"]).await?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_macro() {
        let empty: Vec<Value> = args![];
        assert!(empty.is_empty());

        let values = args![1, "two", 3i64, None::<i32>];
        assert_eq!(
            values,
            [
                Value::Integer(1),
                Value::Text("two".into()),
                Value::BigInt(3),
                Value::Null
            ]
        );
    }
}
