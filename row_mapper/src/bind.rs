//! Bindvar rewriting and named parameters
//!
//! Queries are written with `?` placeholders or `:name` parameters and
//! rewritten into whatever the driver expects.

use crate::errors::MapError;
use field_map::{DescriptorCache, Params, Value};
use std::collections::HashMap;
use std::fmt::Write;

/// Placeholder syntax of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    /// `?`
    Question,
    /// `$1, $2, ...`
    Dollar,
    /// `:arg1, :arg2, ...`
    Named,
    /// `@p1, @p2, ...`
    At,
    Unknown,
}

impl BindType {
    pub fn from_driver(driver_name: &str) -> Self {
        match driver_name {
            "postgres" | "pgx" | "pq-timeouts" | "cloudsqlpostgres" | "cockroach" => {
                BindType::Dollar
            }
            "mysql" | "sqlite" | "sqlite3" => BindType::Question,
            "oci8" | "ora" | "goracle" => BindType::Named,
            "sqlserver" | "mssql" => BindType::At,
            _ => BindType::Unknown,
        }
    }

    /// Placeholder for the argument at 1-based `index`
    fn placeholder(self, index: usize, name: &str, out: &mut String) {
        // Writing into a String cannot fail
        let _ = match self {
            BindType::Question | BindType::Unknown => write!(out, "?"),
            BindType::Dollar => write!(out, "${}", index),
            BindType::Named => write!(out, ":{}", name),
            BindType::At => write!(out, "@p{}", index),
        };
    }
}

/// Rewrite `?` placeholders into the driver's bindvar syntax
pub fn rebind(bind_type: BindType, sql: &str) -> String {
    if matches!(bind_type, BindType::Question | BindType::Unknown) {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len() + 10);
    let mut index = 0;
    for c in sql.chars() {
        if c == '?' {
            index += 1;
            bind_type.placeholder(index, &format!("arg{}", index), &mut out);
        } else {
            out.push(c);
        }
    }
    out
}

/// A query with its named parameters replaced by bindvars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub sql: String,
    /// Parameter names in placeholder order; a name used twice appears twice
    pub names: Vec<String>,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Replace `:name` parameters with bindvars.
///
/// `::` produces a literal `:` and `:=` is copied as is. A colon that does
/// not start a name is copied unchanged.
pub fn compile_named(sql: &str, bind_type: BindType) -> Result<CompiledQuery, MapError> {
    let mut out = String::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ':' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some(':') => {
                chars.next();
                out.push(':');
            }
            Some('=') => {
                chars.next();
                out.push_str(":=");
            }
            Some(&next) if next.is_alphanumeric() || next == '_' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                // A trailing dot ends the sentence, not the name
                let trailing_dot = name.ends_with('.');
                if trailing_dot {
                    name.pop();
                }
                if name.split('.').any(str::is_empty) {
                    return Err(MapError::NamedQuery(format!(
                        "parameter :{} has an empty path segment",
                        name
                    )));
                }

                bind_type.placeholder(names.len() + 1, &name, &mut out);
                names.push(name);
                if trailing_dot {
                    out.push('.');
                }
            }
            _ => out.push(':'),
        }
    }

    Ok(CompiledQuery { sql: out, names })
}

/// Bind named parameters from a map of values
pub fn bind_map(
    bind_type: BindType,
    sql: &str,
    args: &HashMap<String, Value>,
) -> Result<(String, Vec<Value>), MapError> {
    let compiled = compile_named(sql, bind_type)?;
    let values = compiled
        .names
        .iter()
        .map(|name| {
            args.get(name)
                .cloned()
                .ok_or_else(|| MapError::MissingParam(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((compiled.sql, values))
}

/// Bind named parameters from the fields of a `Params` value
///
/// Names are matched against the same resolved names the row mapper uses.
pub fn bind_params<P: Params>(
    bind_type: BindType,
    sql: &str,
    params: &P,
) -> Result<(String, Vec<Value>), MapError> {
    let compiled = compile_named(sql, bind_type)?;
    let descriptor = DescriptorCache::global().params_descriptor::<P>()?;
    let field_values = params.param_values();

    let values = compiled
        .names
        .iter()
        .map(|name| {
            descriptor
                .position(name)
                .and_then(|position| field_values.get(position))
                .cloned()
                .ok_or_else(|| MapError::MissingParam(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((compiled.sql, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_derive::Params;

    #[derive(Params)]
    struct NewUser {
        name: String,
        #[column("mail")]
        email: String,
        age: i32,
    }

    fn user() -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            age: 31,
        }
    }

    #[test]
    fn test_bind_type_from_driver() {
        assert_eq!(BindType::from_driver("postgres"), BindType::Dollar);
        assert_eq!(BindType::from_driver("cockroach"), BindType::Dollar);
        assert_eq!(BindType::from_driver("sqlite3"), BindType::Question);
        assert_eq!(BindType::from_driver("ora"), BindType::Named);
        assert_eq!(BindType::from_driver("mssql"), BindType::At);
        assert_eq!(BindType::from_driver("odbc"), BindType::Unknown);
    }

    #[test]
    fn test_rebind() {
        let sql = "SELECT * FROM t WHERE a = ? AND b = ?";
        assert_eq!(
            rebind(BindType::Dollar, sql),
            "SELECT * FROM t WHERE a = $1 AND b = $2"
        );
        assert_eq!(
            rebind(BindType::Named, sql),
            "SELECT * FROM t WHERE a = :arg1 AND b = :arg2"
        );
        assert_eq!(
            rebind(BindType::At, sql),
            "SELECT * FROM t WHERE a = @p1 AND b = @p2"
        );
        assert_eq!(rebind(BindType::Question, sql), sql);
    }

    #[test]
    fn test_compile_named() {
        let compiled = compile_named(
            "INSERT INTO person (first, last) VALUES (:first, :last_name)",
            BindType::Dollar,
        )
        .unwrap();
        assert_eq!(compiled.sql, "INSERT INTO person (first, last) VALUES ($1, $2)");
        assert_eq!(compiled.names, ["first", "last_name"]);

        let compiled = compile_named("SELECT :a, :a", BindType::Question).unwrap();
        assert_eq!(compiled.sql, "SELECT ?, ?");
        assert_eq!(compiled.names, ["a", "a"]);

        let compiled = compile_named("WHERE id = :id", BindType::Named).unwrap();
        assert_eq!(compiled.sql, "WHERE id = :id");
    }

    #[test]
    fn test_compile_named_escapes() {
        let compiled =
            compile_named("SELECT '10::30', x := 1, ': ' FROM t WHERE a = :a.", BindType::At)
                .unwrap();
        assert_eq!(compiled.sql, "SELECT '10:30', x := 1, ': ' FROM t WHERE a = @p1.");
        assert_eq!(compiled.names, ["a"]);
    }

    #[test]
    fn test_compile_named_dotted_names() {
        let compiled = compile_named("WHERE a = :user.id", BindType::Dollar).unwrap();
        assert_eq!(compiled.names, ["user.id"]);

        let err = compile_named("WHERE a = :user..id", BindType::Dollar).unwrap_err();
        assert!(matches!(err, MapError::NamedQuery(_)));
    }

    #[test]
    fn test_bind_map() {
        let mut args = HashMap::new();
        args.insert("name".to_string(), Value::from("Ann"));
        args.insert("age".to_string(), Value::from(31));

        let (sql, values) =
            bind_map(BindType::Dollar, "SELECT * FROM u WHERE name = :name AND age > :age", &args)
                .unwrap();
        assert_eq!(sql, "SELECT * FROM u WHERE name = $1 AND age > $2");
        assert_eq!(values, [Value::Text("Ann".into()), Value::Integer(31)]);

        let err = bind_map(BindType::Dollar, "WHERE x = :missing", &args).unwrap_err();
        assert!(matches!(err, MapError::MissingParam(name) if name == "missing"));
    }

    #[test]
    fn test_bind_params_uses_resolved_names() {
        let (sql, values) = bind_params(
            BindType::Question,
            "INSERT INTO users (name, email, age) VALUES (:name, :mail, :age)",
            &user(),
        )
        .unwrap();
        assert_eq!(sql, "INSERT INTO users (name, email, age) VALUES (?, ?, ?)");
        assert_eq!(
            values,
            [
                Value::Text("Ann".into()),
                Value::Text("ann@example.com".into()),
                Value::Integer(31)
            ]
        );

        let err = bind_params(BindType::Question, "VALUES (:email)", &user()).unwrap_err();
        assert!(matches!(err, MapError::MissingParam(name) if name == "email"));
    }
}
