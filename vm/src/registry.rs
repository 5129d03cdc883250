use std::io::Write;

use object::{Kind, Selector, Value};

use crate::interpreter::RuntimeError;

/// A native operation implementation.
///
/// Receives the receiver (the value dispatch was keyed on), the remaining
/// arguments, and the run's output sink. Returns the value to push, or
/// `None` for operations that only produce a side effect.
pub type NativeFn =
    fn(&Value, &[Value], &mut dyn Write) -> Result<Option<Value>, RuntimeError>;

/// The fixed (kind, selector) → operation table.
///
/// Built before execution, never mutated afterwards; [`resolve`] is a pure
/// double index with no side effects. An entry missing at run time means
/// the table was assembled incompletely, which the interpreter reports as
/// a fatal configuration error, never as something to paper over.
///
/// [`resolve`]: MethodTable::resolve
pub struct MethodTable {
    entries: [[Option<NativeFn>; Selector::COUNT]; Kind::COUNT],
}

impl MethodTable {
    /// A table with no entries registered.
    pub const fn empty() -> Self {
        Self {
            entries: [[None; Selector::COUNT]; Kind::COUNT],
        }
    }

    pub fn register(&mut self, kind: Kind, selector: Selector, method: NativeFn) {
        self.entries[kind.index()][selector.index()] = Some(method);
    }

    #[inline(always)]
    pub fn resolve(&self, kind: Kind, selector: Selector) -> Option<NativeFn> {
        self.entries[kind.index()][selector.index()]
    }

    /// The full built-in registry: every kind answers every selector.
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        table.register(Kind::Integer, Selector::Add, integer_add);
        table.register(Kind::Integer, Selector::Print, integer_print);
        table.register(Kind::Text, Selector::Add, text_add);
        table.register(Kind::Text, Selector::Print, text_print);
        table
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn expect_integer(value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(RuntimeError::TypeError {
            expected: "integer",
            got: other.clone(),
        }),
    }
}

fn expect_text(value: &Value) -> Result<&str, RuntimeError> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(RuntimeError::TypeError {
            expected: "text",
            got: other.clone(),
        }),
    }
}

fn expect_rhs(args: &[Value]) -> Result<&Value, RuntimeError> {
    args.first().ok_or(RuntimeError::TypeError {
        expected: "argument count",
        got: Value::from_i64(args.len() as i64),
    })
}

pub fn integer_add(
    receiver: &Value,
    args: &[Value],
    _out: &mut dyn Write,
) -> Result<Option<Value>, RuntimeError> {
    let rhs = expect_rhs(args)?;
    let left = expect_integer(receiver)?;
    let right = expect_integer(rhs)?;
    let sum = left
        .checked_add(right)
        .ok_or(RuntimeError::IntegerOverflow { left, right })?;
    Ok(Some(Value::from_i64(sum)))
}

pub fn integer_print(
    receiver: &Value,
    _args: &[Value],
    out: &mut dyn Write,
) -> Result<Option<Value>, RuntimeError> {
    let n = expect_integer(receiver)?;
    writeln!(out, "{n}").map_err(|err| RuntimeError::Io {
        message: err.to_string(),
    })?;
    Ok(None)
}

pub fn text_add(
    receiver: &Value,
    args: &[Value],
    _out: &mut dyn Write,
) -> Result<Option<Value>, RuntimeError> {
    let rhs = expect_rhs(args)?;
    let left = expect_text(receiver)?;
    let right = expect_text(rhs)?;
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    Ok(Some(Value::Text(joined)))
}

pub fn text_print(
    receiver: &Value,
    _args: &[Value],
    out: &mut dyn Write,
) -> Result<Option<Value>, RuntimeError> {
    let s = expect_text(receiver)?;
    writeln!(out, "{s}").map_err(|err| RuntimeError::Io {
        message: err.to_string(),
    })?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_pair() {
        let table = MethodTable::with_defaults();
        for kind in [Kind::Integer, Kind::Text] {
            for selector in [Selector::Add, Selector::Print] {
                assert!(
                    table.resolve(kind, selector).is_some(),
                    "missing {} for {}",
                    selector.name(),
                    kind.name()
                );
            }
        }
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let table = MethodTable::empty();
        assert!(table.resolve(Kind::Integer, Selector::Add).is_none());
        assert!(table.resolve(Kind::Text, Selector::Print).is_none());
    }

    #[test]
    fn integer_add_produces_sum() {
        let mut sink = std::io::sink();
        let result = integer_add(
            &Value::from_i64(3),
            &[Value::from_i64(4)],
            &mut sink,
        );
        assert_eq!(result, Ok(Some(Value::from_i64(7))));
    }

    #[test]
    fn integer_add_rejects_text_operand() {
        let mut sink = std::io::sink();
        let result = integer_add(
            &Value::from_i64(3),
            &[Value::from_text("four")],
            &mut sink,
        );
        assert_eq!(
            result,
            Err(RuntimeError::TypeError {
                expected: "integer",
                got: Value::from_text("four"),
            })
        );
    }

    #[test]
    fn integer_add_detects_overflow() {
        let mut sink = std::io::sink();
        let result = integer_add(
            &Value::from_i64(i64::MAX),
            &[Value::from_i64(1)],
            &mut sink,
        );
        assert_eq!(
            result,
            Err(RuntimeError::IntegerOverflow {
                left: i64::MAX,
                right: 1,
            })
        );
    }

    #[test]
    fn text_add_concatenates_in_order() {
        let mut sink = std::io::sink();
        let result = text_add(
            &Value::from_text("foo"),
            &[Value::from_text("bar")],
            &mut sink,
        );
        assert_eq!(result, Ok(Some(Value::from_text("foobar"))));
    }

    #[test]
    fn print_appends_newline() {
        let mut buf = Vec::new();
        integer_print(&Value::from_i64(7), &[], &mut buf).unwrap();
        text_print(&Value::from_text("foobar"), &[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "7\nfoobar\n");
    }
}
