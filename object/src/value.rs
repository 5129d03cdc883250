use core::fmt;

/// A runtime value.
///
/// The kind set is closed: integers and text, nothing else. Values are
/// immutable once constructed; operations build new values instead of
/// mutating their operands, so plain ownership is enough and no collector
/// is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
}

/// The kind of a [`Value`].
///
/// Doubles as the row key of the method table and as the comparison key of
/// a cache cell's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Kind {
    Integer = 0,
    Text,
}

impl Value {
    #[inline(always)]
    pub const fn from_i64(n: i64) -> Self {
        Self::Integer(n)
    }

    #[inline(always)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[inline(always)]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Integer(_) => Kind::Integer,
            Self::Text(_) => Kind::Text,
        }
    }
}

impl Kind {
    pub const COUNT: usize = Kind::Text as usize + 1;

    /// Row index into the method table.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

/// The stable textual rendering used by `Print`: integers in base 10,
/// text unquoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
