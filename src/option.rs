//! Typed option declarations and value coercion.
use serde::Serialize;
use std::fmt;

/// Declared kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptKind {
    Integer,
    String,
    Boolean,
}

impl OptKind {
    /// Placeholder shown after the flag name in help output.
    pub(crate) fn value_name(self) -> &'static str {
        match self {
            OptKind::Integer => "int",
            OptKind::String => "string",
            OptKind::Boolean => "bool",
        }
    }

    pub(crate) fn zero(self) -> OptValue {
        match self {
            OptKind::Integer => OptValue::Integer(0),
            OptKind::String => OptValue::Text(String::new()),
            OptKind::Boolean => OptValue::Flag(false),
        }
    }
}

impl fmt::Display for OptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_name())
    }
}

/// A parsed or default option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptValue {
    Integer(i64),
    Text(String),
    Flag(bool),
}

impl OptValue {
    pub fn kind(&self) -> OptKind {
        match self {
            OptValue::Integer(_) => OptKind::Integer,
            OptValue::Text(_) => OptKind::String,
            OptValue::Flag(_) => OptKind::Boolean,
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        *self == self.kind().zero()
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptValue::Integer(value) => write!(f, "{value}"),
            OptValue::Text(value) => f.write_str(value),
            OptValue::Flag(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for OptValue {
    fn from(value: i64) -> Self {
        OptValue::Integer(value)
    }
}

impl From<i32> for OptValue {
    fn from(value: i32) -> Self {
        OptValue::Integer(i64::from(value))
    }
}

impl From<&str> for OptValue {
    fn from(value: &str) -> Self {
        OptValue::Text(value.to_string())
    }
}

impl From<String> for OptValue {
    fn from(value: String) -> Self {
        OptValue::Text(value)
    }
}

impl From<bool> for OptValue {
    fn from(value: bool) -> Self {
        OptValue::Flag(value)
    }
}

/// Declaration of a single named, typed, defaulted flag.
///
/// The typed constructors (`int`, `string`, `bool`) always produce a usable
/// option. `Opt::new` accepts any default; when its kind disagrees with the
/// declared kind the option registers as unusable and every lookup of it
/// reports "not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt {
    pub name: String,
    pub desc: String,
    pub kind: OptKind,
    pub default: OptValue,
}

impl Opt {
    pub fn new(
        name: impl Into<String>,
        kind: OptKind,
        default: impl Into<OptValue>,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            kind,
            default: default.into(),
        }
    }

    pub fn int(name: impl Into<String>, default: i64, desc: impl Into<String>) -> Self {
        Self::new(name, OptKind::Integer, default, desc)
    }

    pub fn string(
        name: impl Into<String>,
        default: impl Into<String>,
        desc: impl Into<String>,
    ) -> Self {
        Self::new(name, OptKind::String, default.into(), desc)
    }

    pub fn bool(name: impl Into<String>, default: bool, desc: impl Into<String>) -> Self {
        Self::new(name, OptKind::Boolean, default, desc)
    }

    /// Whether the engine can accept this option at all.
    pub fn is_usable(&self) -> bool {
        self.default.kind() == self.kind && valid_flag_name(&self.name)
    }
}

fn valid_flag_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.contains(['=', ' '])
}

/// Integer literal parser used for `OptKind::Integer` values.
///
/// Accepts an optional sign, `0x`/`0o`/`0b` prefixes, a bare leading `0` for
/// octal, and `_` between digits.
pub(crate) fn parse_int(raw: &str) -> Result<i64, String> {
    let (negative, body) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits) = if let Some(rest) = strip_radix_prefix(body, 'x') {
        (16, rest)
    } else if let Some(rest) = strip_radix_prefix(body, 'o') {
        (8, rest)
    } else if let Some(rest) = strip_radix_prefix(body, 'b') {
        (2, rest)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    if digits.is_empty()
        || digits.starts_with(['_', '+', '-'])
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return Err("parse error".to_string());
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let magnitude = match u64::from_str_radix(&cleaned, radix) {
        Ok(value) => value,
        Err(err) if *err.kind() == std::num::IntErrorKind::PosOverflow => {
            return Err("value out of range".to_string())
        }
        Err(_) => return Err("parse error".to_string()),
    };

    let signed = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(signed).map_err(|_| "value out of range".to_string())
}

fn strip_radix_prefix(body: &str, marker: char) -> Option<&str> {
    let mut chars = body.chars();
    if chars.next() != Some('0') {
        return None;
    }
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&marker) => Some(&body[2..]),
        _ => None,
    }
}

pub(crate) fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err("parse error".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_constructors_are_usable() {
        assert!(Opt::int("count", 5, "how many").is_usable());
        assert!(Opt::string("name", "bob", "who").is_usable());
        assert!(Opt::bool("loud", false, "shout").is_usable());
    }

    #[test]
    fn mismatched_default_is_unusable() {
        let opt = Opt::new("count", OptKind::Integer, "five", "how many");
        assert!(!opt.is_usable());
        assert_eq!(opt.default.kind(), OptKind::String);
    }

    #[test]
    fn malformed_names_are_unusable() {
        assert!(!Opt::int("", 1, "empty").is_usable());
        assert!(!Opt::int("--count", 1, "dashed").is_usable());
        assert!(!Opt::int("a=b", 1, "equals").is_usable());
    }

    #[test]
    fn parse_int_handles_prefixes_and_signs() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("-42"), Ok(-42));
        assert_eq!(parse_int("+7"), Ok(7));
        assert_eq!(parse_int("0x1F"), Ok(31));
        assert_eq!(parse_int("0o17"), Ok(15));
        assert_eq!(parse_int("017"), Ok(15));
        assert_eq!(parse_int("0b101"), Ok(5));
        assert_eq!(parse_int("1_000"), Ok(1000));
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
    }

    #[test]
    fn parse_int_rejects_garbage() {
        assert_eq!(parse_int(""), Err("parse error".to_string()));
        assert_eq!(parse_int("abc"), Err("parse error".to_string()));
        assert_eq!(parse_int("0x"), Err("parse error".to_string()));
        assert_eq!(parse_int("--1"), Err("parse error".to_string()));
        assert_eq!(parse_int("1__0"), Err("parse error".to_string()));
        assert_eq!(parse_int("09"), Err("parse error".to_string()));
        assert_eq!(
            parse_int("9223372036854775808"),
            Err("value out of range".to_string())
        );
        assert_eq!(
            parse_int("99999999999999999999"),
            Err("value out of range".to_string())
        );
    }

    #[test]
    fn parse_bool_literals() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(raw), Ok(true), "{raw}");
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(raw), Ok(false), "{raw}");
        }
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn zero_defaults() {
        assert!(OptValue::Integer(0).is_zero());
        assert!(OptValue::Text(String::new()).is_zero());
        assert!(OptValue::Flag(false).is_zero());
        assert!(!OptValue::Integer(3).is_zero());
    }
}
