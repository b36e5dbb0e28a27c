use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime values

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    List(Vec<Val>),
    Dict(Dict),
}

/// Insertion ordered string-keyed map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dict {
    entries: Vec<(Rc<str>, Val)>,
}

impl Dict {
    pub fn new() -> Dict {
        Dict::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Val> {
        self.entries.iter().find(|(k, _)| &**k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Val> {
        self.entries
            .iter_mut()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: &str, val: Val) {
        match self.get_mut(key) {
            Some(v) => *v = val,
            None => self.entries.push((key.into(), val)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Val> {
        let pos = self.entries.iter().position(|(k, _)| &**k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Val)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl Val {
    /// Typed input: integer, then float, then the raw text.
    pub fn from_input(text: &str) -> Val {
        let trimmed = text.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Val::Integer(n);
        }
        if !trimmed.is_empty() && !trimmed.chars().any(char::is_alphabetic) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Val::Float(f);
            }
        }
        Val::String(text.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Integer(_) => "INTEGER",
            Val::Float(_) => "FLOAT",
            Val::String(_) => "STRING",
            Val::List(_) => "LIST",
            Val::Dict(_) => "DICT",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Integer(n) => *n != 0,
            Val::Float(n) => *n != 0.0,
            Val::String(s) => !s.is_empty(),
            Val::List(v) => !v.is_empty(),
            Val::Dict(d) => !d.is_empty(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Val::Integer(_) | Val::Float(_))
    }

    /// Numbers, and strings that read as numbers.
    pub fn as_number(&self) -> Option<Val> {
        match self {
            Val::Integer(_) | Val::Float(_) => Some(self.clone()),
            Val::String(s) => match Val::from_input(s) {
                Val::String(_) => None,
                n => Some(n),
            },
            _ => None,
        }
    }

    /// Floats with no fraction become integers.
    pub fn whole(f: f64) -> Val {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
            Val::Integer(f as i64)
        } else {
            Val::Float(f)
        }
    }

    fn write_item(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::String(s) => write!(f, "\"{}\"", s),
            v => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Val {
        Val::Integer(if b { 1 } else { 0 })
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Val {
        Val::Integer(n)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Val {
        Val::Float(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Val {
        Val::String(s.into())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Val {
        Val::String(s.into())
    }
}

impl TryFrom<&Val> for f64 {
    type Error = Error;

    fn try_from(val: &Val) -> Result<f64> {
        match val.as_number() {
            Some(Val::Integer(n)) => Ok(n as f64),
            Some(Val::Float(n)) => Ok(n),
            _ => Err(error!(TypeMismatch; format!("EXPECTED NUMBER, GOT {}", val.type_name()))),
        }
    }
}

impl TryFrom<&Val> for i64 {
    type Error = Error;

    fn try_from(val: &Val) -> Result<i64> {
        match val.as_number() {
            Some(Val::Integer(n)) => Ok(n),
            Some(Val::Float(n)) => {
                let n = n.trunc();
                if n.is_finite() && n.abs() < 9.2e18 {
                    Ok(n as i64)
                } else {
                    Err(error!(Overflow))
                }
            }
            _ => Err(error!(TypeMismatch; format!("EXPECTED NUMBER, GOT {}", val.type_name()))),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Integer(n) => write!(f, "{}", n),
            Val::Float(n) => match Val::whole(*n) {
                Val::Integer(i) => write!(f, "{}", i),
                _ if n.is_finite() && *n != 0.0 && (n.abs() >= 1e16 || n.abs() < 1e-4) => {
                    write!(f, "{}", scientific(*n))
                }
                _ => write!(f, "{}", n),
            },
            Val::String(s) => write!(f, "{}", s),
            Val::List(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.write_item(f)?;
                }
                write!(f, "]")
            }
            Val::Dict(d) => {
                write!(f, "{{")?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": ", k)?;
                    v.write_item(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Shortest mantissa with a signed exponent of at least two digits,
/// as in `1e+300` and `8.5e-05`.
fn scientific(n: f64) -> String {
    let text = format!("{:e}", n);
    match text.find('e') {
        Some(at) => {
            let (mantissa, exponent) = (&text[..at], &text[at + 1..]);
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Val::Float(2.0).to_string(), "2");
        assert_eq!(Val::Float(2.5).to_string(), "2.5");
        assert_eq!(
            Val::List(vec![Val::Integer(1), Val::from("a")]).to_string(),
            "[1, \"a\"]"
        );
        let mut d = Dict::new();
        d.insert("k", Val::Integer(1));
        assert_eq!(Val::Dict(d).to_string(), "{\"k\": 1}");
    }

    #[test]
    fn test_display_extremes() {
        assert_eq!(Val::Float(1e300).to_string(), "1e+300");
        assert_eq!(Val::Float(2f64.powi(-60)).to_string(), "8.673617379884035e-19");
        assert_eq!(Val::Float(-1.5e-5).to_string(), "-1.5e-05");
        assert_eq!(Val::Float(1.25e20).to_string(), "1.25e+20");
        assert_eq!(Val::Float(0.001).to_string(), "0.001");
        assert_eq!(Val::Float(123456.75).to_string(), "123456.75");
        assert_eq!(Val::Float(0.0).to_string(), "0");
    }

    #[test]
    fn test_input_typing() {
        assert_eq!(Val::from_input("42"), Val::Integer(42));
        assert_eq!(Val::from_input(" 2.5 "), Val::Float(2.5));
        assert_eq!(Val::from_input("Hi"), Val::from("Hi"));
        assert_eq!(Val::from_input("inf"), Val::from("inf"));
        assert_eq!(Val::from_input(""), Val::from(""));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(f64::try_from(&Val::from("3")).unwrap(), 3.0);
        assert_eq!(i64::try_from(&Val::Float(-2.7)).unwrap(), -2);
        assert!(f64::try_from(&Val::from("x")).is_err());
    }

    #[test]
    fn test_dict_keeps_insertion_order() {
        let mut d = Dict::new();
        d.insert("b", Val::Integer(1));
        d.insert("a", Val::Integer(2));
        d.insert("b", Val::Integer(3));
        let keys: Vec<&str> = d.iter().map(|(k, _)| &**k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(d.remove("b"), Some(Val::Integer(3)));
        assert_eq!(d.len(), 1);
    }
}
