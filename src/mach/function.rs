use super::{Operation, Val};
use crate::error;
use crate::lang::Error;
use rand::{rngs::StdRng, Rng};
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::ops::RangeInclusive;
use std::time::Instant;

type Result<T> = std::result::Result<T, Error>;

pub struct Function {}

fn number(val: &Val) -> Result<f64> {
    f64::try_from(val)
}

fn integer(val: &Val) -> Result<i64> {
    i64::try_from(val)
}

fn text(val: &Val) -> String {
    val.to_string()
}

fn count(val: &Val) -> Result<usize> {
    let n = integer(val)?;
    if n < 0 {
        Ok(0)
    } else {
        Ok(n as usize)
    }
}

fn illegal(name: &str, val: &Val) -> Error {
    error!(IllegalFunctionCall; format!("{}({})", name, val))
}

impl Function {
    pub fn arity(name: &str) -> Option<RangeInclusive<usize>> {
        let arity = match name {
            "DATE$" | "TIME$" | "TIMER" => 0..=0,
            "RND" => 0..=1,
            "ABS" | "ASC" | "ATN" | "ATAN" | "CEIL" | "CHR$" | "COS" | "EXP" | "FIX" | "INT"
            | "LCASE$" | "LEN" | "LOG" | "LOWER$" | "SGN" | "SIN" | "SPC" | "SQR" | "SQRT"
            | "STR$" | "TAB" | "TAN" | "TRIM$" | "TYPE" | "UCASE$" | "UPPER$" | "VAL" => 1..=1,
            "ROUND" => 1..=2,
            "HASKEY" | "LEFT$" | "RIGHT$" => 2..=2,
            "INSTR" | "MID$" => 2..=3,
            "MAX" | "MIN" => 1..=255,
            _ => return None,
        };
        Some(arity)
    }

    /// Names that also read as variables when written without parentheses.
    pub fn is_pseudo_variable(name: &str) -> bool {
        Function::arity(name).map_or(false, |a| a.contains(&0))
    }

    /// Consulted only after user variables.
    pub fn constant(name: &str) -> Option<Val> {
        match name {
            "PI" => Some(Val::Float(std::f64::consts::PI)),
            "E" => Some(Val::Float(std::f64::consts::E)),
            "TAU" => Some(Val::Float(2.0 * std::f64::consts::PI)),
            "INF" => Some(Val::Float(f64::INFINITY)),
            _ => None,
        }
    }

    pub fn call(name: &str, args: Vec<Val>, rng: &mut StdRng, started: Instant) -> Result<Val> {
        match Function::arity(name) {
            Some(arity) if arity.contains(&args.len()) => {}
            Some(_) => {
                return Err(error!(WrongArgumentCount; format!("{} GIVEN {}", name, args.len())))
            }
            None => return Err(error!(UnknownFunction; name)),
        }
        let a = args.get(0).cloned().unwrap_or(Val::Integer(0));
        match name {
            "ABS" => match a.as_number() {
                Some(Val::Integer(n)) => n.checked_abs().map(Val::Integer).ok_or(error!(Overflow)),
                _ => Ok(Val::Float(number(&a)?.abs())),
            },
            "ASC" => Ok(Val::Integer(text(&a).chars().next().map_or(0, |c| c as i64))),
            "ATN" | "ATAN" => Ok(Val::Float(number(&a)?.atan())),
            "CEIL" => Ok(Val::whole(number(&a)?.ceil())),
            "CHR$" => match u32::try_from(integer(&a)?).ok().and_then(std::char::from_u32) {
                Some(c) => Ok(Val::from(c.to_string())),
                None => Err(illegal(name, &a)),
            },
            "COS" => Ok(Val::Float(number(&a)?.cos())),
            "DATE$" => Ok(Val::from(chrono::Local::now().format("%Y-%m-%d").to_string())),
            "EXP" => Ok(Val::Float(number(&a)?.exp())),
            "FIX" => match a.as_number() {
                Some(Val::Integer(n)) => Ok(Val::Integer(n)),
                _ => Ok(Val::whole(number(&a)?.trunc())),
            },
            "HASKEY" => Function::has_key(&a, &args[1]),
            "INSTR" => Function::instr(&args),
            "INT" => match a.as_number() {
                Some(Val::Integer(n)) => Ok(Val::Integer(n)),
                _ => Ok(Val::whole(number(&a)?.floor())),
            },
            "LCASE$" | "LOWER$" => Ok(Val::from(text(&a).to_lowercase())),
            "LEFT$" => Ok(Val::from(
                text(&a).chars().take(count(&args[1])?).collect::<String>(),
            )),
            "LEN" => {
                let len = match &a {
                    Val::List(v) => v.len(),
                    Val::Dict(d) => d.len(),
                    v => text(v).chars().count(),
                };
                Ok(Val::Integer(len as i64))
            }
            "LOG" => match number(&a)? {
                n if n > 0.0 => Ok(Val::Float(n.ln())),
                _ => Err(illegal(name, &a)),
            },
            "MAX" => Function::extreme(args, Ordering::Greater),
            "MID$" => {
                let s = text(&a);
                let start = integer(&args[1])?.max(1) as usize - 1;
                let len = match args.get(2) {
                    Some(l) => count(l)?,
                    None => usize::max_value(),
                };
                Ok(Val::from(s.chars().skip(start).take(len).collect::<String>()))
            }
            "MIN" => Function::extreme(args, Ordering::Less),
            "RIGHT$" => {
                let s: Vec<char> = text(&a).chars().collect();
                let n = count(&args[1])?.min(s.len());
                Ok(Val::from(s[s.len() - n..].iter().collect::<String>()))
            }
            "RND" => {
                let n = match args.get(0) {
                    Some(v) => integer(v)?,
                    None => 1,
                };
                if n > 1 {
                    Ok(Val::Integer(rng.gen_range(1..=n)))
                } else {
                    Ok(Val::Float(rng.gen::<f64>()))
                }
            }
            "ROUND" => {
                let digits = match args.get(1) {
                    Some(d) => integer(d)?.max(0).min(15) as i32,
                    None => 0,
                };
                let n = number(&a)?;
                if digits == 0 {
                    Ok(Val::whole(n.round()))
                } else {
                    let scale = 10f64.powi(digits);
                    Ok(Val::Float((n * scale).round() / scale))
                }
            }
            "SGN" => Ok(Val::Integer(match number(&a)? {
                n if n > 0.0 => 1,
                n if n < 0.0 => -1,
                _ => 0,
            })),
            "SIN" => Ok(Val::Float(number(&a)?.sin())),
            "SPC" | "TAB" => Ok(Val::from(" ".repeat(count(&a)?.min(255)))),
            "SQR" | "SQRT" => match number(&a)? {
                n if n >= 0.0 => Ok(Val::Float(n.sqrt())),
                _ => Err(illegal(name, &a)),
            },
            "STR$" => Ok(Val::from(text(&a))),
            "TAN" => Ok(Val::Float(number(&a)?.tan())),
            "TIME$" => Ok(Val::from(chrono::Local::now().format("%H:%M:%S").to_string())),
            "TIMER" => {
                let secs = started.elapsed().as_secs_f64();
                Ok(Val::Float((secs * 1000.0).round() / 1000.0))
            }
            "TRIM$" => Ok(Val::from(text(&a).trim())),
            "TYPE" => Ok(Val::from(match a {
                Val::Integer(_) | Val::Float(_) => "NUMBER",
                Val::String(_) => "STRING",
                Val::List(_) => "LIST",
                Val::Dict(_) => "DICT",
            })),
            "UCASE$" | "UPPER$" => Ok(Val::from(text(&a).to_uppercase())),
            "VAL" => match Val::from_input(&text(&a)) {
                Val::String(_) => Ok(Val::Integer(0)),
                n => Ok(n),
            },
            _ => Err(error!(UnknownFunction; name)),
        }
    }

    fn has_key(container: &Val, key: &Val) -> Result<Val> {
        match container {
            Val::Dict(d) => Ok(Val::from(d.contains_key(&text(key)))),
            Val::List(v) => Ok(Val::from(v.contains(key))),
            v => Err(error!(NotADict; v.type_name())),
        }
    }

    fn instr(args: &[Val]) -> Result<Val> {
        let (start, haystack, needle) = match args {
            [h, n] => (1, text(h), text(n)),
            [s, h, n] => (integer(s)?.max(1) as usize, text(h), text(n)),
            _ => return Err(error!(WrongArgumentCount; "INSTR")),
        };
        let chars: Vec<char> = haystack.chars().collect();
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() {
            return Ok(Val::Integer(start.min(chars.len() + 1) as i64));
        }
        let mut i = start - 1;
        while i + needle.len() <= chars.len() {
            if chars[i..i + needle.len()] == needle[..] {
                return Ok(Val::Integer(i as i64 + 1));
            }
            i += 1;
        }
        Ok(Val::Integer(0))
    }

    fn extreme(args: Vec<Val>, want: Ordering) -> Result<Val> {
        let items = match args.as_slice() {
            [Val::List(v)] => v.clone(),
            _ => args,
        };
        let mut best: Option<Val> = None;
        for item in items {
            if !item.is_numeric() {
                return Err(error!(TypeMismatch; format!("EXPECTED NUMBER, GOT {}", item.type_name())));
            }
            best = match best {
                Some(b) if Operation::compare(&item, &b) != Some(want) => Some(b),
                _ => Some(item),
            };
        }
        best.ok_or(error!(IllegalFunctionCall; "EMPTY LIST"))
    }
}
