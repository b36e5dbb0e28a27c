use super::{Function, Operation, Runtime, Val};
use crate::error;
use crate::lang::ast::*;
use crate::lang::{Error, Ident};
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

impl Runtime {
    pub(super) fn eval(&mut self, expr: &Expression) -> Result<Val> {
        use Expression::*;
        match expr {
            Integer(n) => Ok(Val::Integer(*n)),
            Float(n) => Ok(Val::Float(*n)),
            String(s) => Ok(Val::String(s.clone())),
            Var(ident) => self.fetch(ident),
            Call(ident, args) => self.call(ident, args),
            Index(base, key) => {
                let base = self.eval(base)?;
                let key = self.eval(key)?;
                index(&base, &key)
            }
            Member(base, key) => {
                let base = self.eval(base)?;
                member(&base, key)
            }
            Negation(expr) => Operation::negate(self.eval(expr)?),
            Not(expr) => Operation::not(self.eval(expr)?),
            Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                Operation::binary(*op, lhs, rhs)
            }
        }
    }

    pub(super) fn eval_number(&mut self, expr: &Expression) -> Result<f64> {
        f64::try_from(&self.eval(expr)?)
    }

    pub(super) fn eval_integer(&mut self, expr: &Expression) -> Result<i64> {
        i64::try_from(&self.eval(expr)?)
    }

    pub(super) fn eval_string(&mut self, expr: &Expression) -> Result<String> {
        Ok(self.eval(expr)?.to_string())
    }

    pub(super) fn eval_list(&mut self, exprs: &[Expression]) -> Result<Vec<Val>> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    fn subscripts(&mut self, exprs: &[Expression]) -> Result<Vec<i64>> {
        exprs.iter().map(|e| self.eval_integer(e)).collect()
    }

    /// Variables first, then zero-argument functions, then constants.
    fn fetch(&mut self, ident: &Ident) -> Result<Val> {
        let name = ident.name();
        if let Some(val) = self.var.get(name) {
            return Ok(val.clone());
        }
        if Function::is_pseudo_variable(name) {
            return Function::call(name, vec![], &mut self.rng, self.started);
        }
        if let Some(val) = Function::constant(name) {
            return Ok(val);
        }
        Ok(self.var.fetch(ident))
    }

    fn call(&mut self, ident: &Ident, args: &[Expression]) -> Result<Val> {
        let name = ident.name();
        if self.var.is_array(ident) {
            let subscripts = self.subscripts(args)?;
            return self.var.fetch_array(ident, &subscripts);
        }
        if let Some(procedure) = self.program.sub(name).cloned() {
            let args = self.eval_list(args)?;
            return self.call_function(&procedure, args);
        }
        if Function::arity(name).is_some() {
            let args = self.eval_list(args)?;
            return Function::call(name, args, &mut self.rng, self.started);
        }
        if args.len() == 1 {
            if let Some(container @ Val::List(_)) | Some(container @ Val::Dict(_)) =
                self.var.get(name).cloned()
            {
                let key = self.eval(&args[0])?;
                return index(&container, &key);
            }
        }
        Err(error!(UnknownFunction; name.to_string()))
    }

    pub(super) fn read_variable(&mut self, var: &Variable) -> Result<Val> {
        match var {
            Variable::Unary(ident) => self.fetch(ident),
            Variable::Array(ident, subscripts) => {
                let subscripts = self.subscripts(subscripts)?;
                self.var.fetch_array(ident, &subscripts)
            }
            Variable::Index(ident, key) => {
                let key = self.eval(key)?;
                index(&self.var.fetch(ident), &key)
            }
            Variable::Member(ident, key) => member(&self.var.fetch(ident), key),
        }
    }

    pub(super) fn assign(&mut self, var: &Variable, val: Val) -> Result<()> {
        match var {
            Variable::Unary(ident) => self.var.store(ident, val),
            Variable::Array(ident, subscripts) => {
                let subscripts = self.subscripts(subscripts)?;
                self.var.store_array(ident, &subscripts, val)
            }
            Variable::Index(ident, key) => {
                let key = self.eval(key)?;
                let mut container = self.var.fetch(ident);
                set_index(&mut container, &key, val)?;
                self.var.store(ident, container)
            }
            Variable::Member(ident, key) => {
                let mut container = self.var.fetch(ident);
                match &mut container {
                    Val::Dict(dict) => dict.insert(key, val),
                    other => return Err(error!(NotADict; other.type_name())),
                }
                self.var.store(ident, container)
            }
        }
    }

    /// Fetches a list variable for the collection statements. An unset
    /// name is an empty list.
    pub(super) fn list_of(&self, ident: &Ident) -> Result<Vec<Val>> {
        match self.var.get(ident.name()) {
            None => Ok(vec![]),
            Some(Val::List(items)) => Ok(items.clone()),
            Some(other) => Err(error!(NotAList; format!("{} IS {}", ident, other.type_name()))),
        }
    }
}

/// Lists count from zero; negative positions are out of range.
fn position(len: usize, key: &Val) -> Result<usize> {
    let i = i64::try_from(key)?;
    if i < 0 || i as usize >= len {
        return Err(error!(SubscriptOutOfRange; format!("{} OF {}", i, len)));
    }
    Ok(i as usize)
}

pub(super) fn index(base: &Val, key: &Val) -> Result<Val> {
    match base {
        Val::List(items) => Ok(items[position(items.len(), key)?].clone()),
        Val::Dict(_) => member(base, &key.to_string()),
        Val::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(Val::from(chars[position(chars.len(), key)?].to_string()))
        }
        other => Err(error!(NotAList; other.type_name())),
    }
}

fn member(base: &Val, key: &str) -> Result<Val> {
    match base {
        Val::Dict(dict) => match dict.get(key) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(SubscriptOutOfRange; format!("NO KEY {}", key))),
        },
        other => Err(error!(NotADict; other.type_name())),
    }
}

pub(super) fn set_index(container: &mut Val, key: &Val, val: Val) -> Result<()> {
    match container {
        Val::List(items) => {
            let i = position(items.len(), key)?;
            items[i] = val;
            Ok(())
        }
        Val::Dict(dict) => {
            dict.insert(&key.to_string(), val);
            Ok(())
        }
        other => Err(error!(NotAList; other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Config, Status};
    use super::*;
    use crate::lang::ErrorCode;

    fn run(source: &str) -> Runtime {
        let mut rt = Runtime::new(Config {
            seed: Some(7),
            ..Config::default()
        });
        rt.execute(source);
        rt
    }

    #[test]
    fn test_precedence_and_types() {
        let rt = run("A = 2 + 3 * 4\nB = 7 / 2\nC$ = \"n\" + 1");
        assert_eq!(rt.variable("A"), Some(Val::Integer(14)));
        assert_eq!(rt.variable("B"), Some(Val::Float(3.5)));
        assert_eq!(rt.variable("C$"), Some(Val::from("n1")));
    }

    #[test]
    fn test_pseudo_variables_and_constants() {
        let rt = run("X = PI\nPI = 3\nY = PI");
        assert_eq!(rt.variable("X"), Some(Val::Float(std::f64::consts::PI)));
        assert_eq!(rt.variable("Y"), Some(Val::Integer(3)));
    }

    #[test]
    fn test_list_and_dict_access() {
        let rt = run("LIST L = 10, 20, 30\nA = L[1]\nL[2] = 5\nB = L[2]\nDICT D = \"k\": 1\nC = D.k");
        assert_eq!(rt.variable("A"), Some(Val::Integer(20)));
        assert_eq!(rt.variable("B"), Some(Val::Integer(5)));
        assert_eq!(rt.variable("C"), Some(Val::Integer(1)));
    }

    #[test]
    fn test_index_errors() {
        let mut rt = Runtime::default();
        let r = rt.execute("LIST L = 1\nA = L[3]\nB = L.x");
        assert_eq!(r.status, Status::Completed);
        assert_eq!(r.errors.len(), 2);
        assert!(r.errors[0].message.starts_with("SUBSCRIPT OUT OF RANGE"));
        assert!(r.errors[1].message.starts_with("NOT A DICTIONARY"));
    }

    #[test]
    fn test_unknown_function() {
        let mut rt = Runtime::default();
        let r = rt.execute("A = NOPE(1)");
        assert_eq!(r.errors.len(), 1);
        let e = index(&Val::Integer(1), &Val::Integer(0)).unwrap_err();
        assert!(e.is(ErrorCode::NotAList));
    }
}
