use super::Val;
use crate::error;
use crate::lang::{Error, Ident};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Variable memory
///
/// One flat store shared by all three heritages. Procedure, SUB and
/// FUNCTION parameters live in scopes layered over it; lookups search
/// the newest scope first.

#[derive(Debug, Default)]
pub struct Var {
    vars: HashMap<Rc<str>, Val>,
    scopes: Vec<HashMap<Rc<str>, Val>>,
    consts: HashSet<Rc<str>>,
    arrays: HashMap<Rc<str>, Array>,
}

#[derive(Debug)]
struct Array {
    bounds: Vec<usize>,
    vals: Vec<Val>,
}

impl Array {
    const MAX_LEN: usize = 1 << 22;

    fn new(name: &str, bounds: Vec<usize>) -> Result<Array> {
        let mut len: usize = 1;
        for b in &bounds {
            len = match len.checked_mul(b + 1) {
                Some(len) if len <= Array::MAX_LEN => len,
                _ => return Err(error!(StackOverflow; "ARRAY TOO LARGE")),
            };
        }
        Ok(Array {
            bounds,
            vals: vec![Var::default_for(name); len],
        })
    }

    fn offset(&self, subscripts: &[i64]) -> Result<usize> {
        if subscripts.len() != self.bounds.len() {
            return Err(error!(SubscriptOutOfRange; "WRONG NUMBER OF SUBSCRIPTS"));
        }
        let mut offset = 0;
        for (s, b) in subscripts.iter().zip(&self.bounds) {
            if *s < 0 || *s as usize > *b {
                return Err(error!(SubscriptOutOfRange; format!("INDEX {} NOT IN 0..{}", s, b)));
            }
            offset = offset * (b + 1) + *s as usize;
        }
        Ok(offset)
    }
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.scopes.clear();
        self.consts.clear();
        self.arrays.clear();
    }

    fn default_for(name: &str) -> Val {
        if name.ends_with('$') {
            Val::String("".into())
        } else {
            Val::Integer(0)
        }
    }

    pub fn get(&self, name: &str) -> Option<&Val> {
        for scope in self.scopes.iter().rev() {
            if let Some(val) = scope.get(name) {
                return Some(val);
            }
        }
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Val> {
        for scope in self.scopes.iter_mut().rev() {
            if scope.contains_key(name) {
                return scope.get_mut(name);
            }
        }
        self.vars.get_mut(name)
    }

    /// Unset names read as 0, or "" for `$` names.
    pub fn fetch(&self, ident: &Ident) -> Val {
        match self.get(ident.name()) {
            Some(val) => val.clone(),
            None => Var::default_for(ident.name()),
        }
    }

    pub fn store(&mut self, ident: &Ident, value: Val) -> Result<()> {
        if self.consts.contains(ident.name()) {
            return Err(error!(ConstantReassigned; ident.to_string()));
        }
        let value = match value {
            Val::Integer(_) | Val::Float(_) if ident.is_string() => Val::from(value.to_string()),
            v => v,
        };
        self.store_name(ident.name(), value);
        Ok(())
    }

    /// Stores without constant checks or `$` coercion. Used for the
    /// machine's own pseudo-variables.
    pub fn store_name(&mut self, name: &str, value: Val) {
        match self.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.vars.insert(name.into(), value);
            }
        }
    }

    pub fn define_const(&mut self, ident: &Ident, value: Val) -> Result<()> {
        self.store(ident, value)?;
        self.consts.insert(ident.name().clone());
        Ok(())
    }

    pub fn push_scope(&mut self, bindings: Vec<(Rc<str>, Val)>) {
        self.scopes.push(bindings.into_iter().collect());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn truncate_scopes(&mut self, depth: usize) {
        self.scopes.truncate(depth);
    }

    pub fn is_array(&self, ident: &Ident) -> bool {
        self.arrays.contains_key(ident.name())
    }

    /// DIM of an existing name starts it over.
    pub fn dimension_array(&mut self, ident: &Ident, bounds: Vec<i64>) -> Result<()> {
        let mut sizes = Vec::with_capacity(bounds.len());
        for b in bounds {
            if b < 0 || b > u16::max_value() as i64 {
                return Err(error!(IllegalFunctionCall; format!("BAD DIMENSION {}", b)));
            }
            sizes.push(b as usize);
        }
        let array = Array::new(ident.name(), sizes)?;
        self.arrays.insert(ident.name().clone(), array);
        Ok(())
    }

    /// First use of an undimensioned array gives it 10 per dimension.
    fn array_for(&mut self, ident: &Ident, dims: usize) -> Result<&mut Array> {
        if !self.arrays.contains_key(ident.name()) {
            let array = Array::new(ident.name(), vec![10; dims])?;
            self.arrays.insert(ident.name().clone(), array);
        }
        match self.arrays.get_mut(ident.name()) {
            Some(array) => Ok(array),
            None => Err(error!(InternalError; "ARRAY")),
        }
    }

    pub fn fetch_array(&mut self, ident: &Ident, subscripts: &[i64]) -> Result<Val> {
        let array = self.array_for(ident, subscripts.len())?;
        let offset = array.offset(subscripts)?;
        Ok(array.vals[offset].clone())
    }

    pub fn store_array(&mut self, ident: &Ident, subscripts: &[i64], value: Val) -> Result<()> {
        let value = match value {
            Val::Integer(_) | Val::Float(_) if ident.is_string() => Val::from(value.to_string()),
            v => v,
        };
        let array = self.array_for(ident, subscripts.len())?;
        let offset = array.offset(subscripts)?;
        array.vals[offset] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_unset_defaults() {
        let var = Var::new();
        assert_eq!(var.fetch(&Ident::new("A")), Val::Integer(0));
        assert_eq!(var.fetch(&Ident::new("A$")), Val::from(""));
    }

    #[test]
    fn test_scopes_shadow_and_restore() {
        let mut var = Var::new();
        let s = Ident::new("S");
        var.store(&s, Val::Integer(1)).unwrap();
        var.push_scope(vec![("S".into(), Val::Integer(50))]);
        assert_eq!(var.fetch(&s), Val::Integer(50));
        var.store(&Ident::new("T"), Val::Integer(2)).unwrap();
        var.pop_scope();
        assert_eq!(var.fetch(&s), Val::Integer(1));
        assert_eq!(var.fetch(&Ident::new("T")), Val::Integer(2));
    }

    #[test]
    fn test_arrays() {
        let mut var = Var::new();
        let a = Ident::new("A");
        var.dimension_array(&a, vec![3]).unwrap();
        var.store_array(&a, &[3], Val::Integer(9)).unwrap();
        assert_eq!(var.fetch_array(&a, &[3]).unwrap(), Val::Integer(9));
        let e = var.fetch_array(&a, &[4]).unwrap_err();
        assert!(e.is(ErrorCode::SubscriptOutOfRange));
        var.dimension_array(&a, vec![3]).unwrap();
        assert_eq!(var.fetch_array(&a, &[3]).unwrap(), Val::Integer(0));
    }

    #[test]
    fn test_auto_dimension_and_string_arrays() {
        let mut var = Var::new();
        let n = Ident::new("N$");
        assert_eq!(var.fetch_array(&n, &[10]).unwrap(), Val::from(""));
        assert!(var.fetch_array(&n, &[11]).is_err());
        var.store_array(&n, &[1], Val::Integer(5)).unwrap();
        assert_eq!(var.fetch_array(&n, &[1]).unwrap(), Val::from("5"));
    }

    #[test]
    fn test_oversized_arrays() {
        let mut var = Var::new();
        let a = Ident::new("A");
        let e = var.dimension_array(&a, vec![65535; 5]).unwrap_err();
        assert!(e.is(ErrorCode::StackOverflow));
        assert!(!var.is_array(&a));
        let b = Ident::new("B");
        let e = var.store_array(&b, &[1; 10], Val::Integer(1)).unwrap_err();
        assert!(e.is(ErrorCode::StackOverflow));
        assert!(var.fetch_array(&b, &[1, 1]).is_ok());
    }

    #[test]
    fn test_constants() {
        let mut var = Var::new();
        let k = Ident::new("K");
        var.define_const(&k, Val::Integer(1)).unwrap();
        assert!(var.store(&k, Val::Integer(2)).unwrap_err().is(ErrorCode::ConstantReassigned));
    }
}
