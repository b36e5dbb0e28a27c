use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector

pub struct Stack<T> {
    overflow_message: &'static str,
    limit: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str, limit: usize) -> Stack<T> {
        Stack {
            overflow_message,
            limit,
            vec: vec![],
        }
    }
    fn underflow_error(&self) -> Error {
        error!(InternalError; "UNDERFLOW")
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.vec.get_mut(index)
    }
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.vec.last_mut()
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn truncate(&mut self, len: usize) {
        self.vec.truncate(len)
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.vec.get(idx)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.vec.iter()
    }
    /// Pushing past the limit is a resource error and leaves the stack
    /// unchanged.
    pub fn push(&mut self, val: T) -> Result<()> {
        if self.vec.len() >= self.limit {
            return Err(error!(StackOverflow; self.overflow_message));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }
    pub fn pop_n(&mut self, len: usize) -> Result<Vec<T>> {
        if len > self.vec.len() {
            Err(self.underflow_error())
        } else {
            let range = (self.vec.len() - len)..;
            Ok(self.vec.drain(range).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Category, ErrorCode};

    #[test]
    fn test_limit_is_resource_error() {
        let mut s: Stack<u8> = Stack::new("CALL DEPTH", 2);
        assert!(s.push(1).is_ok());
        assert!(s.push(2).is_ok());
        let e = s.push(3).unwrap_err();
        assert!(e.is(ErrorCode::StackOverflow));
        assert_eq!(e.category(), Category::Resource);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_underflow() {
        let mut s: Stack<u8> = Stack::new("", 4);
        assert!(s.pop().is_err());
        s.push(1).unwrap();
        s.push(2).unwrap();
        assert_eq!(s.pop_n(2).unwrap(), vec![1, 2]);
    }
}
