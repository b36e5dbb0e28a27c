// Used in both Token and Ast
use std::rc::Rc;

/// Upper-cased variable or function name. `String` names end with `$`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Ident {
    Plain(Rc<str>),
    String(Rc<str>),
}

impl Ident {
    pub fn new(name: &str) -> Ident {
        let name = name.to_ascii_uppercase();
        if name.ends_with('$') {
            Ident::String(name.into())
        } else {
            Ident::Plain(name.into())
        }
    }

    pub fn name(&self) -> &Rc<str> {
        match self {
            Ident::Plain(s) => s,
            Ident::String(s) => s,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Ident::String(_))
    }

    pub fn is(&self, word: &str) -> bool {
        &**self.name() == word
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Ident::*;
        match self {
            Plain(s) => write!(f, "{}", s),
            String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_selects_kind() {
        assert_eq!(Ident::new("name$"), Ident::String("NAME$".into()));
        assert_eq!(Ident::new("count"), Ident::Plain("COUNT".into()));
        assert!(Ident::new("count").is("COUNT"));
    }
}
