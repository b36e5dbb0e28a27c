use super::{Runtime, Val};
use crate::lang::ast::*;
use crate::lang::{Error, Ident};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

impl Runtime {
    pub(super) fn pilot(&mut self, pilot: &Pilot) -> Result<()> {
        use Pilot::*;
        match pilot {
            Type(text) => {
                let text = self.interpolate(text);
                self.emit(&text);
                Ok(())
            }
            Accept(ident) => self.accept(ident),
            Match(patterns) => {
                self.r#match(patterns);
                Ok(())
            }
            Jump(label) => {
                let pc = self.program.label(label)?;
                self.jump(pc)
            }
            Use(label) => {
                let pc = self.program.label(label)?;
                self.gosub(pc)
            }
            Compute(statement) => self.basic(statement),
            End => self.end_pilot(),
            Remark | Label(_) => Ok(()),
            Graphics(command) | Execute(command) => self.command(command),
            Str(op, ident) => self.string_op(*op, ident),
            Dim(ident, size) => {
                let size = self.eval_integer(size)?;
                self.var.dimension_array(ident, vec![size])
            }
            Pause(millis) => {
                let millis = self.eval_number(millis)?;
                self.pause(millis);
                Ok(())
            }
        }
    }

    /// Stores the reply raw for matching and as a number where it reads
    /// as one.
    fn accept(&mut self, ident: &Option<Ident>) -> Result<()> {
        let reply = self.request_input("")?;
        let typed = Val::from_input(&reply);
        self.var.store_name("ANSWER", typed.clone());
        self.var.store_name("INPUT", typed.clone());
        if let Some(ident) = ident {
            let val = if ident.is_string() {
                Val::from(reply.as_str())
            } else {
                typed
            };
            self.var.store(ident, val)?;
        }
        self.answer = reply;
        Ok(())
    }

    /// The answer must equal a pattern exactly, case included. The first
    /// equal pattern wins.
    fn r#match(&mut self, patterns: &[Rc<str>]) {
        let answer = self.answer.trim();
        let hit = patterns.iter().find(|p| answer == &***p).cloned();
        self.matched = hit.is_some();
        self.var.store_name("STATUS", Val::from(self.matched));
        if let Some(pattern) = hit {
            self.var.store_name("MATCHED", Val::String(pattern));
        }
    }

    fn string_op(&mut self, op: StrOp, ident: &Ident) -> Result<()> {
        let text = self
            .var
            .get(ident.name())
            .map_or(String::new(), |v| v.to_string());
        let result = match op {
            StrOp::Upper => text.to_uppercase(),
            StrOp::Lower => text.to_lowercase(),
            StrOp::Reverse => text.chars().rev().collect(),
            StrOp::Trim => text.trim().to_string(),
            StrOp::Len => {
                let name = format!("{}_LEN", ident.name().trim_end_matches('$'));
                self.var
                    .store_name(&name, Val::Integer(text.chars().count() as i64));
                return Ok(());
            }
        };
        self.var.store(ident, Val::from(result))
    }

    /// Replaces `$NAME` and `*NAME*` with variable values. Names that are
    /// not set stay as written.
    pub(super) fn interpolate(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '$' || c == '*' {
                let word: String = chars[i + 1..]
                    .iter()
                    .take_while(|c| c.is_alphanumeric() || **c == '_')
                    .collect();
                let after = i + 1 + word.chars().count();
                if !word.is_empty() {
                    let name = word.to_ascii_uppercase();
                    let found = if c == '*' {
                        if chars.get(after) == Some(&'*') {
                            self.lookup(&name).map(|v| (v, after + 1))
                        } else {
                            None
                        }
                    } else if chars.get(after) == Some(&'$') {
                        self.var
                            .get(&format!("{}$", name))
                            .map(|v| (v.clone(), after + 1))
                            .or_else(|| self.lookup(&name).map(|v| (v, after)))
                    } else {
                        self.lookup(&name).map(|v| (v, after))
                    };
                    if let Some((val, next)) = found {
                        out.push_str(&val.to_string());
                        i = next;
                        continue;
                    }
                }
            }
            out.push(c);
            i += 1;
        }
        out
    }

    fn lookup(&self, name: &str) -> Option<Val> {
        self.var
            .get(name)
            .or_else(|| self.var.get(&format!("{}$", name)))
            .cloned()
    }
}
