use crate::error;
use crate::lang::ast::*;
use crate::lang::{Error, Ident, Source};
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcKind {
    /// Logo `TO`
    Procedure,
    Sub,
    Function,
}

/// A callable body inside the main block: the lines strictly between
/// `start` and `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub kind: ProcKind,
    pub params: Vec<Ident>,
    pub start: usize,
    pub end: usize,
}

/// ## Program
///
/// The loaded source plus everything the pre-scan finds: labels, line
/// numbers, DATA and callable definitions.

#[derive(Debug, Default)]
pub struct Program {
    source: Source,
    labels: HashMap<Rc<str>, usize>,
    numbers: HashMap<usize, usize>,
    data: Vec<Expression>,
    data_starts: Vec<(usize, usize)>,
    procedures: HashMap<Rc<str>, Procedure>,
    subs: HashMap<Rc<str>, Procedure>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn load(source: Source) -> Program {
        let mut program = Program {
            source,
            ..Program::default()
        };
        let block = program.source.block().clone();
        for (pc, line) in program.source.lines().iter().enumerate() {
            if let Some(number) = line.number() {
                program.numbers.entry(number).or_insert(pc);
            }
        }
        for (pc, instr) in block.instrs.iter().enumerate() {
            let command = match &instr.command {
                Ok(command) => command,
                Err(_) => continue,
            };
            let end = block.link(pc).end.unwrap_or(pc);
            match command {
                Command::Label(name) | Command::Pilot(Pilot::Label(name)) => {
                    program.labels.entry(name.clone()).or_insert(pc);
                }
                Command::Basic(Statement::Data(items)) => {
                    program.data_starts.push((pc, program.data.len()));
                    program.data.extend(items.iter().cloned());
                }
                Command::Basic(Statement::Sub(name, params)) => {
                    program.define_sub(ProcKind::Sub, name, params, pc, end);
                }
                Command::Basic(Statement::Function(name, params)) => {
                    program.define_sub(ProcKind::Function, name, params, pc, end);
                }
                Command::Logo(Logo::To(name, params)) => {
                    program.procedures.insert(
                        name.name().clone(),
                        Procedure {
                            kind: ProcKind::Procedure,
                            params: params.clone(),
                            start: pc,
                            end,
                        },
                    );
                }
                _ => {}
            }
        }
        program
    }

    fn define_sub(&mut self, kind: ProcKind, name: &Ident, params: &[Ident], start: usize, end: usize) {
        self.subs.insert(
            name.name().clone(),
            Procedure {
                kind,
                params: params.to_vec(),
                start,
                end,
            },
        );
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn block(&self) -> &Rc<Block> {
        self.source.block()
    }

    pub fn len(&self) -> usize {
        self.source.block().len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.block().is_empty()
    }

    pub fn resolve(&self, target: &Target) -> Result<usize> {
        match target {
            Target::Line(n) => match self.numbers.get(n) {
                Some(pc) => Ok(*pc),
                None => Err(error!(UndefinedLine; n.to_string())),
            },
            Target::Label(name) => self.label(name),
        }
    }

    pub fn label(&self, name: &str) -> Result<usize> {
        let upper = name.trim_start_matches('*').to_ascii_uppercase();
        match self.labels.get(upper.as_str()) {
            Some(pc) => Ok(*pc),
            None => Err(error!(UndefinedLabel; upper)),
        }
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(name)
    }

    pub fn sub(&self, name: &str) -> Option<&Procedure> {
        self.subs.get(name)
    }

    pub fn data(&self) -> &[Expression] {
        &self.data
    }

    /// The first DATA item at or after a main block index.
    pub fn data_index_at(&self, pc: usize) -> usize {
        self.data_starts
            .iter()
            .find(|(start, _)| *start >= pc)
            .map_or(self.data.len(), |(_, index)| *index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prescan() {
        let program = Program::load(Source::load(
            "10 DATA 1, 2\n*start\nL:again\nloop1:\n50 DATA \"x\"\nTO SQ :s\nFD :s\nEND\nSUB Hi(a)\nEND SUB",
        ));
        assert_eq!(program.resolve(&Target::Line(50)).unwrap(), 4);
        assert_eq!(program.label("start").unwrap(), 1);
        assert_eq!(program.label("*AGAIN").unwrap(), 2);
        assert_eq!(program.label("LOOP1").unwrap(), 3);
        assert_eq!(program.data().len(), 3);
        assert_eq!(program.data_index_at(2), 2);
        assert_eq!(program.procedure("SQ").unwrap().end, 7);
        let sub = program.sub("HI").unwrap();
        assert_eq!((sub.start, sub.end, sub.params.len()), (8, 9, 1));
    }

    #[test]
    fn test_unknown_targets() {
        let program = Program::load(Source::load("PRINT 1"));
        assert!(program
            .resolve(&Target::Line(99))
            .unwrap_err()
            .is(crate::lang::ErrorCode::UndefinedLine));
        assert!(program
            .label("nowhere")
            .unwrap_err()
            .is(crate::lang::ErrorCode::UndefinedLabel));
    }
}
