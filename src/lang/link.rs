use super::ast::*;
use super::ErrorCode;
use super::Error;

/// An open construct waiting for its closer.
#[derive(Debug)]
enum Opener {
    If { branches: Vec<usize> },
    While(usize),
    Do(usize),
    For(usize),
    Select { start: usize, cases: Vec<usize> },
    Sub(usize),
    To(usize),
    Try { start: usize, catch: Option<usize> },
}

impl Opener {
    fn unclosed(&self) -> (usize, ErrorCode) {
        match self {
            Opener::If { branches } => (branches[0], ErrorCode::IfWithoutEndIf),
            Opener::While(i) => (*i, ErrorCode::WhileWithoutWend),
            Opener::Do(i) => (*i, ErrorCode::DoWithoutLoop),
            Opener::For(i) => (*i, ErrorCode::ForWithoutNext),
            Opener::Select { start, .. } => (*start, ErrorCode::SelectWithoutEndSelect),
            Opener::Sub(i) | Opener::To(i) => (*i, ErrorCode::SubWithoutEnd),
            Opener::Try { start, .. } => (*start, ErrorCode::TryWithoutEndTry),
        }
    }
}

/// Matches block openers with their branches and closers. Unmatched
/// instructions have their command replaced by the error.
pub fn link(instrs: &mut [Instr]) -> Vec<Link> {
    let mut links = vec![Link::default(); instrs.len()];
    let mut open: Vec<Opener> = vec![];
    let mut failed: Vec<(usize, ErrorCode)> = vec![];
    for i in 0..instrs.len() {
        let command = match &instrs[i].command {
            Ok(command) => command,
            Err(_) => continue,
        };
        if let Command::Logo(Logo::To(..)) = command {
            open.push(Opener::To(i));
            continue;
        }
        let statement = match command.statement() {
            Some(statement) => statement,
            None => continue,
        };
        use Statement::*;
        match statement {
            IfBlock(_) => open.push(Opener::If { branches: vec![i] }),
            ElseIf(_) | Else => match open.last_mut() {
                Some(Opener::If { branches }) => {
                    if let Some(last) = branches.last() {
                        links[*last].alt = Some(i);
                    }
                    branches.push(i);
                }
                _ => failed.push((i, ErrorCode::ElseWithoutIf)),
            },
            EndBlock(Closer::If) => match open.last() {
                Some(Opener::If { branches }) => {
                    if let Some(last) = branches.last() {
                        links[*last].alt = Some(i);
                    }
                    for b in branches {
                        links[*b].end = Some(i);
                    }
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::ElseWithoutIf)),
            },
            While(_) => open.push(Opener::While(i)),
            Wend => match open.last() {
                Some(Opener::While(start)) => {
                    pair(&mut links, *start, i);
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::WendWithoutWhile)),
            },
            Do(_) => open.push(Opener::Do(i)),
            Loop(_) => match open.last() {
                Some(Opener::Do(start)) => {
                    pair(&mut links, *start, i);
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::LoopWithoutDo)),
            },
            For(..) | ForEach(..) => open.push(Opener::For(i)),
            Next(_) => match open.last() {
                Some(Opener::For(start)) => {
                    pair(&mut links, *start, i);
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::NextWithoutFor)),
            },
            Select(_) => open.push(Opener::Select {
                start: i,
                cases: vec![],
            }),
            Case(_) | CaseElse => match open.last_mut() {
                Some(Opener::Select { start, cases }) => {
                    let prev = cases.last().copied().unwrap_or(*start);
                    links[prev].alt = Some(i);
                    cases.push(i);
                }
                _ => failed.push((i, ErrorCode::CaseWithoutSelect)),
            },
            EndBlock(Closer::Select) => match open.last() {
                Some(Opener::Select { start, cases }) => {
                    let prev = cases.last().copied().unwrap_or(*start);
                    links[prev].alt = Some(i);
                    links[*start].end = Some(i);
                    for c in cases {
                        links[*c].end = Some(i);
                    }
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::CaseWithoutSelect)),
            },
            Sub(..) | Function(..) => open.push(Opener::Sub(i)),
            EndBlock(Closer::Sub) | EndBlock(Closer::Function) => match open.last() {
                Some(Opener::Sub(start)) => {
                    links[*start].end = Some(i);
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::SubWithoutEnd)),
            },
            End => {
                if let Some(Opener::To(start)) = open.last() {
                    links[*start].end = Some(i);
                    open.pop();
                }
            }
            Try => open.push(Opener::Try {
                start: i,
                catch: None,
            }),
            Catch(_) => match open.last_mut() {
                Some(Opener::Try { start, catch }) if catch.is_none() => {
                    links[*start].alt = Some(i);
                    *catch = Some(i);
                }
                _ => failed.push((i, ErrorCode::TryWithoutEndTry)),
            },
            EndBlock(Closer::Try) => match open.last() {
                Some(Opener::Try { start, catch }) => {
                    links[*start].end = Some(i);
                    if let Some(c) = catch {
                        links[*c].end = Some(i);
                    }
                    open.pop();
                }
                _ => failed.push((i, ErrorCode::TryWithoutEndTry)),
            },
            _ => {}
        }
    }
    failed.extend(open.iter().map(Opener::unclosed));
    for (i, code) in failed {
        let instr = &mut instrs[i];
        let mut error = Error::new(code);
        if let Some(heritage) = instr.heritage {
            error = error.in_heritage(heritage);
        }
        if instr.line > 0 {
            error = error.in_line_number(instr.line);
        }
        instr.command = Err(error);
        links[i] = Link::default();
    }
    links
}

fn pair(links: &mut [Link], start: usize, close: usize) {
    links[start].end = Some(close);
    links[close].alt = Some(start);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn instrs(statements: Vec<Statement>) -> Vec<Instr> {
        statements
            .into_iter()
            .enumerate()
            .map(|(i, s)| Instr {
                line: i + 1,
                heritage: None,
                command: Ok(Command::Basic(s)),
            })
            .collect()
    }

    fn one() -> Expression {
        Expression::Integer(1)
    }

    #[test]
    fn test_if_chain() {
        let mut v = instrs(vec![
            Statement::IfBlock(one()),
            Statement::Beep,
            Statement::ElseIf(one()),
            Statement::Else,
            Statement::EndBlock(Closer::If),
        ]);
        let links = link(&mut v);
        assert_eq!(links[0], Link { alt: Some(2), end: Some(4) });
        assert_eq!(links[2], Link { alt: Some(3), end: Some(4) });
        assert_eq!(links[3], Link { alt: Some(4), end: Some(4) });
    }

    #[test]
    fn test_nested_loops() {
        let mut v = instrs(vec![
            Statement::While(one()),
            Statement::Do(None),
            Statement::Loop(None),
            Statement::Wend,
        ]);
        let links = link(&mut v);
        assert_eq!(links[0].end, Some(3));
        assert_eq!(links[3].alt, Some(0));
        assert_eq!(links[1].end, Some(2));
    }

    #[test]
    fn test_select_cases() {
        let mut v = instrs(vec![
            Statement::Select(one()),
            Statement::Case(vec![]),
            Statement::CaseElse,
            Statement::EndBlock(Closer::Select),
        ]);
        let links = link(&mut v);
        assert_eq!(links[0], Link { alt: Some(1), end: Some(3) });
        assert_eq!(links[1].alt, Some(2));
        assert_eq!(links[2], Link { alt: Some(3), end: Some(3) });
    }

    #[test]
    fn test_try_catch() {
        let mut v = instrs(vec![
            Statement::Try,
            Statement::Catch(None),
            Statement::EndBlock(Closer::Try),
        ]);
        let links = link(&mut v);
        assert_eq!(links[0], Link { alt: Some(1), end: Some(2) });
        assert_eq!(links[1].end, Some(2));
    }

    #[test]
    fn test_unmatched_constructs_become_errors() {
        let mut v = instrs(vec![Statement::Wend, Statement::While(one())]);
        link(&mut v);
        assert!(v[0].command.as_ref().unwrap_err().is(ErrorCode::WendWithoutWhile));
        let e = v[1].command.as_ref().unwrap_err();
        assert!(e.is(ErrorCode::WhileWithoutWend));
        assert_eq!(e.line_number(), Some(2));
    }
}
