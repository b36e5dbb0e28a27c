use super::ast::*;
use super::classify::{classify, first_word, Heritage, Route, Vocabulary};
use super::link::link;
use super::logo::{bracket_balance, parse_logo};
use super::parse::parse_statement;
use super::pilot::parse_pilot;
use super::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// One line of source with its optional BASIC line number removed.
#[derive(Debug, PartialEq, Clone)]
pub struct Line {
    number: Option<usize>,
    text: String,
}

impl Line {
    pub fn split(s: &str) -> Line {
        let trimmed = s.trim();
        let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            let rest = &trimmed[digits..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                if let Ok(number) = trimmed[..digits].parse() {
                    return Line {
                        number: Some(number),
                        text: rest.trim().to_string(),
                    };
                }
            }
        }
        Line {
            number: None,
            text: trimmed.to_string(),
        }
    }

    pub fn number(&self) -> Option<usize> {
        self.number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.number {
            Some(number) => write!(f, "{} {}", number, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Routes one command to the parser for its heritage.
pub fn command(text: &str, vocabulary: &Vocabulary) -> Result<Command> {
    let text = text.trim();
    let route = classify(text, vocabulary);
    let heritage = match route {
        Route::Pilot => Heritage::Pilot,
        Route::Logo => Heritage::Logo,
        Route::Basic => Heritage::Basic,
        Route::Label(name) => return Ok(Command::Label(name)),
        Route::Comment => return Ok(Command::Nop),
    };
    let parsed = match heritage {
        Heritage::Pilot => parse_pilot(text, vocabulary),
        Heritage::Logo => parse_logo(text, vocabulary),
        Heritage::Basic => parse_statement(text, vocabulary).map(Command::Basic),
    };
    parsed.map_err(|e| e.in_heritage(heritage))
}

/// A loaded program: one instruction per source line, linked.
#[derive(Debug, Clone, Default)]
pub struct Source {
    lines: Vec<Line>,
    block: Rc<Block>,
    vocabulary: Vocabulary,
}

impl Source {
    pub fn load(text: &str) -> Source {
        Source::load_with(text, Vocabulary::new())
    }

    /// Loads with procedure names already known, as a REPL line does.
    pub fn load_with(text: &str, mut vocabulary: Vocabulary) -> Source {
        let lines: Vec<Line> = text.lines().map(Line::split).collect();
        for line in &lines {
            if first_word(line.text()) == "TO" {
                if let Some(name) = line.text().split_whitespace().nth(1) {
                    vocabulary.define(name);
                }
            }
        }
        let mut instrs: Vec<Instr> = Vec::with_capacity(lines.len());
        let mut index = 0;
        while index < lines.len() {
            let mut text = lines[index].text().to_string();
            let first = index;
            if classify(&text, &vocabulary) == Route::Logo {
                while bracket_balance(&text) > 0 && index + 1 < lines.len() {
                    index += 1;
                    text.push('\n');
                    text.push_str(lines[index].text());
                }
            }
            instrs.push(Source::instr(first + 1, &text, &vocabulary));
            for continued in first + 1..=index {
                instrs.push(Instr {
                    line: continued + 1,
                    heritage: None,
                    command: Ok(Command::Nop),
                });
            }
            index += 1;
        }
        let links = link(&mut instrs);
        Source {
            lines,
            block: Rc::new(Block { instrs, links }),
            vocabulary,
        }
    }

    fn instr(line: usize, text: &str, vocabulary: &Vocabulary) -> Instr {
        let command = command(text, vocabulary).map_err(|e| e.in_line_number(line));
        let heritage = match &command {
            Ok(c) => c.heritage(),
            Err(e) => e.heritage(),
        };
        Instr {
            line,
            heritage,
            command,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn block(&self) -> &Rc<Block> {
        &self.block
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Every load-time error, in source order.
    pub fn errors(&self) -> Vec<Error> {
        self.block
            .instrs
            .iter()
            .filter_map(|i| i.command.as_ref().err().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_line_number_split() {
        let line = Line::split("  10 PRINT \"A\"");
        assert_eq!(line.number(), Some(10));
        assert_eq!(line.text(), "PRINT \"A\"");
        assert_eq!(line.to_string(), "10 PRINT \"A\"");
        assert_eq!(Line::split("10PRINT").number(), None);
    }

    #[test]
    fn test_one_instr_per_line() {
        let source = Source::load("10 PRINT 1\n\nREM x\n*start\nT:hi");
        let instrs = &source.block().instrs;
        assert_eq!(instrs.len(), 5);
        assert_eq!(instrs[1].command, Ok(Command::Nop));
        assert_eq!(instrs[3].command, Ok(Command::Label("START".into())));
        assert_eq!(instrs[4].heritage, Some(Heritage::Pilot));
        assert_eq!(instrs[4].line, 5);
    }

    #[test]
    fn test_multi_line_repeat_joins() {
        let source = Source::load("REPEAT 2 [\n  FD 10\n  RT 90\n]\nPRINT 1");
        let instrs = &source.block().instrs;
        assert_eq!(instrs.len(), 5);
        match &instrs[0].command {
            Ok(Command::Logo(Logo::Repeat(_, body))) => assert_eq!(body.len(), 2),
            c => panic!("{:?}", c),
        }
        assert_eq!(instrs[2].command, Ok(Command::Nop));
    }

    #[test]
    fn test_procedures_known_before_use() {
        let source = Source::load("SQ 10\nTO SQ :s\nFD :s\nEND");
        let instrs = &source.block().instrs;
        assert!(matches!(instrs[0].command, Ok(Command::Logo(Logo::Call(..)))));
        assert_eq!(source.block().link(1).end, Some(3));
    }

    #[test]
    fn test_errors_carry_line_and_heritage() {
        let source = Source::load("PRINT 1\nFORWARD\nWEND");
        let errors = source.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line_number(), Some(2));
        assert_eq!(errors[0].heritage(), Some(Heritage::Logo));
        assert!(errors[1].is(ErrorCode::WendWithoutWhile));
    }
}
