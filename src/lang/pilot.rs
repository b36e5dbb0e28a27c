use super::{
    ast::*, classify::pilot_parts, classify::Vocabulary, lex::lex, line::command, logo::parse_logo,
    parse::parse_expression, parse::parse_statement, parse::Parser, token::*, Error,
};

type Result<T> = std::result::Result<T, Error>;

/// Parses a colon command such as `T:Hello` or `TY:Matched`.
pub fn parse_pilot(text: &str, vocabulary: &Vocabulary) -> Result<Command> {
    let (letter, gate, body) = match pilot_parts(text.trim()) {
        Some(parts) => parts,
        None => return Err(error!(SyntaxError; "EXPECTED PILOT COMMAND")),
    };
    let inner = match letter {
        'Y' => return Ok(Command::Gated(true, Box::new(command(body.trim(), vocabulary)?))),
        'N' => return Ok(Command::Gated(false, Box::new(command(body.trim(), vocabulary)?))),
        _ => Command::Pilot(pilot_command(letter, body, vocabulary)?),
    };
    match gate {
        Some(gate) => Ok(Command::Gated(gate, Box::new(inner))),
        None => Ok(inner),
    }
}

fn pilot_command(letter: char, body: &str, vocabulary: &Vocabulary) -> Result<Pilot> {
    let arg = body.trim();
    match letter {
        'T' => Ok(Pilot::Type(arg.into())),
        'A' => accept(arg),
        'M' => Ok(Pilot::Match(
            arg.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Into::into)
                .collect(),
        )),
        'J' => Ok(Pilot::Jump(label(arg)?)),
        'U' if arg.contains('=') => Ok(Pilot::Compute(parse_statement(arg, vocabulary)?)),
        'U' => Ok(Pilot::Use(label(arg)?)),
        'C' => compute(arg, vocabulary),
        'E' => Ok(Pilot::End),
        'R' => Ok(Pilot::Remark),
        'L' => Ok(Pilot::Label(label(arg)?)),
        'G' => Ok(Pilot::Graphics(Box::new(parse_logo(arg, vocabulary)?))),
        'S' => string_op(arg),
        'D' => dimension(arg),
        'P' => Ok(Pilot::Pause(parse_expression(arg)?)),
        'X' => Ok(Pilot::Execute(Box::new(command(arg, vocabulary)?))),
        _ => Err(error!(UnknownCommand; format!("{}:", letter))),
    }
}

fn label(arg: &str) -> Result<std::rc::Rc<str>> {
    let name = arg.trim_start_matches('*').trim();
    if name.is_empty() {
        return Err(error!(SyntaxError; "EXPECTED LABEL"));
    }
    Ok(name.to_ascii_uppercase().into())
}

fn accept(arg: &str) -> Result<Pilot> {
    if arg.is_empty() {
        return Ok(Pilot::Accept(None));
    }
    let tokens = lex(arg);
    match tokens.as_slice() {
        [(_, Token::Ident(ident))] => Ok(Pilot::Accept(Some(ident.clone()))),
        _ => Err(error!(SyntaxError; "EXPECTED VARIABLE")),
    }
}

fn compute(arg: &str, vocabulary: &Vocabulary) -> Result<Pilot> {
    if arg.starts_with('*') {
        return Ok(Pilot::Use(label(arg)?));
    }
    let tokens = lex(arg);
    let mut parse = Parser::new(arg, &tokens, vocabulary);
    let assignment = tokens
        .iter()
        .any(|(_, t)| *t == Token::Operator(Operator::Equal));
    if assignment {
        if let Ok(statement) = parse_statement(arg, vocabulary) {
            if let Statement::Let(..) = statement {
                return Ok(Pilot::Compute(statement));
            }
        }
    }
    let expr = parse.expression()?;
    parse.finish()?;
    Ok(Pilot::Compute(Statement::Let(
        Variable::Unary(Ident::new("RESULT")),
        expr,
    )))
}

fn string_op(arg: &str) -> Result<Pilot> {
    let mut words = arg.split_whitespace();
    let op = match words.next().map(str::to_ascii_uppercase).as_deref() {
        Some("UPPER") => StrOp::Upper,
        Some("LOWER") => StrOp::Lower,
        Some("LEN") => StrOp::Len,
        Some("REVERSE") => StrOp::Reverse,
        Some("TRIM") => StrOp::Trim,
        _ => return Err(error!(SyntaxError; "EXPECTED UPPER, LOWER, LEN, REVERSE OR TRIM")),
    };
    match (words.next(), words.next()) {
        (Some(name), None) => Ok(Pilot::Str(op, Ident::new(name))),
        _ => Err(error!(SyntaxError; "EXPECTED VARIABLE")),
    }
}

fn dimension(arg: &str) -> Result<Pilot> {
    match parse_statement(&format!("DIM {}", arg), &Vocabulary::new())? {
        Statement::Dim(mut v) if v.len() == 1 => {
            let (ident, mut bounds) = v.remove(0);
            if bounds.len() != 1 {
                return Err(error!(SyntaxError; "EXPECTED ONE DIMENSION"));
            }
            Ok(Pilot::Dim(ident, bounds.remove(0)))
        }
        _ => Err(error!(SyntaxError; "EXPECTED NAME(SIZE)")),
    }
}
