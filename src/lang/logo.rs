use super::{
    ast::*, classify::first_word, classify::Vocabulary, lex::lex, line::command, link::link,
    parse::parse_expression, parse::split_top_level, token::*, Error,
};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Words that start a new command inside a REPEAT body or a Logo line.
const COMMAND_WORDS: &[&str] = &[
    "ARC", "BACK", "BACKWARD", "BK", "CIRCLE", "CLEARSCREEN", "CS", "DOT", "END", "FD", "FILL",
    "FILLED", "FOR", "FORWARD", "GOSUB", "GOTO", "HIDETURTLE", "HOME", "HT", "IF", "LEFT", "LET",
    "LT", "MAKE", "PD", "PENDOWN", "PENUP", "PRINT", "PU", "RECT", "RECTANGLE", "REM", "REPEAT",
    "RIGHT", "RT", "SETBACKGROUND", "SETBG", "SETCOLOR", "SETCOLOUR", "SETFC", "SETFILLCOLOR",
    "SETH", "SETHEADING", "SETPC", "SETPENCOLOR", "SETPENSIZE", "SETWIDTH", "SETXY", "SHOWTURTLE",
    "SQUARE", "ST", "TOWARDS", "TRIANGLE",
];

/// Parses a line whose first word is a Logo keyword or a `TO` procedure.
pub fn parse_logo(text: &str, vocabulary: &Vocabulary) -> Result<Command> {
    let text = text.trim();
    if !first_word(text).eq_ignore_ascii_case("TO") {
        let segments = split_commands(text, vocabulary);
        if segments.len() > 1 {
            return Ok(Command::Logo(Logo::Run(block(&segments, vocabulary))));
        }
    }
    Ok(Command::Logo(logo_command(text, vocabulary)?))
}

fn logo_command(text: &str, vocabulary: &Vocabulary) -> Result<Logo> {
    let word = first_word(text);
    let rest = text[word.len()..].trim();
    let none = |logo: Logo| -> Result<Logo> {
        if rest.is_empty() {
            Ok(logo)
        } else {
            Err(error!(SyntaxError; format!("UNEXPECTED {}", rest)))
        }
    };
    use Logo::*;
    match word.as_str() {
        "FORWARD" | "FD" => Ok(Forward(one(rest)?)),
        "BACK" | "BK" | "BACKWARD" => Ok(Back(one(rest)?)),
        "LEFT" | "LT" => Ok(Left(one(rest)?)),
        "RIGHT" | "RT" => Ok(Right(one(rest)?)),
        "PENUP" | "PU" => none(PenUp),
        "PENDOWN" | "PD" => none(PenDown),
        "HOME" => none(Home),
        "CLEARSCREEN" | "CS" | "CLEAN" => none(ClearScreen),
        "SETXY" | "SETPOS" => {
            let (x, y) = two(rest)?;
            Ok(SetXY(x, y))
        }
        "SETX" => Ok(SetX(one(rest)?)),
        "SETY" => Ok(SetY(one(rest)?)),
        "SETHEADING" | "SETH" => Ok(SetHeading(one(rest)?)),
        "TOWARDS" => {
            let (x, y) = two(rest)?;
            Ok(Towards(x, y))
        }
        "SHOWTURTLE" | "ST" => none(ShowTurtle),
        "HIDETURTLE" | "HT" => none(HideTurtle),
        "SETCOLOR" | "SETCOLOUR" | "SETPENCOLOR" | "SETPC" => Ok(SetColor(colour(rest)?)),
        "SETPENSIZE" | "SETWIDTH" => Ok(SetPenSize(one(rest)?)),
        "SETFILLCOLOR" | "SETFC" => Ok(SetFillColor(colour(rest)?)),
        "SETBACKGROUND" | "SETBG" | "SETSCREENCOLOR" | "SETSCREENCOLOUR" => {
            Ok(SetBackground(colour(rest)?))
        }
        "CIRCLE" => Ok(Circle(one(rest)?)),
        "ARC" => {
            let (angle, radius) = one_or_two(rest)?;
            Ok(Arc(angle, radius))
        }
        "DOT" => Ok(Dot(optional(rest)?)),
        "RECT" | "RECTANGLE" => {
            let (w, h) = one_or_two(rest)?;
            Ok(Rect(w, h))
        }
        "SQUARE" => Ok(Square(optional(rest)?)),
        "TRIANGLE" => Ok(Triangle(optional(rest)?)),
        "POLYGON" => {
            let (sides, len) = up_to_two(rest)?;
            Ok(Polygon(sides, len))
        }
        "STAR" => {
            let (points, len) = up_to_two(rest)?;
            Ok(Star(points, len))
        }
        "FILL" | "FILLED" => none(Fill),
        "REPEAT" => repeat(rest, vocabulary),
        "MAKE" => make(rest),
        "HEADING" => none(Query(super::ast::Query::Heading)),
        "POS" | "POSITION" => none(Query(super::ast::Query::Pos)),
        "XCOR" => none(Query(super::ast::Query::XCor)),
        "YCOR" => none(Query(super::ast::Query::YCor)),
        "PENCOLOR?" => none(Query(super::ast::Query::PenColor)),
        "PENSIZE?" => none(Query(super::ast::Query::PenSize)),
        "TRACE" => none(Trace(true)),
        "NOTRACE" => none(Trace(false)),
        "LABEL" | "STAMP" => label(rest),
        "WRAP" => none(Edge(super::ast::Edge::Wrap)),
        "WINDOW" => none(Edge(super::ast::Edge::Window)),
        "FENCE" => none(Edge(super::ast::Edge::Fence)),
        "TO" => to(rest),
        _ if vocabulary.is_procedure(&word) => Ok(Call(Ident::new(&word), arguments(rest)?)),
        _ => Err(error!(UnknownCommand; word)),
    }
}

/// Logo arguments are separated by commas or by spaces. Without commas,
/// `10 -20` is two arguments while `:s * 2` and `10 - 20` are one.
pub fn arguments(text: &str) -> Result<Vec<Expression>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(vec![]);
    }
    let pieces = split_top_level(text, ',');
    if pieces.len() > 1 {
        return pieces.into_iter().map(|p| parse_expression(p.trim())).collect();
    }
    words(text).into_iter().map(parse_expression).collect()
}

fn words(text: &str) -> Vec<&str> {
    let mut spans: Vec<(usize, usize)> = vec![];
    let mut depth = 0i32;
    let mut quoted = false;
    let mut start = None;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '(' | '[' if !quoted => depth += 1,
            ')' | ']' if !quoted => depth -= 1,
            c if c.is_whitespace() && !quoted && depth == 0 => {
                if let Some(s) = start.take() {
                    spans.push((s, i));
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    let is_op_word = |w: &str| {
        matches!(
            w.to_ascii_uppercase().as_str(),
            "MOD" | "AND" | "OR" | "XOR" | "NOT"
        )
    };
    let mut merged: Vec<(usize, usize)> = vec![];
    for (s, e) in spans {
        let word = &text[s..e];
        if let Some(last) = merged.last_mut() {
            let prev = &text[last.0..last.1];
            let joins = prev.ends_with(|c| "+-*/\\^=<>".contains(c))
                || is_op_word(prev.rsplit(' ').next().unwrap_or(prev))
                || is_op_word(word)
                || word.starts_with(|c| "*/\\^=<>".contains(c))
                || word == "+"
                || word == "-";
            if joins {
                last.1 = e;
                continue;
            }
        }
        merged.push((s, e));
    }
    merged.into_iter().map(|(s, e)| &text[s..e]).collect()
}

fn one(text: &str) -> Result<Expression> {
    let mut args = arguments(text)?;
    match args.len() {
        1 => Ok(args.remove(0)),
        0 => Err(error!(MissingOperand)),
        _ => Err(error!(WrongArgumentCount)),
    }
}

fn optional(text: &str) -> Result<Option<Expression>> {
    let mut args = arguments(text)?;
    match args.len() {
        0 => Ok(None),
        1 => Ok(Some(args.remove(0))),
        _ => Err(error!(WrongArgumentCount)),
    }
}

fn two(text: &str) -> Result<(Expression, Expression)> {
    let mut args = arguments(text)?.into_iter();
    match (args.next(), args.next(), args.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        (_, None, _) => Err(error!(MissingOperand)),
        _ => Err(error!(WrongArgumentCount)),
    }
}

fn one_or_two(text: &str) -> Result<(Expression, Option<Expression>)> {
    match up_to_two(text)? {
        (Some(a), b) => Ok((a, b)),
        (None, _) => Err(error!(MissingOperand)),
    }
}

fn up_to_two(text: &str) -> Result<(Option<Expression>, Option<Expression>)> {
    let mut args = arguments(text)?.into_iter();
    let pair = (args.next(), args.next());
    if args.next().is_some() {
        return Err(error!(WrongArgumentCount));
    }
    Ok(pair)
}

/// Colour arguments: a palette index or name, `#rrggbb`, or an RGB triple.
fn colour(text: &str) -> Result<Vec<Expression>> {
    let text = text.trim();
    let bare = !text.is_empty()
        && (text.chars().all(|c| c.is_ascii_alphabetic())
            || (text.starts_with('#') && text[1..].chars().all(|c| c.is_ascii_hexdigit())));
    if bare {
        return Ok(vec![Expression::String(text.to_ascii_lowercase().into())]);
    }
    let args = arguments(text)?;
    match args.len() {
        1 | 3 => Ok(args),
        0 => Err(error!(MissingOperand)),
        _ => Err(error!(WrongArgumentCount)),
    }
}

fn make(text: &str) -> Result<Logo> {
    let tokens = lex(&format!("MAKE {}", text));
    let name = match tokens.get(1) {
        Some((_, Token::Literal(Literal::String(name)))) => Ident::new(name),
        Some((_, Token::Ident(ident))) => ident.clone(),
        _ => return Err(error!(SyntaxError; "EXPECTED \"NAME")),
    };
    let value = match tokens.get(2) {
        Some((col, _)) => &text[col.start - 5..],
        None => return Err(error!(MissingOperand)),
    };
    Ok(Logo::Make(name, parse_expression(value)?))
}

fn label(text: &str) -> Result<Logo> {
    let mut body = text.trim();
    let mut size = None;
    if let Some((head, tail)) = body.rsplit_once(char::is_whitespace) {
        if let Ok(n) = tail.parse::<i64>() {
            size = Some(Expression::Integer(n));
            body = head.trim_end();
        }
    }
    let text = if body.len() >= 2 && body.starts_with('"') && body.ends_with('"') {
        Expression::String(body[1..body.len() - 1].into())
    } else {
        parse_expression(body).unwrap_or_else(|_| Expression::String(body.into()))
    };
    Ok(Logo::Label(text, size))
}

fn to(text: &str) -> Result<Logo> {
    let tokens = lex(text);
    let mut idents = tokens.into_iter().map(|(_, t)| match t {
        Token::Ident(ident) => Ok(ident),
        t => Err(error!(SyntaxError; format!("UNEXPECTED {}", t))),
    });
    let name = match idents.next() {
        Some(name) => name?,
        None => return Err(error!(SyntaxError; "EXPECTED PROCEDURE NAME")),
    };
    Ok(Logo::To(name, idents.collect::<Result<Vec<_>>>()?))
}

fn repeat(text: &str, vocabulary: &Vocabulary) -> Result<Logo> {
    let open = match text.find('[') {
        Some(i) => i,
        None => return Err(error!(UnbalancedBrackets; "EXPECTED [")),
    };
    let close = match matching_bracket(text, open) {
        Some(i) => i,
        None => return Err(error!(UnbalancedBrackets)),
    };
    if !text[close + 1..].trim().is_empty() {
        return Err(error!(SyntaxError; format!("UNEXPECTED {}", text[close + 1..].trim())));
    }
    let count = parse_expression(text[..open].trim())?;
    let body = split_commands(&text[open + 1..close], vocabulary);
    Ok(Logo::Repeat(count, block(&body, vocabulary)))
}

/// A `"` right after MAKE is a Logo word marker, not a string quote.
fn opens_string(text: &str, i: usize) -> bool {
    let before = text[..i].trim_end();
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '[')
        .next()
        .unwrap_or("");
    !word.eq_ignore_ascii_case("MAKE")
}

/// Index of the `]` closing the `[` at `open`, skipping quoted text.
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0;
    let mut quoted = false;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '"' if quoted || opens_string(text, open + i) => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Net `[` minus `]` outside quotes.
pub fn bracket_balance(text: &str) -> i32 {
    let mut depth = 0;
    let mut quoted = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' if quoted || opens_string(text, i) => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Splits a bracket body into commands at newlines, after a closing
/// bracket, and before a command word.
pub fn split_commands<'a>(text: &'a str, vocabulary: &Vocabulary) -> Vec<&'a str> {
    let mut commands = vec![];
    let mut depth = 0i32;
    let mut quoted = false;
    let mut start = 0;
    fn push<'a>(commands: &mut Vec<&'a str>, s: &'a str) {
        let s = s.trim();
        if !s.is_empty() {
            commands.push(s);
        }
    }
    for (i, ch) in text.char_indices() {
        match ch {
            '"' if quoted || opens_string(text, i) => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => {
                depth -= 1;
                if depth == 0 {
                    push(&mut commands, &text[start..=i]);
                    start = i + 1;
                }
            }
            '\n' if depth == 0 => {
                push(&mut commands, &text[start..i]);
                start = i + 1;
            }
            c if c.is_whitespace() && depth == 0 && !quoted => {
                let next = first_word(text[i..].trim_start());
                let starts = COMMAND_WORDS.binary_search(&next.as_str()).is_ok()
                    || vocabulary.is_procedure(&next);
                if starts && !text[start..i].trim().is_empty() {
                    push(&mut commands, &text[start..i]);
                    start = i;
                }
            }
            _ => {}
        }
    }
    push(&mut commands, &text[start..]);
    commands
}

fn block(texts: &[&str], vocabulary: &Vocabulary) -> Rc<Block> {
    let mut instrs: Vec<Instr> = texts
        .iter()
        .map(|text| {
            let command = command(text, vocabulary);
            let heritage = match &command {
                Ok(c) => c.heritage(),
                Err(e) => e.heritage(),
            };
            Instr {
                line: 0,
                heritage,
                command,
            }
        })
        .collect();
    let links = link(&mut instrs);
    Rc::new(Block { instrs, links })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo(s: &str) -> Logo {
        match parse_logo(s, &Vocabulary::new()) {
            Ok(Command::Logo(l)) => l,
            Ok(c) => panic!("{:?}", c),
            Err(e) => panic!("{}", e),
        }
    }

    #[test]
    fn test_command_words_sorted_for_search() {
        let mut sorted = COMMAND_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, COMMAND_WORDS);
    }

    #[test]
    fn test_space_separated_arguments() {
        assert_eq!(
            logo("SETXY 10 -20"),
            Logo::SetXY(
                Expression::Integer(10),
                Expression::Negation(Box::new(Expression::Integer(20)))
            )
        );
        assert_eq!(
            logo("SETXY 10 - 20, 5"),
            Logo::SetXY(
                Expression::Binary(
                    Operator::Minus,
                    Box::new(Expression::Integer(10)),
                    Box::new(Expression::Integer(20))
                ),
                Expression::Integer(5)
            )
        );
        assert_eq!(
            logo("FD :s * 2"),
            Logo::Forward(Expression::Binary(
                Operator::Multiply,
                Box::new(Expression::Var(Ident::new("S"))),
                Box::new(Expression::Integer(2))
            ))
        );
    }

    #[test]
    fn test_repeat_body_split() {
        match logo("REPEAT 4 [FORWARD 50 RIGHT 90]") {
            Logo::Repeat(Expression::Integer(4), block) => {
                assert_eq!(block.len(), 2);
                assert_eq!(
                    block.instrs[1].command,
                    Ok(Command::Logo(Logo::Right(Expression::Integer(90))))
                );
            }
            l => panic!("{:?}", l),
        }
    }

    #[test]
    fn test_nested_repeat() {
        match logo("REPEAT 2 [REPEAT 3 [FD 1] RT 180]") {
            Logo::Repeat(_, block) => {
                assert_eq!(block.len(), 2);
                assert!(matches!(
                    block.instrs[0].command,
                    Ok(Command::Logo(Logo::Repeat(..)))
                ));
            }
            l => panic!("{:?}", l),
        }
    }

    #[test]
    fn test_unbalanced_repeat() {
        let e = parse_logo("REPEAT 4 [FD 10", &Vocabulary::new()).unwrap_err();
        assert!(e.is(crate::lang::ErrorCode::UnbalancedBrackets));
    }

    #[test]
    fn test_make_word_inside_repeat() {
        match logo("REPEAT 3 [MAKE \"n :n + 1 FD :n]") {
            Logo::Repeat(_, block) => assert_eq!(block.len(), 2),
            l => panic!("{:?}", l),
        }
    }

    #[test]
    fn test_several_commands_on_a_line() {
        match logo("FD 10 RT 90") {
            Logo::Run(block) => assert_eq!(block.len(), 2),
            l => panic!("{:?}", l),
        }
    }

    #[test]
    fn test_to_and_make() {
        assert_eq!(
            logo("TO square :size :n"),
            Logo::To(Ident::new("SQUARE"), vec![Ident::new("SIZE"), Ident::new("N")])
        );
        assert_eq!(
            logo("MAKE \"total :total + 1"),
            Logo::Make(
                Ident::new("TOTAL"),
                Expression::Binary(
                    Operator::Plus,
                    Box::new(Expression::Var(Ident::new("TOTAL"))),
                    Box::new(Expression::Integer(1))
                )
            )
        );
    }

    #[test]
    fn test_colours_and_labels() {
        assert_eq!(logo("SETCOLOR Red"), Logo::SetColor(vec![Expression::String("red".into())]));
        assert_eq!(logo("SETPC 4"), Logo::SetColor(vec![Expression::Integer(4)]));
        assert_eq!(
            logo("LABEL \"Hi there\" 20"),
            Logo::Label(Expression::String("Hi there".into()), Some(Expression::Integer(20)))
        );
    }

    #[test]
    fn test_home_with_assignment_is_an_error() {
        assert!(parse_logo("HOME = 5", &Vocabulary::new()).is_err());
    }

    #[test]
    fn test_procedure_call() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.define("SQ");
        assert_eq!(
            parse_logo("SQ 50", &vocabulary),
            Ok(Command::Logo(Logo::Call(Ident::new("SQ"), vec![Expression::Integer(50)])))
        );
    }
}
