use super::{ast::*, classify::Vocabulary, lex::lex, token::*, Column, Error};

type Result<T> = std::result::Result<T, Error>;

/// Parses one BASIC statement. `vocabulary` routes the commands nested
/// in `IF ... THEN`.
pub fn parse_statement(text: &str, vocabulary: &Vocabulary) -> Result<Statement> {
    let tokens = lex(text);
    let mut parse = Parser::new(text, &tokens, vocabulary);
    match parse.statement().and_then(|s| parse.finish().map(|_| s)) {
        Ok(s) => Ok(s),
        Err(e) => Err(e.in_column(&parse.column())),
    }
}

pub fn parse_expression(text: &str) -> Result<Expression> {
    let tokens = lex(text);
    let vocabulary = Vocabulary::new();
    let mut parse = Parser::new(text, &tokens, &vocabulary);
    match parse.expression().and_then(|e| parse.finish().map(|_| e)) {
        Ok(e) => Ok(e),
        Err(e) => Err(e.in_column(&parse.column())),
    }
}

pub struct Parser<'a> {
    text: &'a str,
    tokens: &'a [(Column, Token)],
    pos: usize,
    vocabulary: &'a Vocabulary,
}

const PREC_OR: usize = 1;
const PREC_AND: usize = 2;
const PREC_NOT: usize = 3;
const PREC_COMPARE: usize = 4;
const PREC_POWER: usize = 8;

impl<'a> Parser<'a> {
    pub fn new(
        text: &'a str,
        tokens: &'a [(Column, Token)],
        vocabulary: &'a Vocabulary,
    ) -> Parser<'a> {
        Parser {
            text,
            tokens,
            pos: 0,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &'a Vocabulary {
        self.vocabulary
    }

    /// Column of the most recently consumed token.
    pub fn column(&self) -> Column {
        match self.tokens.get(self.pos.saturating_sub(1)) {
            Some((col, _)) => col.clone(),
            None => 0..0,
        }
    }

    pub fn next(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos).map(|(_, t)| t);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n).map(|(_, t)| t)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Source text from the next token to the end.
    pub fn rest(&self) -> &'a str {
        match self.tokens.get(self.pos) {
            Some((col, _)) => &self.text[col.start..],
            None => "",
        }
    }

    pub fn finish(&mut self) -> Result<()> {
        match self.next() {
            None => Ok(()),
            Some(t) => Err(error!(SyntaxError; format!("UNEXPECTED {}", t))),
        }
    }

    pub fn accept(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            return true;
        }
        false
    }

    pub fn accept_word(&mut self, word: &str) -> bool {
        if let Some(t) = self.peek() {
            if t.is_word(word) {
                self.pos += 1;
                return true;
            }
        }
        false
    }

    pub fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(t) if t.is_word(word))
    }

    pub fn expect_word(&mut self, word: &str) -> Result<()> {
        if self.accept_word(word) {
            Ok(())
        } else {
            Err(error!(SyntaxError; format!("EXPECTED {}", word)))
        }
    }

    pub fn expect(&mut self, token: Token) -> Result<()> {
        if let Some(t) = self.next() {
            if *t == token {
                return Ok(());
            }
        }
        use Token::*;
        Err(error!(SyntaxError;
            match token {
                Unknown(_) => "UNEXPECTED TOKEN",
                Literal(_) => "EXPECTED LITERAL",
                Operator(_) => "EXPECTED OPERATOR",
                Ident(_) => "EXPECTED IDENTIFIER",
                LParen => "EXPECTED LEFT PARENTHESIS",
                RParen => "EXPECTED RIGHT PARENTHESIS",
                LBracket => "EXPECTED LEFT BRACKET",
                RBracket => "EXPECTED RIGHT BRACKET",
                Comma => "EXPECTED COMMA",
                Colon => "EXPECTED COLON",
                Semicolon => "EXPECTED SEMICOLON",
                Dot => "EXPECTED DOT",
                Hash => "EXPECTED #",
            }
        ))
    }

    pub fn ident(&mut self) -> Result<Ident> {
        match self.next() {
            Some(Token::Ident(i)) => Ok(i.clone()),
            _ => Err(error!(SyntaxError; "EXPECTED IDENTIFIER")),
        }
    }

    pub fn expression(&mut self) -> Result<Expression> {
        fn parse(this: &mut Parser, precedence: usize) -> Result<Expression> {
            use Operator::*;
            let mut lhs = match this.next() {
                Some(Token::LParen) => {
                    let expr = this.expression()?;
                    this.expect(Token::RParen)?;
                    expr
                }
                Some(Token::Operator(Minus)) => {
                    Expression::Negation(Box::new(parse(this, PREC_POWER)?))
                }
                Some(Token::Operator(Plus)) => parse(this, PREC_POWER)?,
                Some(Token::Operator(Not)) => Expression::Not(Box::new(parse(this, PREC_NOT)?)),
                Some(Token::Ident(i)) => match this.peek() {
                    Some(Token::LParen) => Expression::Call(i.clone(), this.expression_list()?),
                    _ => Expression::Var(i.clone()),
                },
                Some(Token::Literal(l)) => Expression::for_literal(l)?,
                _ => return Err(error!(SyntaxError; "EXPECTED EXPRESSION")),
            };
            loop {
                if this.accept(&Token::LBracket) {
                    let index = this.expression()?;
                    this.expect(Token::RBracket)?;
                    lhs = Expression::Index(Box::new(lhs), Box::new(index));
                    continue;
                }
                if let (Some(Token::Dot), Some(Token::Literal(Literal::String(key)))) =
                    (this.peek(), this.peek_nth(1))
                {
                    this.pos += 2;
                    lhs = Expression::Member(Box::new(lhs), key.as_str().into());
                    continue;
                }
                break;
            }
            while let Some(Token::Operator(op)) = this.peek() {
                if *op == Not {
                    break;
                }
                let op_precedence = Expression::op_precedence(op);
                if op_precedence < precedence {
                    break;
                }
                this.next();
                let next_precedence = if *op == Caret {
                    op_precedence
                } else {
                    op_precedence + 1
                };
                let rhs = parse(this, next_precedence)?;
                lhs = Expression::Binary(*op, Box::new(lhs), Box::new(rhs));
            }
            Ok(lhs)
        }
        parse(self, 0)
    }

    /// Parenthesized, comma separated.
    pub fn expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        if self.accept(&Token::RParen) {
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.next() {
                Some(Token::RParen) => return Ok(v),
                Some(Token::Comma) => continue,
                _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
            }
        }
    }

    /// Comma separated to the end of the statement.
    pub fn arguments(&mut self) -> Result<Vec<Expression>> {
        let mut v = vec![];
        if self.at_end() {
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            if !self.accept(&Token::Comma) {
                return Ok(v);
            }
        }
    }

    pub fn variable(&mut self) -> Result<Variable> {
        let ident = self.ident()?;
        match self.peek() {
            Some(Token::LParen) => Ok(Variable::Array(ident, self.expression_list()?)),
            Some(Token::LBracket) => {
                self.next();
                let index = self.expression()?;
                self.expect(Token::RBracket)?;
                Ok(Variable::Index(ident, index))
            }
            Some(Token::Dot) => match self.peek_nth(1) {
                Some(Token::Literal(Literal::String(key))) => {
                    self.pos += 2;
                    Ok(Variable::Member(ident, key.as_str().into()))
                }
                _ => Err(error!(SyntaxError; "EXPECTED KEY")),
            },
            _ => Ok(Variable::Unary(ident)),
        }
    }

    fn variable_list(&mut self) -> Result<Vec<Variable>> {
        let mut v = vec![self.variable()?];
        while self.accept(&Token::Comma) {
            v.push(self.variable()?);
        }
        Ok(v)
    }

    fn target(&mut self) -> Result<Target> {
        match self.next() {
            Some(Token::Literal(Literal::Integer(s))) => match s.parse() {
                Ok(n) => Ok(Target::Line(n)),
                Err(_) => Err(error!(UndefinedLine)),
            },
            Some(Token::Ident(i)) => Ok(Target::Label(i.name().clone())),
            Some(Token::Operator(Operator::Multiply)) => Ok(Target::Label(self.ident()?.name().clone())),
            _ => Err(error!(SyntaxError; "EXPECTED LINE NUMBER OR LABEL")),
        }
    }

    fn target_list(&mut self) -> Result<Vec<Target>> {
        let mut v = vec![self.target()?];
        while self.accept(&Token::Comma) {
            v.push(self.target()?);
        }
        Ok(v)
    }

    fn file_number(&mut self) -> Result<Expression> {
        self.accept(&Token::Hash);
        self.expression()
    }

    fn statement(&mut self) -> Result<Statement> {
        match self.peek() {
            Some(Token::Unknown(s)) if s == "?" => {
                self.next();
                Statement::for_word(self, Word::Print)
            }
            Some(Token::Ident(i)) => {
                let assignment = matches!(self.peek_nth(1), Some(Token::Operator(Operator::Equal)));
                match Word::lookup(i.name()) {
                    Some(word) if !assignment => {
                        self.next();
                        Statement::for_word(self, word)
                    }
                    _ => Statement::r#let(self),
                }
            }
            _ => Err(error!(SyntaxError; "EXPECTED STATEMENT")),
        }
    }
}

impl Expression {
    fn op_precedence(op: &Operator) -> usize {
        use Operator::*;
        match op {
            Or | Xor => PREC_OR,
            And => PREC_AND,
            Not => PREC_NOT,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => PREC_COMPARE,
            Plus | Minus => 5,
            Multiply | Divide | DivideInt | Modulus => 6,
            Caret => PREC_POWER,
        }
    }

    fn for_literal(lit: &Literal) -> Result<Expression> {
        match lit {
            Literal::Integer(s) => match s.parse() {
                Ok(n) => Ok(Expression::Integer(n)),
                Err(_) => Err(error!(Overflow)),
            },
            Literal::Float(s) => match s.parse() {
                Ok(n) => Ok(Expression::Float(n)),
                Err(_) => Err(error!(SyntaxError; "MALFORMED NUMBER")),
            },
            Literal::String(s) => Ok(Expression::String(s.as_str().into())),
        }
    }
}

impl Statement {
    fn for_word(parse: &mut Parser, word: Word) -> Result<Statement> {
        use Word::*;
        match word {
            AppendFile => Self::r#file_write(parse, Statement::AppendFile),
            Assert => Self::r#assert(parse),
            Beep => Ok(Statement::Beep),
            Break => Ok(Statement::Break),
            Call => Self::r#call(parse),
            Case => Self::r#case(parse),
            Catch => Self::r#catch(parse),
            Close => Self::r#close(parse),
            Cls => Ok(Statement::Cls),
            Color => Ok(Statement::Color(parse.arguments()?)),
            Const => Self::r#const(parse),
            Data => Self::r#data(parse),
            Decr => Self::r#step_by(parse, Statement::Decr),
            Delay => Ok(Statement::Delay(parse.expression()?)),
            Delete => Self::r#delete(parse),
            Dict => Self::r#dict(parse),
            Dim => Self::r#dim(parse),
            Do => Ok(Statement::Do(Self::condition(parse)?)),
            Else => Self::r#else(parse),
            ElseIf => Self::r#elseif(parse),
            End => Self::r#end(parse),
            EndIf => Ok(Statement::EndBlock(Closer::If)),
            Exit => Self::r#exit(parse),
            For => Self::r#for(parse),
            ForEach => Self::r#foreach(parse),
            Function => Self::r#define(parse, Statement::Function),
            Get => Self::r#get(parse),
            Gosub => Ok(Statement::Gosub(parse.target()?)),
            Goto => Ok(Statement::Goto(parse.target()?)),
            If => Self::r#if(parse),
            Incr => Self::r#step_by(parse, Statement::Incr),
            Input => Self::r#input(parse),
            Join => Self::r#join(parse),
            Let => Self::r#let(parse),
            List => Self::r#list(parse),
            Loop => Ok(Statement::Loop(Self::condition(parse)?)),
            Next => Self::r#next(parse),
            On => Self::r#on(parse),
            Open => Self::r#open(parse),
            Pop => Self::r#take(parse, Statement::Pop),
            Print => Self::r#print(parse),
            Printf => Ok(Statement::Printf(parse.arguments()?)),
            Push => Self::r#push(parse, Statement::Push),
            Randomize => Ok(Statement::Randomize(if parse.at_end() {
                None
            } else {
                Some(parse.expression()?)
            })),
            Read => Ok(Statement::Read(parse.variable_list()?)),
            ReadFile => Self::r#file_read(parse, Statement::ReadFile),
            ReadLine => Self::r#file_read(parse, Statement::ReadLine),
            Rem => Err(error!(SyntaxError; "EXPECTED STATEMENT")),
            Restore => Ok(Statement::Restore(if parse.at_end() {
                None
            } else {
                Some(parse.target()?)
            })),
            Return => Ok(Statement::Return(if parse.at_end() {
                None
            } else {
                Some(parse.expression()?)
            })),
            Reverse => Ok(Statement::Reverse(parse.ident()?)),
            Select => Self::r#select(parse),
            Set => Self::r#set(parse),
            Shift => Self::r#take(parse, Statement::Shift),
            Sleep => Ok(Statement::Sleep(parse.expression()?)),
            Sort => {
                let ident = parse.ident()?;
                Ok(Statement::Sort(ident, parse.accept_word("DESC")))
            }
            Splice => Self::r#splice(parse),
            Split => Self::r#split(parse),
            Stop => Ok(Statement::Stop),
            Sub => Self::r#define(parse, Statement::Sub),
            Swap => {
                let a = parse.variable()?;
                parse.expect(Token::Comma)?;
                Ok(Statement::Swap(a, parse.variable()?))
            }
            Throw => Ok(Statement::Throw(parse.expression()?)),
            Try => Ok(Statement::Try),
            TypeOf => Self::r#typeof(parse),
            Unshift => Self::r#push(parse, Statement::Unshift),
            Wend => Ok(Statement::Wend),
            While => Ok(Statement::While(parse.expression()?)),
            WriteFile => Self::r#file_write(parse, Statement::WriteFile),
            WriteLine => {
                let n = parse.file_number()?;
                parse.expect(Token::Comma)?;
                Ok(Statement::WriteLine(n, parse.expression()?))
            }
        }
    }

    fn r#let(parse: &mut Parser) -> Result<Statement> {
        let var = parse.variable()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        let expr = parse.expression()?;
        Ok(Statement::Let(var, expr))
    }

    fn r#print(parse: &mut Parser) -> Result<Statement> {
        let mut v = vec![];
        while let Some(t) = parse.peek() {
            match t {
                Token::Semicolon => {
                    parse.next();
                    v.push(PrintItem::Semicolon);
                }
                Token::Comma => {
                    parse.next();
                    v.push(PrintItem::Comma);
                }
                _ => v.push(PrintItem::Expr(parse.expression()?)),
            }
        }
        Ok(Statement::Print(v))
    }

    fn r#input(parse: &mut Parser) -> Result<Statement> {
        let mut prompt = None;
        if let Some(Token::Literal(Literal::String(_))) = parse.peek() {
            prompt = Some(parse.expression()?);
            if !parse.accept(&Token::Semicolon) {
                parse.expect(Token::Comma)?;
            }
        }
        Ok(Statement::Input(prompt, parse.variable_list()?))
    }

    fn r#if(parse: &mut Parser) -> Result<Statement> {
        let condition = parse.expression()?;
        if !parse.peek_word("GOTO") {
            parse.expect_word("THEN")?;
        }
        if parse.at_end() {
            return Ok(Statement::IfBlock(condition));
        }
        let base = parse.tokens[parse.pos].0.start;
        let mut split = None;
        while let Some(t) = parse.next() {
            if t.is_word("ELSE") {
                split = Some(parse.column());
                break;
            }
        }
        parse.pos = parse.tokens.len();
        let vocabulary = parse.vocabulary();
        let text = parse.text;
        let (then_text, else_text) = match split {
            Some(col) => (&text[base..col.start], Some(&text[col.end..])),
            None => (&text[base..], None),
        };
        let then_command = Box::new(Self::branch(then_text, vocabulary)?);
        let else_command = match else_text {
            Some(text) => Some(Box::new(Self::branch(text, vocabulary)?)),
            None => None,
        };
        Ok(Statement::If(condition, then_command, else_command))
    }

    fn branch(text: &str, vocabulary: &Vocabulary) -> Result<Command> {
        let text = text.trim();
        if let Ok(n) = text.parse::<usize>() {
            return Ok(Command::Basic(Statement::Goto(Target::Line(n))));
        }
        super::line::command(text, vocabulary)
    }

    fn r#elseif(parse: &mut Parser) -> Result<Statement> {
        let condition = parse.expression()?;
        parse.accept_word("THEN");
        Ok(Statement::ElseIf(condition))
    }

    fn r#else(parse: &mut Parser) -> Result<Statement> {
        if parse.accept_word("IF") {
            return Self::r#elseif(parse);
        }
        Ok(Statement::Else)
    }

    fn r#end(parse: &mut Parser) -> Result<Statement> {
        let closer = match parse.next() {
            None => return Ok(Statement::End),
            Some(t) if t.is_word("IF") => Closer::If,
            Some(t) if t.is_word("SELECT") => Closer::Select,
            Some(t) if t.is_word("SUB") => Closer::Sub,
            Some(t) if t.is_word("FUNCTION") => Closer::Function,
            Some(t) if t.is_word("TRY") => Closer::Try,
            Some(t) => return Err(error!(SyntaxError; format!("UNEXPECTED {}", t))),
        };
        Ok(Statement::EndBlock(closer))
    }

    fn r#for(parse: &mut Parser) -> Result<Statement> {
        if parse.accept_word("EACH") {
            return Self::r#foreach(parse);
        }
        let ident = parse.ident()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        let from = parse.expression()?;
        parse.expect_word("TO")?;
        let to = parse.expression()?;
        let step = if parse.accept_word("STEP") {
            Some(parse.expression()?)
        } else {
            None
        };
        Ok(Statement::For(ident, from, to, step))
    }

    fn r#foreach(parse: &mut Parser) -> Result<Statement> {
        let first = parse.ident()?;
        let second = if parse.accept(&Token::Comma) {
            Some(parse.ident()?)
        } else {
            None
        };
        parse.expect_word("IN")?;
        Ok(Statement::ForEach(first, second, parse.expression()?))
    }

    fn r#next(parse: &mut Parser) -> Result<Statement> {
        if parse.at_end() {
            return Ok(Statement::Next(None));
        }
        Ok(Statement::Next(Some(parse.ident()?)))
    }

    fn condition(parse: &mut Parser) -> Result<Option<Condition>> {
        if parse.accept_word("WHILE") {
            return Ok(Some(Condition::While(parse.expression()?)));
        }
        if parse.accept_word("UNTIL") {
            return Ok(Some(Condition::Until(parse.expression()?)));
        }
        Ok(None)
    }

    fn r#exit(parse: &mut Parser) -> Result<Statement> {
        let kind = match parse.next() {
            Some(t) if t.is_word("FOR") || t.is_word("FOREACH") => ExitKind::For,
            Some(t) if t.is_word("DO") => ExitKind::Do,
            Some(t) if t.is_word("WHILE") => ExitKind::While,
            Some(t) if t.is_word("SUB") => ExitKind::Sub,
            Some(t) if t.is_word("FUNCTION") => ExitKind::Function,
            _ => return Err(error!(SyntaxError; "EXPECTED FOR, DO, WHILE, SUB OR FUNCTION")),
        };
        Ok(Statement::Exit(kind))
    }

    fn r#on(parse: &mut Parser) -> Result<Statement> {
        let expr = parse.expression()?;
        if parse.accept_word("GOTO") {
            return Ok(Statement::OnGoto(expr, parse.target_list()?));
        }
        parse.expect_word("GOSUB")?;
        Ok(Statement::OnGosub(expr, parse.target_list()?))
    }

    fn r#select(parse: &mut Parser) -> Result<Statement> {
        parse.accept_word("CASE");
        Ok(Statement::Select(parse.expression()?))
    }

    fn r#case(parse: &mut Parser) -> Result<Statement> {
        if parse.accept_word("ELSE") {
            return Ok(Statement::CaseElse);
        }
        let mut tests = vec![];
        loop {
            if parse.accept_word("IS") {
                let op = match parse.next() {
                    Some(Token::Operator(op)) if op.is_comparison() => *op,
                    _ => return Err(error!(SyntaxError; "EXPECTED COMPARISON")),
                };
                tests.push(CaseTest::Is(op, parse.expression()?));
            } else {
                let value = parse.expression()?;
                if parse.accept_word("TO") {
                    tests.push(CaseTest::Range(value, parse.expression()?));
                } else {
                    tests.push(CaseTest::Value(value));
                }
            }
            if !parse.accept(&Token::Comma) {
                return Ok(Statement::Case(tests));
            }
        }
    }

    fn r#data(parse: &mut Parser) -> Result<Statement> {
        let rest = parse.rest();
        parse.pos = parse.tokens.len();
        let mut items = vec![];
        for item in split_top_level(rest, ',') {
            let item = item.trim();
            if item.starts_with('"') {
                let s = item.trim_start_matches('"').trim_end_matches('"');
                items.push(Expression::String(s.into()));
            } else if let Ok(n) = item.parse::<i64>() {
                items.push(Expression::Integer(n));
            } else if let Ok(n) = item.parse::<f64>() {
                items.push(Expression::Float(n));
            } else {
                items.push(Expression::String(item.into()));
            }
        }
        Ok(Statement::Data(items))
    }

    fn r#dim(parse: &mut Parser) -> Result<Statement> {
        let mut v = vec![];
        loop {
            let ident = parse.ident()?;
            v.push((ident, parse.expression_list()?));
            if !parse.accept(&Token::Comma) {
                return Ok(Statement::Dim(v));
            }
        }
    }

    fn r#step_by(
        parse: &mut Parser,
        f: fn(Variable, Option<Expression>) -> Statement,
    ) -> Result<Statement> {
        let var = parse.variable()?;
        let by = if parse.accept(&Token::Comma) {
            Some(parse.expression()?)
        } else {
            None
        };
        Ok(f(var, by))
    }

    fn r#define(parse: &mut Parser, f: fn(Ident, Vec<Ident>) -> Statement) -> Result<Statement> {
        let name = parse.ident()?;
        let mut params = vec![];
        if parse.accept(&Token::LParen) {
            if !parse.accept(&Token::RParen) {
                loop {
                    params.push(parse.ident()?);
                    if parse.accept(&Token::RParen) {
                        break;
                    }
                    parse.expect(Token::Comma)?;
                }
            }
        }
        Ok(f(name, params))
    }

    fn r#call(parse: &mut Parser) -> Result<Statement> {
        let name = parse.ident()?;
        let args = if let Some(Token::LParen) = parse.peek() {
            parse.expression_list()?
        } else {
            parse.arguments()?
        };
        Ok(Statement::Call(name, args))
    }

    fn r#list(parse: &mut Parser) -> Result<Statement> {
        let name = parse.ident()?;
        if parse.accept(&Token::Operator(Operator::Equal)) {
            return Ok(Statement::List(name, parse.arguments()?));
        }
        Ok(Statement::List(name, vec![]))
    }

    fn r#split(parse: &mut Parser) -> Result<Statement> {
        let source = parse.expression()?;
        parse.expect(Token::Comma)?;
        let delimiter = parse.expression()?;
        parse.expect_word("INTO")?;
        Ok(Statement::Split(source, delimiter, parse.ident()?))
    }

    fn r#join(parse: &mut Parser) -> Result<Statement> {
        let name = parse.ident()?;
        parse.expect(Token::Comma)?;
        let delimiter = parse.expression()?;
        parse.expect_word("INTO")?;
        Ok(Statement::Join(name, delimiter, parse.variable()?))
    }

    fn r#push(parse: &mut Parser, f: fn(Ident, Vec<Expression>) -> Statement) -> Result<Statement> {
        let name = parse.ident()?;
        parse.expect(Token::Comma)?;
        Ok(f(name, parse.arguments()?))
    }

    fn r#take(parse: &mut Parser, f: fn(Ident, Option<Variable>) -> Statement) -> Result<Statement> {
        let name = parse.ident()?;
        let into = if parse.accept(&Token::Comma) {
            Some(parse.variable()?)
        } else {
            None
        };
        Ok(f(name, into))
    }

    fn r#splice(parse: &mut Parser) -> Result<Statement> {
        let name = parse.ident()?;
        parse.expect(Token::Comma)?;
        let start = parse.expression()?;
        parse.expect(Token::Comma)?;
        let count = parse.expression()?;
        let inserts = if parse.accept(&Token::Comma) {
            parse.arguments()?
        } else {
            vec![]
        };
        Ok(Statement::Splice(name, start, count, inserts))
    }

    fn r#dict(parse: &mut Parser) -> Result<Statement> {
        let name = parse.ident()?;
        let mut pairs = vec![];
        if parse.accept(&Token::Operator(Operator::Equal)) {
            loop {
                let key = parse.expression()?;
                parse.expect(Token::Colon)?;
                pairs.push((key, parse.expression()?));
                if !parse.accept(&Token::Comma) {
                    break;
                }
            }
        }
        Ok(Statement::Dict(name, pairs))
    }

    /// `NAME.key` or `NAME, key` at the front of SET, GET and DELETE.
    fn dict_key(parse: &mut Parser) -> Result<(Ident, Expression, bool)> {
        let name = parse.ident()?;
        if let (Some(Token::Dot), Some(Token::Literal(Literal::String(key)))) =
            (parse.peek(), parse.peek_nth(1))
        {
            parse.pos += 2;
            return Ok((name, Expression::String(key.as_str().into()), true));
        }
        parse.expect(Token::Comma)?;
        Ok((name, parse.expression()?, false))
    }

    fn r#set(parse: &mut Parser) -> Result<Statement> {
        let (name, key, dotted) = Self::dict_key(parse)?;
        if dotted {
            parse.expect(Token::Operator(Operator::Equal))?;
        } else {
            parse.expect(Token::Comma)?;
        }
        Ok(Statement::Set(name, key, parse.expression()?))
    }

    fn r#get(parse: &mut Parser) -> Result<Statement> {
        let (name, key, dotted) = Self::dict_key(parse)?;
        if dotted {
            parse.expect_word("INTO")?;
        } else {
            parse.expect(Token::Comma)?;
        }
        Ok(Statement::Get(name, key, parse.variable()?))
    }

    fn r#delete(parse: &mut Parser) -> Result<Statement> {
        let (name, key, _) = Self::dict_key(parse)?;
        Ok(Statement::Delete(name, key))
    }

    fn r#catch(parse: &mut Parser) -> Result<Statement> {
        if parse.at_end() {
            return Ok(Statement::Catch(None));
        }
        Ok(Statement::Catch(Some(parse.ident()?)))
    }

    fn r#const(parse: &mut Parser) -> Result<Statement> {
        let name = parse.ident()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        Ok(Statement::Const(name, parse.expression()?))
    }

    fn r#typeof(parse: &mut Parser) -> Result<Statement> {
        let expr = parse.expression()?;
        let into = if parse.accept_word("INTO") {
            Some(parse.variable()?)
        } else {
            None
        };
        Ok(Statement::TypeOf(expr, into))
    }

    fn r#assert(parse: &mut Parser) -> Result<Statement> {
        let condition = parse.expression()?;
        let message = if parse.accept(&Token::Comma) {
            Some(parse.expression()?)
        } else {
            None
        };
        Ok(Statement::Assert(condition, message))
    }

    fn r#open(parse: &mut Parser) -> Result<Statement> {
        let path = parse.expression()?;
        parse.expect_word("FOR")?;
        let mode = match parse.next() {
            Some(t) if t.is_word("INPUT") => FileMode::Input,
            Some(t) if t.is_word("OUTPUT") => FileMode::Output,
            Some(t) if t.is_word("APPEND") => FileMode::Append,
            _ => return Err(error!(BadFileMode)),
        };
        parse.expect_word("AS")?;
        Ok(Statement::Open(path, mode, parse.file_number()?))
    }

    fn r#close(parse: &mut Parser) -> Result<Statement> {
        if parse.at_end() || parse.accept_word("ALL") {
            return Ok(Statement::Close(None));
        }
        Ok(Statement::Close(Some(parse.file_number()?)))
    }

    fn r#file_read(parse: &mut Parser, f: fn(Expression, Variable) -> Statement) -> Result<Statement> {
        let source = parse.file_number()?;
        parse.expect(Token::Comma)?;
        Ok(f(source, parse.variable()?))
    }

    fn r#file_write(
        parse: &mut Parser,
        f: fn(Expression, Expression) -> Statement,
    ) -> Result<Statement> {
        let path = parse.expression()?;
        parse.expect(Token::Comma)?;
        Ok(f(path, parse.expression()?))
    }
}

/// Splits on `sep` outside quotes, parentheses and brackets.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut v = vec![];
    let mut depth = 0i32;
    let mut quoted = false;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '(' | '[' if !quoted => depth += 1,
            ')' | ']' if !quoted => depth -= 1,
            c if c == sep && !quoted && depth == 0 => {
                v.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if start < text.len() || !v.is_empty() {
        v.push(&text[start..]);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Statement {
        match parse_statement(s, &Vocabulary::new()) {
            Ok(s) => s,
            Err(e) => panic!("{} : {:?}", e, e),
        }
    }

    fn var(s: &str) -> Expression {
        Expression::Var(Ident::new(s))
    }

    fn bin(op: Operator, l: Expression, r: Expression) -> Expression {
        Expression::Binary(op, Box::new(l), Box::new(r))
    }

    #[test]
    fn test_implicit_let() {
        assert_eq!(
            parse_str("total = total + 1"),
            Statement::Let(
                Variable::Unary(Ident::new("TOTAL")),
                bin(Operator::Plus, var("TOTAL"), Expression::Integer(1))
            )
        );
    }

    #[test]
    fn test_precedence_and_paren() {
        assert_eq!(
            parse_expression("2-(3+x)*4").unwrap(),
            bin(
                Operator::Minus,
                Expression::Integer(2),
                bin(
                    Operator::Multiply,
                    bin(Operator::Plus, Expression::Integer(3), var("X")),
                    Expression::Integer(4)
                )
            )
        );
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_negation() {
        assert_eq!(
            parse_expression("-2^3^2").unwrap(),
            Expression::Negation(Box::new(bin(
                Operator::Caret,
                Expression::Integer(2),
                bin(Operator::Caret, Expression::Integer(3), Expression::Integer(2))
            )))
        );
    }

    #[test]
    fn test_logical_below_comparison() {
        assert_eq!(
            parse_expression("a < 1 OR NOT b = 2").unwrap(),
            bin(
                Operator::Or,
                bin(Operator::Less, var("A"), Expression::Integer(1)),
                Expression::Not(Box::new(bin(Operator::Equal, var("B"), Expression::Integer(2))))
            )
        );
    }

    #[test]
    fn test_index_and_member() {
        assert_eq!(
            parse_expression("l[1] + d.Key").unwrap(),
            bin(
                Operator::Plus,
                Expression::Index(Box::new(var("L")), Box::new(Expression::Integer(1))),
                Expression::Member(Box::new(var("D")), "Key".into())
            )
        );
    }

    #[test]
    fn test_printer_list() {
        assert_eq!(
            parse_str("? 1; 2, 3;"),
            Statement::Print(vec![
                PrintItem::Expr(Expression::Integer(1)),
                PrintItem::Semicolon,
                PrintItem::Expr(Expression::Integer(2)),
                PrintItem::Comma,
                PrintItem::Expr(Expression::Integer(3)),
                PrintItem::Semicolon,
            ])
        );
    }

    #[test]
    fn test_if_then_line_number_and_else() {
        assert_eq!(
            parse_str("IF X > 1 THEN 100 ELSE PRINT 2"),
            Statement::If(
                bin(Operator::Greater, var("X"), Expression::Integer(1)),
                Box::new(Command::Basic(Statement::Goto(Target::Line(100)))),
                Some(Box::new(Command::Basic(Statement::Print(vec![PrintItem::Expr(
                    Expression::Integer(2)
                )]))))
            )
        );
        assert_eq!(
            parse_str("IF X THEN"),
            Statement::IfBlock(var("X"))
        );
    }

    #[test]
    fn test_if_then_routes_other_heritages() {
        match parse_str("IF 1 THEN FORWARD 10") {
            Statement::If(_, then, None) => assert!(matches!(*then, Command::Logo(_))),
            s => panic!("{:?}", s),
        }
    }

    #[test]
    fn test_for_step() {
        assert_eq!(
            parse_str("FOR I = 10 TO 1 STEP -1"),
            Statement::For(
                Ident::new("I"),
                Expression::Integer(10),
                Expression::Integer(1),
                Some(Expression::Negation(Box::new(Expression::Integer(1))))
            )
        );
    }

    #[test]
    fn test_case_forms() {
        assert_eq!(
            parse_str("CASE 1, 3 TO 5, IS > 9"),
            Statement::Case(vec![
                CaseTest::Value(Expression::Integer(1)),
                CaseTest::Range(Expression::Integer(3), Expression::Integer(5)),
                CaseTest::Is(Operator::Greater, Expression::Integer(9)),
            ])
        );
    }

    #[test]
    fn test_data_items() {
        assert_eq!(
            parse_str(r#"DATA 1, 2.5, "a,b", bare"#),
            Statement::Data(vec![
                Expression::Integer(1),
                Expression::Float(2.5),
                Expression::String("a,b".into()),
                Expression::String("bare".into()),
            ])
        );
    }

    #[test]
    fn test_end_forms() {
        assert_eq!(parse_str("END"), Statement::End);
        assert_eq!(parse_str("END IF"), Statement::EndBlock(Closer::If));
        assert_eq!(parse_str("end sub"), Statement::EndBlock(Closer::Sub));
        assert_eq!(parse_str("ENDIF"), Statement::EndBlock(Closer::If));
    }

    #[test]
    fn test_dict_statements() {
        assert_eq!(
            parse_str("SET d.name = 1"),
            Statement::Set(
                Ident::new("D"),
                Expression::String("name".into()),
                Expression::Integer(1)
            )
        );
        assert_eq!(
            parse_str(r#"GET d, "k", v"#),
            Statement::Get(
                Ident::new("D"),
                Expression::String("k".into()),
                Variable::Unary(Ident::new("V"))
            )
        );
    }

    #[test]
    fn test_syntax_error_has_column() {
        let e = parse_statement("PRINT (1", &Vocabulary::new()).unwrap_err();
        assert!(e.is(crate::lang::ErrorCode::SyntaxError));
    }
}
