use super::{token::*, Column};

/// Splits one command into tokens. Columns are byte offsets into `s`
/// so callers can slice the text back out.
pub fn lex(s: &str) -> Vec<(Column, Token)> {
    TempleLexer::lex(s)
}

fn is_temple_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

fn is_temple_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_temple_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_temple_alphanumeric(c: char) -> bool {
    is_temple_alphabetic(c) || is_temple_digit(c)
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut Chars<'a>;

    fn peek_char(&mut self) -> Option<char> {
        self.chars().peek().map(|(_, c)| *c)
    }

    fn whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !is_temple_whitespace(ch) {
                break;
            }
            self.chars().next();
        }
    }

    fn number(&mut self) -> Token {
        let mut s = String::new();
        let mut decimal = false;
        let mut exp = false;
        while let Some(ch) = self.peek_char() {
            if is_temple_digit(ch) {
                s.push(ch);
            } else if ch == '.' && !decimal && !exp {
                decimal = true;
                s.push(ch);
            } else if (ch == 'e' || ch == 'E') && !exp && !s.is_empty() {
                let mut ahead = self.chars().clone();
                ahead.next();
                let sign = match ahead.peek() {
                    Some((_, '+')) | Some((_, '-')) => {
                        ahead.next();
                        true
                    }
                    _ => false,
                };
                match ahead.peek() {
                    Some((_, d)) if is_temple_digit(*d) => {}
                    _ => break,
                }
                exp = true;
                s.push('E');
                self.chars().next();
                if sign {
                    if let Some((_, sign)) = self.chars().next() {
                        s.push(sign);
                    }
                }
                continue;
            } else {
                break;
            }
            self.chars().next();
        }
        if decimal || exp {
            Token::Literal(Literal::Float(s))
        } else if s.parse::<i64>().is_ok() {
            Token::Literal(Literal::Integer(s))
        } else {
            Token::Literal(Literal::Float(s))
        }
    }

    fn string(&mut self) -> Token {
        let mut s = String::new();
        self.chars().next();
        while let Some((_, ch)) = self.chars().next() {
            if ch == '"' {
                break;
            }
            s.push(ch);
        }
        Token::Literal(Literal::String(s))
    }

    /// Logo `"word` with no closing quote.
    fn quoted_word(&mut self) -> Token {
        self.chars().next();
        Token::Literal(Literal::String(self.word()))
    }

    fn word(&mut self) -> String {
        let mut s = String::new();
        while let Some(ch) = self.peek_char() {
            if !is_temple_alphanumeric(ch) {
                break;
            }
            s.push(ch);
            self.chars().next();
        }
        s
    }

    fn alphabetic(&mut self) -> Token {
        let mut s = self.word().to_ascii_uppercase();
        match self.peek_char() {
            Some('$') => {
                s.push('$');
                self.chars().next();
            }
            Some('?') if s == "PENCOLOR" || s == "PENSIZE" => {
                s.push('?');
                self.chars().next();
            }
            _ => {}
        }
        if let Some(op) = Operator::from_word(&s) {
            return Token::Operator(op);
        }
        Token::Ident(Ident::new(&s))
    }

    fn minutia(&mut self) -> Token {
        let ch = match self.chars().next() {
            Some((_, ch)) => ch,
            None => return Token::Unknown(String::new()),
        };
        let pk = self.peek_char();
        let mut two = |token: Token| {
            self.chars().next();
            token
        };
        use Operator::*;
        match (ch, pk) {
            ('<', Some('=')) => two(Token::Operator(LessEqual)),
            ('<', Some('>')) => two(Token::Operator(NotEqual)),
            ('>', Some('=')) => two(Token::Operator(GreaterEqual)),
            ('=', Some('=')) => two(Token::Operator(Equal)),
            ('!', Some('=')) => two(Token::Operator(NotEqual)),
            ('<', _) => Token::Operator(Less),
            ('>', _) => Token::Operator(Greater),
            ('=', _) => Token::Operator(Equal),
            ('+', _) => Token::Operator(Plus),
            ('-', _) => Token::Operator(Minus),
            ('*', _) => Token::Operator(Multiply),
            ('/', _) => Token::Operator(Divide),
            ('\\', _) => Token::Operator(DivideInt),
            ('^', _) => Token::Operator(Caret),
            ('(', _) => Token::LParen,
            (')', _) => Token::RParen,
            ('[', _) => Token::LBracket,
            (']', _) => Token::RBracket,
            (',', _) => Token::Comma,
            (';', _) => Token::Semicolon,
            (':', _) => Token::Colon,
            ('.', _) => Token::Dot,
            ('#', _) => Token::Hash,
            _ => Token::Unknown(ch.to_string()),
        }
    }
}

struct TempleLexer<'a> {
    chars: Chars<'a>,
    len: usize,
    prev: Option<Token>,
    pending: Option<(Column, Token)>,
    remark: bool,
}

impl<'a> Tokenizers<'a> for TempleLexer<'a> {
    fn chars(&mut self) -> &mut Chars<'a> {
        &mut self.chars
    }
}

impl<'a> TempleLexer<'a> {
    fn lex(s: &str) -> Vec<(Column, Token)> {
        let mut lexer = TempleLexer {
            chars: s.char_indices().peekable(),
            len: s.len(),
            prev: None,
            pending: None,
            remark: false,
        };
        let mut v = vec![];
        while let Some(spanned) = lexer.next_token() {
            lexer.prev = Some(spanned.1.clone());
            v.push(spanned);
        }
        v
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some((i, _)) => *i,
            None => self.len,
        }
    }

    fn next_token(&mut self) -> Option<(Column, Token)> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }
        if self.remark {
            return None;
        }
        self.whitespace();
        let start = self.offset();
        let pk = self.peek_char()?;
        let after_ident = matches!(
            self.prev,
            Some(Token::Ident(_)) | Some(Token::RParen) | Some(Token::RBracket)
        );
        let token = if is_temple_digit(pk) || (pk == '.' && self.next_is_digit()) {
            self.number()
        } else if pk == '.' && after_ident && self.next_is_alphabetic() {
            // D.key keeps the key's own spelling
            self.chars.next();
            let key_start = self.offset();
            let key = self.word();
            let end = self.offset();
            self.pending = Some((key_start..end, Token::Literal(Literal::String(key))));
            return Some((start..key_start, Token::Dot));
        } else if pk == ':' && self.next_is_alphabetic() {
            self.chars.next();
            let mut name = self.word();
            if self.peek_char() == Some('$') {
                self.chars.next();
                name.push('$');
            }
            Token::Ident(Ident::new(&name))
        } else if is_temple_alphabetic(pk) {
            let t = self.alphabetic();
            if t.is_word("REM") {
                self.remark = true;
            }
            t
        } else if pk == '"' {
            match &self.prev {
                Some(t) if t.is_word("MAKE") => self.quoted_word(),
                _ => self.string(),
            }
        } else if pk == '\'' {
            self.remark = true;
            return None;
        } else {
            self.minutia()
        };
        let end = self.offset();
        Some((start..end, token))
    }

    fn next_is_digit(&mut self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.peek(), Some((_, c)) if is_temple_digit(*c))
    }

    fn next_is_alphabetic(&mut self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.peek(), Some((_, c)) if is_temple_alphabetic(*c))
    }
}
