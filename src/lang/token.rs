pub use super::ident::Ident;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Literal(Literal),
    Operator(Operator),
    Ident(Ident),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Hash,
}

impl Token {
    /// True for an identifier spelled exactly `word`.
    pub fn is_word(&self, word: &str) -> bool {
        match self {
            Token::Ident(ident) => ident.is(word),
            _ => false,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Literal(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            Semicolon => write!(f, ";"),
            Dot => write!(f, "."),
            Hash => write!(f, "#"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(String),
    Float(String),
    String(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Integer(s) => write!(f, "{}", s),
            Float(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    DivideInt,
    Modulus,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
    Xor,
}

impl Operator {
    pub fn from_word(s: &str) -> Option<Operator> {
        use Operator::*;
        match s {
            "MOD" => Some(Modulus),
            "NOT" => Some(Not),
            "AND" => Some(And),
            "OR" => Some(Or),
            "XOR" => Some(Xor),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        use Operator::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Caret => write!(f, "^"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            DivideInt => write!(f, "\\"),
            Modulus => write!(f, "MOD"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            Xor => write!(f, "XOR"),
        }
    }
}

/// Leading keyword of a BASIC statement.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Word {
    AppendFile,
    Assert,
    Beep,
    Break,
    Call,
    Case,
    Catch,
    Close,
    Cls,
    Color,
    Const,
    Data,
    Decr,
    Delay,
    Delete,
    Dict,
    Dim,
    Do,
    Else,
    ElseIf,
    End,
    EndIf,
    Exit,
    For,
    ForEach,
    Function,
    Get,
    Gosub,
    Goto,
    If,
    Incr,
    Input,
    Join,
    Let,
    List,
    Loop,
    Next,
    On,
    Open,
    Pop,
    Print,
    Printf,
    Push,
    Randomize,
    Read,
    ReadFile,
    ReadLine,
    Rem,
    Restore,
    Return,
    Reverse,
    Select,
    Set,
    Shift,
    Sleep,
    Sort,
    Splice,
    Split,
    Stop,
    Sub,
    Swap,
    Throw,
    Try,
    TypeOf,
    Unshift,
    Wend,
    While,
    WriteFile,
    WriteLine,
}

const WORDS: &[(&str, Word)] = &[
    ("APPENDFILE", Word::AppendFile),
    ("ASSERT", Word::Assert),
    ("BEEP", Word::Beep),
    ("BREAK", Word::Break),
    ("CALL", Word::Call),
    ("CASE", Word::Case),
    ("CATCH", Word::Catch),
    ("CLOSE", Word::Close),
    ("CLS", Word::Cls),
    ("COLOR", Word::Color),
    ("COLOUR", Word::Color),
    ("CONST", Word::Const),
    ("DATA", Word::Data),
    ("DECR", Word::Decr),
    ("DELAY", Word::Delay),
    ("DELETE", Word::Delete),
    ("DICT", Word::Dict),
    ("DIM", Word::Dim),
    ("DO", Word::Do),
    ("ELSE", Word::Else),
    ("ELSEIF", Word::ElseIf),
    ("END", Word::End),
    ("ENDIF", Word::EndIf),
    ("EXIT", Word::Exit),
    ("FOR", Word::For),
    ("FOREACH", Word::ForEach),
    ("FUNCTION", Word::Function),
    ("GET", Word::Get),
    ("GOSUB", Word::Gosub),
    ("GOTO", Word::Goto),
    ("IF", Word::If),
    ("INCR", Word::Incr),
    ("INPUT", Word::Input),
    ("JOIN", Word::Join),
    ("LET", Word::Let),
    ("LIST", Word::List),
    ("LOOP", Word::Loop),
    ("NEXT", Word::Next),
    ("ON", Word::On),
    ("OPEN", Word::Open),
    ("POP", Word::Pop),
    ("PRINT", Word::Print),
    ("PRINTF", Word::Printf),
    ("PUSH", Word::Push),
    ("RANDOMIZE", Word::Randomize),
    ("READ", Word::Read),
    ("READFILE", Word::ReadFile),
    ("READLINE", Word::ReadLine),
    ("REM", Word::Rem),
    ("RESTORE", Word::Restore),
    ("RETURN", Word::Return),
    ("REVERSE", Word::Reverse),
    ("SELECT", Word::Select),
    ("SET", Word::Set),
    ("SHIFT", Word::Shift),
    ("SLEEP", Word::Sleep),
    ("SORT", Word::Sort),
    ("SPLICE", Word::Splice),
    ("SPLIT", Word::Split),
    ("STOP", Word::Stop),
    ("SUB", Word::Sub),
    ("SWAP", Word::Swap),
    ("THROW", Word::Throw),
    ("TRY", Word::Try),
    ("TYPEOF", Word::TypeOf),
    ("UNSHIFT", Word::Unshift),
    ("WEND", Word::Wend),
    ("WHILE", Word::While),
    ("WRITEFILE", Word::WriteFile),
    ("WRITELINE", Word::WriteLine),
];

impl Word {
    pub fn lookup(s: &str) -> Option<Word> {
        WORDS.iter().find(|(w, _)| *w == s).map(|(_, word)| *word)
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match WORDS.iter().find(|(_, w)| w == self) {
            Some((s, _)) => write!(f, "{}", s),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_lookup() {
        assert_eq!(Word::lookup("FOREACH"), Some(Word::ForEach));
        assert_eq!(Word::lookup("PICKLES"), None);
        assert_eq!(Word::ReadLine.to_string(), "READLINE");
    }

    #[test]
    fn test_operator_words() {
        assert_eq!(Operator::from_word("MOD"), Some(Operator::Modulus));
        assert_eq!(Operator::from_word("THEN"), None);
    }
}
