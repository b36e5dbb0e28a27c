use super::{Column, Heritage, LineNumber};

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    column: Column,
    heritage: Option<Heritage>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

/// The four failure classes a host can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Syntax,
    Runtime,
    Resource,
    Cancelled,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Category::Syntax => write!(f, "SyntaxError"),
            Category::Runtime => write!(f, "RuntimeError"),
            Category::Resource => write!(f, "ResourceError"),
            Category::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            column: 0..0,
            heritage: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn heritage(&self) -> Option<Heritage> {
        self.heritage
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    /// Annotates with a source line unless one is already attached.
    pub fn in_line_number(self, line: usize) -> Error {
        if self.line_number.is_some() {
            return self;
        }
        Error {
            line_number: Some(line),
            ..self
        }
    }

    pub fn in_column(self, column: &Column) -> Error {
        if self.column != (0..0) {
            return self;
        }
        Error {
            column: column.clone(),
            ..self
        }
    }

    pub fn in_heritage(self, heritage: Heritage) -> Error {
        if self.heritage.is_some() {
            return self;
        }
        Error {
            heritage: Some(heritage),
            ..self
        }
    }

    pub fn message<S: Into<String>>(self, message: S) -> Error {
        Error {
            message: message.into(),
            ..self
        }
    }

    pub fn category(&self) -> Category {
        match self.code {
            2 | 22 | 26 | 29 | 30 | 31 | 32 | 33 | 34 | 35 | 36 | 44 | 64 | 65 => Category::Syntax,
            70 => Category::Resource,
            80..=82 => Category::Cancelled,
            _ => Category::Runtime,
        }
    }

    /// The upper-case description without line or heritage decoration.
    pub fn description(&self) -> &'static str {
        match self.code {
            1 => "NEXT WITHOUT FOR",
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            4 => "OUT OF DATA",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            8 => "UNDEFINED LINE",
            9 => "SUBSCRIPT OUT OF RANGE",
            11 => "DIVISION BY ZERO",
            13 => "TYPE MISMATCH",
            18 => "UNDEFINED USER FUNCTION",
            22 => "MISSING OPERAND",
            26 => "FOR WITHOUT NEXT",
            29 => "WHILE WITHOUT WEND",
            30 => "WEND WITHOUT WHILE",
            31 => "LOOP WITHOUT DO",
            32 => "DO WITHOUT LOOP",
            33 => "IF WITHOUT END IF",
            34 => "ELSE WITHOUT IF",
            35 => "CASE WITHOUT SELECT",
            36 => "SELECT WITHOUT END SELECT",
            37 => "EXIT OUTSIDE LOOP",
            38 => "STEP IS ZERO",
            40 => "UNDEFINED LABEL",
            41 => "UNDEFINED PROCEDURE",
            42 => "WRONG NUMBER OF ARGUMENTS",
            43 => "UNKNOWN FUNCTION",
            44 => "UNBALANCED BRACKETS",
            45 => "CONSTANT REASSIGNED",
            46 => "ASSERTION FAILED",
            47 => "UNHANDLED ERROR",
            48 => "NOT A LIST",
            49 => "NOT A DICTIONARY",
            50 => "UNKNOWN COMMAND",
            51 => "INTERNAL ERROR",
            52 => "BAD FILE NUMBER",
            53 => "FILE NOT FOUND",
            54 => "BAD FILE MODE",
            57 => "DISK I/O ERROR",
            62 => "INPUT PAST END",
            64 => "TRY WITHOUT END TRY",
            65 => "SUB WITHOUT END",
            70 => "STACK OVERFLOW",
            80 => "BREAK",
            81 => "INSTRUCTION LIMIT EXCEEDED",
            82 => "TIME LIMIT EXCEEDED",
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    OutOfData = 4,
    IllegalFunctionCall = 5,
    Overflow = 6,
    UndefinedLine = 8,
    SubscriptOutOfRange = 9,
    DivisionByZero = 11,
    TypeMismatch = 13,
    UndefinedUserFunction = 18,
    MissingOperand = 22,
    ForWithoutNext = 26,
    WhileWithoutWend = 29,
    WendWithoutWhile = 30,
    LoopWithoutDo = 31,
    DoWithoutLoop = 32,
    IfWithoutEndIf = 33,
    ElseWithoutIf = 34,
    CaseWithoutSelect = 35,
    SelectWithoutEndSelect = 36,
    ExitOutsideLoop = 37,
    StepIsZero = 38,
    UndefinedLabel = 40,
    UndefinedProcedure = 41,
    WrongArgumentCount = 42,
    UnknownFunction = 43,
    UnbalancedBrackets = 44,
    ConstantReassigned = 45,
    AssertionFailed = 46,
    Thrown = 47,
    NotAList = 48,
    NotADict = 49,
    UnknownCommand = 50,
    InternalError = 51,
    BadFileNumber = 52,
    FileNotFound = 53,
    BadFileMode = 54,
    DiskIoError = 57,
    InputPastEnd = 62,
    TryWithoutEndTry = 64,
    SubWithoutEnd = 65,
    StackOverflow = 70,
    Break = 80,
    StepLimit = 81,
    TimeLimit = 82,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = self.description();
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if let Some(heritage) = self.heritage {
            suffix.push_str(&format!(" [{}]", heritage));
        }
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        let mut message = String::new();
        if !self.message.is_empty() {
            message.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}", self.code)?;
        } else {
            write!(f, "{}", code_str)?;
        }
        if !suffix.is_empty() {
            write!(f, " IN{}", suffix)?;
        }
        write!(f, "{}", message)
    }
}
