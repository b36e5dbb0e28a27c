use std::collections::HashSet;
use std::rc::Rc;

/// The language a command comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heritage {
    Basic,
    Pilot,
    Logo,
}

impl std::fmt::Display for Heritage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Heritage::Basic => write!(f, "BASIC"),
            Heritage::Pilot => write!(f, "PILOT"),
            Heritage::Logo => write!(f, "LOGO"),
        }
    }
}

/// Which parser gets a line. Line numbers are stripped before routing.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Pilot,
    Label(Rc<str>),
    Logo,
    Comment,
    Basic,
}

/// Names a program defines with `TO`. These route to Logo like keywords.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    procedures: HashSet<Rc<str>>,
}

impl Vocabulary {
    pub fn new() -> Vocabulary {
        Vocabulary::default()
    }

    pub fn define(&mut self, name: &str) {
        self.procedures.insert(name.to_ascii_uppercase().into());
    }

    pub fn is_procedure(&self, name: &str) -> bool {
        self.procedures.contains(name)
    }
}

const LOGO_KEYWORDS: &[&str] = &[
    "ARC",
    "BACK",
    "BACKWARD",
    "BK",
    "CIRCLE",
    "CLEAN",
    "CLEARSCREEN",
    "CS",
    "DOT",
    "FD",
    "FENCE",
    "FILL",
    "FILLED",
    "FORWARD",
    "HEADING",
    "HIDETURTLE",
    "HOME",
    "HT",
    "LABEL",
    "LEFT",
    "LT",
    "MAKE",
    "NOTRACE",
    "PD",
    "PENCOLOR?",
    "PENDOWN",
    "PENSIZE?",
    "PENUP",
    "POLYGON",
    "POS",
    "POSITION",
    "PU",
    "RECT",
    "RECTANGLE",
    "REPEAT",
    "RIGHT",
    "RT",
    "SETBACKGROUND",
    "SETBG",
    "SETCOLOR",
    "SETCOLOUR",
    "SETFC",
    "SETFILLCOLOR",
    "SETH",
    "SETHEADING",
    "SETPC",
    "SETPENCOLOR",
    "SETPENSIZE",
    "SETPOS",
    "SETSCREENCOLOR",
    "SETSCREENCOLOUR",
    "SETWIDTH",
    "SETX",
    "SETXY",
    "SETY",
    "SHOWTURTLE",
    "SQUARE",
    "ST",
    "STAMP",
    "STAR",
    "TO",
    "TOWARDS",
    "TRACE",
    "TRIANGLE",
    "WINDOW",
    "WRAP",
    "XCOR",
    "YCOR",
];

pub fn is_logo_keyword(word: &str) -> bool {
    LOGO_KEYWORDS.binary_search(&word).is_ok()
}

/// The leading word of `text`, upper-cased, with a trailing `?` kept for
/// the Logo pen queries.
pub fn first_word(text: &str) -> String {
    let mut word: String = text
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect::<String>()
        .to_ascii_uppercase();
    if text[word.len()..].starts_with('?') {
        word.push('?');
    }
    word
}

/// PILOT command letter, optional Y/N modifier and the text after the colon.
pub fn pilot_parts(text: &str) -> Option<(char, Option<bool>, &str)> {
    let mut chars = text.char_indices();
    let (_, letter) = chars.next()?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    match chars.next()? {
        (i, ':') => Some((letter.to_ascii_uppercase(), None, &text[i + 1..])),
        (_, m) if "YyNn".contains(m) => match chars.next()? {
            (i, ':') => {
                let gate = m.eq_ignore_ascii_case(&'Y');
                Some((letter.to_ascii_uppercase(), Some(gate), &text[i + 1..]))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Applies the routing rules in their fixed order.
pub fn classify(text: &str, vocabulary: &Vocabulary) -> Route {
    let text = text.trim();
    if text.is_empty() {
        return Route::Comment;
    }
    if pilot_parts(text).is_some() {
        return Route::Pilot;
    }
    if let Some(label) = text.strip_prefix('*') {
        return Route::Label(label.trim().to_ascii_uppercase().into());
    }
    let word = first_word(text);
    if is_logo_keyword(&word) || vocabulary.is_procedure(&word) {
        return Route::Logo;
    }
    if word == "REM" || text.starts_with('\'') || text.starts_with(';') {
        return Route::Comment;
    }
    if word.len() > 1 && !word.ends_with('$') && text[word.len()..].trim() == ":" {
        return Route::Label(word.into());
    }
    Route::Basic
}
