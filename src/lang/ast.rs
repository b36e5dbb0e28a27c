use super::{Error, Heritage, Ident, Operator};
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Var(Ident),
    /// `NAME(args)`: built-in, user FUNCTION or array element.
    Call(Ident, Vec<Expression>),
    /// `L[i]` or `D["key"]`
    Index(Box<Expression>, Box<Expression>),
    /// `D.key`
    Member(Box<Expression>, Rc<str>),
    Negation(Box<Expression>),
    Not(Box<Expression>),
    Binary(Operator, Box<Expression>, Box<Expression>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Variable {
    Unary(Ident),
    Array(Ident, Vec<Expression>),
    Index(Ident, Expression),
    Member(Ident, Rc<str>),
}

impl Variable {
    pub fn ident(&self) -> &Ident {
        use Variable::*;
        match self {
            Unary(i) | Array(i, _) | Index(i, _) | Member(i, _) => i,
        }
    }
}

/// Where GOTO, GOSUB, J: and friends go.
#[derive(Debug, PartialEq, Clone)]
pub enum Target {
    Line(usize),
    Label(Rc<str>),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Target::Line(n) => write!(f, "{}", n),
            Target::Label(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum PrintItem {
    Expr(Expression),
    Comma,
    Semicolon,
}

#[derive(Debug, PartialEq, Clone)]
pub enum CaseTest {
    Value(Expression),
    Range(Expression, Expression),
    Is(Operator, Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Condition {
    While(Expression),
    Until(Expression),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ExitKind {
    For,
    Do,
    While,
    Sub,
    Function,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FileMode {
    Input,
    Output,
    Append,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Closer {
    If,
    Select,
    Sub,
    Function,
    Try,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Assert(Expression, Option<Expression>),
    Beep,
    Break,
    Call(Ident, Vec<Expression>),
    Case(Vec<CaseTest>),
    CaseElse,
    Catch(Option<Ident>),
    Close(Option<Expression>),
    Cls,
    Color(Vec<Expression>),
    Const(Ident, Expression),
    Data(Vec<Expression>),
    Decr(Variable, Option<Expression>),
    Delay(Expression),
    Delete(Ident, Expression),
    Dict(Ident, Vec<(Expression, Expression)>),
    Dim(Vec<(Ident, Vec<Expression>)>),
    Do(Option<Condition>),
    Else,
    ElseIf(Expression),
    End,
    EndBlock(Closer),
    Exit(ExitKind),
    For(Ident, Expression, Expression, Option<Expression>),
    ForEach(Ident, Option<Ident>, Expression),
    Function(Ident, Vec<Ident>),
    Get(Ident, Expression, Variable),
    Gosub(Target),
    Goto(Target),
    /// Single-line `IF c THEN a [ELSE b]`.
    If(Expression, Box<Command>, Option<Box<Command>>),
    IfBlock(Expression),
    Incr(Variable, Option<Expression>),
    Input(Option<Expression>, Vec<Variable>),
    Join(Ident, Expression, Variable),
    Let(Variable, Expression),
    List(Ident, Vec<Expression>),
    Loop(Option<Condition>),
    Next(Option<Ident>),
    OnGosub(Expression, Vec<Target>),
    OnGoto(Expression, Vec<Target>),
    Open(Expression, FileMode, Expression),
    Pop(Ident, Option<Variable>),
    Print(Vec<PrintItem>),
    Printf(Vec<Expression>),
    Push(Ident, Vec<Expression>),
    Randomize(Option<Expression>),
    Read(Vec<Variable>),
    ReadFile(Expression, Variable),
    ReadLine(Expression, Variable),
    Restore(Option<Target>),
    Return(Option<Expression>),
    Reverse(Ident),
    Select(Expression),
    Set(Ident, Expression, Expression),
    Shift(Ident, Option<Variable>),
    Sleep(Expression),
    Sort(Ident, bool),
    Splice(Ident, Expression, Expression, Vec<Expression>),
    Split(Expression, Expression, Ident),
    Stop,
    Sub(Ident, Vec<Ident>),
    Swap(Variable, Variable),
    Throw(Expression),
    Try,
    TypeOf(Expression, Option<Variable>),
    Unshift(Ident, Vec<Expression>),
    Wend,
    While(Expression),
    AppendFile(Expression, Expression),
    WriteFile(Expression, Expression),
    WriteLine(Expression, Expression),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum StrOp {
    Upper,
    Lower,
    Len,
    Reverse,
    Trim,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Pilot {
    /// `T:` text, interpolated when it runs.
    Type(Rc<str>),
    Accept(Option<Ident>),
    Match(Vec<Rc<str>>),
    Jump(Rc<str>),
    Use(Rc<str>),
    /// `C:` assignment, or a bare expression stored in RESULT.
    Compute(Statement),
    End,
    Remark,
    Label(Rc<str>),
    Graphics(Box<Command>),
    Str(StrOp, Ident),
    Dim(Ident, Expression),
    Pause(Expression),
    Execute(Box<Command>),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Edge {
    Wrap,
    Window,
    Fence,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Query {
    Heading,
    Pos,
    XCor,
    YCor,
    PenColor,
    PenSize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Logo {
    Arc(Expression, Option<Expression>),
    Back(Expression),
    Call(Ident, Vec<Expression>),
    Circle(Expression),
    ClearScreen,
    Dot(Option<Expression>),
    Edge(Edge),
    Fill,
    Forward(Expression),
    HideTurtle,
    Home,
    Label(Expression, Option<Expression>),
    Left(Expression),
    Make(Ident, Expression),
    PenDown,
    PenUp,
    Polygon(Option<Expression>, Option<Expression>),
    Query(Query),
    Rect(Expression, Option<Expression>),
    Repeat(Expression, Rc<Block>),
    /// Several commands written on one line.
    Run(Rc<Block>),
    Right(Expression),
    SetBackground(Vec<Expression>),
    SetColor(Vec<Expression>),
    SetFillColor(Vec<Expression>),
    SetHeading(Expression),
    SetPenSize(Expression),
    SetX(Expression),
    SetXY(Expression, Expression),
    SetY(Expression),
    ShowTurtle,
    Square(Option<Expression>),
    Star(Option<Expression>, Option<Expression>),
    To(Ident, Vec<Ident>),
    Towards(Expression, Expression),
    Trace(bool),
    Triangle(Option<Expression>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Basic(Statement),
    Pilot(Pilot),
    Logo(Logo),
    /// `Y:` and `N:` gates, and the `TY:` style modifiers.
    Gated(bool, Box<Command>),
    Label(Rc<str>),
    Nop,
}

impl Command {
    pub fn heritage(&self) -> Option<Heritage> {
        match self {
            Command::Basic(_) => Some(Heritage::Basic),
            Command::Pilot(_) | Command::Gated(..) => Some(Heritage::Pilot),
            Command::Logo(_) => Some(Heritage::Logo),
            Command::Label(_) | Command::Nop => None,
        }
    }

    pub fn statement(&self) -> Option<&Statement> {
        match self {
            Command::Basic(s) => Some(s),
            _ => None,
        }
    }
}

/// One executable line. A parse failure is kept and reported each time
/// the line runs.
#[derive(Debug, PartialEq, Clone)]
pub struct Instr {
    pub line: usize,
    pub heritage: Option<Heritage>,
    pub command: Result<Command, Error>,
}

/// Precomputed jump targets for a block opener or branch.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Link {
    /// Next branch: ELSEIF/ELSE/ENDIF for IF, next CASE, CATCH for TRY,
    /// the opener for WEND/LOOP/NEXT.
    pub alt: Option<usize>,
    /// The closing instruction of the construct.
    pub end: Option<usize>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block {
    pub instrs: Vec<Instr>,
    pub links: Vec<Link>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn link(&self, pc: usize) -> Link {
        self.links.get(pc).copied().unwrap_or_default()
    }
}
