use super::{
    Config, ErrorRecord, ExecutionResult, Files, ProcKind, Procedure, Program, Stack, Status,
    Turtle, TurtleEvent, Val, Var,
};
use crate::error;
use crate::lang::ast::*;
use crate::lang::{Category, Error, ErrorCode, Heritage, Ident, Source};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

type Result<T> = std::result::Result<T, Error>;

/// Supplies lines for INPUT and `A:`. `None` cancels the run.
pub trait InputProvider {
    fn request_input(&mut self, prompt: &str) -> Option<String>;
}

impl<F> InputProvider for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum FrameKind {
    Main,
    /// GOSUB, `U:` and `C:*label`
    Gosub,
    Repeat { count: i64, done: i64 },
    Run,
    Call(ProcKind),
}

/// A position in a block. Instructions between `pc` and `end` belong to
/// this frame; reaching `end` returns.
#[derive(Debug)]
pub(super) struct Frame {
    pub block: Rc<Block>,
    pub pc: usize,
    pub end: Option<usize>,
    pub kind: FrameKind,
    /// Source line reported for instructions that have none.
    pub line: usize,
    loops: usize,
    tries: usize,
    scopes: usize,
}

#[derive(Debug)]
pub(super) enum LoopKind {
    For {
        var: Ident,
        limit: Val,
        step: Val,
    },
    ForEach {
        first: Ident,
        second: Option<Ident>,
        items: Vec<(Val, Val)>,
        index: usize,
    },
    While,
    Do,
}

#[derive(Debug)]
pub(super) struct Loop {
    /// Depth of the frame that opened the loop.
    pub frame: usize,
    /// Index of the opener in that frame's block.
    pub start: usize,
    pub kind: LoopKind,
}

#[derive(Debug)]
pub(super) struct TryFrame {
    frame: usize,
    loops: usize,
    catch: Option<usize>,
    end: usize,
}

/// ## Runtime
///
/// Owns every piece of interpreter state for one program. Independent
/// runtimes share nothing.

pub struct Runtime {
    config: Config,
    pub(super) program: Program,
    pub(super) var: Var,
    pub(super) frames: Stack<Frame>,
    pub(super) loops: Stack<Loop>,
    tries: Vec<TryFrame>,
    try_floor: usize,
    pub(super) turtle: Turtle,
    pub(super) trace: bool,
    pub(super) data_cursor: usize,
    pub(super) rng: StdRng,
    pub(super) started: Instant,
    pub(super) files: Files,
    pub(super) answer: String,
    pub(super) matched: bool,
    steps: u64,
    output: Vec<String>,
    pending: String,
    events: Vec<TurtleEvent>,
    errors: Vec<ErrorRecord>,
    halt: Option<Status>,
    escaping: Option<Error>,
    pub(super) returned: Option<Val>,
    function_depth: usize,
    debug: bool,
    breakpoints: HashSet<usize>,
    skip_break: bool,
    cancel: Arc<AtomicBool>,
    input: Option<Box<dyn InputProvider>>,
    queued: VecDeque<String>,
    output_hook: Option<Box<dyn FnMut(&str)>>,
    event_hook: Option<Box<dyn FnMut(&TurtleEvent)>>,
    pub(super) pc: usize,
    pub(super) line: usize,
    pub(super) block: Rc<Block>,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Runtime {
            frames: Stack::new("CALL DEPTH EXCEEDED", config.max_call_depth),
            loops: Stack::new("LOOP NESTING EXCEEDED", config.max_loop_depth),
            turtle: Turtle::new(config.canvas_width, config.canvas_height),
            config,
            program: Program::new(),
            var: Var::new(),
            tries: vec![],
            try_floor: 0,
            trace: false,
            data_cursor: 0,
            rng,
            started: Instant::now(),
            files: Files::new(),
            answer: String::new(),
            matched: false,
            steps: 0,
            output: vec![],
            pending: String::new(),
            events: vec![],
            errors: vec![],
            halt: None,
            escaping: None,
            returned: None,
            function_depth: 0,
            debug: false,
            breakpoints: HashSet::new(),
            skip_break: false,
            cancel: Arc::new(AtomicBool::new(false)),
            input: None,
            queued: VecDeque::new(),
            output_hook: None,
            event_hook: None,
            pc: 0,
            line: 0,
            block: Rc::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clears all program state. Host settings (callbacks, breakpoints,
    /// queued input) survive.
    pub fn reset(&mut self) {
        self.program = Program::new();
        self.var.clear();
        self.frames.clear();
        self.loops.clear();
        self.tries.clear();
        self.try_floor = 0;
        self.turtle.reset();
        self.trace = false;
        self.data_cursor = 0;
        self.rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.started = Instant::now();
        self.files.clear();
        self.answer.clear();
        self.matched = false;
        self.steps = 0;
        self.output.clear();
        self.pending.clear();
        self.events.clear();
        self.errors.clear();
        self.halt = None;
        self.escaping = None;
        self.returned = None;
        self.function_depth = 0;
        self.skip_break = false;
        self.cancel.store(false, Ordering::SeqCst);
    }

    /// Pre-scans a program without running it.
    pub fn load(&mut self, text: &str) {
        self.program = Program::load(Source::load(text));
        self.frames.clear();
        let main = self.program.block().clone();
        if let Err(error) = self.push_frame(main, 0, None, FrameKind::Main) {
            self.record(&error);
        }
    }

    pub fn execute(&mut self, text: &str) -> ExecutionResult {
        self.reset();
        self.load(text);
        self.run()
    }

    /// Runs one line against the current state, REPL style.
    pub fn execute_line(&mut self, text: &str) -> ExecutionResult {
        let vocabulary = self.program.source().vocabulary().clone();
        let source = Source::load_with(text, vocabulary);
        let marks = (self.output.len(), self.events.len(), self.errors.len());
        self.frames.clear();
        self.loops.clear();
        self.tries.clear();
        self.halt = None;
        self.escaping = None;
        self.steps = 0;
        self.cancel.store(false, Ordering::SeqCst);
        if let Err(error) = self.push_frame(source.block().clone(), 0, None, FrameKind::Main) {
            self.record(&error);
        }
        let mut result = self.run();
        result.output.drain(..marks.0.min(result.output.len()));
        result.events.drain(..marks.1.min(result.events.len()));
        result.errors.drain(..marks.2.min(result.errors.len()));
        result
    }

    /// Starts or continues the loaded program.
    pub fn run(&mut self) -> ExecutionResult {
        while self.step() {}
        let status = self.halt.take().unwrap_or(Status::Completed);
        if let Status::Paused { .. } = status {
        } else {
            self.flush();
            self.frames.clear();
            self.files.clear();
        }
        ExecutionResult {
            output: self.output.clone(),
            events: self.events.clone(),
            errors: self.errors.clone(),
            status,
        }
    }

    /// Continues after a breakpoint without stopping on it again.
    pub fn resume(&mut self) -> ExecutionResult {
        self.skip_break = true;
        self.run()
    }

    pub fn set_debug_mode(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// 1-based source lines.
    pub fn set_breakpoints<I: IntoIterator<Item = usize>>(&mut self, lines: I) {
        self.breakpoints = lines.into_iter().collect();
    }

    pub fn set_input_provider(&mut self, provider: Box<dyn InputProvider>) {
        self.input = Some(provider);
    }

    /// Queues a line for INPUT and `A:` when no provider is set.
    pub fn push_input<S: Into<String>>(&mut self, line: S) {
        self.queued.push_back(line.into());
    }

    pub fn on_output<F: FnMut(&str) + 'static>(&mut self, hook: F) {
        self.output_hook = Some(Box::new(hook));
    }

    pub fn on_turtle_event<F: FnMut(&TurtleEvent) + 'static>(&mut self, hook: F) {
        self.event_hook = Some(Box::new(hook));
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn variable(&self, name: &str) -> Option<Val> {
        self.var.get(&name.to_ascii_uppercase()).cloned()
    }

    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Runs one instruction. False once the run is over, paused, or a
    /// nested FUNCTION call has to unwind.
    fn step(&mut self) -> bool {
        if self.halt.is_some() || self.escaping.is_some() {
            return false;
        }
        if self.cancel.load(Ordering::SeqCst) {
            self.halt = Some(Status::Stopped);
            return false;
        }
        if self.steps >= self.config.max_steps {
            let error = error!(StepLimit; format!("{} STEPS", self.config.max_steps));
            self.record(&error.in_line_number(self.line));
            self.halt = Some(Status::Stopped);
            return false;
        }
        if let Some(limit) = self.config.max_duration {
            if self.started.elapsed() > limit {
                self.record(&error!(TimeLimit).in_line_number(self.line));
                self.halt = Some(Status::Stopped);
                return false;
            }
        }
        let (block, pc, end, origin) = match self.frames.last() {
            Some(f) => (f.block.clone(), f.pc, f.end, f.line),
            None => {
                self.halt = Some(Status::Completed);
                return false;
            }
        };
        if end == Some(pc) || pc >= block.len() {
            self.steps += 1;
            return match self.frame_done() {
                Ok(()) => self.halt.is_none(),
                Err(error) => self.fail(error),
            };
        }
        let instr = &block.instrs[pc];
        let line = if instr.line > 0 { instr.line } else { origin };
        if self.function_depth == 0 {
            let skip = std::mem::replace(&mut self.skip_break, false);
            if self.debug && !skip && instr.line > 0 && self.breakpoints.contains(&line) {
                self.halt = Some(Status::Paused { line });
                return false;
            }
        }
        self.steps += 1;
        if let Some(frame) = self.frames.last_mut() {
            frame.pc = pc + 1;
        }
        self.pc = pc;
        self.line = line;
        self.block = block.clone();
        let result = match &instr.command {
            Ok(command) => self.command(command),
            Err(error) => Err(error.clone()),
        };
        match result {
            Ok(()) => self.halt.is_none() && self.escaping.is_none(),
            Err(error) => {
                let mut error = error.in_line_number(line);
                if let Some(heritage) = instr.heritage {
                    error = error.in_heritage(heritage);
                }
                self.fail(error)
            }
        }
    }

    pub(super) fn command(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Basic(s) => self.basic(s).map_err(|e| e.in_heritage(Heritage::Basic)),
            Command::Pilot(p) => self.pilot(p).map_err(|e| e.in_heritage(Heritage::Pilot)),
            Command::Logo(l) => self.logo(l).map_err(|e| e.in_heritage(Heritage::Logo)),
            Command::Gated(gate, inner) => {
                if self.matched == *gate {
                    self.command(inner)
                        .map_err(|e| e.in_heritage(Heritage::Pilot))
                } else {
                    Ok(())
                }
            }
            Command::Label(_) | Command::Nop => Ok(()),
        }
    }

    /// Per-line error policy. Returns whether the run continues.
    fn fail(&mut self, error: Error) -> bool {
        if self.halt.is_some() || self.escaping.is_some() {
            return false;
        }
        match error.category() {
            Category::Cancelled => {
                self.halt = Some(Status::Stopped);
                return false;
            }
            Category::Resource => {
                self.record(&error);
                self.halt = Some(Status::Errored);
                return false;
            }
            Category::Syntax | Category::Runtime => {}
        }
        if self.tries.len() > self.try_floor {
            return match self.catch(&error) {
                Ok(()) => true,
                Err(e) => {
                    self.record(&e);
                    true
                }
            };
        }
        if !self.tries.is_empty() {
            self.escaping = Some(error);
            return false;
        }
        self.record(&error);
        if error.is(ErrorCode::Thrown) {
            self.halt = Some(Status::Errored);
            return false;
        }
        true
    }

    fn catch(&mut self, error: &Error) -> Result<()> {
        let handler = match self.tries.pop() {
            Some(t) => t,
            None => return Err(error!(InternalError; "NO HANDLER")),
        };
        self.unwind_to(handler.frame)?;
        self.loops.truncate(handler.loops);
        let message = if error.is(ErrorCode::Thrown) {
            error.text().to_string()
        } else {
            error.to_string()
        };
        self.var.store_name("ERROR$", Val::from(message.clone()));
        let frame = match self.frames.last_mut() {
            Some(f) => f,
            None => return Err(error!(InternalError; "NO FRAME")),
        };
        frame.pc = match handler.catch {
            Some(catch) => {
                if let Ok(Command::Basic(Statement::Catch(Some(ident)))) =
                    &frame.block.instrs[catch].command
                {
                    let ident = ident.clone();
                    self.var.store(&ident, Val::from(message))?;
                }
                catch + 1
            }
            None => handler.end + 1,
        };
        Ok(())
    }

    pub(super) fn record(&mut self, error: &Error) {
        self.flush();
        self.errors.push(ErrorRecord::from(error));
        self.emit(&format!("?{}", error));
    }

    /// Appends to the line being built by PRINT.
    pub(super) fn print(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    pub(super) fn column(&self) -> usize {
        self.pending.chars().count()
    }

    /// Finishes the pending line with `text`.
    pub(super) fn emit(&mut self, text: &str) {
        let mut line = std::mem::take(&mut self.pending);
        line.push_str(text);
        if let Some(hook) = self.output_hook.as_mut() {
            hook(&line);
        }
        self.output.push(line);
    }

    pub(super) fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.emit("");
        }
    }

    pub(super) fn draw(&mut self, event: TurtleEvent) {
        if let TurtleEvent::Pose { x, y, heading, .. } = &event {
            let (x, y, heading) = (*x, *y, *heading);
            self.var.store_name("TURTLE_X", Val::Float(x));
            self.var.store_name("TURTLE_Y", Val::Float(y));
            self.var.store_name("TURTLE_HEADING", Val::Float(heading));
            if self.trace {
                self.flush();
                self.emit(&format!(
                    "TRACE: [{}, {}] heading {}",
                    tidy(x),
                    tidy(y),
                    tidy(heading)
                ));
            }
        }
        if let Some(hook) = self.event_hook.as_mut() {
            hook(&event);
        }
        self.events.push(event);
    }

    pub(super) fn request_input(&mut self, prompt: &str) -> Result<String> {
        self.flush();
        match self.input.as_mut() {
            Some(provider) => match provider.request_input(prompt) {
                Some(line) => Ok(line),
                None => Err(error!(Break; "INPUT CANCELLED")),
            },
            None => Ok(self.queued.pop_front().unwrap_or_default()),
        }
    }

    pub(super) fn pause(&self, millis: f64) {
        if self.config.real_time && millis > 0.0 && millis.is_finite() {
            std::thread::sleep(Duration::from_secs_f64(millis.min(60_000.0) / 1000.0));
        }
    }

    pub(super) fn halt(&mut self, status: Status) {
        self.halt = Some(status);
    }

    pub(super) fn link(&self) -> Link {
        self.block.link(self.pc)
    }

    /// Moves the current frame's program counter.
    pub(super) fn goto_pc(&mut self, pc: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pc = pc;
        }
    }

    pub(super) fn push_frame(
        &mut self,
        block: Rc<Block>,
        pc: usize,
        end: Option<usize>,
        kind: FrameKind,
    ) -> Result<()> {
        let frame = Frame {
            block,
            pc,
            end,
            kind,
            line: self.line,
            loops: self.loops.len(),
            tries: self.tries.len(),
            scopes: self.var.scope_depth(),
        };
        self.frames.push(frame)
    }

    pub(super) fn pop_frame(&mut self) -> Result<()> {
        let frame = self.frames.pop()?;
        self.loops.truncate(frame.loops);
        self.tries.truncate(frame.tries);
        self.var.truncate_scopes(frame.scopes);
        if let FrameKind::Repeat { .. } = frame.kind {
            let outer = self.frames.iter().rev().find_map(|f| match f.kind {
                FrameKind::Repeat { done, .. } => Some(done + 1),
                _ => None,
            });
            if let Some(n) = outer {
                self.var.store_name("REPCOUNT", Val::Integer(n));
            }
        }
        Ok(())
    }

    fn unwind_to(&mut self, depth: usize) -> Result<()> {
        while self.frames.len() > depth {
            self.pop_frame()?;
        }
        Ok(())
    }

    fn frame_done(&mut self) -> Result<()> {
        let mut again = None;
        let kind = match self.frames.last_mut() {
            Some(frame) => {
                if let FrameKind::Repeat { count, done } = &mut frame.kind {
                    if *done + 1 < *count {
                        *done += 1;
                        frame.pc = 0;
                        again = Some(*done + 1);
                    }
                }
                frame.kind.clone()
            }
            None => return Ok(()),
        };
        if let Some(n) = again {
            self.var.store_name("REPCOUNT", Val::Integer(n));
            return Ok(());
        }
        match kind {
            FrameKind::Main | FrameKind::Gosub => {
                self.halt = Some(Status::Completed);
                Ok(())
            }
            FrameKind::Repeat { .. } | FrameKind::Run | FrameKind::Call(_) => self.pop_frame(),
        }
    }

    /// Jumps within the main program, leaving REPEAT and multi-command
    /// blocks.
    pub(super) fn jump(&mut self, pc: usize) -> Result<()> {
        let main = self.program.block().clone();
        while self.frames.len() > 1 && !self.top_is(&main) {
            self.pop_frame()?;
        }
        if self.top_is(&main) {
            self.goto_pc(pc);
            Ok(())
        } else {
            self.push_frame(main, pc, None, FrameKind::Main)
        }
    }

    fn top_is(&self, block: &Rc<Block>) -> bool {
        self.frames
            .last()
            .map_or(false, |f| Rc::ptr_eq(&f.block, block))
    }

    pub(super) fn gosub(&mut self, pc: usize) -> Result<()> {
        let main = self.program.block().clone();
        self.push_frame(main, pc, None, FrameKind::Gosub)
    }

    pub(super) fn run_block(&mut self, block: Rc<Block>, kind: FrameKind) -> Result<()> {
        self.push_frame(block, 0, None, kind)
    }

    /// Enters a procedure, SUB or FUNCTION body with its parameters bound.
    pub(super) fn enter(&mut self, procedure: &Procedure, args: Vec<Val>) -> Result<()> {
        if args.len() != procedure.params.len() {
            return Err(error!(WrongArgumentCount; format!(
                "EXPECTED {}, GOT {}",
                procedure.params.len(),
                args.len()
            )));
        }
        let main = self.program.block().clone();
        self.push_frame(
            main,
            procedure.start + 1,
            Some(procedure.end),
            FrameKind::Call(procedure.kind),
        )?;
        let bindings = procedure
            .params
            .iter()
            .map(|p| p.name().clone())
            .zip(args)
            .collect();
        self.var.push_scope(bindings);
        Ok(())
    }

    /// Runs a FUNCTION to completion from inside an expression.
    pub(super) fn call_function(&mut self, procedure: &Procedure, args: Vec<Val>) -> Result<Val> {
        if self.function_depth >= self.config.max_function_depth {
            return Err(error!(StackOverflow; "FUNCTION DEPTH EXCEEDED"));
        }
        let depth = self.frames.len();
        self.enter(procedure, args)?;
        self.returned = None;
        let saved = (self.pc, self.line, self.block.clone(), self.try_floor);
        self.try_floor = self.tries.len();
        self.function_depth += 1;
        let result = loop {
            if self.frames.len() <= depth {
                break Ok(self.returned.take().unwrap_or(Val::Integer(0)));
            }
            if !self.step() {
                if let Some(error) = self.escaping.take() {
                    break self.unwind_to(depth).and(Err(error));
                }
                if self.halt.is_some() {
                    break Err(error!(Break; "HALTED"));
                }
            }
        };
        self.function_depth -= 1;
        let (pc, line, block, floor) = saved;
        self.pc = pc;
        self.line = line;
        self.block = block;
        self.try_floor = floor;
        result
    }

    /// RETURN: leaves the nearest GOSUB or call frame.
    pub(super) fn return_from(&mut self, value: Option<Val>) -> Result<()> {
        let found = self
            .frames
            .iter()
            .rposition(|f| matches!(f.kind, FrameKind::Gosub | FrameKind::Call(_)));
        match found {
            Some(index) => {
                let function = matches!(
                    self.frames.get(index),
                    Some(Frame {
                        kind: FrameKind::Call(ProcKind::Function),
                        ..
                    })
                );
                self.unwind_to(index)?;
                if function {
                    let value = value.unwrap_or(Val::Integer(0));
                    self.var.store_name("RESULT", value.clone());
                    self.returned = Some(value);
                }
                Ok(())
            }
            None => Err(error!(ReturnWithoutGosub)),
        }
    }

    /// `E:` returns from a `U:` call, or ends the program.
    pub(super) fn end_pilot(&mut self) -> Result<()> {
        let found = self
            .frames
            .iter()
            .rposition(|f| f.kind == FrameKind::Gosub);
        match found {
            Some(index) => self.unwind_to(index),
            None => {
                self.halt = Some(Status::Completed);
                Ok(())
            }
        }
    }

    /// EXIT SUB and EXIT FUNCTION.
    pub(super) fn exit_call(&mut self) -> Result<()> {
        let found = self
            .frames
            .iter()
            .rposition(|f| matches!(f.kind, FrameKind::Call(_)));
        match found {
            Some(index) => self.unwind_to(index),
            None => Err(error!(ExitOutsideLoop)),
        }
    }

    pub(super) fn push_try(&mut self) -> Result<()> {
        let link = self.link();
        let end = match link.end {
            Some(end) => end,
            None => return Err(error!(TryWithoutEndTry)),
        };
        self.tries.push(TryFrame {
            frame: self.frames.len(),
            loops: self.loops.len(),
            catch: link.alt,
            end,
        });
        Ok(())
    }

    /// CATCH or END TRY reached without an error.
    pub(super) fn leave_try(&mut self) {
        let depth = self.frames.len();
        let pc = self.pc;
        if let Some(t) = self.tries.last() {
            if t.frame == depth && (t.catch == Some(pc) || t.end == pc) {
                self.tries.pop();
            }
        }
    }

    /// Index into `loops` of the innermost loop of the current frame that
    /// `seek` accepts.
    pub(super) fn find_loop<F>(&self, seek: F) -> Option<usize>
    where
        F: Fn(&LoopKind) -> Seek,
    {
        let depth = self.frames.len();
        let mut i = self.loops.len();
        while i > 0 {
            i -= 1;
            let entry = self.loops.get(i)?;
            if entry.frame != depth {
                return None;
            }
            match seek(&entry.kind) {
                Seek::Found => return Some(i),
                Seek::Skip => {}
                Seek::Stop => return None,
            }
        }
        None
    }

    /// Opens a loop at the current instruction, dropping any stale loop
    /// the same opener left behind.
    pub(super) fn push_loop(&mut self, kind: LoopKind) -> Result<()> {
        let pc = self.pc;
        let depth = self.frames.len();
        let stale = self
            .loops
            .iter()
            .rposition(|l| l.frame == depth && l.start == pc);
        if let Some(i) = stale {
            self.loops.truncate(i);
        }
        self.loops.push(Loop {
            frame: depth,
            start: pc,
            kind,
        })
    }
}

pub(super) enum Seek {
    Found,
    Skip,
    Stop,
}

/// Rounds away float noise for display.
pub(super) fn tidy(n: f64) -> String {
    Val::Float((n * 1e6).round() / 1e6).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_input_provider() {
        let mut rt = Runtime::default();
        rt.set_input_provider(Box::new(|_: &str| Some("Hi".to_string())));
        let r = rt.execute("A:\nT:$ANSWER");
        assert_eq!(r.output, vec!["Hi"]);
    }

    #[test]
    fn test_provider_none_cancels() {
        let mut rt = Runtime::default();
        rt.set_input_provider(Box::new(|_: &str| None));
        let r = rt.execute("PRINT 1\nINPUT A\nPRINT 2");
        assert_eq!(r.output, vec!["1"]);
        assert_eq!(r.status, Status::Stopped);
    }

    #[test]
    fn test_cancel_handle() {
        let mut rt = Runtime::default();
        rt.load("10 GOTO 10");
        rt.cancel_handle().store(true, Ordering::SeqCst);
        assert_eq!(rt.run().status, Status::Stopped);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = Runtime::default();
        let mut b = Runtime::default();
        a.execute("X = 1");
        b.execute("X = 2");
        assert_eq!(a.variable("x"), Some(Val::Integer(1)));
        assert_eq!(b.variable("x"), Some(Val::Integer(2)));
    }

    #[test]
    fn test_callbacks_see_events_in_order() {
        use std::cell::RefCell;
        let seen = Rc::new(RefCell::new(vec![]));
        let mut rt = Runtime::default();
        let out = seen.clone();
        rt.on_output(move |line| out.borrow_mut().push(line.to_string()));
        let ev = seen.clone();
        rt.on_turtle_event(move |e| {
            if let TurtleEvent::Line { .. } = e {
                ev.borrow_mut().push("line".to_string())
            }
        });
        rt.execute("PRINT \"a\"\nFORWARD 10\nPRINT \"b\"");
        assert_eq!(*seen.borrow(), vec!["a", "line", "b"]);
    }
}
