use super::eval::{index, set_index};
use super::files;
use super::runtime::{LoopKind, Seek};
use super::{Dict, Operation, Runtime, Status, Val};
use crate::error;
use crate::lang::ast::*;
use crate::lang::{Error, Ident};
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::Ordering;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

const ZONE: usize = 14;

impl Runtime {
    pub(super) fn basic(&mut self, statement: &Statement) -> Result<()> {
        use Statement::*;
        match statement {
            Assert(cond, message) => self.r#assert(cond, message),
            Beep => {
                self.pause(200.0);
                Ok(())
            }
            Break => self.r#break(),
            Call(ident, args) => self.call_sub(ident, args),
            Case(_) | CaseElse | Else | ElseIf(_) => self.skip_to_end(),
            Catch(_) => {
                self.leave_try();
                self.skip_to_end()
            }
            Close(number) => self.r#close(number),
            Cls => Ok(()),
            Color(args) => {
                let colour = self.colour(args)?;
                self.turtle.color = colour;
                Ok(())
            }
            Const(ident, expr) => {
                let val = self.eval(expr)?;
                self.var.define_const(ident, val)
            }
            Data(_) | EndBlock(Closer::If) | EndBlock(Closer::Select) => Ok(()),
            EndBlock(Closer::Sub) | EndBlock(Closer::Function) => Ok(()),
            EndBlock(Closer::Try) => {
                self.leave_try();
                Ok(())
            }
            Decr(var, by) => self.r#step_by(var, by, true),
            Incr(var, by) => self.r#step_by(var, by, false),
            Delay(millis) => {
                let millis = self.eval_number(millis)?;
                self.pause(millis);
                Ok(())
            }
            Sleep(seconds) => {
                let seconds = self.eval_number(seconds)?;
                self.pause(seconds * 1000.0);
                Ok(())
            }
            Delete(ident, key) => self.r#delete(ident, key),
            Dict(ident, pairs) => self.r#dict(ident, pairs),
            Dim(arrays) => self.r#dim(arrays),
            Do(condition) => self.r#do(condition),
            End => {
                self.halt(Status::Completed);
                Ok(())
            }
            Exit(kind) => self.r#exit(*kind),
            For(var, from, to, step) => self.r#for(var, from, to, step),
            ForEach(first, second, collection) => self.r#foreach(first, second, collection),
            Function(..) | Sub(..) => self.skip_to_end(),
            Get(ident, key, var) => self.r#get(ident, key, var),
            Gosub(target) => {
                let pc = self.program.resolve(target)?;
                self.gosub(pc)
            }
            Goto(target) => {
                let pc = self.program.resolve(target)?;
                self.jump(pc)
            }
            If(cond, then, otherwise) => {
                if self.eval(cond)?.is_truthy() {
                    self.command(then)
                } else if let Some(otherwise) = otherwise {
                    self.command(otherwise)
                } else {
                    Ok(())
                }
            }
            IfBlock(cond) => self.r#if_block(cond),
            Input(prompt, vars) => self.r#input(prompt, vars),
            Join(ident, delimiter, var) => self.r#join(ident, delimiter, var),
            Let(var, expr) => {
                let val = self.eval(expr)?;
                self.assign(var, val)
            }
            List(ident, items) => {
                let items = self.eval_list(items)?;
                self.var.store(ident, Val::List(items))
            }
            Loop(condition) => self.r#loop(condition),
            Next(ident) => self.r#next(ident),
            OnGosub(expr, targets) => self.r#on(expr, targets, true),
            OnGoto(expr, targets) => self.r#on(expr, targets, false),
            Open(path, mode, number) => {
                let path = self.eval_string(path)?;
                let number = self.eval_integer(number)?;
                self.files.open(number, &path, *mode)
            }
            Pop(ident, into) => self.r#take(ident, into, false),
            Shift(ident, into) => self.r#take(ident, into, true),
            Print(items) => self.print_items(items),
            Printf(args) => self.r#printf(args),
            Push(ident, items) => self.r#push(ident, items, false),
            Unshift(ident, items) => self.r#push(ident, items, true),
            Randomize(seed) => {
                self.rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(self.eval_number(seed)?.to_bits()),
                    None => StdRng::from_entropy(),
                };
                Ok(())
            }
            Read(vars) => self.r#read(vars),
            ReadFile(source, var) => self.r#read_file(source, var),
            ReadLine(number, var) => self.r#read_line(number, var),
            Restore(target) => {
                self.data_cursor = match target {
                    Some(target) => {
                        let pc = self.program.resolve(target)?;
                        self.program.data_index_at(pc)
                    }
                    None => 0,
                };
                Ok(())
            }
            Return(value) => {
                let value = match value {
                    Some(expr) => Some(self.eval(expr)?),
                    None => None,
                };
                self.return_from(value)
            }
            Reverse(ident) => {
                let mut items = self.list_of(ident)?;
                items.reverse();
                self.var.store(ident, Val::List(items))
            }
            Select(expr) => self.r#select(expr),
            Set(ident, key, expr) => self.r#set(ident, key, expr),
            Sort(ident, descending) => {
                let mut items = self.list_of(ident)?;
                items.sort_by(|a, b| Operation::compare(a, b).unwrap_or(Ordering::Equal));
                if *descending {
                    items.reverse();
                }
                self.var.store(ident, Val::List(items))
            }
            Splice(ident, start, count, inserts) => self.r#splice(ident, start, count, inserts),
            Split(source, delimiter, ident) => self.r#split(source, delimiter, ident),
            Stop => {
                self.halt(Status::Stopped);
                Ok(())
            }
            Swap(a, b) => {
                let first = self.read_variable(a)?;
                let second = self.read_variable(b)?;
                self.assign(a, second)?;
                self.assign(b, first)
            }
            Throw(message) => {
                let message = self.eval_string(message)?;
                Err(error!(Thrown; message))
            }
            Try => self.push_try(),
            TypeOf(expr, into) => {
                let name = Val::from(self.eval(expr)?.type_name());
                match into {
                    Some(var) => self.assign(var, name),
                    None => {
                        self.emit(&name.to_string());
                        Ok(())
                    }
                }
            }
            Wend => self.r#wend(),
            While(cond) => self.r#while(cond),
            AppendFile(path, text) => {
                let path = self.eval_string(path)?;
                let text = self.eval_string(text)?;
                files::write_file(&path, &format!("\n{}", text), true)
            }
            WriteFile(path, text) => {
                let path = self.eval_string(path)?;
                let text = self.eval_string(text)?;
                files::write_file(&path, &text, false)
            }
            WriteLine(number, text) => {
                let number = self.eval_integer(number)?;
                let text = self.eval_string(text)?;
                self.files.write_line(number, &text)
            }
        }
    }

    /// Leaves a construct by continuing after its closer.
    pub(super) fn skip_to_end(&mut self) -> Result<()> {
        match self.link().end {
            Some(end) => {
                self.goto_pc(end + 1);
                Ok(())
            }
            None => Err(error!(InternalError; "UNLINKED BLOCK")),
        }
    }

    fn r#assert(&mut self, cond: &Expression, message: &Option<Expression>) -> Result<()> {
        if self.eval(cond)?.is_truthy() {
            return Ok(());
        }
        match message {
            Some(message) => {
                let message = self.eval_string(message)?;
                Err(error!(AssertionFailed; message))
            }
            None => Err(error!(AssertionFailed)),
        }
    }

    fn call_sub(&mut self, ident: &Ident, args: &[Expression]) -> Result<()> {
        let name = ident.name();
        let procedure = match self.program.sub(name) {
            Some(p) => p.clone(),
            None => match self.program.procedure(name) {
                Some(p) => p.clone(),
                None => return Err(error!(UndefinedProcedure; name.to_string())),
            },
        };
        let args = self.eval_list(args)?;
        self.enter(&procedure, args)
    }

    fn r#close(&mut self, number: &Option<Expression>) -> Result<()> {
        match number {
            Some(number) => {
                let number = self.eval_integer(number)?;
                self.files.close(number)
            }
            None => {
                self.files.clear();
                Ok(())
            }
        }
    }

    fn r#step_by(&mut self, var: &Variable, by: &Option<Expression>, down: bool) -> Result<()> {
        let by = match by {
            Some(expr) => self.eval(expr)?,
            None => Val::Integer(1),
        };
        let current = self.read_variable(var)?;
        let next = if down {
            Operation::subtract(current, by)?
        } else {
            Operation::sum(current, by)?
        };
        self.assign(var, next)
    }

    fn r#dim(&mut self, arrays: &[(Ident, Vec<Expression>)]) -> Result<()> {
        for (ident, bounds) in arrays {
            let mut sizes = Vec::with_capacity(bounds.len());
            for bound in bounds {
                sizes.push(self.eval_integer(bound)?);
            }
            self.var.dimension_array(ident, sizes)?;
        }
        Ok(())
    }

    fn r#dict(&mut self, ident: &Ident, pairs: &[(Expression, Expression)]) -> Result<()> {
        let mut dict = Dict::new();
        for (key, val) in pairs {
            let key = self.eval_string(key)?;
            let val = self.eval(val)?;
            dict.insert(&key, val);
        }
        self.var.store(ident, Val::Dict(dict))
    }

    fn r#set(&mut self, ident: &Ident, key: &Expression, expr: &Expression) -> Result<()> {
        let key = self.eval(key)?;
        let val = self.eval(expr)?;
        let mut container = match self.var.get(ident.name()) {
            Some(existing) => existing.clone(),
            None => Val::Dict(Dict::new()),
        };
        set_index(&mut container, &key, val)?;
        self.var.store(ident, container)
    }

    /// A missing key reads as "".
    fn r#get(&mut self, ident: &Ident, key: &Expression, var: &Variable) -> Result<()> {
        let key = self.eval(key)?;
        let val = match self.var.fetch(ident) {
            Val::Dict(dict) => dict
                .get(&key.to_string())
                .cloned()
                .unwrap_or_else(|| Val::from("")),
            other => index(&other, &key)?,
        };
        self.assign(var, val)
    }

    fn r#delete(&mut self, ident: &Ident, key: &Expression) -> Result<()> {
        let key = self.eval(key)?;
        match self.var.fetch(ident) {
            Val::Dict(mut dict) => {
                dict.remove(&key.to_string());
                self.var.store(ident, Val::Dict(dict))
            }
            other => Err(error!(NotADict; other.type_name())),
        }
    }

    fn r#push(&mut self, ident: &Ident, items: &[Expression], front: bool) -> Result<()> {
        let items = self.eval_list(items)?;
        let mut list = self.list_of(ident)?;
        if front {
            list.splice(0..0, items);
        } else {
            list.extend(items);
        }
        self.var.store(ident, Val::List(list))
    }

    /// POP and SHIFT of an empty list leave the target alone.
    fn r#take(&mut self, ident: &Ident, into: &Option<Variable>, front: bool) -> Result<()> {
        let mut list = self.list_of(ident)?;
        if list.is_empty() {
            return Ok(());
        }
        let val = if front { list.remove(0) } else { list.remove(list.len() - 1) };
        self.var.store(ident, Val::List(list))?;
        match into {
            Some(var) => self.assign(var, val),
            None => Ok(()),
        }
    }

    fn r#splice(
        &mut self,
        ident: &Ident,
        start: &Expression,
        count: &Expression,
        inserts: &[Expression],
    ) -> Result<()> {
        let start = self.eval_integer(start)?;
        let count = self.eval_integer(count)?;
        let inserts = self.eval_list(inserts)?;
        let mut list = self.list_of(ident)?;
        let start = (start.max(0) as usize).min(list.len());
        let end = start + (count.max(0) as usize).min(list.len() - start);
        list.splice(start..end, inserts);
        self.var.store(ident, Val::List(list))
    }

    /// Also sets `NAME_LENGTH`.
    fn r#split(&mut self, source: &Expression, delimiter: &Expression, ident: &Ident) -> Result<()> {
        let source = self.eval_string(source)?;
        let delimiter = self.eval_string(delimiter)?;
        let parts: Vec<Val> = if delimiter.is_empty() {
            source.chars().map(|c| Val::from(c.to_string())).collect()
        } else {
            source.split(delimiter.as_str()).map(Val::from).collect()
        };
        let length = format!("{}_LENGTH", ident.name());
        self.var.store_name(&length, Val::Integer(parts.len() as i64));
        self.var.store(ident, Val::List(parts))
    }

    fn r#join(&mut self, ident: &Ident, delimiter: &Expression, var: &Variable) -> Result<()> {
        let delimiter = self.eval_string(delimiter)?;
        let list = self.list_of(ident)?;
        let joined = list
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(&delimiter);
        self.assign(var, Val::from(joined))
    }

    fn r#if_block(&mut self, cond: &Expression) -> Result<()> {
        if self.eval(cond)?.is_truthy() {
            return Ok(());
        }
        let block = self.block.clone();
        let mut at = self.link().alt;
        while let Some(pc) = at {
            match block.instrs[pc].command.as_ref().ok().and_then(Command::statement) {
                Some(Statement::ElseIf(cond)) => {
                    if self.eval(cond)?.is_truthy() {
                        self.goto_pc(pc + 1);
                        return Ok(());
                    }
                    at = block.link(pc).alt;
                }
                _ => {
                    self.goto_pc(pc + 1);
                    return Ok(());
                }
            }
        }
        Err(error!(IfWithoutEndIf))
    }

    fn r#select(&mut self, expr: &Expression) -> Result<()> {
        let subject = self.eval(expr)?;
        let block = self.block.clone();
        let mut at = self.link().alt;
        while let Some(pc) = at {
            match block.instrs[pc].command.as_ref().ok().and_then(Command::statement) {
                Some(Statement::Case(tests)) => {
                    for test in tests {
                        if self.case_matches(&subject, test)? {
                            self.goto_pc(pc + 1);
                            return Ok(());
                        }
                    }
                    at = block.link(pc).alt;
                }
                _ => {
                    self.goto_pc(pc + 1);
                    return Ok(());
                }
            }
        }
        Err(error!(SelectWithoutEndSelect))
    }

    fn case_matches(&mut self, subject: &Val, test: &CaseTest) -> Result<bool> {
        match test {
            CaseTest::Value(expr) => {
                let val = self.eval(expr)?;
                Ok(Operation::compare(subject, &val) == Some(Ordering::Equal))
            }
            CaseTest::Range(low, high) => {
                let low = self.eval(low)?;
                let high = self.eval(high)?;
                let above = Operation::compare(subject, &low).map_or(false, |o| o != Ordering::Less);
                let below =
                    Operation::compare(subject, &high).map_or(false, |o| o != Ordering::Greater);
                Ok(above && below)
            }
            CaseTest::Is(op, expr) => {
                let val = self.eval(expr)?;
                Ok(Operation::binary(*op, subject.clone(), val)?.is_truthy())
            }
        }
    }

    fn r#for(
        &mut self,
        var: &Ident,
        from: &Expression,
        to: &Expression,
        step: &Option<Expression>,
    ) -> Result<()> {
        let from = self.eval(from)?;
        let limit = self.eval(to)?;
        let step = match step {
            Some(expr) => self.eval(expr)?,
            None => Val::Integer(1),
        };
        if f64::try_from(&step)? == 0.0 {
            return Err(error!(StepIsZero));
        }
        self.var.store(var, from.clone())?;
        if in_range(&from, &limit, &step)? {
            self.push_loop(LoopKind::For {
                var: var.clone(),
                limit,
                step,
            })
        } else {
            self.skip_to_end()
        }
    }

    fn r#foreach(
        &mut self,
        first: &Ident,
        second: &Option<Ident>,
        collection: &Expression,
    ) -> Result<()> {
        let pairs = second.is_some();
        let items: Vec<(Val, Val)> = match self.eval(collection)? {
            Val::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    if pairs {
                        (Val::Integer(i as i64), v)
                    } else {
                        (v, Val::Integer(0))
                    }
                })
                .collect(),
            Val::Dict(dict) => dict
                .iter()
                .map(|(k, v)| (Val::String(k.clone()), v.clone()))
                .collect(),
            Val::String(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if pairs {
                        (Val::Integer(i as i64), Val::from(c.to_string()))
                    } else {
                        (Val::from(c.to_string()), Val::Integer(0))
                    }
                })
                .collect(),
            other => return Err(error!(NotAList; other.type_name())),
        };
        if items.is_empty() {
            return self.skip_to_end();
        }
        self.bind_each(first, second, &items[0])?;
        self.push_loop(LoopKind::ForEach {
            first: first.clone(),
            second: second.clone(),
            items,
            index: 0,
        })
    }

    fn bind_each(&mut self, first: &Ident, second: &Option<Ident>, item: &(Val, Val)) -> Result<()> {
        self.var.store(first, item.0.clone())?;
        if let Some(second) = second {
            self.var.store(second, item.1.clone())?;
        }
        Ok(())
    }

    fn r#next(&mut self, ident: &Option<Ident>) -> Result<()> {
        let found = self.find_loop(|kind| match kind {
            LoopKind::For { var, .. } | LoopKind::ForEach { first: var, .. } => match ident {
                Some(ident) if ident != var => Seek::Skip,
                _ => Seek::Found,
            },
            LoopKind::While | LoopKind::Do => Seek::Stop,
        });
        let i = match found {
            Some(i) => i,
            None => return Err(error!(NextWithoutFor)),
        };
        self.loops.truncate(i + 1);
        let (start, advance) = match self.loops.get_mut(i) {
            Some(entry) => {
                let advance = match &mut entry.kind {
                    LoopKind::For { var, limit, step } => {
                        Advance::Count(var.clone(), limit.clone(), step.clone())
                    }
                    LoopKind::ForEach {
                        first,
                        second,
                        items,
                        index,
                    } => {
                        *index += 1;
                        Advance::Each(first.clone(), second.clone(), items.get(*index).cloned())
                    }
                    LoopKind::While | LoopKind::Do => return Err(error!(NextWithoutFor)),
                };
                (entry.start, advance)
            }
            None => return Err(error!(NextWithoutFor)),
        };
        match advance {
            Advance::Count(var, limit, step) => {
                let next = Operation::sum(self.var.fetch(&var), step.clone())?;
                if in_range(&next, &limit, &step)? {
                    self.var.store(&var, next)?;
                    self.goto_pc(start + 1);
                } else {
                    self.loops.truncate(i);
                }
            }
            Advance::Each(first, second, Some(item)) => {
                self.bind_each(&first, &second, &item)?;
                self.goto_pc(start + 1);
            }
            Advance::Each(_, _, None) => self.loops.truncate(i),
        }
        Ok(())
    }

    fn r#while(&mut self, cond: &Expression) -> Result<()> {
        if self.eval(cond)?.is_truthy() {
            self.push_loop(LoopKind::While)
        } else {
            self.skip_to_end()
        }
    }

    fn r#wend(&mut self) -> Result<()> {
        let start = match self.link().alt {
            Some(start) => start,
            None => return Err(error!(WendWithoutWhile)),
        };
        if let Some(i) = self.find_loop(|kind| match kind {
            LoopKind::While => Seek::Found,
            _ => Seek::Stop,
        }) {
            self.loops.truncate(i);
        }
        self.goto_pc(start);
        Ok(())
    }

    fn r#do(&mut self, condition: &Option<Condition>) -> Result<()> {
        let enter = match condition {
            Some(Condition::While(cond)) => self.eval(cond)?.is_truthy(),
            Some(Condition::Until(cond)) => !self.eval(cond)?.is_truthy(),
            None => true,
        };
        if enter {
            self.push_loop(LoopKind::Do)
        } else {
            self.skip_to_end()
        }
    }

    fn r#loop(&mut self, condition: &Option<Condition>) -> Result<()> {
        let start = match self.link().alt {
            Some(start) => start,
            None => return Err(error!(LoopWithoutDo)),
        };
        let again = match condition {
            Some(Condition::While(cond)) => self.eval(cond)?.is_truthy(),
            Some(Condition::Until(cond)) => !self.eval(cond)?.is_truthy(),
            None => true,
        };
        if let Some(i) = self.find_loop(|kind| match kind {
            LoopKind::Do => Seek::Found,
            _ => Seek::Stop,
        }) {
            self.loops.truncate(i);
        }
        if again {
            self.goto_pc(start);
        }
        Ok(())
    }

    fn r#exit(&mut self, kind: ExitKind) -> Result<()> {
        let found = match kind {
            ExitKind::Sub | ExitKind::Function => return self.exit_call(),
            ExitKind::For => self.find_loop(|k| match k {
                LoopKind::For { .. } | LoopKind::ForEach { .. } => Seek::Found,
                _ => Seek::Skip,
            }),
            ExitKind::While => self.find_loop(|k| match k {
                LoopKind::While => Seek::Found,
                _ => Seek::Skip,
            }),
            ExitKind::Do => self.find_loop(|k| match k {
                LoopKind::Do => Seek::Found,
                _ => Seek::Skip,
            }),
        };
        match found {
            Some(i) => self.leave_loop(i),
            None => Err(error!(ExitOutsideLoop)),
        }
    }

    fn r#break(&mut self) -> Result<()> {
        match self.find_loop(|_| Seek::Found) {
            Some(i) => self.leave_loop(i),
            None => Err(error!(ExitOutsideLoop)),
        }
    }

    fn leave_loop(&mut self, i: usize) -> Result<()> {
        let start = match self.loops.get(i) {
            Some(entry) => entry.start,
            None => return Err(error!(ExitOutsideLoop)),
        };
        self.loops.truncate(i);
        match self.block.link(start).end {
            Some(end) => {
                self.goto_pc(end + 1);
                Ok(())
            }
            None => Err(error!(ExitOutsideLoop)),
        }
    }

    fn r#on(&mut self, expr: &Expression, targets: &[Target], gosub: bool) -> Result<()> {
        let n = self.eval_integer(expr)?;
        if n < 1 || n as usize > targets.len() {
            return Ok(());
        }
        let pc = self.program.resolve(&targets[n as usize - 1])?;
        if gosub {
            self.gosub(pc)
        } else {
            self.jump(pc)
        }
    }

    /// One request per statement; several variables split the reply on
    /// commas.
    fn r#input(&mut self, prompt: &Option<Expression>, vars: &[Variable]) -> Result<()> {
        let prompt = match prompt {
            Some(expr) => self.eval_string(expr)?,
            None => "? ".to_string(),
        };
        let reply = self.request_input(&prompt)?;
        if vars.len() == 1 {
            return self.store_input(&vars[0], &reply);
        }
        let mut parts = reply.split(',');
        for var in vars {
            let part = parts.next().unwrap_or("").trim().to_string();
            self.store_input(var, &part)?;
        }
        Ok(())
    }

    pub(super) fn store_input(&mut self, var: &Variable, text: &str) -> Result<()> {
        let val = if var.ident().is_string() {
            Val::from(text)
        } else {
            Val::from_input(text)
        };
        self.assign(var, val)
    }

    fn r#read(&mut self, vars: &[Variable]) -> Result<()> {
        for var in vars {
            let expr = match self.program.data().get(self.data_cursor) {
                Some(expr) => expr.clone(),
                None => return Err(error!(OutOfData)),
            };
            self.data_cursor += 1;
            let val = self.eval(&expr)?;
            let val = match val {
                Val::String(s) if !var.ident().is_string() => match Val::from(&*s).as_number() {
                    Some(n) => n,
                    None => return Err(error!(TypeMismatch; format!("READ {}", s))),
                },
                v => v,
            };
            self.assign(var, val)?;
        }
        Ok(())
    }

    /// A file number reads what is left of an open file; a path reads
    /// the whole file, or "" when it does not exist.
    fn r#read_file(&mut self, source: &Expression, var: &Variable) -> Result<()> {
        let text = match self.eval(source)? {
            Val::Integer(number) => self.files.read_rest(number)?,
            other => files::read_file(&other.to_string()).unwrap_or_default(),
        };
        self.assign(var, Val::from(text))
    }

    /// Reading past the end stores "" and sets EOF.
    fn r#read_line(&mut self, number: &Expression, var: &Variable) -> Result<()> {
        let number = self.eval_integer(number)?;
        let line = self.files.read_line(number)?;
        self.var.store_name("EOF", Val::from(line.is_none()));
        self.store_input(var, &line.unwrap_or_default())
    }

    fn print_items(&mut self, items: &[PrintItem]) -> Result<()> {
        let mut newline = true;
        for item in items {
            newline = true;
            match item {
                PrintItem::Expr(Expression::Call(ident, args))
                    if ident.is("TAB") && args.len() == 1 =>
                {
                    let column = self.eval_integer(&args[0])?.max(0).min(255) as usize;
                    let at = self.column();
                    if column > at {
                        self.print(&" ".repeat(column - at));
                    }
                }
                PrintItem::Expr(expr) => {
                    let val = self.eval(expr)?;
                    self.print(&val.to_string());
                }
                PrintItem::Comma => {
                    newline = false;
                    let pad = ZONE - self.column() % ZONE;
                    self.print(&" ".repeat(pad));
                }
                PrintItem::Semicolon => newline = false,
            }
        }
        if newline {
            self.emit("");
        }
        Ok(())
    }

    fn r#printf(&mut self, args: &[Expression]) -> Result<()> {
        let mut args = self.eval_list(args)?;
        if args.is_empty() {
            self.emit("");
            return Ok(());
        }
        let format = args.remove(0).to_string();
        let text = self.format(&format, &args)?;
        for line in text.split('\n') {
            self.emit(line);
        }
        Ok(())
    }

    /// `{0}` and `{NAME}` placeholders, `%d %s %f %.Nf` conversions and
    /// `\n` `\t` escapes.
    fn format(&self, format: &str, args: &[Val]) -> Result<String> {
        let chars: Vec<char> = format.chars().collect();
        let mut out = String::new();
        let mut next_arg = args.iter();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '\\' if i + 1 < chars.len() && (chars[i + 1] == 'n' || chars[i + 1] == 't') => {
                    out.push(if chars[i + 1] == 'n' { '\n' } else { '\t' });
                    i += 2;
                }
                '{' => match chars[i..].iter().position(|c| *c == '}') {
                    Some(len) => {
                        let inner: String = chars[i + 1..i + len].iter().collect();
                        match self.placeholder(&inner, args) {
                            Some(val) => out.push_str(&val),
                            None => out.extend(&chars[i..=i + len]),
                        }
                        i += len + 1;
                    }
                    None => {
                        out.push('{');
                        i += 1;
                    }
                },
                '%' if i + 1 < chars.len() => {
                    let spec_len = chars[i + 1..]
                        .iter()
                        .position(|c| c.is_ascii_alphabetic() || *c == '%')
                        .map(|p| p + 1);
                    let spec: String = match spec_len {
                        Some(len) => chars[i + 1..=i + len].iter().collect(),
                        None => String::new(),
                    };
                    match conversion(&spec, &mut next_arg)? {
                        Some(text) => {
                            out.push_str(&text);
                            i += spec.chars().count() + 1;
                        }
                        None => {
                            out.push('%');
                            i += 1;
                        }
                    }
                }
                c => {
                    out.push(c);
                    i += 1;
                }
            }
        }
        Ok(out)
    }

    fn placeholder(&self, inner: &str, args: &[Val]) -> Option<String> {
        if let Ok(n) = inner.trim().parse::<usize>() {
            return args.get(n).map(Val::to_string);
        }
        let ident = Ident::new(inner.trim());
        self.var.get(ident.name()).map(Val::to_string)
    }
}

enum Advance {
    Count(Ident, Val, Val),
    Each(Ident, Option<Ident>, Option<(Val, Val)>),
}

fn conversion<'a, I>(spec: &str, args: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = &'a Val>,
{
    let kind = match spec.chars().last() {
        Some(c) => c,
        None => return Ok(None),
    };
    if kind == '%' && spec.len() == 1 {
        return Ok(Some("%".to_string()));
    }
    let precision = match spec.find('.') {
        Some(dot) => spec[dot + 1..spec.len() - 1].parse::<usize>().ok().map(|p| p.min(64)),
        None => None,
    };
    let text = match kind {
        'd' | 'i' => match args.next() {
            Some(val) => format!("{}", i64::try_from(val)?),
            None => return Ok(None),
        },
        'f' => match args.next() {
            Some(val) => format!("{:.*}", precision.unwrap_or(6), f64::try_from(val)?),
            None => return Ok(None),
        },
        's' => match args.next() {
            Some(val) => val.to_string(),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(text))
}

fn in_range(val: &Val, limit: &Val, step: &Val) -> Result<bool> {
    let ascending = f64::try_from(step)? > 0.0;
    let order = match Operation::compare(val, limit) {
        Some(order) => order,
        None => return Err(error!(TypeMismatch)),
    };
    Ok(if ascending {
        order != Ordering::Greater
    } else {
        order != Ordering::Less
    })
}
