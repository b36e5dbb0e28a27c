use super::runtime::{tidy, FrameKind};
use super::{palette, Runtime, TurtleEvent, Val};
use crate::error;
use crate::lang::ast::*;
use crate::lang::Error;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

impl Runtime {
    pub(super) fn logo(&mut self, logo: &Logo) -> Result<()> {
        use Logo::*;
        match logo {
            Forward(distance) => {
                let distance = self.eval_number(distance)?;
                self.travel(distance);
                Ok(())
            }
            Back(distance) => {
                let distance = self.eval_number(distance)?;
                self.travel(-distance);
                Ok(())
            }
            Left(angle) => {
                let angle = self.eval_number(angle)?;
                let event = self.turtle.turn(-angle);
                self.draw(event);
                Ok(())
            }
            Right(angle) => {
                let angle = self.eval_number(angle)?;
                let event = self.turtle.turn(angle);
                self.draw(event);
                Ok(())
            }
            SetHeading(heading) => {
                let heading = self.eval_number(heading)?;
                let event = self.turtle.set_heading(heading);
                self.draw(event);
                Ok(())
            }
            SetX(x) => {
                let x = self.eval_number(x)?;
                self.move_to(x, self.turtle.y);
                Ok(())
            }
            SetY(y) => {
                let y = self.eval_number(y)?;
                self.move_to(self.turtle.x, y);
                Ok(())
            }
            SetXY(x, y) => {
                let x = self.eval_number(x)?;
                let y = self.eval_number(y)?;
                self.move_to(x, y);
                Ok(())
            }
            Towards(x, y) => {
                let x = self.eval_number(x)?;
                let y = self.eval_number(y)?;
                let heading = self.turtle.towards(x, y);
                let event = self.turtle.set_heading(heading);
                self.draw(event);
                Ok(())
            }
            Home => {
                let event = self.turtle.home();
                self.draw(event);
                Ok(())
            }
            ClearScreen => {
                for event in self.turtle.clear() {
                    self.draw(event);
                }
                Ok(())
            }
            PenUp => {
                self.turtle.pen_down = false;
                Ok(())
            }
            PenDown => {
                self.turtle.pen_down = true;
                Ok(())
            }
            HideTurtle | ShowTurtle => {
                self.turtle.visible = matches!(logo, ShowTurtle);
                let event = self.turtle.pose();
                self.draw(event);
                Ok(())
            }
            SetColor(args) => {
                self.turtle.color = self.colour(args)?;
                Ok(())
            }
            SetFillColor(args) => {
                self.turtle.fill_color = self.colour(args)?;
                Ok(())
            }
            SetBackground(args) => {
                let colour = self.colour(args)?;
                self.turtle.background = colour.clone();
                self.draw(TurtleEvent::Background(colour));
                Ok(())
            }
            SetPenSize(size) => {
                let size = self.eval_number(size)?;
                if !(size >= 0.0) {
                    return Err(error!(IllegalFunctionCall; "PEN SIZE"));
                }
                self.turtle.pen_size = size;
                Ok(())
            }
            Edge(edge) => {
                self.turtle.edge = *edge;
                Ok(())
            }
            Circle(radius) => {
                let radius = self.eval_number(radius)?;
                let event = self.turtle.circle(radius);
                self.draw(event);
                Ok(())
            }
            Arc(angle, radius) => {
                let angle = self.eval_number(angle)?;
                let radius = self.eval_or(radius, 50.0)?;
                let event = self.turtle.arc(angle, radius);
                self.draw(event);
                Ok(())
            }
            Dot(size) => {
                let size = self.eval_or(size, 3.0)?;
                let event = self.turtle.dot(size);
                self.draw(event);
                Ok(())
            }
            Rect(width, height) => {
                let width = self.eval_number(width)?;
                let height = self.eval_or(height, width)?;
                let event = self.turtle.rect(width, height);
                self.draw(event);
                Ok(())
            }
            Label(text, size) => {
                let text = self.eval_string(text)?;
                let size = self.eval_or(size, 12.0)?;
                let event = self.turtle.label(text, size.max(1.0).min(512.0) as u32);
                self.draw(event);
                Ok(())
            }
            Square(side) => {
                let side = self.eval_or(side, 50.0)?;
                self.outline(4, side, 90.0);
                Ok(())
            }
            Triangle(side) => {
                let side = self.eval_or(side, 50.0)?;
                self.outline(3, side, 120.0);
                Ok(())
            }
            Polygon(sides, side) => {
                let sides = self.eval_count(sides, 6)?;
                let side = self.eval_or(side, 50.0)?;
                self.outline(sides, side, 360.0 / sides as f64);
                Ok(())
            }
            Star(points, side) => {
                let points = self.eval_count(points, 5)?;
                let side = self.eval_or(side, 50.0)?;
                self.outline(points, side, 720.0 / points as f64);
                Ok(())
            }
            Fill => {
                self.emit("FILL: area fill is not drawn on a vector canvas");
                Ok(())
            }
            Trace(on) => {
                self.trace = *on;
                Ok(())
            }
            Query(query) => {
                let text = self.query(*query);
                self.emit(&text);
                Ok(())
            }
            Make(ident, value) => {
                let value = self.eval(value)?;
                self.var.store(ident, value)
            }
            Repeat(count, block) => {
                let count = self.eval_integer(count)?;
                if count <= 0 {
                    return Ok(());
                }
                self.var.store_name("REPCOUNT", Val::Integer(1));
                self.run_block(block.clone(), FrameKind::Repeat { count, done: 0 })
            }
            Run(block) => self.run_block(block.clone(), FrameKind::Run),
            Call(ident, args) => {
                let procedure = match self.program.procedure(ident.name()) {
                    Some(p) => p.clone(),
                    None => match self.program.sub(ident.name()) {
                        Some(p) => p.clone(),
                        None => return Err(error!(UndefinedProcedure; ident.to_string())),
                    },
                };
                let args = self.eval_list(args)?;
                self.enter(&procedure, args)
            }
            To(..) => self.skip_to_end(),
        }
    }

    fn eval_or(&mut self, expr: &Option<Expression>, default: f64) -> Result<f64> {
        match expr {
            Some(expr) => self.eval_number(expr),
            None => Ok(default),
        }
    }

    /// Vertex counts below three draw a triangle.
    fn eval_count(&mut self, expr: &Option<Expression>, default: i64) -> Result<u32> {
        let n = match expr {
            Some(expr) => self.eval_integer(expr)?,
            None => default,
        };
        if n > 360 {
            return Err(error!(IllegalFunctionCall; format!("{} SIDES", n)));
        }
        Ok(n.max(3) as u32)
    }

    fn travel(&mut self, distance: f64) {
        for event in self.turtle.forward(distance) {
            self.draw(event);
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        for event in self.turtle.move_to((x, y)) {
            self.draw(event);
        }
    }

    fn outline(&mut self, sides: u32, side: f64, turn: f64) {
        for _ in 0..sides {
            self.travel(side);
            let event = self.turtle.turn(turn);
            self.draw(event);
        }
    }

    fn query(&self, query: Query) -> String {
        let turtle = &self.turtle;
        match query {
            Query::Heading => format!("Heading: {}", tidy(turtle.heading)),
            Query::Pos => format!("Position: [{}, {}]", tidy(turtle.x), tidy(turtle.y)),
            Query::XCor => tidy(turtle.x),
            Query::YCor => tidy(turtle.y),
            Query::PenColor => format!("Pen color: {}", turtle.color),
            Query::PenSize => format!("Pen size: {}", tidy(turtle.pen_size)),
        }
    }

    /// A palette index, a colour name or `#rrggbb`, or an RGB triple.
    pub(super) fn colour(&mut self, args: &[Expression]) -> Result<String> {
        match args {
            [r, g, b] => {
                let mut channel = |e: &Expression| -> Result<i64> {
                    Ok(self.eval_integer(e)?.max(0).min(255))
                };
                let (r, g, b) = (channel(r)?, channel(g)?, channel(b)?);
                Ok(format!("#{:02x}{:02x}{:02x}", r, g, b))
            }
            [single] => match self.eval(single)? {
                Val::String(s) => Ok(s.to_lowercase()),
                other => {
                    let index = i64::try_from(&other)?;
                    match palette(index) {
                        Some(name) => Ok(name.to_string()),
                        None => Err(error!(IllegalFunctionCall; format!("COLOR {}", index))),
                    }
                }
            },
            _ => Err(error!(WrongArgumentCount; "EXPECTED COLOR")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Runtime, Status};
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn lines(events: &[TurtleEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TurtleEvent::Line { .. }))
            .count()
    }

    #[test]
    fn test_square_closes() {
        let mut rt = Runtime::default();
        let r = rt.execute("SQUARE 40");
        assert_eq!(lines(&r.events), 4);
        assert!(close(rt.turtle().x, 0.0) && close(rt.turtle().y, 0.0));
        assert!(close(rt.turtle().heading, 0.0));
    }

    #[test]
    fn test_shapes_count_segments() {
        let mut rt = Runtime::default();
        assert_eq!(lines(&rt.execute("POLYGON 6 30").events), 6);
        assert_eq!(lines(&rt.execute("STAR").events), 5);
        assert_eq!(lines(&rt.execute("TRIANGLE").events), 3);
    }

    #[test]
    fn test_pen_up_draws_nothing() {
        let mut rt = Runtime::default();
        let r = rt.execute("PENUP\nFORWARD 50\nPENDOWN\nFORWARD 10");
        assert_eq!(lines(&r.events), 1);
        assert!(close(rt.turtle().y, 60.0));
    }

    #[test]
    fn test_queries() {
        let mut rt = Runtime::default();
        let r = rt.execute("RIGHT 90\nFORWARD 10\nHEADING\nPOS\nXCOR\nSETPC 4\nPENCOLOR?");
        assert_eq!(
            r.output,
            vec!["Heading: 90", "Position: [10, 0]", "10", "Pen color: red"]
        );
    }

    #[test]
    fn test_colours() {
        let mut rt = Runtime::default();
        rt.execute("SETCOLOR 255, 128, 0\nSETFC Navy\nSETBG 1");
        assert_eq!(rt.turtle().color, "#ff8000");
        assert_eq!(rt.turtle().fill_color, "navy");
        assert_eq!(rt.turtle().background, "blue");
        let r = rt.execute("SETCOLOR 99");
        assert_eq!(r.errors.len(), 1);
    }

    #[test]
    fn test_repeat_and_repcount() {
        let mut rt = Runtime::default();
        let r = rt.execute("REPEAT 3 [PRINT REPCOUNT]\nREPEAT 0 [PRINT 9]");
        assert_eq!(r.output, vec!["1", "2", "3"]);
        assert_eq!(r.status, Status::Completed);
    }

    #[test]
    fn test_trace_and_mirrors() {
        let mut rt = Runtime::default();
        let r = rt.execute("TRACE\nFORWARD 5\nNOTRACE\nFORWARD 5");
        assert_eq!(r.output, vec!["TRACE: [0, 5] heading 0"]);
        assert_eq!(rt.variable("TURTLE_Y"), Some(Val::Float(10.0)));
    }

    #[test]
    fn test_make_and_fill() {
        let mut rt = Runtime::default();
        let r = rt.execute("MAKE \"size 7\nFILL\nPRINT SIZE");
        assert!(r.output[0].starts_with("FILL"));
        assert_eq!(r.output[1], "7");
    }
}
