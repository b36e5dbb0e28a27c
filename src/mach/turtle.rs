use crate::lang::ast::Edge;

/// Drawing instructions for the host. Coordinates are turtle space:
/// origin at the canvas centre, y grows upward.
#[derive(Debug, Clone, PartialEq)]
pub enum TurtleEvent {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: String,
        width: f64,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        color: String,
        width: f64,
    },
    /// `start` is a turtle heading; `extent` runs clockwise.
    Arc {
        center: (f64, f64),
        radius: f64,
        start: f64,
        extent: f64,
        color: String,
        width: f64,
    },
    Dot {
        at: (f64, f64),
        radius: f64,
        color: String,
    },
    /// `corner` is the top left; the rectangle extends right and down.
    Rect {
        corner: (f64, f64),
        width: f64,
        height: f64,
        color: String,
        width_px: f64,
    },
    Label {
        at: (f64, f64),
        text: String,
        size: u32,
        color: String,
    },
    Pose {
        x: f64,
        y: f64,
        heading: f64,
        visible: bool,
    },
    Background(String),
    Clear,
}

const PALETTE: [&str; 16] = [
    "black", "blue", "green", "cyan", "red", "magenta", "yellow", "white", "brown", "tan",
    "forest", "aqua", "salmon", "violet", "orange", "gray",
];

pub fn palette(index: i64) -> Option<&'static str> {
    if (0..16).contains(&index) {
        Some(PALETTE[index as usize])
    } else {
        None
    }
}

/// ## Turtle pose and pen
///
/// Heading 0 points up and grows clockwise.

#[derive(Debug, Clone, PartialEq)]
pub struct Turtle {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub pen_down: bool,
    pub color: String,
    pub pen_size: f64,
    pub fill_color: String,
    pub background: String,
    pub visible: bool,
    pub edge: Edge,
    canvas_width: f64,
    canvas_height: f64,
}

impl Turtle {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Turtle {
        Turtle {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            pen_down: true,
            color: "black".into(),
            pen_size: 1.0,
            fill_color: "black".into(),
            background: "white".into(),
            visible: true,
            edge: Edge::Window,
            canvas_width,
            canvas_height,
        }
    }

    pub fn reset(&mut self) {
        *self = Turtle::new(self.canvas_width, self.canvas_height);
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn pose(&self) -> TurtleEvent {
        TurtleEvent::Pose {
            x: self.x,
            y: self.y,
            heading: self.heading,
            visible: self.visible,
        }
    }

    fn stroke(&self, from: (f64, f64), to: (f64, f64)) -> Option<TurtleEvent> {
        if self.pen_down {
            Some(TurtleEvent::Line {
                from,
                to,
                color: self.color.clone(),
                width: self.pen_size,
            })
        } else {
            None
        }
    }

    /// Moves along the heading. Negative distances move backward.
    pub fn forward(&mut self, distance: f64) -> Vec<TurtleEvent> {
        let rad = (90.0 - self.heading).to_radians();
        let to = (
            self.x + distance * rad.cos(),
            self.y + distance * rad.sin(),
        );
        self.move_to(to)
    }

    /// Moves to a point, drawing when the pen is down.
    pub fn move_to(&mut self, to: (f64, f64)) -> Vec<TurtleEvent> {
        let from = self.position();
        let (half_w, half_h) = (self.canvas_width / 2.0, self.canvas_height / 2.0);
        let mut events = vec![];
        match self.edge {
            Edge::Window => {
                events.extend(self.stroke(from, to));
                self.x = to.0;
                self.y = to.1;
            }
            Edge::Fence => {
                let to = (to.0.max(-half_w).min(half_w), to.1.max(-half_h).min(half_h));
                events.extend(self.stroke(from, to));
                self.x = to.0;
                self.y = to.1;
            }
            Edge::Wrap => {
                events.extend(self.stroke(from, to));
                self.x = wrap(to.0, half_w);
                self.y = wrap(to.1, half_h);
            }
        }
        events.push(self.pose());
        events
    }

    pub fn turn(&mut self, degrees: f64) -> TurtleEvent {
        self.set_heading(self.heading + degrees)
    }

    pub fn set_heading(&mut self, degrees: f64) -> TurtleEvent {
        self.heading = degrees.rem_euclid(360.0);
        self.pose()
    }

    pub fn home(&mut self) -> TurtleEvent {
        self.x = 0.0;
        self.y = 0.0;
        self.heading = 0.0;
        self.pose()
    }

    pub fn clear(&mut self) -> Vec<TurtleEvent> {
        vec![TurtleEvent::Clear, self.home()]
    }

    pub fn towards(&self, x: f64, y: f64) -> f64 {
        (x - self.x).atan2(y - self.y).to_degrees().rem_euclid(360.0)
    }

    pub fn circle(&self, radius: f64) -> TurtleEvent {
        TurtleEvent::Circle {
            center: self.position(),
            radius: radius.abs(),
            color: self.color.clone(),
            width: self.pen_size,
        }
    }

    pub fn arc(&self, angle: f64, radius: f64) -> TurtleEvent {
        TurtleEvent::Arc {
            center: self.position(),
            radius: radius.abs(),
            start: self.heading,
            extent: angle,
            color: self.color.clone(),
            width: self.pen_size,
        }
    }

    pub fn dot(&self, size: f64) -> TurtleEvent {
        TurtleEvent::Dot {
            at: self.position(),
            radius: (size / 2.0).max(1.0),
            color: self.color.clone(),
        }
    }

    pub fn rect(&self, width: f64, height: f64) -> TurtleEvent {
        TurtleEvent::Rect {
            corner: self.position(),
            width,
            height,
            color: self.color.clone(),
            width_px: self.pen_size,
        }
    }

    pub fn label(&self, text: String, size: u32) -> TurtleEvent {
        TurtleEvent::Label {
            at: self.position(),
            text,
            size,
            color: self.color.clone(),
        }
    }
}

fn wrap(v: f64, half: f64) -> f64 {
    if half <= 0.0 {
        return v;
    }
    (v + half).rem_euclid(2.0 * half) - half
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_heading_zero_is_up() {
        let mut t = Turtle::new(600.0, 400.0);
        let events = t.forward(100.0);
        assert!(close(t.x, 0.0) && close(t.y, 100.0));
        assert!(matches!(events[0], TurtleEvent::Line { .. }));
        t.turn(90.0);
        t.forward(50.0);
        assert!(close(t.x, 50.0) && close(t.y, 100.0));
        t.turn(-180.0);
        assert!(close(t.heading, 270.0));
    }

    #[test]
    fn test_pen_up_moves_without_drawing() {
        let mut t = Turtle::new(600.0, 400.0);
        t.pen_down = false;
        let events = t.forward(10.0);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TurtleEvent::Pose { .. }));
    }

    #[test]
    fn test_edges() {
        let mut t = Turtle::new(600.0, 400.0);
        t.edge = Edge::Fence;
        t.forward(1000.0);
        assert!(close(t.y, 200.0));
        t.home();
        t.edge = Edge::Wrap;
        t.forward(250.0);
        assert!(close(t.y, -150.0));
        t.home();
        t.edge = Edge::Window;
        t.forward(250.0);
        assert!(close(t.y, 250.0));
    }

    #[test]
    fn test_towards() {
        let t = Turtle::new(600.0, 400.0);
        assert!(close(t.towards(10.0, 0.0), 90.0));
        assert!(close(t.towards(0.0, -10.0), 180.0));
        assert!(close(t.towards(-10.0, 0.0), 270.0));
    }

    #[test]
    fn test_palette() {
        assert_eq!(palette(4), Some("red"));
        assert_eq!(palette(16), None);
    }
}
