#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// One drawing primitive. Classes map onto the report stylesheet.
#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    GroupStart {
        class: String,
        offset: Option<Point>,
    },
    GroupEnd,
    Line {
        from: Point,
        to: Point,
        class: String,
    },
    Path {
        points: Vec<Point>,
        class: String,
        stroke: Option<String>,
        title: Option<String>,
    },
    Circle {
        center: Point,
        radius: f64,
        class: String,
        tooltip: Vec<(&'static str, String)>,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        class: String,
        id: Option<String>,
        hidden: bool,
    },
    Text {
        at: Point,
        text: String,
        class: String,
        anchor: Anchor,
        rotated: bool,
    },
}

impl Mark {
    pub fn class(&self) -> Option<&str> {
        match self {
            Mark::GroupStart { class, .. }
            | Mark::Line { class, .. }
            | Mark::Path { class, .. }
            | Mark::Circle { class, .. }
            | Mark::Rect { class, .. }
            | Mark::Text { class, .. } => Some(class),
            Mark::GroupEnd => None,
        }
    }
}

/// Anything the chart can be drawn onto.
pub trait Surface {
    fn draw(&mut self, mark: Mark);
}

/// Records marks in order; used to inspect a render without producing SVG.
impl Surface for Vec<Mark> {
    fn draw(&mut self, mark: Mark) {
        self.push(mark);
    }
}
