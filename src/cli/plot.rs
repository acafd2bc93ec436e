use std::io;
use std::path::Path as FilePath;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use svg::{
    node::element::{path::Data, Line, Path},
    Document,
};

use billfold::{Summary, Timestamp, Window};

/// Step plot of the totals of a series of windows
pub struct Plotter<'d> {
    data: &'d [Summary],
}

impl<'d> Plotter<'d> {
    pub fn from(data: &'d [Summary]) -> Self {
        Self { data }
    }

    /// Write the plot to `file`, nothing is written for an empty series
    pub fn save(&self, file: &FilePath) -> io::Result<bool> {
        match self.document() {
            Some(doc) => svg::save(file, &doc).map(|()| true),
            None => Ok(false),
        }
    }

    fn document(&self) -> Option<Document> {
        StepDrawer {
            points: self
                .data
                .iter()
                .map(|sum| (sum.window().to_range(), sum.total().to_scalar()))
                .collect(),
        }
        .render()
    }
}

pub trait Scalar {
    fn to_scalar(&self) -> f64;
}

pub trait ScalarRange {
    fn to_range(&self) -> (f64, f64);
}

impl Scalar for Decimal {
    fn to_scalar(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

impl Scalar for Timestamp {
    fn to_scalar(&self) -> f64 {
        self.and_utc().timestamp() as f64
    }
}

impl ScalarRange for Window {
    fn to_range(&self) -> (f64, f64) {
        (self.start.to_scalar(), self.end.to_scalar())
    }
}

/// Horizontal segments `((start, end), height)`, sorted and adjacent
#[derive(Debug)]
struct StepDrawer {
    points: Vec<((f64, f64), f64)>,
}

const FHEIGHT: f64 = 700.0;
const FWIDTH: f64 = 1000.0;
const STROKE_WIDTH: f64 = 2.0;
const MARGIN: f64 = 20.0;
const FILL: &str = "steelblue";

impl StepDrawer {
    fn render(&self) -> Option<Document> {
        let ((xmin, _), _) = *self.points.first()?;
        let ((_, xmax), _) = *self.points.last()?;
        let (ymin, ymax) = self
            .points
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
        let width = (xmax - xmin).max(1.0);
        let height = (ymax - ymin).max(1.0);
        let resize_x = |x: f64| (x - xmin) / width * FWIDTH;
        let resize_y = |y: f64| (height - (y - ymin)) / height * FHEIGHT;
        let data = self
            .points
            .iter()
            .fold(
                Data::new().move_to((resize_x(xmin), resize_y(0.0))),
                |data, ((start, end), y)| {
                    data.line_to((resize_x(*start), resize_y(*y)))
                        .line_to((resize_x(*end), resize_y(*y)))
                },
            )
            .line_to((resize_x(xmax), resize_y(0.0)))
            .close();
        let steps = Path::new()
            .set("fill", FILL)
            .set("stroke", FILL)
            .set("d", data);
        let yaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", 0.0)
            .set("y1", 0.0)
            .set("y2", FHEIGHT)
            .set("stroke", "black")
            .set("stroke-width", STROKE_WIDTH);
        let xaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", FWIDTH)
            .set("y1", resize_y(0.0))
            .set("y2", resize_y(0.0))
            .set("stroke", "black")
            .set("stroke-width", STROKE_WIDTH);
        Some(
            Document::new()
                .add(steps)
                .add(yaxis)
                .add(xaxis)
                .set(
                    "viewBox",
                    (-MARGIN, -MARGIN, FWIDTH + 2.0 * MARGIN, FHEIGHT + 2.0 * MARGIN),
                ),
        )
    }
}
