//! A single tall sheet of vector marks, laid out top to bottom.
//!
//! Coordinates are millimetres with the origin at the top-left corner of the
//! sheet and `y` growing downwards. The sheet is as wide as an A4 page and as
//! tall as its content; [`crate::pdf`] slices it into pages.

use vistoria_core::report::A4_WIDTH_MM;

use crate::text::{text_width_mm, wrap, Font, MM_PER_PT};

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.1, 0.1, 0.1);
    pub const GREY: Rgb = Rgb(0.42, 0.45, 0.5);
    pub const LIGHT: Rgb = Rgb(0.9, 0.91, 0.93);
    pub const BLUE: Rgb = Rgb(0.23, 0.51, 0.96);
    pub const GREEN: Rgb = Rgb(0.09, 0.5, 0.24);
    pub const RED: Rgb = Rgb(0.8, 0.13, 0.13);
    pub const AMBER: Rgb = Rgb(0.85, 0.55, 0.05);

    /// The same hue mixed with white, for box backgrounds.
    pub fn tint(self, amount: f64) -> Rgb {
        let mix = |c: f64| c + (1.0 - c) * amount;
        Rgb(mix(self.0), mix(self.1), mix(self.2))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f64,
        /// Baseline position.
        y: f64,
        size: f64,
        font: Font,
        color: Rgb,
        text: String,
    },
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Rgb,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Rgb,
    },
}

/// One cell of a [`Sheet::stat_row`].
#[derive(Debug, Clone)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub color: Rgb,
}

const MARGIN_MM: f64 = 15.0;
const LINE_SPACING: f64 = 1.35;
const BODY_PT: f64 = 10.0;
const SMALL_PT: f64 = 8.5;

fn line_height(size_pt: f64) -> f64 {
    size_pt * MM_PER_PT * LINE_SPACING
}

#[derive(Debug, Clone)]
pub struct Sheet {
    width: f64,
    cursor: f64,
    marks: Vec<Mark>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    pub fn new() -> Self {
        Self {
            width: A4_WIDTH_MM,
            cursor: MARGIN_MM,
            marks: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Content height including the bottom margin; zero when nothing was drawn.
    pub fn height(&self) -> f64 {
        if self.marks.is_empty() {
            0.0
        } else {
            self.cursor + MARGIN_MM
        }
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    fn content_width(&self) -> f64 {
        self.width - 2.0 * MARGIN_MM
    }

    pub fn gap(&mut self, mm: f64) {
        self.cursor += mm;
    }

    fn push_text(&mut self, x: f64, baseline: f64, size: f64, font: Font, color: Rgb, text: &str) {
        self.marks.push(Mark::Text {
            x,
            y: baseline,
            size,
            font,
            color,
            text: text.to_string(),
        });
    }

    /// Wrapped text starting at `indent` mm from the left margin.
    fn lines(&mut self, text: &str, indent: f64, size: f64, font: Font, color: Rgb) {
        let x = MARGIN_MM + indent;
        let max_width = self.content_width() - indent;
        let step = line_height(size);
        for line in wrap(text, font, size, max_width) {
            self.cursor += step;
            let baseline = self.cursor - step * 0.25;
            self.push_text(x, baseline, size, font, color, &line);
        }
    }

    pub fn title(&mut self, text: &str) {
        self.lines(text, 0.0, 18.0, Font::Bold, Rgb::BLACK);
        self.gap(1.5);
    }

    pub fn subtitle(&mut self, text: &str) {
        self.lines(text, 0.0, BODY_PT, Font::Regular, Rgb::GREY);
    }

    /// Section heading followed by a thin rule.
    pub fn heading(&mut self, text: &str) {
        self.gap(5.0);
        self.lines(text, 0.0, 13.0, Font::Bold, Rgb::BLACK);
        self.gap(1.0);
        self.rule();
        self.gap(1.5);
    }

    pub fn paragraph(&mut self, text: &str) {
        self.lines(text, 0.0, BODY_PT, Font::Regular, Rgb::BLACK);
    }

    /// Grey small print, e.g. "Sem observações."
    pub fn note(&mut self, text: &str) {
        self.lines(text, 0.0, SMALL_PT, Font::Regular, Rgb::GREY);
    }

    /// `Label: value`, with the value wrapped in the space left of the label.
    pub fn field(&mut self, label: &str, value: &str) {
        let label = format!("{label}: ");
        let indent = text_width_mm(&label, Font::Bold, BODY_PT);
        let start = self.cursor;
        let step = line_height(BODY_PT);
        self.push_text(
            MARGIN_MM,
            start + step - step * 0.25,
            BODY_PT,
            Font::Bold,
            Rgb::BLACK,
            &label,
        );
        self.lines(value, indent, BODY_PT, Font::Regular, Rgb::BLACK);
        if self.cursor == start {
            self.cursor += step;
        }
    }

    pub fn rule(&mut self) {
        let y = self.cursor;
        self.marks.push(Mark::Rule {
            x1: MARGIN_MM,
            y1: y,
            x2: self.width - MARGIN_MM,
            y2: y,
            width: 0.3,
            color: Rgb::LIGHT,
        });
    }

    /// Equal-width boxes, each with a small label over a large value.
    pub fn stat_row(&mut self, stats: &[Stat]) {
        if stats.is_empty() {
            return;
        }
        const GUTTER: f64 = 4.0;
        const BOX_HEIGHT: f64 = 20.0;
        let count = stats.len() as f64;
        let box_width = (self.content_width() - GUTTER * (count - 1.0)) / count;
        let top = self.cursor + 2.0;

        for (i, stat) in stats.iter().enumerate() {
            let x = MARGIN_MM + i as f64 * (box_width + GUTTER);
            self.marks.push(Mark::Rect {
                x,
                y: top,
                w: box_width,
                h: BOX_HEIGHT,
                fill: stat.color.tint(0.88),
            });
            self.push_text(x + 3.0, top + 6.5, SMALL_PT, Font::Regular, stat.color, &stat.label);
            self.push_text(x + 3.0, top + 15.5, 18.0, Font::Bold, stat.color, &stat.value);
        }
        self.cursor = top + BOX_HEIGHT + 2.0;
    }

    /// An item line: bold name on the left, coloured status on the right,
    /// wrapped detail text underneath.
    pub fn item(&mut self, name: &str, status: &str, status_color: Rgb, detail: &str) {
        let status_width = text_width_mm(status, Font::Bold, BODY_PT);
        let right = self.width - MARGIN_MM;
        let top = self.cursor;
        let step = line_height(BODY_PT);

        self.push_text(
            right - status_width,
            top + step - step * 0.25,
            BODY_PT,
            Font::Bold,
            status_color,
            status,
        );
        let name_lines = wrap(name, Font::Bold, BODY_PT, self.content_width() - status_width - 4.0);
        for line in name_lines {
            self.cursor += step;
            let baseline = self.cursor - step * 0.25;
            self.push_text(MARGIN_MM, baseline, BODY_PT, Font::Bold, Rgb::BLACK, &line);
        }
        if self.cursor == top {
            self.cursor += step;
        }
        self.lines(detail, 0.0, SMALL_PT, Font::Regular, Rgb::GREY);
        self.gap(1.5);
        self.rule();
        self.gap(1.0);
    }

    /// Horizontal bar chart. Bars are scaled against the largest count.
    pub fn bar_chart(&mut self, entries: &[(String, usize)], color: Rgb) {
        const LABEL_WIDTH: f64 = 45.0;
        const COUNT_WIDTH: f64 = 12.0;
        const BAR_HEIGHT: f64 = 5.0;
        let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;
        let track = self.content_width() - LABEL_WIDTH - COUNT_WIDTH;

        for (label, count) in entries {
            let top = self.cursor + 1.5;
            let baseline = top + BAR_HEIGHT - 1.2;
            self.push_text(MARGIN_MM, baseline, BODY_PT, Font::Regular, Rgb::BLACK, label);
            let bar_x = MARGIN_MM + LABEL_WIDTH;
            self.marks.push(Mark::Rect {
                x: bar_x,
                y: top,
                w: track,
                h: BAR_HEIGHT,
                fill: Rgb::LIGHT.tint(0.5),
            });
            let w = track * (*count as f64) / max;
            if w > 0.0 {
                self.marks.push(Mark::Rect {
                    x: bar_x,
                    y: top,
                    w,
                    h: BAR_HEIGHT,
                    fill: color,
                });
            }
            self.push_text(
                bar_x + track + 2.0,
                baseline,
                BODY_PT,
                Font::Bold,
                Rgb::BLACK,
                &count.to_string(),
            );
            self.cursor = top + BAR_HEIGHT + 1.5;
        }
    }
}
