//! Page canvas and draw commands.
//!
//! Layout code works top-down: `y` grows from the top edge of the page. The
//! PDF surface has its origin at the bottom-left, so every helper converts
//! the y coordinate once, when the command is issued. A `DrawCommand`
//! always holds surface coordinates.

use crate::font_metrics::{FontFace, FontMetrics};

// ============================================================================
// CONSTANTS
// ============================================================================

/// ISO A4 width in points
pub const A4_WIDTH: f32 = 595.28;
/// ISO A4 height in points
pub const A4_HEIGHT: f32 = 841.89;

// ============================================================================
// COLOR
// ============================================================================

/// RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub const fn gray(level: f32) -> Self {
        Color::rgb(level, level, level)
    }
}

// ============================================================================
// TEXT STYLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Options for a single `Canvas::text` call.
///
/// A `max_width` of zero disables wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub max_width: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            face: FontFace::Helvetica,
            size: 10.0,
            color: Color::BLACK,
            align: TextAlign::Left,
            max_width: 0.0,
        }
    }
}

impl TextStyle {
    pub fn new(face: FontFace, size: f32) -> Self {
        TextStyle {
            face,
            size,
            ..TextStyle::default()
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn max_width(mut self, max_width: f32) -> Self {
        self.max_width = max_width;
        self
    }

    fn metrics(&self) -> &'static FontMetrics {
        self.face.metrics()
    }
}

// ============================================================================
// DRAW COMMANDS
// ============================================================================

/// One primitive on the page surface (bottom-left origin).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Text run; `y` is the baseline.
    Text {
        text: String,
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Color,
    },
    /// Filled rectangle; `(x, y)` is the bottom-left corner.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
    },
    /// Filled disc
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// True when every coordinate and size can be written to a content stream.
    pub fn is_finite(&self) -> bool {
        match self {
            DrawCommand::Text { x, y, size, .. } => [*x, *y, *size].iter().all(|v| v.is_finite()),
            DrawCommand::Rect { x, y, width, height, .. } => {
                [*x, *y, *width, *height].iter().all(|v| v.is_finite())
            }
            DrawCommand::Line { x1, y1, x2, y2, thickness, .. } => {
                [*x1, *y1, *x2, *y2, *thickness].iter().all(|v| v.is_finite())
            }
            DrawCommand::Circle { cx, cy, radius, .. } => {
                [*cx, *cy, *radius].iter().all(|v| v.is_finite())
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A finished page: its size plus the commands in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    /// All text runs in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::text)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

// ============================================================================
// TEXT MEASUREMENT
// ============================================================================

/// Greedy word wrap.
///
/// Words are added to the current line while the line stays within
/// `max_width`. A word that is wider than `max_width` on its own still gets
/// its own line and is never broken.
pub fn wrap_words(text: &str, metrics: &FontMetrics, size: f32, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let tentative = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if metrics.string_width(&tentative, size) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = tentative;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn aligned_x(x: f32, line: &str, style: &TextStyle) -> f32 {
    match style.align {
        TextAlign::Left => x,
        TextAlign::Center => x - style.metrics().string_width(line, style.size) / 2.0,
        TextAlign::Right => x - style.metrics().string_width(line, style.size),
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// Collects draw commands for one page.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    line_height: f32,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    /// `line_height` is the multiplier applied to the font size when text
    /// advances to the next line.
    pub fn new(width: f32, height: f32, line_height: f32) -> Self {
        Canvas {
            width,
            height,
            line_height,
            commands: Vec::new(),
        }
    }

    pub fn a4(line_height: f32) -> Self {
        Canvas::new(A4_WIDTH, A4_HEIGHT, line_height)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Vertical distance between two baselines at `size`
    pub fn line_advance(&self, size: f32) -> f32 {
        size * self.line_height
    }

    fn surface_y(&self, y: f32) -> f32 {
        self.height - y
    }

    /// Lines `text` would occupy with `style` (a single line when wrapping
    /// is off).
    pub fn wrap(&self, text: &str, style: &TextStyle) -> Vec<String> {
        if style.max_width > 0.0 {
            wrap_words(text, style.metrics(), style.size, style.max_width)
        } else {
            vec![text.to_string()]
        }
    }

    /// Draws `text` with its baseline at top-down `y` and returns the y just
    /// below the drawn block, so callers can stack content.
    pub fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> f32 {
        let lines = self.wrap(text, style);
        let advance = self.line_advance(style.size);

        let mut line_y = y;
        for line in &lines {
            let command = DrawCommand::Text {
                x: aligned_x(x, line, style),
                y: self.surface_y(line_y),
                text: line.clone(),
                face: style.face,
                size: style.size,
                color: style.color,
            };
            self.commands.push(command);
            line_y += advance;
        }

        y + advance * lines.len().max(1) as f32
    }

    /// Fills the rectangle whose top-left corner is `(x, y)`.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let command = self.rect_command(x, y, width, height, color);
        self.commands.push(command);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color) {
        let (y1, y2) = (self.surface_y(y1), self.surface_y(y2));
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
            color,
        });
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let cy = self.surface_y(cy);
        self.commands.push(DrawCommand::Circle { cx, cy, radius, color });
    }

    /// Position in paint order, for use with `rect_behind`.
    pub fn mark(&self) -> usize {
        self.commands.len()
    }

    /// Fills a rectangle underneath everything drawn since `mark`.
    pub fn rect_behind(&mut self, mark: usize, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let command = self.rect_command(x, y, width, height, color);
        let at = mark.min(self.commands.len());
        self.commands.insert(at, command);
    }

    fn rect_command(&self, x: f32, y: f32, width: f32, height: f32, color: Color) -> DrawCommand {
        DrawCommand::Rect {
            x,
            y: self.height - y - height,
            width,
            height,
            color,
        }
    }

    pub fn into_page(self) -> Page {
        Page {
            width: self.width,
            height: self.height,
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn rect_is_flipped_to_bottom_left_origin() {
        let mut canvas = Canvas::a4(1.4);
        canvas.rect(50.0, 100.0, 200.0, 40.0, Color::gray(0.95));

        match &canvas.into_page().commands[0] {
            DrawCommand::Rect { x, y, width, height, .. } => {
                assert!(approx(*x, 50.0));
                assert!(approx(*y, A4_HEIGHT - 100.0 - 40.0));
                assert!(approx(*width, 200.0));
                assert!(approx(*height, 40.0));
            }
            other => panic!("expected rect, got {:?}", other),
        }
    }

    #[test]
    fn line_endpoints_convert_independently() {
        let mut canvas = Canvas::new(100.0, 500.0, 1.2);
        canvas.line(0.0, 10.0, 50.0, 400.0, 2.0, Color::BLACK);

        assert_eq!(
            canvas.into_page().commands[0],
            DrawCommand::Line {
                x1: 0.0,
                y1: 490.0,
                x2: 50.0,
                y2: 100.0,
                thickness: 2.0,
                color: Color::BLACK,
            }
        );
    }

    #[test]
    fn circle_center_is_flipped() {
        let mut canvas = Canvas::new(100.0, 500.0, 1.2);
        canvas.circle(80.0, 180.0, 40.0, Color::WHITE);

        match &canvas.into_page().commands[0] {
            DrawCommand::Circle { cx, cy, radius, .. } => {
                assert!(approx(*cx, 80.0));
                assert!(approx(*cy, 320.0));
                assert!(approx(*radius, 40.0));
            }
            other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn single_line_text_returns_advanced_y() {
        let mut canvas = Canvas::a4(1.4);
        let next = canvas.text("Hello", 50.0, 100.0, &TextStyle::new(FontFace::Helvetica, 10.0));

        assert!(approx(next, 114.0));
        let page = canvas.into_page();
        match &page.commands[0] {
            DrawCommand::Text { x, y, text, .. } => {
                assert_eq!(text, "Hello");
                assert!(approx(*x, 50.0));
                assert!(approx(*y, A4_HEIGHT - 100.0));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn alignment_shifts_by_measured_width() {
        let style = TextStyle::new(FontFace::Helvetica, 12.0);
        let mut canvas = Canvas::a4(1.2);
        canvas.text("Hello", 200.0, 50.0, &style.align(TextAlign::Center));
        canvas.text("Hello", 200.0, 50.0, &style.align(TextAlign::Right));

        let xs: Vec<f32> = canvas
            .into_page()
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::Text { x, .. } => *x,
                _ => f32::NAN,
            })
            .collect();
        // "Hello" at 12pt is 27.336pt wide
        assert!(approx(xs[0], 200.0 - 13.668));
        assert!(approx(xs[1], 200.0 - 27.336));
    }

    #[test]
    fn wrapped_text_stacks_lines_and_reports_height() {
        let style = TextStyle::new(FontFace::Helvetica, 10.0).max_width(60.0);
        let mut canvas = Canvas::a4(1.4);
        let next = canvas.text("alpha beta gamma delta", 10.0, 100.0, &style);

        let page = canvas.into_page();
        let lines: Vec<&str> = page.texts().collect();
        assert!(lines.len() > 1);
        assert!(approx(next, 100.0 + 14.0 * lines.len() as f32));

        let ys: Vec<f32> = page
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        for pair in ys.windows(2) {
            assert!(approx(pair[0] - pair[1], 14.0));
        }
    }

    #[test]
    fn right_aligned_wrapped_lines_align_individually() {
        let style = TextStyle::new(FontFace::Helvetica, 10.0)
            .max_width(40.0)
            .align(TextAlign::Right);
        let mut canvas = Canvas::a4(1.2);
        canvas.text("a bbbbbbbb", 300.0, 100.0, &style);

        let metrics = FontFace::Helvetica.metrics();
        for command in canvas.into_page().commands {
            if let DrawCommand::Text { x, text, size, .. } = command {
                assert!(approx(x + metrics.string_width(&text, size), 300.0));
            }
        }
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let metrics = FontFace::Helvetica.metrics();
        let lines = wrap_words("a Supercalifragilistic b", metrics, 10.0, 30.0);
        assert_eq!(lines, vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn empty_text_draws_nothing_but_still_advances() {
        let style = TextStyle::new(FontFace::Helvetica, 10.0).max_width(100.0);
        let mut canvas = Canvas::a4(1.4);
        let next = canvas.text("   ", 0.0, 20.0, &style);
        assert!(approx(next, 34.0));
        assert!(canvas.into_page().commands.is_empty());
    }

    #[test]
    fn rect_behind_paints_under_later_content() {
        let mut canvas = Canvas::a4(1.2);
        canvas.rect(0.0, 0.0, 10.0, 10.0, Color::BLACK);
        let mark = canvas.mark();
        canvas.text("over", 0.0, 50.0, &TextStyle::default());
        canvas.rect_behind(mark, 0.0, 40.0, 100.0, 20.0, Color::gray(0.95));

        let page = canvas.into_page();
        assert!(matches!(page.commands[1], DrawCommand::Rect { .. }));
        assert_eq!(page.commands[2].text(), Some("over"));
    }

    #[test]
    fn non_finite_commands_are_detected() {
        let mut canvas = Canvas::a4(1.2);
        canvas.rect(f32::NAN, 0.0, 1.0, 1.0, Color::BLACK);
        canvas.line(0.0, 0.0, 1.0, 1.0, 1.0, Color::BLACK);
        let page = canvas.into_page();
        assert!(!page.commands[0].is_finite());
        assert!(page.commands[1].is_finite());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every wrapped line fits, unless it is one word that is
        /// too wide on its own.
        #[test]
        fn wrapped_lines_fit_max_width(
            words in prop::collection::vec("[A-Za-z0-9]{1,18}", 0..30),
            max_width in 20.0f32..400.0f32,
            size in 6.0f32..24.0f32,
        ) {
            let text = words.join(" ");
            let metrics = FontFace::Helvetica.metrics();
            let lines = wrap_words(&text, metrics, size, max_width);

            for line in &lines {
                let fits = metrics.string_width(line, size) <= max_width;
                let single_word = !line.contains(' ');
                prop_assert!(fits || single_word, "line {:?} overflows", line);
            }

            // Wrapping never drops or reorders words
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
            let original: Vec<&str> = words.iter().map(String::as_str).collect();
            prop_assert_eq!(rejoined, original);
        }
    }
}
