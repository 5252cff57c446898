// THEORY:
// The `overlay` module decides what gets drawn on a decorated frame, but not
// how pixels are produced. `layout` turns the current label and the frequency
// table into plain geometry (filled rectangles and text items), and `draw`
// replays that geometry onto any `Canvas`. The camera front end implements
// `Canvas` for its frame type; tests implement it with a recorder.
//
// The picture has two parts:
// 1.  **Label panel**: a black box in the top-left corner naming the current
//     emotion.
// 2.  **Bar chart**: one green bar per label seen so far, in first-seen order,
//     each scaled against the most frequent label and captioned beneath a
//     shared baseline.

use crate::core_modules::emotion::Emotion;
use crate::core_modules::frequency::FrequencyCounter;
use crate::error::RenderError;

const LABEL_PANEL: Rect = Rect::new(10, 10, 390, 90);
const LABEL_ORIGIN: Point = Point::new(20, 60);
const LABEL_SCALE: f64 = 1.5;
const LABEL_THICKNESS: i32 = 3;

const BAR_START_X: i32 = 10;
const BAR_BASELINE_Y: i32 = 500;
const BAR_WIDTH: i32 = 30;
const BAR_SPACING: i32 = 10;
const BAR_MAX_HEIGHT: i32 = 100;
const CAPTION_OFFSET_Y: i32 = 15;
const CAPTION_SCALE: f64 = 0.5;
const CAPTION_THICKNESS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its top-left corner and size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub rect: Rect,
    pub color: Color,
}

/// Text anchored at its bottom-left corner, sized relative to the font's base height.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub origin: Point,
    pub scale: f64,
    pub color: Color,
    pub thickness: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub emotion: Emotion,
    pub count: u64,
    pub fill: FilledRect,
    pub caption: TextItem,
}

/// Everything drawn on one decorated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub label_panel: FilledRect,
    pub label_text: TextItem,
    pub baseline: FilledRect,
    pub bars: Vec<Bar>,
}

/// Drawing surface the overlay is replayed onto.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError>;
    fn draw_text(&mut self, item: &TextItem) -> Result<(), RenderError>;
}

/// Bar height in pixels for `count` against the largest count; truncates like an integer cast.
pub fn bar_height(count: u64, max_count: u64) -> i32 {
    let max_count = max_count.max(1);
    ((count as f64 / max_count as f64) * BAR_MAX_HEIGHT as f64) as i32
}

pub fn layout(current: Emotion, table: &FrequencyCounter) -> OverlayLayout {
    let max_count = table.max_count().unwrap_or(1);

    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(slot, (emotion, count))| {
            let x = BAR_START_X + slot as i32 * (BAR_WIDTH + BAR_SPACING);
            let height = bar_height(count, max_count);
            Bar {
                emotion,
                count,
                fill: FilledRect {
                    rect: Rect::new(x, BAR_BASELINE_Y - height, BAR_WIDTH, height),
                    color: Color::GREEN,
                },
                caption: TextItem {
                    text: emotion.to_string(),
                    origin: Point::new(x, BAR_BASELINE_Y + CAPTION_OFFSET_Y),
                    scale: CAPTION_SCALE,
                    color: Color::WHITE,
                    thickness: CAPTION_THICKNESS,
                },
            }
        })
        .collect();

    let slots = bars.len().max(1) as i32;
    let baseline_width = slots * BAR_WIDTH + (slots - 1) * BAR_SPACING;

    OverlayLayout {
        label_panel: FilledRect {
            rect: LABEL_PANEL,
            color: Color::BLACK,
        },
        label_text: TextItem {
            text: format!("Emotion: {}", current),
            origin: LABEL_ORIGIN,
            scale: LABEL_SCALE,
            color: Color::WHITE,
            thickness: LABEL_THICKNESS,
        },
        baseline: FilledRect {
            rect: Rect::new(BAR_START_X, BAR_BASELINE_Y, baseline_width, 1),
            color: Color::GREEN,
        },
        bars,
    }
}

pub fn draw<C: Canvas + ?Sized>(canvas: &mut C, layout: &OverlayLayout) -> Result<(), RenderError> {
    canvas.fill_rect(layout.label_panel.rect, layout.label_panel.color)?;
    canvas.draw_text(&layout.label_text)?;
    canvas.fill_rect(layout.baseline.rect, layout.baseline.color)?;
    for bar in &layout.bars {
        if bar.fill.rect.height > 0 {
            canvas.fill_rect(bar.fill.rect, bar.fill.color)?;
        }
        canvas.draw_text(&bar.caption)?;
    }
    Ok(())
}

/// Lays out and draws the overlay for `current` in one step.
pub fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    current: Emotion,
    table: &FrequencyCounter,
) -> Result<(), RenderError> {
    draw(canvas, &layout(current, table))
}
