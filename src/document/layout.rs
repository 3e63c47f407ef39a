// 📐 Layout - flow blocks top-down into fixed-margin pages
//
// Output is a list of pages, each a flat list of draw primitives in PDF
// coordinates (points, origin bottom-left). A block that does not fit on the
// current page continues on the next one; paragraphs break between lines and
// tables break between rows. A row taller than a whole frame is split between
// its wrapped lines.

use super::metrics::{text_width, wrap_text};
use super::style::{row_shade, Align, Color, FontFace, PageGeometry, TableStyle, TextStyle};
use std::ops::Range;

// ============================================================================
// INPUT BLOCKS
// ============================================================================

/// A run of text. Each element of `lines` starts on a new line (forced break);
/// long lines are word-wrapped to the frame width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        TextBlock {
            lines: vec![text.into()],
            style,
        }
    }

    pub fn with_breaks(lines: Vec<String>, style: TextStyle) -> Self {
        TextBlock { lines, style }
    }

    /// Forced line breaks inside this block
    pub fn forced_breaks(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub column_widths: Vec<f32>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

impl TableBlock {
    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Table(TableBlock),
    Spacer(f32),
}

// ============================================================================
// OUTPUT PRIMITIVES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f32 },
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
    },
}

/// What a table row is, for callers inspecting a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
    /// Background fill of every table row placed on this page, in order
    pub row_fills: Vec<(RowKind, Color)>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ============================================================================
// PAGINATOR
// ============================================================================

pub struct Paginator {
    page: PageGeometry,
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor: f32,
}

impl Paginator {
    pub fn new(page: PageGeometry) -> Self {
        Paginator {
            page,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: page.frame_top(),
        }
    }

    /// Lay out every block; at least one page is always produced
    pub fn layout(page: PageGeometry, blocks: &[Block]) -> Vec<PageLayout> {
        let mut paginator = Paginator::new(page);
        for block in blocks {
            match block {
                Block::Text(text) => paginator.place_text(text),
                Block::Table(table) => paginator.place_table(table),
                Block::Spacer(height) => paginator.advance(*height),
            }
        }
        paginator.finish()
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.current);
        self.pages
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.page.frame_bottom()
    }

    fn page_is_empty(&self) -> bool {
        self.current.ops.is_empty()
    }

    fn new_page(&mut self) {
        let done = std::mem::take(&mut self.current);
        self.pages.push(done);
        self.cursor = self.page.frame_top();
    }

    /// Make room for `height`, starting a new page if needed
    fn reserve(&mut self, height: f32) {
        if height > self.remaining() && !self.page_is_empty() {
            self.new_page();
        }
    }

    /// Vertical space; never carried over to a fresh page
    fn advance(&mut self, height: f32) {
        self.cursor = (self.cursor - height).max(self.page.frame_bottom());
    }

    fn place_text(&mut self, block: &TextBlock) {
        let style = block.style;
        let frame_width = self.page.frame_width();

        for forced in &block.lines {
            for line in wrap_text(forced, style.face, style.size, frame_width) {
                self.reserve(style.leading);

                let width = text_width(&line, style.face, style.size);
                let x = match style.align {
                    Align::Left => self.page.margin,
                    Align::Center => (self.page.width - width) / 2.0,
                };
                let baseline = self.cursor - style.leading + (style.leading - style.size) / 2.0 + style.size * 0.2;

                if !line.is_empty() {
                    self.current.ops.push(DrawOp::Text {
                        x,
                        y: baseline,
                        text: line,
                        face: style.face,
                        size: style.size,
                        color: style.color,
                    });
                }
                self.cursor -= style.leading;
            }
        }

        self.advance(style.space_after);
    }

    fn place_table(&mut self, table: &TableBlock) {
        let x0 = (self.page.width - table.width()) / 2.0;

        self.place_row(table, x0, RowKind::Header, &table.header);
        for (index, row) in table.rows.iter().enumerate() {
            self.place_row(table, x0, RowKind::Data(index), row);
        }
    }

    fn place_row(&mut self, table: &TableBlock, x0: f32, kind: RowKind, cells: &[String]) {
        let style = &table.style;
        let (face, foreground, background, padding_bottom) = match kind {
            RowKind::Header => (
                FontFace::Bold,
                style.header_foreground,
                style.header_background,
                style.header_padding_bottom,
            ),
            RowKind::Data(index) => (FontFace::Regular, style.body_foreground, row_shade(index), style.padding_bottom),
        };

        let wrapped: Vec<Vec<String>> = table
            .column_widths
            .iter()
            .enumerate()
            .map(|(col, width)| {
                let text = cells.get(col).map(String::as_str).unwrap_or("");
                wrap_text(text, face, style.font_size, width - 2.0 * style.padding_x)
            })
            .collect();

        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let chrome = style.padding_top + padding_bottom;
        let height = chrome + line_count as f32 * style.leading;
        if height <= self.page.frame_top() - self.page.frame_bottom() {
            self.reserve(height);
        }

        let mut start = 0;
        while start < line_count {
            let fit = ((self.remaining() - chrome) / style.leading).floor();
            if fit < 1.0 && !self.page_is_empty() {
                self.new_page();
                continue;
            }

            let take = (fit.max(1.0) as usize).min(line_count - start);
            let segment = RowSegment {
                kind,
                face,
                foreground,
                background,
                padding_bottom,
                lines: start..start + take,
            };
            self.place_row_segment(table, x0, &wrapped, segment);

            start += take;
            if start < line_count {
                self.new_page();
            }
        }
    }

    fn place_row_segment(&mut self, table: &TableBlock, x0: f32, wrapped: &[Vec<String>], segment: RowSegment) {
        let style = &table.style;
        let face = segment.face;
        let height = style.padding_top + segment.lines.len() as f32 * style.leading + segment.padding_bottom;
        let top = self.cursor;
        let bottom = top - height;

        self.current.row_fills.push((segment.kind, segment.background));
        self.current.ops.push(DrawOp::FillRect {
            rect: Rect {
                x: x0,
                y: bottom,
                width: table.width(),
                height,
            },
            color: segment.background,
        });

        let mut x = x0;
        for (col, width) in table.column_widths.iter().enumerate() {
            let cell = Rect {
                x,
                y: bottom,
                width: *width,
                height,
            };

            let lines = wrapped[col]
                .iter()
                .enumerate()
                .filter(|(line_no, _)| segment.lines.contains(line_no));
            for (line_no, line) in lines {
                if line.is_empty() {
                    continue;
                }
                let offset = (line_no - segment.lines.start) as f32;
                let line_width = text_width(line, face, style.font_size);
                self.current.ops.push(DrawOp::Text {
                    x: x + (width - line_width) / 2.0,
                    y: top - style.padding_top - style.font_size - offset * style.leading,
                    text: line.clone(),
                    face,
                    size: style.font_size,
                    color: segment.foreground,
                });
            }

            self.current.ops.push(DrawOp::StrokeRect {
                rect: cell,
                color: style.grid_color,
                line_width: style.grid_width,
            });
            x += width;
        }

        self.cursor = bottom;
    }
}

/// The slice of a row's wrapped lines drawn on one page
struct RowSegment {
    kind: RowKind,
    face: FontFace,
    foreground: Color,
    background: Color,
    padding_bottom: f32,
    lines: Range<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::style::ATTENDANCE_COLUMN_WIDTHS;

    fn table(rows: usize) -> TableBlock {
        TableBlock {
            column_widths: ATTENDANCE_COLUMN_WIDTHS.to_vec(),
            header: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            rows: (0..rows)
                .map(|i| vec![format!("Member {}", i), "Pos".into(), "Virtual".into(), "Absent".into()])
                .collect(),
            style: TableStyle::default(),
        }
    }

    #[test]
    fn test_empty_layout_still_has_one_page() {
        let pages = Paginator::layout(PageGeometry::letter(), &[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].ops.is_empty());
    }

    #[test]
    fn test_centered_text_is_centered_on_page() {
        let pages = Paginator::layout(
            PageGeometry::letter(),
            &[Block::Text(TextBlock::new("Hello", TextStyle::subtitle()))],
        );

        let (x, text, size) = match &pages[0].ops[0] {
            DrawOp::Text { x, text, size, .. } => (*x, text.clone(), *size),
            other => panic!("unexpected op {:?}", other),
        };
        let width = text_width(&text, FontFace::Regular, size);
        assert!((x + width / 2.0 - 306.0).abs() < 1e-3);
    }

    #[test]
    fn test_left_text_starts_at_margin() {
        let pages = Paginator::layout(
            PageGeometry::letter(),
            &[Block::Text(TextBlock::new("Body", TextStyle::body()))],
        );
        assert!(matches!(pages[0].ops[0], DrawOp::Text { x, .. } if x == 72.0));
    }

    #[test]
    fn test_table_is_centered_and_banded() {
        let pages = Paginator::layout(PageGeometry::letter(), &[Block::Table(table(4))]);

        let first_fill = pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_fill.x, 54.0);
        assert_eq!(first_fill.width, 504.0);

        let fills = &pages[0].row_fills;
        assert_eq!(fills[0], (RowKind::Header, Color::ACCENT));
        assert_eq!(fills[1], (RowKind::Data(0), Color::SHADE_EVEN));
        assert_eq!(fills[2], (RowKind::Data(1), Color::SHADE_ODD));
        assert_eq!(fills[3], (RowKind::Data(2), Color::SHADE_EVEN));
        assert_eq!(fills[4], (RowKind::Data(3), Color::SHADE_ODD));
    }

    #[test]
    fn test_long_table_breaks_between_rows() {
        let pages = Paginator::layout(PageGeometry::letter(), &[Block::Table(table(60))]);
        assert!(pages.len() >= 2);

        let data_rows: usize = pages
            .iter()
            .map(|p| p.row_fills.iter().filter(|(k, _)| matches!(k, RowKind::Data(_))).count())
            .sum();
        assert_eq!(data_rows, 60);

        // banding follows the data index, not the position on the page
        for page in &pages {
            for (kind, color) in &page.row_fills {
                if let RowKind::Data(i) = kind {
                    assert_eq!(*color, row_shade(*i));
                }
            }
        }

        // nothing is drawn below the bottom margin
        for page in &pages {
            for op in &page.ops {
                if let DrawOp::FillRect { rect, .. } = op {
                    assert!(rect.y >= 72.0 - 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_cell_text_wraps_and_grows_row() {
        let mut t = table(1);
        t.rows[0][0] = "An extraordinarily long member name that cannot fit".into();

        let pages = Paginator::layout(PageGeometry::letter(), &[Block::Table(t)]);
        let heights: Vec<f32> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, .. } => Some(rect.height),
                _ => None,
            })
            .collect();

        // header: 3 + 12 + 12, data row: 3 + n*12 + 3 with n > 1
        assert_eq!(heights[0], 27.0);
        assert!(heights[1] > 18.0);
    }

    #[test]
    fn test_long_paragraph_flows_to_next_page() {
        let lines: Vec<String> = (0..80).map(|i| format!("Line {}", i)).collect();
        let pages = Paginator::layout(
            PageGeometry::letter(),
            &[Block::Text(TextBlock::with_breaks(lines, TextStyle::body()))],
        );

        assert_eq!(pages.len(), 2);
        let total: usize = pages.iter().map(|p| p.texts().count()).sum();
        assert_eq!(total, 80);
    }

    #[test]
    fn test_row_taller_than_page_is_split() {
        let mut t = table(1);
        t.rows[0][0] = (0..2000).map(|i| format!("name{}", i)).collect::<Vec<_>>().join(" ");

        let pages = Paginator::layout(PageGeometry::letter(), &[Block::Table(t)]);
        assert!(pages.len() > 2);

        for page in &pages {
            for op in &page.ops {
                match op {
                    DrawOp::Text { y, .. } => assert!(*y >= 72.0 - 1e-3, "text below margin at {}", y),
                    DrawOp::FillRect { rect, .. } => assert!(rect.y >= 72.0 - 1e-3),
                    _ => {}
                }
            }
        }

        let words: usize = pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|t| t.starts_with("name"))
            .map(|t| t.split_whitespace().count())
            .sum();
        assert_eq!(words, 2000);

        // every page carrying part of the row repeats its shading
        for page in &pages[1..] {
            assert_eq!(page.row_fills, vec![(RowKind::Data(0), row_shade(0))]);
        }
    }
}
