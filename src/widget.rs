use crate::theme::{
    BASE_STYLE, DATE_ROW_STYLE, DECORATION_STYLE, PLACEHOLDER_STYLE, SATURDAY_STYLE,
    SUNDAY_STYLE, TITLE_STYLE, TODAY_MODIFIER, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::Text,
    widgets::{Paragraph, Widget},
};
use weekstrip::{ColumnKind, Header, SlotContent, WeekBarColumn, WeekBody, WeekStrip};

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Width of the strip in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Line on which the weekday labels are drawn, below the title and its rule
const LABEL_LINE: u16 = 2;

/// Line on which the first day row (or the empty-week placeholder) is drawn
const BODY_LINE: u16 = 5;

/// Number of lines taken up by each day row
const ROW_LINES: u16 = 2;

/// Indentation of day content beneath its date
const CONTENT_INDENT: u16 = 2;

const UNSUPPLIED_TEXT: &str = "(no content)";

const ACS_HLINE: char = '─';

#[derive(Clone, Copy, Debug)]
pub(crate) struct StripView<'a> {
    strip: &'a WeekStrip<String>,
}

impl<'a> StripView<'a> {
    pub(crate) fn new(strip: &'a WeekStrip<String>) -> Self {
        StripView { strip }
    }
}

impl Widget for StripView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_header(&self.strip.header());
        canvas.hline(LABEL_LINE - 1, 0, ACS_HLINE, MAIN_WIDTH);
        for (i, column) in std::iter::zip(0u16.., self.strip.week_bar()) {
            canvas.draw_column(i, &column);
        }
        canvas.hline(LABEL_LINE + 2, 0, ACS_HLINE, MAIN_WIDTH);
        match self.strip.body() {
            WeekBody::Collapsed(placeholder) => canvas.draw_placeholder(placeholder),
            WeekBody::Rows(rows) => {
                for (i, slot) in std::iter::zip(0u16.., rows) {
                    canvas.draw_row(i, &self.strip.full_label(slot.date), &slot.content);
                }
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_header(&mut self, header: &Header<'_, String>) {
        if let Some(left) = header.left {
            self.mvprint(0, 0, left, DECORATION_STYLE);
        }
        if let Some(right) = header.right {
            let x = MAIN_WIDTH.saturating_sub(text_width(right));
            self.mvprint(0, x, right, DECORATION_STYLE);
        }
        let title = format!("<  {}  >", header.title);
        let x = MAIN_WIDTH.saturating_sub(text_width(&title)) / 2;
        self.mvprint(0, x, title, TITLE_STYLE);
    }

    fn draw_column(&mut self, index: u16, column: &WeekBarColumn) {
        let style = match column.kind {
            ColumnKind::Sunday => SUNDAY_STYLE,
            ColumnKind::Saturday => SATURDAY_STYLE,
            ColumnKind::Weekday => BASE_STYLE,
        };
        let left = DAY_WIDTH * index;
        self.mvprint(
            LABEL_LINE,
            left + 2,
            column.label,
            WEEKDAY_STYLE.patch(style),
        );
        let (day, style) = if column.is_today {
            (
                format!("[{:2}]", column.date.day()),
                style.add_modifier(TODAY_MODIFIER),
            )
        } else {
            (format!(" {:2} ", column.date.day()), style)
        };
        self.mvprint(LABEL_LINE + 1, left + 1, day, style);
    }

    fn draw_placeholder(&mut self, placeholder: &str) {
        let x = MAIN_WIDTH.saturating_sub(text_width(placeholder)) / 2;
        self.mvprint(BODY_LINE + 1, x, placeholder, PLACEHOLDER_STYLE);
    }

    fn draw_row(&mut self, row_no: u16, label: &str, content: &SlotContent<String>) {
        let y = BODY_LINE.saturating_add(row_no.saturating_mul(ROW_LINES));
        self.mvprint(y, 0, label, DATE_ROW_STYLE);
        match content {
            SlotContent::Filled(s) => self.mvprint(y + 1, CONTENT_INDENT, s, BASE_STYLE),
            SlotContent::Empty => (),
            SlotContent::Unsupplied => {
                self.mvprint(y + 1, CONTENT_INDENT, UNSUPPLIED_TEXT, PLACEHOLDER_STYLE);
            }
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // A Paragraph truncates text that would run past the strip, as
            // long as the Rect it is given lies within the frame.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), BASE_STYLE);
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Text::raw(s).width()).unwrap_or(u16::MAX)
}
