use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::moon::moon_note;
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crate::widget::StripView;
use crate::Config;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use time::Date;
use weekstrip::{AnchorError, Direction, WeekStrip};

static EMPTY_WEEK_TEXT: &str = "No new or full moons this week";

static HINT_TEXT: &str = "Press ? for help";

#[derive(Debug)]
pub(crate) struct App {
    strip: WeekStrip<String>,
    // Written by the strip's date-click handler
    selected: Rc<Cell<Option<Date>>>,
    state: AppState,
}

impl App {
    pub(crate) fn new(config: &Config, today: Date) -> Result<App, AnchorError> {
        let selected = Rc::new(Cell::new(None));
        let on_click = Rc::clone(&selected);
        let mut builder = WeekStrip::builder(today)
            .start_of_week(config.week_start)
            .locale(config.locale)
            .render_day_content(moon_note)
            .show_empty_days(config.show_empty_days)
            .empty_week_data(String::from(EMPTY_WEEK_TEXT))
            .left_header(String::from(env!("CARGO_PKG_NAME")))
            .right_header(today.to_string())
            .on_date_click(move |date| on_click.set(Some(date)))
            .on_week_change(|range| log::info!("Showing week {range}"));
        if let Some(date) = config.date {
            builder = builder.initial_date(date);
        }
        Ok(App {
            strip: builder.build()?,
            selected,
            state: AppState::Calendar,
        })
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h' | 'k') | KeyCode::Left | KeyCode::Up => {
                    self.strip.navigate(Direction::Prev).is_ok()
                }
                KeyCode::Char('l' | 'j') | KeyCode::Right | KeyCode::Down => {
                    self.strip.navigate(Direction::Next).is_ok()
                }
                KeyCode::Char('0') | KeyCode::Home => self.strip.jump_to_today().is_ok(),
                KeyCode::Char(c @ '1'..='7') => self.select_column(c),
                KeyCode::Char('e') => {
                    let show = !self.strip.shows_empty_days();
                    self.strip.set_show_empty_days(show);
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok())
                        {
                            Some(d) => state.handle_input(JumpToInput::Digit(d)),
                            None => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.strip.jump_to(date).is_ok()
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    // `digit` is the 1-based column number shown in the help
    fn select_column(&mut self, digit: char) -> bool {
        let column = digit
            .to_digit(10)
            .and_then(|d| usize::try_from(d).ok())
            .and_then(|d| d.checked_sub(1))
            .and_then(|i| self.strip.week_bar().get(i).copied());
        match column {
            Some(column) => {
                self.strip.click_date(column.date);
                true
            }
            None => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn status_line(&self) -> Line<'static> {
        match self.selected.get() {
            Some(date) => Line::styled(
                format!("Selected: {}", self.strip.full_label(date)),
                STATUS_STYLE,
            ),
            None => Line::styled(HINT_TEXT, STATUS_STYLE),
        }
        .centered()
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [strip_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        StripView::new(&self.strip).render(strip_area, buf);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
