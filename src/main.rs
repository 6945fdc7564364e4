mod app;
mod help;
mod jumpto;
mod moon;
mod theme;
mod widget;
use crate::app::App;
use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use weekstrip::{Locale, WeekStart};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Config),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    pub(crate) date: Option<Date>,
    pub(crate) week_start: WeekStart,
    pub(crate) locale: Locale,
    pub(crate) show_empty_days: bool,
    pub(crate) log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = Config {
            show_empty_days: true,
            ..Config::default()
        };
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('w') | Arg::Long("week-start") => {
                    config.week_start = parser.value()?.parse()?;
                }
                Arg::Short('L') | Arg::Long("locale") => {
                    config.locale = parser.value()?.parse()?;
                }
                Arg::Short('H') | Arg::Long("hide-empty") => config.show_empty_days = false,
                Arg::Short('l') | Arg::Long("log-file") => {
                    config.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if config.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => config.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(config))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(config) => {
                let _logger = config.log_file.clone().map(init_logging).transpose()?;
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                log::debug!("Starting up; today is {today}");
                let app = App::new(&config, today).context("failed to set up week strip")?;
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    app.run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: weekstrip [<options>] [YYYY-MM-DD]");
                println!();
                println!("Browse a calendar one week at a time, noting NetHack's new & full moons");
                println!();
                println!("Options:");
                println!("  -w, --week-start <sun|mon>");
                println!("                    Day on which weeks begin [default: sun]");
                println!();
                println!("  -L, --locale <en|ko>");
                println!("                    Language for weekday names [default: en]");
                println!();
                println!("  -H, --hide-empty  Only list days that have a moon event");
                println!();
                println!("  -l, --log-file <FILE>");
                println!("                    Write log messages to the given file; the level");
                println!("                    is read from $RUST_LOG [default: debug]");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

// The terminal is taken over by the UI, so log records only ever go to a
// file.  The returned handle must be kept alive for as long as logging is
// wanted.
fn init_logging(path: PathBuf) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("debug")
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(path).context("invalid log file path")?)
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;
    Ok(handle)
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
