use clap::ValueEnum;
use minilock::display::TableStyle;
use strum::Display;

#[derive(Debug, ValueEnum, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputMode {
    Sharp,
    Modern,
    Psql,
    Markdown,
}

impl From<OutputMode> for TableStyle {
    fn from(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Sharp => TableStyle::Sharp,
            OutputMode::Modern => TableStyle::Modern,
            OutputMode::Psql => TableStyle::Psql,
            OutputMode::Markdown => TableStyle::Markdown,
        }
    }
}
