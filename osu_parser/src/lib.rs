//! Parser for the `.osu` beatmap text format.
//!
//! Only the sections the strain pipeline needs are interpreted
//! (`General`, `Metadata`, `Difficulty`, `HitObjects`); every other section is
//! read and discarded. Recoverable problems are returned as [`ParseWarning`]s
//! alongside the chart instead of failing the parse.

mod error;
mod hit_object;
mod parser;


use osu_schema::Chart;

pub use error::{ParseError, ParseWarning, WarningKind};
pub use parser::SUPPORTED_FORMAT_VERSION;

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Stop storing hit objects past this many. `None` keeps them all.
    pub max_hit_objects: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ParsedChart {
    pub chart: Chart,
    pub warnings: Vec<ParseWarning>,
}

pub fn parse_bytes(buf: &[u8]) -> Result<ParsedChart, ParseError> {
    parse_bytes_with_options(buf, &ParseOptions::default())
}

pub fn parse_bytes_with_options(
    buf: &[u8],
    options: &ParseOptions,
) -> Result<ParsedChart, ParseError> {
    let src = String::from_utf8_lossy(buf);
    parse_str_with_options(&src, options)
}

pub fn parse_str(src: &str) -> Result<ParsedChart, ParseError> {
    parse_str_with_options(src, &ParseOptions::default())
}

pub fn parse_str_with_options(src: &str, options: &ParseOptions) -> Result<ParsedChart, ParseError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    parser::parse_chart(src, options)
}
