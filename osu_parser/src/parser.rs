use osu_schema::{Chart, Difficulty, HitObject, Metadata};

use crate::error::{ParseError, ParseWarning, WarningKind};
use crate::hit_object::{parse_hit_object_line, HitObjectLine};
use crate::{ParseOptions, ParsedChart};

pub const SUPPORTED_FORMAT_VERSION: u32 = 14;
const VERSION_PREFIX: &str = "osu file format v";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    General,
    Metadata,
    Difficulty,
    HitObjects,
    Ignored,
}

impl Section {
    fn from_name(name: &str) -> Self {
        match name {
            "General" => Self::General,
            "Metadata" => Self::Metadata,
            "Difficulty" => Self::Difficulty,
            "HitObjects" => Self::HitObjects,
            _ => Self::Ignored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before the first section header.
    Preamble,
    Open(Section),
    /// A section's line grammar stopped matching; wait for the next header.
    Skipping,
}

pub(crate) fn parse_chart(src: &str, options: &ParseOptions) -> Result<ParsedChart, ParseError> {
    let mut lines = src.lines().enumerate().map(|(i, line)| (i + 1, line));
    let header = lines.next().map(|(_, line)| line).unwrap_or_default();
    let format_version = parse_version_header(header)?;

    let mut scanner = Scanner::new(format_version, options);
    if format_version != SUPPORTED_FORMAT_VERSION {
        scanner.warnings.push(ParseWarning::new(
            WarningKind::UnsupportedVersion,
            format!("osu file format v{format_version} not guaranteed to parse correctly"),
            1,
        ));
    }

    for (line_no, line) in lines {
        scanner.feed(line_no, line);
    }
    Ok(scanner.finish())
}

fn parse_version_header(line: &str) -> Result<u32, ParseError> {
    let missing = || ParseError::MissingVersion {
        found: line.chars().take(40).collect(),
    };
    let rest = line.strip_prefix(VERSION_PREFIX).ok_or_else(missing)?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse().map_err(|_| missing())
}

/// `[Name]` with an alphanumeric name. Anything after the closing bracket is ignored.
fn parse_section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    let name_end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = &inner[..name_end];
    if name.is_empty() || !inner[name_end..].starts_with(']') {
        return None;
    }
    Some(name)
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

struct Scanner<'o> {
    options: &'o ParseOptions,
    state: ScanState,
    meta: Metadata,
    difficulty: Difficulty,
    hit_objects: Vec<HitObject>,
    warnings: Vec<ParseWarning>,
    dropped_over_capacity: usize,
    first_dropped_line: usize,
}

impl<'o> Scanner<'o> {
    fn new(format_version: u32, options: &'o ParseOptions) -> Self {
        Self {
            options,
            state: ScanState::Preamble,
            meta: Metadata {
                format_version,
                ..Metadata::default()
            },
            difficulty: Difficulty::default(),
            hit_objects: Vec::new(),
            warnings: Vec::new(),
            dropped_over_capacity: 0,
            first_dropped_line: 0,
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        if line.starts_with('[') {
            self.close_section();
            self.state = match parse_section_header(line) {
                Some(name) => ScanState::Open(Section::from_name(name)),
                None => {
                    self.warnings.push(
                        ParseWarning::new(
                            WarningKind::MalformedSectionHeader,
                            "failed to parse section header",
                            line_no,
                        )
                        .with_context(line.to_string()),
                    );
                    ScanState::Skipping
                }
            };
            return;
        }

        let ScanState::Open(section) = self.state else {
            return;
        };

        let keep_scanning = match section {
            Section::General => {
                self.general_line(line);
                true
            }
            Section::Metadata => {
                self.metadata_line(line);
                true
            }
            Section::Difficulty => self.difficulty_line(line_no, line),
            Section::HitObjects => self.hit_object_line(line_no, line),
            Section::Ignored => true,
        };

        if !keep_scanning {
            log::debug!("{section:?} section ends at line {line_no}");
            self.close_section();
            self.state = ScanState::Skipping;
        }
    }

    fn general_line(&mut self, line: &str) {
        if let Some(("Mode", value)) = split_key_value(line) {
            if let Ok(mode) = value.parse() {
                self.meta.game_mode = mode;
            }
        }
    }

    fn metadata_line(&mut self, line: &str) {
        let Some((key, value)) = split_key_value(line) else {
            return;
        };
        let slot = match key {
            "Title" => &mut self.meta.name,
            "Version" => &mut self.meta.version_label,
            "Artist" => &mut self.meta.artist,
            "Creator" => &mut self.meta.creator,
            _ => return,
        };
        *slot = value.to_string();
    }

    /// `Key:Value` with an alphabetic key and a numeric value. Returns `false`
    /// when the line does not match, which ends the section.
    fn difficulty_line(&mut self, line_no: usize, line: &str) -> bool {
        let Some((key, value)) = line.split_once(':') else {
            return false;
        };
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        let Ok(value) = value.trim().parse::<f64>() else {
            return false;
        };

        let d = &mut self.difficulty;
        match key {
            "ApproachRate" => d.approach_rate = value,
            "OverallDifficulty" => d.overall_difficulty = value,
            "CircleSize" => d.circle_size = value,
            "HPDrainRate" => d.hp_drain = value,
            "SliderMultiplier" => d.slider_multiplier = value,
            "SliderTickRate" => d.slider_tick_rate = value,
            _ => self.warnings.push(ParseWarning::new(
                WarningKind::UnknownDifficultyKey,
                format!("unhandled Difficulty setting {key}"),
                line_no,
            )),
        }
        true
    }

    fn hit_object_line(&mut self, line_no: usize, line: &str) -> bool {
        let Some(parsed) = parse_hit_object_line(line, line_no) else {
            return false;
        };

        match parsed {
            HitObjectLine::Parsed { object, warnings } => {
                self.warnings.extend(warnings);
                let full = self
                    .options
                    .max_hit_objects
                    .is_some_and(|cap| self.hit_objects.len() >= cap);
                if full {
                    if self.dropped_over_capacity == 0 {
                        self.first_dropped_line = line_no;
                    }
                    self.dropped_over_capacity += 1;
                } else {
                    self.hit_objects.push(object);
                }
            }
            HitObjectLine::Unclassified(warning) => self.warnings.push(warning),
        }
        true
    }

    fn close_section(&self) {
        match self.state {
            ScanState::Open(Section::HitObjects) => {
                log::debug!("parsed {} hit objects", self.hit_objects.len());
            }
            ScanState::Open(Section::Difficulty) => {
                let d = &self.difficulty;
                log::debug!(
                    "parsed difficulty ar:{} od:{} cs:{} hp:{}",
                    d.approach_rate,
                    d.overall_difficulty,
                    d.circle_size,
                    d.hp_drain
                );
            }
            _ => {}
        }
    }

    fn finish(mut self) -> ParsedChart {
        self.close_section();
        if let Some(cap) = self.options.max_hit_objects.filter(|_| self.dropped_over_capacity > 0) {
            self.warnings.push(ParseWarning::new(
                WarningKind::CapacityExceeded,
                format!(
                    "hit object capacity {cap} reached, dropped {} objects",
                    self.dropped_over_capacity
                ),
                self.first_dropped_line,
            ));
        }

        ParsedChart {
            chart: Chart {
                meta: self.meta,
                difficulty: self.difficulty,
                hit_objects: self.hit_objects,
            },
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_header_accepts_trailing_text() {
        assert_eq!(parse_version_header("osu file format v14"), Ok(14));
        assert_eq!(parse_version_header("osu file format v9 (legacy)"), Ok(9));
    }

    #[test]
    fn version_header_requires_exact_prefix_and_digits() {
        assert!(parse_version_header("osu file format v").is_err());
        assert!(parse_version_header(" osu file format v14").is_err());
        assert!(parse_version_header("osu file format vX").is_err());
        assert!(parse_version_header("").is_err());
    }

    #[test]
    fn section_header_name_must_be_alphanumeric() {
        assert_eq!(parse_section_header("[HitObjects]"), Some("HitObjects"));
        assert_eq!(parse_section_header("[Colours]  "), Some("Colours"));
        assert_eq!(parse_section_header("[Hit Objects]"), None);
        assert_eq!(parse_section_header("[]"), None);
        assert_eq!(parse_section_header("[Difficulty"), None);
    }
}
