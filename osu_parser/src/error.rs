use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("E1001: missing `osu file format v<n>` header (found {found:?})")]
    MissingVersion { found: String },
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::MissingVersion { .. } => "E1001",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    UnsupportedVersion,
    MalformedSectionHeader,
    UnknownDifficultyKey,
    UnknownHitObjectType,
    MalformedSliderTail,
    CapacityExceeded,
    MalformedCurve,
}

impl WarningKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "W1001",
            Self::MalformedSectionHeader => "W1002",
            Self::UnknownDifficultyKey => "W2001",
            Self::UnknownHitObjectType => "W3001",
            Self::MalformedSliderTail => "W3002",
            Self::CapacityExceeded => "W3003",
            Self::MalformedCurve => "W3004",
        }
    }
}

/// A recoverable problem found while parsing. The chart is still produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub message: String,
    pub line: usize,
    pub context: Option<String>,
}

impl ParseWarning {
    pub(crate) fn new(kind: WarningKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            context: None,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (line {})", self.code(), self.message, self.line)?;
        if let Some(context) = &self.context {
            write!(f, " [{context}]")?;
        }
        Ok(())
    }
}
