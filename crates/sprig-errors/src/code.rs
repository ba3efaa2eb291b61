use std::fmt;

use annotate_snippets::Level;

/// How bad a diagnostic is. Ordered from most to least severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn is_error(self) -> bool {
        matches!(self, Self::Fatal | Self::Error)
    }

    pub(crate) fn level(self) -> Level {
        match self {
            Self::Fatal | Self::Error => Level::Error,
            Self::Warning => Level::Warning,
            Self::Info => Level::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// Stable numeric identifiers for every syntax diagnostic. Never renumber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum DiagnosticCode {
    InvalidType = 4,
    BadCharacter = 5,
    UnexpectedToken = 6,
    UnterminatedString = 27,
    UnterminatedComment = 41,
    ExpectedToken = 56,
}

impl DiagnosticCode {
    pub fn number(self) -> u16 {
        self as u16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "SP0004",
            Self::BadCharacter => "SP0005",
            Self::UnexpectedToken => "SP0006",
            Self::UnterminatedString => "SP0027",
            Self::UnterminatedComment => "SP0041",
            Self::ExpectedToken => "SP0056",
        }
    }

    pub fn default_severity(self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_padded() {
        assert_eq!(DiagnosticCode::BadCharacter.to_string(), "SP0005");
        assert_eq!(DiagnosticCode::UnterminatedComment.number(), 41);
        assert_eq!(format!("{}", DiagnosticCode::ExpectedToken), format!("SP{:04}", 56));
    }

    #[test]
    fn severity_order() {
        let mut severities = [Severity::Info, Severity::Error, Severity::Fatal, Severity::Warning];
        severities.sort();
        assert_eq!(
            severities,
            [Severity::Fatal, Severity::Error, Severity::Warning, Severity::Info]
        );
        assert!(Severity::Fatal.is_error());
        assert!(!Severity::Warning.is_error());
    }
}
