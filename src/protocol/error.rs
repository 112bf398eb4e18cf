//! Command rejection reasons

/// Why an inbound line was not applied.
///
/// Never sent to the host; counted and logged only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// E01: Line does not start with the command prefix
    BadPrefix,
    /// E02: Fewer valid tokens than spaces, and partial commands are refused
    Incomplete,
    /// E03: Prefix matched but no valid token followed
    NoTokens,
}

impl RejectReason {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadPrefix => "E01",
            Self::Incomplete => "E02",
            Self::NoTokens => "E03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::BadPrefix => "bad prefix",
            Self::Incomplete => "incomplete command",
            Self::NoTokens => "no state tokens",
        }
    }
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
