//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E02xx: Structural errors (brackets, keys, separators)
//! - E04xx: Expression errors

use std::fmt;

/// Error codes for document syntax errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Unclosed list `[`
    E0201,
    /// Unclosed map `{`
    E0202,
    /// `:` used outside of a map
    E0203,
    /// Map key is not a string
    E0204,
    /// Key appears twice in the same map
    E0205,
    /// `,` used outside of a list or map
    E0206,
    /// Content after the document's root value
    E0207,

    // =========================================================================
    // E04xx: Expression errors
    // =========================================================================
    /// No value where one was expected
    E0401,
}

impl ErrorCode {
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0201 => "unclosed list",
            Self::E0202 => "unclosed map",
            Self::E0203 => "colon (:) used outside of a map",
            Self::E0204 => "map key is not a string",
            Self::E0205 => "duplicate map key",
            Self::E0206 => "comma (,) used outside of a list or map",
            Self::E0207 => "unexpected content after document",
            Self::E0401 => "expected a value",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            Self::E0206 => "E0206",
            Self::E0207 => "E0207",
            Self::E0401 => "E0401",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
