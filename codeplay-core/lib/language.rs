//! Languages supported by the remote execution service.
//!
//! The set is closed: adding a language means adding a variant and its table entry, and the
//! compiler makes sure both exist. Ids coming from the page are parsed with [`str::parse`] and
//! anything outside the set surfaces as [`CodeplayError::UnsupportedLanguage`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::CodeplayError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A language an interactive code block can be run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python 3
    Python,
    /// JavaScript on Node.js
    JavaScript,
    /// C++ compiled with GCC
    Cpp,
    /// Java
    Java,
    /// Go
    Go,
    /// Rust
    Rust,
}

/// The runtime the execution service must use for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageConfig {
    /// Name of the language as the service knows it
    pub runtime_name: &'static str,

    /// Exact runtime version the service must select
    pub runtime_version: &'static str,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Language {
    /// Every supported language, in the order they are offered on the page.
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::JavaScript,
        Language::Cpp,
        Language::Java,
        Language::Go,
        Language::Rust,
    ];

    /// Get the abstract id the page uses for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Go => "go",
            Self::Rust => "rust",
        }
    }

    /// Get the runtime the execution service uses for this language.
    pub fn config(&self) -> LanguageConfig {
        let (runtime_name, runtime_version) = match self {
            Self::Python => ("python", "3.10.0"),
            Self::JavaScript => ("javascript", "18.15.0"),
            Self::Cpp => ("c++", "10.2.0"),
            Self::Java => ("java", "15.0.2"),
            Self::Go => ("go", "1.16.2"),
            Self::Rust => ("rust", "1.68.2"),
        };

        LanguageConfig {
            runtime_name,
            runtime_version,
        }
    }

    /// Get an external playground a reader can fall back to when execution fails.
    pub fn playground_url(&self) -> &'static str {
        match self {
            Self::Python => "https://www.online-python.com/",
            Self::JavaScript => "https://playcode.io/new",
            Self::Cpp => "https://godbolt.org/",
            Self::Java => "https://www.jdoodle.com/online-java-compiler/",
            Self::Go => "https://go.dev/play/",
            Self::Rust => "https://play.rust-lang.org/",
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = CodeplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| CodeplayError::UnsupportedLanguage(s.to_string()))
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
