//! Tree description markup
//!
//! One element per line. Leading tabs give the nesting depth, then a tag of
//! quoted properties in fixed order:
//!
//! ```text
//! <"Div" "root" "0 0" "400 300" "0 0 0 255" "" "">
//! 	<"Button" "button1" "10 10" "100 40" "255 0 0 255" "" "">
//! >
//! ```
//!
//! The properties are type, name, position, size, colour, texture path and
//! data. The last two may be empty or left out. A line holding only tabs and
//! `>` ends the document.

pub mod parser;

pub use parser::MarkupParser;

use crate::ui::tree::TreeError;

/// Names of the tag properties, in the order they appear
pub const PROPERTY_NAMES: [&str; MAX_PROPERTIES] =
    ["type", "name", "position", "size", "color", "texture", "data"];

/// Properties every tag must carry
pub const REQUIRED_PROPERTIES: usize = 5;

/// Upper bound on properties per tag
pub const MAX_PROPERTIES: usize = 7;

/// Default byte limit for a single property
pub const DEFAULT_MAX_PROPERTY_LEN: usize = 255;

/// Markup errors
///
/// Every variant except `EmptyDocument` and `Io` carries the 1-based line
/// number where parsing stopped.
#[derive(thiserror::Error, Debug)]
pub enum MarkupError {
    /// Input ended before the closing line, or a tag line had no newline
    #[error("line {line}: unexpected end of input")]
    UnexpectedEof {
        /// Line number
        line: usize,
    },

    /// Nesting increased by more than one level
    #[error("line {line}: depth jumps from {from} to {to}")]
    DepthJump {
        /// Line number
        line: usize,
        /// Depth of the previous tag (-1 before the first)
        from: i32,
        /// Depth of this tag
        to: i32,
    },

    /// A property is longer than the configured limit
    #[error("line {line}: property exceeds {max} bytes")]
    PropertyOverflow {
        /// Line number
        line: usize,
        /// Configured limit
        max: usize,
    },

    /// More properties than a tag can hold
    #[error("line {line}: more than {max} properties")]
    TooManyProperties {
        /// Line number
        line: usize,
        /// Property limit
        max: usize,
    },

    /// A required property was left out
    #[error("line {line}: missing '{property}' property")]
    MissingProperty {
        /// Line number
        line: usize,
        /// Name of the first missing property
        property: &'static str,
    },

    /// A numeric property does not hold the expected integers
    #[error("line {line}: invalid {property} '{text}'")]
    InvalidNumber {
        /// Line number
        line: usize,
        /// Property name
        property: &'static str,
        /// Raw property text
        text: String,
    },

    /// A character that cannot appear at this point of a line
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedCharacter {
        /// Line number
        line: usize,
        /// Offending character
        ch: char,
    },

    /// Line ended before `>`
    #[error("line {line}: tag is not closed")]
    UnterminatedTag {
        /// Line number
        line: usize,
    },

    /// Line ended inside a quoted property
    #[error("line {line}: property is not closed")]
    UnterminatedProperty {
        /// Line number
        line: usize,
    },

    /// Blank line between tags
    #[error("line {line}: empty line")]
    EmptyLine {
        /// Line number
        line: usize,
    },

    /// A second top-level element
    #[error("line {line}: document already has a root element")]
    MultipleRoots {
        /// Line number
        line: usize,
    },

    /// The document closed without any element
    #[error("document contains no elements")]
    EmptyDocument,

    /// The tag was well formed but the element could not be created
    #[error("line {line}: {source}")]
    Tree {
        /// Line number
        line: usize,
        /// Underlying tree error
        source: TreeError,
    },

    /// Reading the markup file failed
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),
}

impl MarkupError {
    /// Line the error refers to, when there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof { line }
            | Self::DepthJump { line, .. }
            | Self::PropertyOverflow { line, .. }
            | Self::TooManyProperties { line, .. }
            | Self::MissingProperty { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedTag { line }
            | Self::UnterminatedProperty { line }
            | Self::EmptyLine { line }
            | Self::MultipleRoots { line }
            | Self::Tree { line, .. } => Some(*line),
            Self::EmptyDocument | Self::Io(_) => None,
        }
    }
}
