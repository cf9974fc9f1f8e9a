use std::fmt;

/// Broad error category, used by callers that only care about the class of failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Out-of-range numeric parameter (posterize levels, color maxima, ...).
    InvalidArgument,
    /// Drawing API called in the wrong order (nested `begin_shape`, unbalanced pop, ...).
    InvalidSequence,
    /// Malformed persisted image data.
    Format,
    /// Operation not available on the active backend.
    Unsupported,
}

/// Error returned by drawing, compositing and codec operations.
///
/// Sequence errors are raised before any state is touched; the caller's
/// buffers are left exactly as they were.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    InvalidArgument(String),
    InvalidSequence(String),
    /// `push_style` past the stack depth.
    StackOverflow { depth: usize },
    /// `pop_style` without a matching push.
    StackUnderflow,
    /// Malformed image data. `expected` / `actual` describe the mismatch.
    Format {
        what: &'static str,
        expected: String,
        actual: String,
    },
    Unsupported(String),
}

impl DrawError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_sequence(msg: impl Into<String>) -> Self {
        Self::InvalidSequence(msg.into())
    }

    pub(crate) fn format(
        what: &'static str,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::Format { what, expected: expected.to_string(), actual: actual.to_string() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidSequence(_) | Self::StackOverflow { .. } | Self::StackUnderflow => {
                ErrorKind::InvalidSequence
            }
            Self::Format { .. } => ErrorKind::Format,
            Self::Unsupported(_) => ErrorKind::Unsupported,
        }
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::InvalidSequence(msg) => write!(f, "invalid call sequence: {msg}"),
            Self::StackOverflow { depth } => {
                write!(f, "too many push_style() calls (stack depth is {depth})")
            }
            Self::StackUnderflow => write!(f, "pop_style() called more times than push_style()"),
            Self::Format { what, expected, actual } => {
                write!(f, "bad image data ({what}): expected {expected}, found {actual}")
            }
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
        }
    }
}

impl std::error::Error for DrawError {}

pub type DrawResult<T> = Result<T, DrawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_errors_are_sequence_errors() {
        assert_eq!(DrawError::StackUnderflow.kind(), ErrorKind::InvalidSequence);
        assert_eq!(DrawError::StackOverflow { depth: 64 }.kind(), ErrorKind::InvalidSequence);
    }

    #[test]
    fn format_error_mentions_both_sides() {
        let err = DrawError::format("tga width", 640, 320);
        let text = err.to_string();
        assert!(text.contains("640"));
        assert!(text.contains("320"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
