use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Format

/// The wire formats, used to label parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Jsv,
    Csv,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.pad("JSON"),
            Self::Jsv => f.pad("JSV"),
            Self::Csv => f.pad("CSV"),
        }
    }
}

// -----------------------------------------------------------------------------
// Error

/// Errors reported by the serializers.
///
/// Construct through the helper functions, which take anything that
/// converts into `Cow<'static, str>`.
///
/// ```
/// use vc_serial::{Error, Format};
///
/// let err = Error::parse(Format::Json, 3, "unexpected `}`");
/// assert_eq!(err.to_string(), "JSON parse error at 3: unexpected `}`");
///
/// let err = Error::not_supported("app::Evil, app");
/// assert!(err.is_not_supported());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed input text.
    #[error("{format} parse error at {position}: {message}")]
    Parse {
        format: Format,
        position: usize,
        message: Cow<'static, str>,
    },

    /// A value could not be converted into the target type.
    #[error("cannot convert {member}into `{type_path}`: {message}")]
    Coercion {
        type_path: Cow<'static, str>,
        /// `"field "` with a trailing space, or empty at the root.
        member: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    /// A type hint named a type that the resolver refused.
    #[error("type `{type_hint}` is not supported for deserialization")]
    NotSupported { type_hint: String },

    /// The global config was changed after it was locked by `Config::init`.
    #[error("the global config is locked")]
    ConfigLocked,

    /// An invalid setting, such as an unknown shorthand key.
    #[error("invalid config: {message}")]
    Config { message: Cow<'static, str> },

    /// A custom serialize or deserialize function failed.
    #[error("custom function for `{type_path}` failed: {message}")]
    CustomFunction {
        type_path: Cow<'static, str>,
        message: String,
    },

    /// A failure reported by a collaborator outside the serializers.
    #[error("external failure: {message}")]
    External { message: String },
}

impl Error {
    #[cold]
    pub fn parse(format: Format, position: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Parse {
            format,
            position,
            message: message.into(),
        }
    }

    #[cold]
    pub fn coercion(
        type_path: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Coercion {
            type_path: type_path.into(),
            member: Cow::Borrowed(""),
            message: message.into(),
        }
    }

    #[cold]
    pub fn not_supported(type_hint: impl Into<String>) -> Self {
        Self::NotSupported {
            type_hint: type_hint.into(),
        }
    }

    #[cold]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[cold]
    pub fn custom_function(type_path: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::CustomFunction {
            type_path: type_path.into(),
            message: message.into(),
        }
    }

    #[cold]
    pub fn external(message: impl Into<String>) -> Self {
        Self::External {
            message: message.into(),
        }
    }

    /// Names the member a coercion error happened in.
    ///
    /// The innermost member wins; other errors are returned unchanged.
    pub fn in_member(self, member: &str) -> Self {
        match self {
            Self::Coercion {
                type_path,
                member: current,
                message,
            } if current.is_empty() => Self::Coercion {
                type_path,
                member: Cow::Owned(alloc::format!("field `{member}` ")),
                message,
            },
            other => other,
        }
    }

    #[inline]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }

    #[inline]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// `true` for failures outside the serializers, which callers may
    /// treat as "feature unavailable".
    #[inline]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External { .. })
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Error, Format};

    #[test]
    fn coercion_names_the_innermost_member() {
        let err = Error::coercion("i32", "not a number").in_member("Id").in_member("Outer");
        assert_eq!(err.to_string(), "cannot convert field `Id` into `i32`: not a number");

        let root = Error::coercion("i32", "not a number");
        assert_eq!(root.to_string(), "cannot convert into `i32`: not a number");
    }

    #[test]
    fn error_classes() {
        assert!(Error::parse(Format::Csv, 0, "x").is_parse());
        assert!(Error::external("license expired").is_external());
        assert!(!Error::ConfigLocked.is_not_supported());
    }
}
