//! Error taxonomy for the rendering core.  Every failure is local and
//! recoverable by the calling layer; nothing in the pipeline retries,
//! and no partial output is ever returned alongside an error.

/// The error type shared by every fallible operation in the crate.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// A caller-supplied parameter was out of contract: non-positive
    /// image dimensions or iteration limit, a view rectangle whose
    /// corners are not strictly ordered, or a non-positive zoom.
    #[fail(display = "invalid parameter: {}", what)]
    InvalidParameter {
        /// Which parameter was rejected, and why.
        what: String,
    },

    /// An easing lookup was given an identifier that is not one of the
    /// registered curve names.
    #[fail(display = "unknown easing curve: {}", name)]
    UnknownEasing {
        /// The identifier that failed to resolve.
        name: String,
    },
}

impl Error {
    /// Shorthand constructor for `InvalidParameter`.
    pub fn invalid_parameter<S: Into<String>>(what: S) -> Error {
        Error::InvalidParameter { what: what.into() }
    }

    /// Shorthand constructor for `UnknownEasing`.
    pub fn unknown_easing<S: Into<String>>(name: S) -> Error {
        Error::UnknownEasing { name: name.into() }
    }
}
