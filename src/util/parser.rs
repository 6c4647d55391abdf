use core::fmt;
use octseq::parse::ShortInput;

//--------- ParseError -------------------------------------------------------

/// An error happened while parsing data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An attempt was made to go beyond the end of the parser.
    ShortInput,

    /// The 16 octet marker of a BGP header is not all ones.
    ///
    /// The stream can not be resynchronised after this, callers should
    /// treat it as fatal for the session.
    InvalidMarker,

    /// The length field of a BGP header is out of bounds.
    InvalidLength(u16),

    /// The message is well-formed but of a type no decoder exists for.
    UnrecognizedType(u8),

    /// A formatting error occurred.
    Form(FormError),
}

impl ParseError {
    /// Creates a new parse error as a form error with the given message.
    pub fn form_error(msg: &'static str) -> Self {
        FormError::new(msg).into()
    }

    /// Returns whether the octet stream can not be used any further.
    ///
    /// After a framing error the position of the next message is unknown.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParseError::InvalidMarker | ParseError::InvalidLength(_)
        )
    }
}

//--- From

impl From<FormError> for ParseError {
    fn from(err: FormError) -> Self {
        ParseError::Form(err)
    }
}

impl From<ShortInput> for ParseError {
    fn from(_: ShortInput) -> Self {
        ParseError::ShortInput
    }
}

//--- Display and Error

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::ShortInput => f.write_str("unexpected end of input"),
            ParseError::InvalidMarker => f.write_str("invalid BGP marker"),
            ParseError::InvalidLength(len) => {
                write!(f, "invalid BGP message length {}", len)
            }
            ParseError::UnrecognizedType(typ) => {
                write!(f, "unrecognized BGP message type {}", typ)
            }
            ParseError::Form(ref err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError { }

//------------ FormError -----------------------------------------------------

/// A formatting error occured.
///
/// This is a generic error for all kinds of error cases that result in data
/// not being accepted. For diagnostics, the error is being given a static
/// string describing the error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormError(&'static str);

impl FormError {
    /// Creates a new form error value with the given diagnostics string.
    pub fn new(msg: &'static str) -> Self {
        FormError(msg)
    }
}

//--- Display and Error

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FormError { }

//------------ Tests ---------------------------------------------------------
