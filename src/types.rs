//! Types module for the main runtime, exposing error and result types.
//!
//! Errors are split into two kinds: configuration errors, which are raised
//! before anything touches AWS, and provider errors, which come back from
//! a call against AWS. Everything else coerces into one of the two.
use logger::SetLoggerError;
use quick_xml::events::Event;
use quick_xml::Reader;
use rusoto_core::region::ParseRegionError;
use rusoto_core::request;

use std::fmt::{self, Debug, Display, Formatter};
use std::io;

/// Public type alias for a result with a `UtilError` error type.
pub type UtilResult<T> = Result<T, UtilError>;

/// Error type for everything raised by this tool.
///
/// Both variants carry only a message; the variant itself decides whether
/// a failure happened before any side effect (`Config`) or during a call
/// to the provider (`Provider`).
#[derive(Clone, PartialEq, Eq)]
pub enum UtilError {
    Config(String),
    Provider(String),
}

impl UtilError {
    /// Constructs a configuration error from a message.
    pub fn config<S: Into<String>>(msg: S) -> UtilError {
        UtilError::Config(msg.into())
    }

    /// Constructs a provider error from a message.
    pub fn provider<S: Into<String>>(msg: S) -> UtilError {
        UtilError::Provider(msg.into())
    }

    /// Retrieves the inner message, regardless of kind.
    pub fn message(&self) -> &str {
        match self {
            UtilError::Config(msg) | UtilError::Provider(msg) => msg,
        }
    }

    /// Determines whether this error was raised by configuration.
    #[cfg(test)]
    pub fn is_config(&self) -> bool {
        matches!(self, UtilError::Config(_))
    }
}

/// Debug implementation for `UtilError`.
impl Debug for UtilError {
    /// Formats an `UtilError` by delegating to `Display`.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Display implementation for `UtilError`.
impl Display for UtilError {
    /// Formats an `UtilError` by writing out the inner representation.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            UtilError::Config(msg) => write!(f, "Configuration error: {}", msg),
            UtilError::Provider(msg) => write!(f, "{}", msg),
        }
    }
}

/// Macro to implement `From` for provided types.
macro_rules! derive_from {
    ($type:ty) => {
        impl<'a> From<$type> for UtilError {
            fn from(t: $type) -> UtilError {
                UtilError::Config(t.to_string())
            }
        }
    };
}

// Easy derivations of derive_from.
derive_from!(&'a str);
derive_from!(io::Error);
derive_from!(clap::Error);
derive_from!(SetLoggerError);
derive_from!(regex::Error);
derive_from!(ParseRegionError);
derive_from!(request::TlsError);
derive_from!(String);

/// Macro to implement `From` for Rusoto types.
macro_rules! derive_from_rusoto {
    ($type:ty) => {
        impl From<rusoto_core::RusotoError<$type>> for UtilError {
            /// Converts a Rusoto error to a `UtilError`.
            fn from(err: rusoto_core::RusotoError<$type>) -> UtilError {
                let msg = err.to_string();
                UtilError::Provider(extract_message(&msg).unwrap_or(msg))
            }
        }
    };
}

// derive error display for all used rusoto types
derive_from_rusoto!(rusoto_elbv2::DescribeLoadBalancersError);
derive_from_rusoto!(rusoto_elbv2::ModifyLoadBalancerAttributesError);
derive_from_rusoto!(rusoto_s3::GetBucketLocationError);
derive_from_rusoto!(rusoto_s3::GetBucketLoggingError);
derive_from_rusoto!(rusoto_s3::ListBucketsError);
derive_from_rusoto!(rusoto_s3::PutBucketLoggingError);

/// Pulls the `<Message>` text out of an XML error body, if there is one.
///
/// Rusoto prefixes unknown errors with request metadata, so parsing starts
/// at the first tag rather than at the start of the string.
fn extract_message(msg: &str) -> Option<String> {
    let start = msg.find('<')?;

    // create an XML reader and buffer
    let mut reader = Reader::from_str(&msg[start..]);
    let mut buffer = Vec::new();

    loop {
        // parse through each XML node event
        match reader.read_event(&mut buffer) {
            // end, or error, just give up
            Ok(Event::Eof) | Err(_) => return None,

            // if we find a message tag, we'll use that as the error
            Ok(Event::Start(ref e)) if e.name() == b"Message" => {
                return reader.read_text(b"Message", &mut Vec::new()).ok();
            }

            // skip
            _ => (),
        }
        // empty buffers
        buffer.clear();
    }
}
