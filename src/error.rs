use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Conversion itself never surfaces these to callers: any error escaping a translation rule is
/// caught at that node's visit boundary and replaced by an error fragment, so the converter stays
/// total over malformed input. The variants exist for the rule-internal `?` plumbing and for the
/// graph primitives, which can reject dangling vertex handles.
///
/// # Error Categories
///
/// - [`Error::Malformed`] - Input tree shape violates the contract a rule relies on
///   (e.g. an `if` without a condition child, a `goto` without a target)
/// - [`Error::GraphError`] - A graph primitive was handed a vertex handle that does not
///   exist in the graph
#[derive(Error, Debug)]
pub enum Error {
    /// The input tree is damaged in a way a translation rule cannot work around.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Graph construction error.
    ///
    /// Returned when an edge references a vertex handle that was never added to
    /// the graph. The composition algebra only ever passes live handles, so in
    /// practice this indicates a bug in a caller-supplied handle.
    #[error("{0}")]
    GraphError(String),
}
