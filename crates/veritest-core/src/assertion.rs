//! The record describing one evaluated check

/// One evaluated check, forwarded to the output sink the moment it is made.
///
/// The suite, method and argument fields are filled in by the suite at
/// dispatch time; the file/line pair is the call site of the assertion
/// itself. An empty `error_message` means the check passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// Name of the suite the assertion ran under
    pub suite: String,
    /// Name of the test method the assertion ran in
    pub method: String,
    /// Rendered argument string of the test method
    pub args: String,
    /// Source file of the assertion call site
    pub file: String,
    /// Source line of the assertion call site
    pub line: u32,
    /// Failure description, empty when the check passed
    pub error_message: String,
    /// Optional annotation supplied by the test author
    pub user_message: String,
}

impl Assertion {
    /// The `method(args)` display form used by most sinks.
    pub fn full_method(&self) -> String {
        format!("{}({})", self.method, self.args)
    }

    /// A framework-generated failure not tied to any call site, e.g. the
    /// misconfiguration warning a parallel suite emits for directly
    /// registered test methods.
    pub(crate) fn synthetic(suite: &str, error_message: &str) -> Self {
        Assertion {
            suite: suite.to_string(),
            method: String::new(),
            args: String::new(),
            file: String::new(),
            line: 0,
            error_message: error_message.to_string(),
            user_message: String::new(),
        }
    }
}
