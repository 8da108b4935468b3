/// An error built from a free-form message, usually added as context.
#[derive(Debug)]
pub(super) struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    pub(super) fn new(message: String) -> AdhocError {
        AdhocError {
            message: message.into(),
        }
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
