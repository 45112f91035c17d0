use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error ({context}): {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("could not resolve gateway address '{addr}'")]
    Resolve { addr: String },
    #[error("connection closed before a response was received")]
    Closed,
}

impl TransportError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| TransportError::Io { context, source }
    }
}
