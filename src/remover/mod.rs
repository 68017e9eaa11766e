// Background removal capability.
// The segmentation model is an opaque collaborator: image bytes in, PNG bytes out.

mod command;

pub use command::CommandRemover;

use std::{future::Future, io, pin::Pin, process::ExitStatus};
use thiserror::Error;

/// Environment variable through which the inference runtime finds its cache directory.
pub const CACHE_DIR_ENV: &str = "NUMBA_CACHE_DIR";

/// Errors raised by a background remover.
#[derive(Error, Debug)]
pub enum RemovalError {
    /// The remover program could not be started.
    #[error("failed to start remover program {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Piping data to or from the remover failed.
    #[error("I/O error while talking to the remover: {0}")]
    Io(#[from] io::Error),

    /// The remover exited unsuccessfully.
    #[error("remover exited with {status}: {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    /// The remover succeeded but wrote nothing.
    #[error("remover produced no output")]
    EmptyOutput,
}

pub type RemovalFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<u8>, RemovalError>> + Send + 'a>>;

/// Trait for background removal backends
/// Allows swapping the external model runtime without touching the request handlers.
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background from an encoded image.
    ///
    /// Dropping the returned future must abandon the work, including any
    /// process started for it.
    ///
    /// # Returns
    /// * Encoded image with a transparent background, normally PNG
    fn remove(&self, input: Vec<u8>) -> RemovalFuture<'_>;
}

#[cfg(test)]
pub mod mock {
    use super::{BackgroundRemover, RemovalError, RemovalFuture};
    use std::{future::ready, io};

    /// Returns the same bytes for every input.
    pub struct StaticRemover(pub Vec<u8>);

    impl BackgroundRemover for StaticRemover {
        fn remove(&self, _input: Vec<u8>) -> RemovalFuture<'_> {
            Box::pin(ready(Ok::<_, RemovalError>(self.0.clone())))
        }
    }

    /// Returns its input untouched.
    pub struct EchoRemover;

    impl BackgroundRemover for EchoRemover {
        fn remove(&self, input: Vec<u8>) -> RemovalFuture<'_> {
            Box::pin(ready(Ok::<_, RemovalError>(input)))
        }
    }

    /// Fails every call with a recognisable internal message.
    pub struct FailingRemover;

    pub const FAILURE_DETAIL: &str = "onnxruntime: CUDA out of memory";

    impl BackgroundRemover for FailingRemover {
        fn remove(&self, _input: Vec<u8>) -> RemovalFuture<'_> {
            Box::pin(ready(Err::<Vec<u8>, _>(RemovalError::Io(
                io::Error::other(FAILURE_DETAIL),
            ))))
        }
    }

    /// Panics on every call.
    pub struct PanickingRemover;

    pub const PANIC_DETAIL: &str = "segmentation model crashed";

    impl BackgroundRemover for PanickingRemover {
        fn remove(&self, _input: Vec<u8>) -> RemovalFuture<'_> {
            panic!("{}", PANIC_DETAIL)
        }
    }
}
