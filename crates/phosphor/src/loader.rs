//! Asynchronous logo decoding.
//!
//! Decoding is the one asynchronous operation in the system, modeled as a
//! single-shot future: a worker thread decodes, sends exactly one result
//! over a bounded channel, and exits. The driver polls without blocking
//! once per tick and proceeds with the fallback grid until then. Only one
//! decode is ever in flight per instance.

use std::path::{Path, PathBuf};

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use phosphor_core::error::{FieldError, FieldResult};
use phosphor_core::sampler::ImagePixelBuffer;

/// A decode in flight. Dropping it abandons the result; the worker's send
/// fails silently and the thread exits.
#[derive(Debug)]
pub struct PendingImage {
    receiver: Receiver<FieldResult<ImagePixelBuffer>>,
}

impl PendingImage {
    /// Non-blocking poll. Returns `Some` exactly once, when the worker
    /// has finished (successfully or not).
    pub fn poll(&mut self) -> Option<FieldResult<ImagePixelBuffer>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FieldError::ImageDecode(
                "decode worker exited without a result".to_string(),
            ))),
        }
    }
}

/// Starts decoding `path` on a worker thread.
#[must_use]
pub fn spawn_decode(path: PathBuf) -> PendingImage {
    let (sender, receiver) = bounded(1);
    // Thread spawn failure is a resource-exhaustion condition; surface it
    // through the same channel as a decode error rather than panicking.
    let spawned = std::thread::Builder::new()
        .name("phosphor-decode".to_string())
        .spawn({
            let sender = sender.clone();
            move || {
                // The receiver may already be gone (instance destroyed
                // before the decode resolved); that is fine.
                let _ = sender.send(decode(&path));
            }
        });
    if let Err(error) = spawned {
        let _ = sender.send(Err(FieldError::ImageDecode(format!(
            "could not spawn decode worker: {error}"
        ))));
    }
    PendingImage { receiver }
}

/// Decodes an image file into an RGBA pixel buffer.
fn decode(path: &Path) -> FieldResult<ImagePixelBuffer> {
    let decoded = image::open(path)
        .map_err(|e| FieldError::ImageDecode(format!("{}: {e}", path.display())))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImagePixelBuffer::new(width, height, rgba.into_raw())
}
