//! Streaming multipart uploads.
//!
//! A producer task copies the sample into one end of an in-memory pipe while
//! reqwest reads the other end as the body of the file part, so the sample is
//! never held in memory as a whole. The producer reports how it finished over
//! a oneshot channel that the caller checks once the request has been sent.

use std::io;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::sync::oneshot;
use tokio_util::io::ReaderStream;
use tracing::debug;

use vmray_core::constants::{SAMPLE_FILE_FIELD, UPLOAD_PIPE_CAPACITY};
use vmray_core::error::{VmrayError, VmrayResult};

use crate::params::Parameters;

/// Handle on the task feeding the upload pipe.
pub(crate) struct UploadProducer {
    outcome: oneshot::Receiver<io::Result<u64>>,
}

impl UploadProducer {
    /// Wait for the producer and return the number of bytes it streamed.
    pub(crate) async fn finish(self) -> VmrayResult<u64> {
        match self.outcome.await {
            Ok(Ok(streamed)) => Ok(streamed),
            Ok(Err(e)) => Err(VmrayError::Upload(format!("failed to stream sample: {e}"))),
            Err(_) => Err(VmrayError::Upload(
                "upload producer stopped without reporting".into(),
            )),
        }
    }
}

/// Open `path` and build a form with the file streamed as `sample_file`
/// followed by `params` as text fields.
///
/// The file is opened before anything is spawned, so a missing file fails
/// here without touching the network.
pub(crate) async fn sample_form(path: &Path, params: &Parameters) -> VmrayResult<(Form, UploadProducer)> {
    let file = File::open(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| SAMPLE_FILE_FIELD.to_string());

    let (writer, reader) = tokio::io::duplex(UPLOAD_PIPE_CAPACITY);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = pump(file, writer).await;
        if let Err(ref e) = outcome {
            debug!("upload producer failed: {e}");
        }
        let _ = tx.send(outcome);
    });

    let part = Part::stream(Body::wrap_stream(ReaderStream::new(reader)))
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| VmrayError::Upload(format!("invalid mime type: {e}")))?;

    let form = params.append_to(Form::new().part(SAMPLE_FILE_FIELD, part));
    Ok((form, UploadProducer { outcome: rx }))
}

/// Copy the file into the pipe, then close the writer to end the body.
async fn pump(mut file: File, mut writer: DuplexStream) -> io::Result<u64> {
    let streamed = tokio::io::copy(&mut file, &mut writer).await?;
    writer.shutdown().await?;
    Ok(streamed)
}
