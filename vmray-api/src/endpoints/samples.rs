//! Sample endpoints.

use std::path::Path;

use vmray_core::constants::{actions, SAMPLE_FILE_FIELD};
use vmray_core::error::VmrayResult;

use crate::client::{ApiClient, RequestMethod};
use crate::params::Parameters;
use crate::response::{FindSampleResult, SampleInfo, UploadResult};

impl ApiClient {
    /// Find a sample by its md5, sha1 or sha256 hash.
    pub async fn find_sample(&self, hash: &str) -> VmrayResult<FindSampleResult> {
        self.fetch_json(
            RequestMethod::Post,
            actions::FIND_SAMPLE,
            Parameters::new().with("hash", hash),
        )
        .await
    }

    /// Get metadata for a sample id.
    pub async fn get_sample_info(&self, id: &str) -> VmrayResult<SampleInfo> {
        self.fetch_json(
            RequestMethod::Post,
            actions::GET_SAMPLE_INFO,
            Parameters::new().with("id", id),
        )
        .await
    }

    /// Submit a file for analysis.
    ///
    /// The file is streamed as the `sample_file` part under its base name.
    pub async fn upload_sample(&self, path: impl AsRef<Path>) -> VmrayResult<UploadResult> {
        let path = path.as_ref();
        self.log_trace(&format!("upload_sample file: '{}'", path.display()));
        let fields = Parameters::new()
            .with("comment", "")
            .with("cmdline", "")
            .with("archive_password", "")
            .with("name", SAMPLE_FILE_FIELD);
        self.upload_json(actions::UPLOAD_SAMPLE, path, fields).await
    }
}
