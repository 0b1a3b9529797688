//! Analysis endpoints.

use vmray_core::constants::actions;
use vmray_core::error::VmrayResult;

use crate::client::{ApiClient, RequestMethod};
use crate::params::Parameters;
use crate::response::AnalysisInfo;

impl ApiClient {
    /// Get all analyses of a sample, with the jobs still attached to it.
    pub async fn get_analysis_info(&self, sample_id: &str) -> VmrayResult<AnalysisInfo> {
        self.fetch_json(
            RequestMethod::Post,
            actions::GET_ANALYSIS_INFO,
            Parameters::new().with("sample_id", sample_id),
        )
        .await
    }

    /// Download the result archive (zip) of an analysis.
    ///
    /// The bytes are returned as received; persisting them is up to the caller.
    pub async fn download_analysis(&self, analysis_id: &str) -> VmrayResult<Vec<u8>> {
        self.fetch_bytes(
            actions::DOWNLOAD_ANALYSIS,
            Parameters::new().with("analysis_id", analysis_id),
        )
        .await
    }
}
