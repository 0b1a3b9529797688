//! Job endpoints.

use vmray_core::constants::actions;
use vmray_core::error::VmrayResult;

use crate::client::{ApiClient, RequestMethod};
use crate::params::Parameters;
use crate::response::JobsInfo;

impl ApiClient {
    /// List pending and in-progress jobs.
    pub async fn get_jobs_info(&self) -> VmrayResult<JobsInfo> {
        self.fetch_json(RequestMethod::Post, actions::GET_JOBS_INFO, Parameters::new())
            .await
    }
}
