//! VMRay API - HTTP client for the VMRay malware analysis service.
//!
//! Covers sample lookup and metadata, analysis and job status, streaming
//! sample upload and analysis archive download. Every call authenticates with
//! basic auth and also sends the credentials as form fields, which the
//! service requires.
//!
//! ```no_run
//! # async fn run() -> vmray_api::VmrayResult<()> {
//! let client = vmray_api::ApiClient::builder()
//!     .basic_auth("analyst@example.com", "secret")
//!     .error_log(true)
//!     .build()?;
//! let found = client.find_sample("d41d8cd98f00b204e9800998ecf8427e").await?;
//! let info = client.get_analysis_info(&found.sample_id.to_string()).await?;
//! for id in info.analysis_ids() {
//!     std::fs::write(format!("{id}.zip"), client.download_analysis(id).await?)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod params;
pub mod response;
mod upload;

// Re-export key types
pub use client::{basic_auth, ApiClient, ApiClientBuilder, RequestMethod};
pub use params::Parameters;
pub use response::{
    AnalysisDetail, AnalysisInfo, FindSampleResult, JobDetail, JobsInfo, SampleInfo,
    UploadDetail, UploadResult,
};
pub use vmray_core::{ClientConfig, VmrayError, VmrayResult};
