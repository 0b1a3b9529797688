//! Response records.
//!
//! Plain mirrors of the JSON shapes returned by the service. Every field
//! falls back to its default when the service omits it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Result of `find_sample`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindSampleResult {
    pub sample_id: i64,
}

/// Sample metadata returned by `get_sample_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleInfo {
    #[serde(rename = "sample_filesize")]
    pub filesize: i64,
    #[serde(rename = "sample_priority")]
    pub priority: i64,
    #[serde(rename = "sample_sha1hash")]
    pub sha1: String,
    pub sample_type: String,
    #[serde(rename = "sample_filename")]
    pub filename: String,
    #[serde(rename = "sample_md5hash")]
    pub md5: String,
    #[serde(rename = "sample_password")]
    pub password: String,
    #[serde(rename = "sample_shareable")]
    pub shareable: bool,
    pub sample_id: i64,
    #[serde(rename = "sample_sha256hash")]
    pub sha256: String,
    #[serde(rename = "sample_url")]
    pub url: String,
    /// Creation timestamp as sent by the service.
    #[serde(rename = "sample_created")]
    pub created: String,
}

/// Pending and in-progress jobs, keyed by job id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsInfo {
    pub jobs: BTreeMap<String, JobDetail>,
}

/// State of a single job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDetail {
    pub status: String,
    pub slot: i64,
}

/// Result of `get_analysis_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInfo {
    /// Analyses keyed by analysis id.
    #[serde(rename = "Analyses")]
    pub analyses: BTreeMap<String, AnalysisDetail>,
    pub jobs: JobsInfo,
}

impl AnalysisInfo {
    /// Analysis ids in ascending key order.
    pub fn analysis_ids(&self) -> impl Iterator<Item = &str> {
        self.analyses.keys().map(String::as_str)
    }
}

/// Metadata of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDetail {
    pub analysis_id: i64,
    pub analysis_sample_id: i64,
    pub analysis_job_id: i64,
    pub analysis_jobrule_id: i64,
    pub analysis_cmdline_id: i64,
    pub analysis_configuration_id: i64,
    pub analysis_user_config_id: i64,
    pub analysis_user_id: i64,
    pub analysis_vmhost_id: i64,
    pub analysis_vm_id: i64,
    pub analysis_analyzer_id: i64,
    pub analysis_prescript_id: i64,
    pub analysis_snapshot_id: i64,
    pub analysis_priority: i64,
    pub analysis_hint: i64,
    pub analysis_severity: i64,
    pub analysis_size: i64,
    pub analysis_created: String,
    pub analysis_job_started: String,
    pub analysis_result: String,
    pub analysis_analyzer_version: String,
    pub analysis_external_reference: String,
    pub analyzer_type: String,
    pub analyzer_name: String,
    pub configuration_name: String,
    pub snapshot_name: String,
    pub vmhost_name: String,
    pub vm_name: String,
    pub target: String,
}

/// One submission created by `upload_sample`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadDetail {
    pub submission_id: i64,
    pub sample_id: i64,
    pub webif_url: String,
    pub sample_filename: String,
    pub sample_url: String,
    pub job_ids: Vec<i64>,
}

/// Result of `upload_sample`, keyed by the service's result key.
pub type UploadResult = HashMap<String, UploadDetail>;
