//! Service-wide constants.

/// Default VMRay cloud API endpoint.
pub const DEFAULT_URL: &str = "https://cloud.vmray.com/api/";

/// Value of the `type` form field the service expects on every API call.
pub const API_TYPE: &str = "api";

/// Multipart field carrying the uploaded sample.
pub const SAMPLE_FILE_FIELD: &str = "sample_file";

/// Capacity of the in-memory pipe between the upload producer and the HTTP body.
pub const UPLOAD_PIPE_CAPACITY: usize = 64 * 1024;

/// Environment variable holding the account email.
pub const ENV_EMAIL: &str = "VMRAY_EMAIL";

/// Environment variable holding the account password.
pub const ENV_PASSWORD: &str = "VMRAY_PASSWD";

/// Environment variable overriding the API endpoint.
pub const ENV_URL: &str = "VMRAY_URL";

/// `tracing` target for request/response dumps.
pub const TRACE_TARGET: &str = "vmray::trace";

/// `tracing` target for error dumps.
pub const ERROR_TARGET: &str = "vmray::error";

/// API action names, appended to the base URL.
pub mod actions {
    pub const FIND_SAMPLE: &str = "find_sample";
    pub const GET_SAMPLE_INFO: &str = "get_sample_info";
    pub const GET_ANALYSIS_INFO: &str = "get_analysis_info";
    pub const GET_JOBS_INFO: &str = "get_jobs_info";
    pub const DOWNLOAD_ANALYSIS: &str = "download_analysis";
    pub const UPLOAD_SAMPLE: &str = "upload_sample";
}

/// Root CA for [`DEFAULT_URL`] (GlobalSign Root CA, valid until 2028-01-28).
pub const GLOBALSIGN_ROOT_CA: &str = "-----BEGIN CERTIFICATE-----
MIIDdTCCAl2gAwIBAgILBAAAAAABFUtaw5QwDQYJKoZIhvcNAQEFBQAwVzELMAkG
A1UEBhMCQkUxGTAXBgNVBAoTEEdsb2JhbFNpZ24gbnYtc2ExEDAOBgNVBAsTB1Jv
b3QgQ0ExGzAZBgNVBAMTEkdsb2JhbFNpZ24gUm9vdCBDQTAeFw05ODA5MDExMjAw
MDBaFw0yODAxMjgxMjAwMDBaMFcxCzAJBgNVBAYTAkJFMRkwFwYDVQQKExBHbG9i
YWxTaWduIG52LXNhMRAwDgYDVQQLEwdSb290IENBMRswGQYDVQQDExJHbG9iYWxT
aWduIFJvb3QgQ0EwggEiMA0GCSqGSIb3DQEBAQUAA4IBDwAwggEKAoIBAQDaDuaZ
jc6j40+Kfvvxi4Mla+pIH/EqsLmVEQS98GPR4mdmzxzdzxtIK+6NiY6arymAZavp
xy0Sy6scTHAHoT0KMM0VjU/43dSMUBUc71DuxC73/OlS8pF94G3VNTCOXkNz8kHp
1Wrjsok6Vjk4bwY8iGlbKk3Fp1S4bInMm/k8yuX9ifUSPJJ4ltbcdG6TRGHRjcdG
snUOhugZitVtbNV4FpWi6cgKOOvyJBNPc1STE4U6G7weNLWLBYy5d4ux2x8gkasJ
U26Qzns3dLlwR5EiUWMWea6xrkEmCMgZK9FGqkjWZCrXgzT/LCrBbBlDSgeF59N8
9iFo7+ryUp9/k5DPAgMBAAGjQjBAMA4GA1UdDwEB/wQEAwIBBjAPBgNVHRMBAf8E
BTADAQH/MB0GA1UdDgQWBBRge2YaRQ2XyolQL30EzTSo//z9SzANBgkqhkiG9w0B
AQUFAAOCAQEA1nPnfE920I2/7LqivjTFKDK1fPxsnCwrvQmeU79rXqoRSLblCKOz
yj1hTdNGCbM+w6DjY1Ub8rrvrTnhQ7k4o+YviiY776BQVvnGCv04zcQLcFGUl5gE
38NflNUVyRRBnMRddWQVDf9VMOyGj/8N7yy5Y0b2qvzfvGn9LhJIZJrglfCm7ymP
AbEVtQwdpf5pLGkkeB6zpxxxYu7KyJesF12KwvhHhm4qxFYxldBniYUr+WymXUad
DKqC5JlR3XC321Y9YeRq4VzW9v493kHMB65jUr9TU/Qr6cf9tveCX4XSQRjbgbME
HMUfpIBvFSDJ3gyICh3WZlXi/EjJKSZp4A==
-----END CERTIFICATE-----
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_ends_with_slash() {
        assert!(DEFAULT_URL.ends_with('/'));
        assert!(DEFAULT_URL.starts_with("https://"));
    }

    #[test]
    fn test_root_ca_is_pem() {
        assert!(GLOBALSIGN_ROOT_CA.starts_with("-----BEGIN CERTIFICATE-----"));
        assert!(GLOBALSIGN_ROOT_CA.trim_end().ends_with("-----END CERTIFICATE-----"));
    }
}
