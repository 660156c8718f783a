/// Failures talking to a third-party service
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response could not be decoded: {detail}")]
    Decode { service: &'static str, detail: String },

    #[error("{service} is not configured: {setting} is missing")]
    MissingCredentials {
        service: &'static str,
        setting: &'static str,
    },
}

impl UpstreamError {
    pub fn request(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Request { service, source }
    }

    pub fn decode(service: &'static str, detail: impl std::fmt::Display) -> Self {
        UpstreamError::Decode {
            service,
            detail: detail.to_string(),
        }
    }
}
