use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult};
use crate::error::{ClientError, ErrorKind};
use crate::request::Request;

/// Fails responses whose status code is at or above a threshold.
///
/// The failure keeps the response's status, headers and entity and is
/// tagged `http-error` with the status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorCode;

#[derive(Debug, Clone, Copy)]
pub struct ErrorCodeConfig {
    /// Lowest status code treated as an error. Default: 400.
    pub code: u16,
}

impl Default for ErrorCodeConfig {
    fn default() -> Self {
        Self { code: 400 }
    }
}

impl Interceptor for ErrorCode {
    type Config = ErrorCodeConfig;

    fn name(&self) -> &str {
        "error-code"
    }

    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        config: &'a ErrorCodeConfig,
    ) -> BoxFut<'a, ClientResult> {
        Box::pin(async move {
            let response = next.call(request).await?;
            match response.status_code() {
                Some(code) if code >= config.code => {
                    Err(ClientError::from_response(response, ErrorKind::HttpStatus(code)))
                }
                _ => Ok(response),
            }
        })
    }
}
