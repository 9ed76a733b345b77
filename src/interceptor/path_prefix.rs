use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult};
use crate::request::Request;

/// Prepends a prefix to relative request paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathPrefix;

#[derive(Debug, Clone, Default)]
pub struct PathPrefixConfig {
    pub prefix: String,
}

impl PathPrefixConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

fn is_absolute(path: &str) -> bool {
    path.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
    })
}

/// Join `prefix` and `path` with exactly one `/` between them.
fn join(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return prefix.to_string();
    }
    format!("{}/{}", prefix.trim_end_matches('/'), path.trim_start_matches('/'))
}

impl Interceptor for PathPrefix {
    type Config = PathPrefixConfig;

    fn name(&self) -> &str {
        "path-prefix"
    }

    fn intercept<'a>(
        &'a self,
        mut request: Request,
        next: &'a dyn Client,
        config: &'a PathPrefixConfig,
    ) -> BoxFut<'a, ClientResult> {
        if !is_absolute(&request.path) {
            request.path = join(&config.prefix, &request.path);
        }
        next.call(request)
    }
}
