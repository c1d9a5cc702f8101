//! Backend integrations.
//!
//! The gateway only talks to the backend through [`BackendInvoker`]; which
//! implementation is used comes from `backend.kind` in the configuration.

pub mod greeting;
pub mod http;
pub mod invoker;

use std::sync::Arc;

use crate::config::{BackendConfig, BackendKind};

pub use greeting::GreetingBackend;
pub use http::HttpBackend;
pub use invoker::{BackendInvoker, InvokeError};

/// Build the invoker selected by `config`.
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn BackendInvoker>, InvokeError> {
    match config.kind {
        BackendKind::Greeting => Ok(Arc::new(GreetingBackend::default())),
        BackendKind::Http => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| InvokeError::Request("backend.url is not set".to_string()))?;
            Ok(Arc::new(HttpBackend::new(url)?))
        }
    }
}
