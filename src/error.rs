// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::error_codes;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaSyncError {
    #[error("Failed to fetch webhook configuration {name}: {source}")]
    FetchWebhookConfig {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to update webhook configuration {name}: {source}")]
    UpdateWebhookConfig {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to fetch trust bundle from secret {namespace}/{secret}: {source}")]
    TrustBundle {
        namespace: String,
        secret: String,
        #[source]
        source: CertificateError,
    },

    #[error("Timed out after {timeout:?} while {operation}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl CaSyncError {
    /// Check if the underlying API error is a 404
    pub fn is_not_found(&self) -> bool {
        match self {
            CaSyncError::FetchWebhookConfig { source: e, .. }
            | CaSyncError::UpdateWebhookConfig { source: e, .. } => is_not_found(e),
            _ => false,
        }
    }

    /// Stable code attached to the error log line for alerting
    pub fn code(&self) -> &'static str {
        match self {
            CaSyncError::FetchWebhookConfig { .. } => error_codes::FETCHING_WEBHOOK_CONFIG,
            CaSyncError::TrustBundle { .. } => error_codes::FETCHING_TRUST_BUNDLE,
            CaSyncError::UpdateWebhookConfig { .. } => error_codes::UPDATING_CA_BUNDLE,
            CaSyncError::Timeout { .. } => error_codes::API_TIMEOUT,
        }
    }
}

/// Errors raised while reading the trust bundle secret
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Secret has no data")]
    EmptySecret,

    #[error("Secret does not contain key '{0}'")]
    MissingKey(String),

    #[error("Key '{0}' does not hold a PEM encoded certificate")]
    Malformed(String),
}

pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

pub type Result<T> = std::result::Result<T, CaSyncError>;
