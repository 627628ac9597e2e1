// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Trust bundle retrieval from Kubernetes secrets

use crate::constants::secret_keys;
use crate::error::CertificateError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

const PEM_CERTIFICATE_HEADER: &str = "-----BEGIN CERTIFICATE-----";

/// The CA material the injector webhook is served with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustBundle {
    /// PEM certificate chain written into the webhook client config
    pub cert_chain: Vec<u8>,
    pub issuing_ca: Option<Vec<u8>>,
}

/// Supplies the current trust bundle for a namespace and secret name
#[async_trait]
pub trait CertificateSource: Send + Sync {
    async fn fetch(&self, namespace: &str, secret_name: &str)
        -> Result<TrustBundle, CertificateError>;
}

/// Reads the trust bundle from a Secret on every call
pub struct KubeCertificateSource {
    client: Client,
}

impl KubeCertificateSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CertificateSource for KubeCertificateSource {
    #[instrument(skip(self))]
    async fn fetch(
        &self,
        namespace: &str,
        secret_name: &str,
    ) -> Result<TrustBundle, CertificateError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets.get(secret_name).await?;

        debug!("Read trust bundle secret {}/{}", namespace, secret_name);
        trust_bundle_from_secret(&secret)
    }
}

/// Extract the trust bundle from secret data.
///
/// `tls.crt` is the chain; when it is missing the issuing CA in `ca.crt` is used instead.
pub fn trust_bundle_from_secret(secret: &Secret) -> Result<TrustBundle, CertificateError> {
    let Some(data) = secret.data.as_ref().filter(|d| !d.is_empty()) else {
        return Err(CertificateError::EmptySecret);
    };

    let issuing_ca = pem_value(data, secret_keys::CA)?;
    let cert_chain = match pem_value(data, secret_keys::CERT_CHAIN)? {
        Some(chain) => chain,
        None => issuing_ca
            .clone()
            .ok_or_else(|| CertificateError::MissingKey(secret_keys::CERT_CHAIN.to_string()))?,
    };

    Ok(TrustBundle {
        cert_chain,
        issuing_ca,
    })
}

fn pem_value(
    data: &BTreeMap<String, ByteString>,
    key: &str,
) -> Result<Option<Vec<u8>>, CertificateError> {
    let Some(value) = data.get(key) else {
        return Ok(None);
    };

    let is_pem = std::str::from_utf8(&value.0)
        .map(|s| s.contains(PEM_CERTIFICATE_HEADER))
        .unwrap_or(false);
    if !is_pem {
        return Err(CertificateError::Malformed(key.to_string()));
    }

    Ok(Some(value.0.clone()))
}
