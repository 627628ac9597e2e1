// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CA bundle reconciliation for the injector's MutatingWebhookConfiguration.

use crate::config::Config;
use crate::error::{CaSyncError, Result};
use crate::kubernetes::{CertificateSource, TrustBundle, WebhookStore};
use k8s_openapi::api::admissionregistration::v1::{MutatingWebhook, MutatingWebhookConfiguration};
use k8s_openapi::ByteString;
use kube::runtime::reflector::ObjectRef;
use kube::ResourceExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, trace};

/// Identity of the object that triggered a reconcile. Carries no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub name: String,
    pub namespace: Option<String>,
}

impl ReconcileRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }
}

impl From<&ObjectRef<MutatingWebhookConfiguration>> for ReconcileRequest {
    fn from(obj: &ObjectRef<MutatingWebhookConfiguration>) -> Self {
        Self {
            name: obj.name.clone(),
            namespace: obj.namespace.clone(),
        }
    }
}

/// How a pass that needs no retry ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The request was for an object this syncer does not own
    Ignored,
    /// The object does not exist (anymore)
    Absent,
    /// Every injector entry already carries a CA bundle
    Compliant,
    /// The CA bundle was written into the entries at these indices
    Updated { entries: Vec<usize> },
}

#[derive(Debug)]
pub enum ReconcileOutcome {
    Done(Completion),
    /// Transient failure; the controller should retry later
    Requeue(CaSyncError),
}

impl ReconcileOutcome {
    pub fn is_requeue(&self) -> bool {
        matches!(self, ReconcileOutcome::Requeue(_))
    }
}

/// Keeps the injector webhook entries of one MutatingWebhookConfiguration
/// populated with the current trust bundle.
pub struct CaBundleSyncer {
    store: Arc<dyn WebhookStore>,
    certificates: Arc<dyn CertificateSource>,
    config: Config,
}

impl CaBundleSyncer {
    pub fn new(
        store: Arc<dyn WebhookStore>,
        certificates: Arc<dyn CertificateSource>,
        config: Config,
    ) -> Self {
        Self {
            store,
            certificates,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one fetch-decide-update pass for `request`.
    ///
    /// Never panics and never returns a fatal error: every failure is folded
    /// into either `Done` or `Requeue`.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn reconcile(&self, request: &ReconcileRequest) -> ReconcileOutcome {
        if request.name != self.config.webhook_config_name {
            trace!("Ignoring MutatingWebhookConfiguration {}", request.name);
            return ReconcileOutcome::Done(Completion::Ignored);
        }

        match self.sync(&request.name).await {
            Ok(completion) => ReconcileOutcome::Done(completion),
            Err(e) if e.is_not_found() => {
                debug!(
                    "MutatingWebhookConfiguration {} no longer exists, nothing to reconcile",
                    request.name
                );
                ReconcileOutcome::Done(Completion::Absent)
            }
            Err(e) => ReconcileOutcome::Requeue(e),
        }
    }

    async fn sync(&self, name: &str) -> Result<Completion> {
        let mut webhook_config = self
            .bounded("fetching webhook configuration", self.store.get(name))
            .await?
            .map_err(|source| CaSyncError::FetchWebhookConfig {
                name: name.to_string(),
                source,
            })?;

        if webhook_config.name_any() != self.config.webhook_config_name {
            return Ok(Completion::Ignored);
        }

        let injector = self.config.injector_webhook_name.as_str();
        let mut marked = entries_missing_ca_bundle(&webhook_config, injector);

        let bundle = if self.config.replace_stale_bundles {
            let bundle = self.fetch_trust_bundle().await?;
            marked.extend(entries_with_stale_ca_bundle(
                &webhook_config,
                injector,
                &bundle.cert_chain,
            ));
            marked.sort_unstable();
            Some(bundle)
        } else {
            None
        };

        if marked.is_empty() {
            trace!("MutatingWebhookConfiguration {} already compliant", name);
            return Ok(Completion::Compliant);
        }

        for idx in &marked {
            trace!("CA bundle missing or stale for webhook entry {} of {}", idx, name);
        }

        let bundle = match bundle {
            Some(bundle) => bundle,
            None => self.fetch_trust_bundle().await?,
        };
        apply_ca_bundle(&mut webhook_config, &marked, &bundle.cert_chain);

        self.bounded("updating webhook configuration", self.store.update(&webhook_config))
            .await?
            .map_err(|source| CaSyncError::UpdateWebhookConfig {
                name: name.to_string(),
                source,
            })?;

        info!(
            "Successfully updated CA bundle for MutatingWebhookConfiguration {}",
            name
        );
        Ok(Completion::Updated { entries: marked })
    }

    async fn fetch_trust_bundle(&self) -> Result<TrustBundle> {
        let namespace = self.config.cert_namespace.as_str();
        let secret = self.config.cert_secret_name.as_str();

        self.bounded(
            "fetching trust bundle",
            self.certificates.fetch(namespace, secret),
        )
        .await?
        .map_err(|source| CaSyncError::TrustBundle {
            namespace: namespace.to_string(),
            secret: secret.to_string(),
            source,
        })
    }

    /// Bound an API call by the configured timeout
    async fn bounded<F: Future>(&self, operation: &'static str, fut: F) -> Result<F::Output> {
        with_timeout(self.config.api_timeout, operation, fut).await
    }
}

async fn with_timeout<F: Future>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> Result<F::Output> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| CaSyncError::Timeout { operation, timeout })
}

fn has_ca_bundle(webhook: &MutatingWebhook) -> bool {
    webhook
        .client_config
        .ca_bundle
        .as_ref()
        .is_some_and(|b| !b.0.is_empty())
}

/// Indices of injector entries whose CA bundle is absent or empty
pub fn entries_missing_ca_bundle(config: &MutatingWebhookConfiguration, injector: &str) -> Vec<usize> {
    config
        .webhooks
        .iter()
        .flatten()
        .enumerate()
        .filter(|(_, w)| w.name == injector && !has_ca_bundle(w))
        .map(|(idx, _)| idx)
        .collect()
}

/// Indices of injector entries carrying a non-empty CA bundle different from `cert_chain`
pub fn entries_with_stale_ca_bundle(
    config: &MutatingWebhookConfiguration,
    injector: &str,
    cert_chain: &[u8],
) -> Vec<usize> {
    config
        .webhooks
        .iter()
        .flatten()
        .enumerate()
        .filter(|(_, w)| w.name == injector && has_ca_bundle(w))
        .filter(|(_, w)| {
            w.client_config
                .ca_bundle
                .as_ref()
                .is_some_and(|b| b.0 != cert_chain)
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Write `cert_chain` into the CA bundle of the entries at `indices`, leaving the rest untouched
pub fn apply_ca_bundle(config: &mut MutatingWebhookConfiguration, indices: &[usize], cert_chain: &[u8]) {
    let Some(webhooks) = config.webhooks.as_mut() else {
        return;
    };

    for &idx in indices {
        if let Some(webhook) = webhooks.get_mut(idx) {
            webhook.client_config.ca_bundle = Some(ByteString(cert_chain.to_vec()));
        }
    }
}
