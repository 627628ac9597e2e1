// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read/write access to MutatingWebhookConfiguration objects

use crate::constants::OPERATOR_NAME;
use async_trait::async_trait;
use k8s_openapi::api::admissionregistration::v1::MutatingWebhookConfiguration;
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{debug, instrument};

/// Typed get/update access to webhook configurations.
///
/// `update` must reject writes whose `resourceVersion` is stale so that the
/// caller redoes the whole fetch-decide-update cycle.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<MutatingWebhookConfiguration, kube::Error>;

    async fn update(
        &self,
        config: &MutatingWebhookConfiguration,
    ) -> Result<MutatingWebhookConfiguration, kube::Error>;
}

/// Store backed by the Kubernetes API server
pub struct KubeWebhookStore {
    api: Api<MutatingWebhookConfiguration>,
}

impl KubeWebhookStore {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl WebhookStore for KubeWebhookStore {
    #[instrument(skip(self))]
    async fn get(&self, name: &str) -> Result<MutatingWebhookConfiguration, kube::Error> {
        self.api.get(name).await
    }

    #[instrument(skip(self, config), fields(name = %config.name_any()))]
    async fn update(
        &self,
        config: &MutatingWebhookConfiguration,
    ) -> Result<MutatingWebhookConfiguration, kube::Error> {
        let name = config.name_any();
        let pp = PostParams {
            field_manager: Some(OPERATOR_NAME.to_string()),
            ..Default::default()
        };

        debug!(
            "Replacing MutatingWebhookConfiguration {} at resourceVersion {:?}",
            name,
            config.resource_version()
        );
        self.api.replace(&name, &pp, config).await
    }
}
