// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! MutatingWebhookConfiguration reconciler - watches the target configuration and
//! hands each trigger to the CA bundle syncer.

use crate::error::{CaSyncError, Result};
use crate::sync::{CaBundleSyncer, Completion, ReconcileOutcome, ReconcileRequest};
use futures::StreamExt;
use k8s_openapi::api::admissionregistration::v1::MutatingWebhookConfiguration;
use kube::{
    runtime::{controller::Action, reflector::ObjectRef, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

pub struct WebhookConfigReconciler {
    client: Client,
    syncer: CaBundleSyncer,
}

impl WebhookConfigReconciler {
    pub fn new(client: Client, syncer: CaBundleSyncer) -> Self {
        Self { client, syncer }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let webhook_configs: Api<MutatingWebhookConfiguration> = Api::all(self.client.clone());
        let watcher_config = WatcherConfig::default().fields(&format!(
            "metadata.name={}",
            self.syncer.config().webhook_config_name
        ));
        let context = Arc::new(self);

        Controller::new(webhook_configs, watcher_config)
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled MutatingWebhookConfiguration: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(
    webhook_config: Arc<MutatingWebhookConfiguration>,
    ctx: Arc<WebhookConfigReconciler>,
) -> Result<Action> {
    // Only the identity is used; the syncer always re-reads the object
    let request = ReconcileRequest::from(&ObjectRef::from_obj(&*webhook_config));
    let outcome = ctx.syncer.reconcile(&request).await;
    action_for(&request, outcome)
}

/// Report the outcome and translate it into a controller action
fn action_for(request: &ReconcileRequest, outcome: ReconcileOutcome) -> Result<Action> {
    match outcome {
        ReconcileOutcome::Done(Completion::Ignored) => {
            trace!("Skipping MutatingWebhookConfiguration {}", request.name);
        }
        ReconcileOutcome::Done(Completion::Absent) => {
            debug!("MutatingWebhookConfiguration {} not found", request.name);
        }
        ReconcileOutcome::Done(Completion::Compliant) => {
            debug!("MutatingWebhookConfiguration {} is compliant", request.name);
        }
        ReconcileOutcome::Done(Completion::Updated { entries }) => {
            info!(
                name = %request.name,
                entries = ?entries,
                "Patched CA bundle into MutatingWebhookConfiguration"
            );
        }
        ReconcileOutcome::Requeue(e) => return Err(e),
    }

    // Wait for the next change - the watcher will notify us when the configuration changes
    Ok(Action::await_change())
}

fn error_policy(
    webhook_config: Arc<MutatingWebhookConfiguration>,
    error: &CaSyncError,
    ctx: Arc<WebhookConfigReconciler>,
) -> Action {
    error!(
        name = %webhook_config.name_any(),
        error_code = error.code(),
        "Reconciliation error: {}",
        error
    );
    Action::requeue(ctx.syncer.config().error_requeue)
}
