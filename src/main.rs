// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webhook_ca_sync::config::Config;
use webhook_ca_sync::kubernetes::{KubeCertificateSource, KubeWebhookStore};
use webhook_ca_sync::reconcilers::WebhookConfigReconciler;
use webhook_ca_sync::sync::CaBundleSyncer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting webhook CA bundle sync");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: webhook_config={}, injector_webhook={}, cert_secret={}/{}, replace_stale_bundles={}",
        config.webhook_config_name,
        config.injector_webhook_name,
        config.cert_namespace,
        config.cert_secret_name,
        config.replace_stale_bundles
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let syncer = CaBundleSyncer::new(
        Arc::new(KubeWebhookStore::new(client.clone())),
        Arc::new(KubeCertificateSource::new(client.clone())),
        config,
    );
    let reconciler = WebhookConfigReconciler::new(client, syncer);

    info!("Starting reconciler...");
    reconciler.run().await?;

    warn!("Reconciler stopped");
    Ok(())
}
