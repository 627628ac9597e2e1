// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{timing, DEFAULT_CERT_SECRET_NAME, DEFAULT_INJECTOR_WEBHOOK_NAME};
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the MutatingWebhookConfiguration to keep in sync
    pub webhook_config_name: String,
    /// Name of the injector hook entry within that configuration
    pub injector_webhook_name: String,
    /// Namespace of the trust bundle secret
    pub cert_namespace: String,
    pub cert_secret_name: String,
    /// Also replace non-empty bundles that differ from the trust bundle
    pub replace_stale_bundles: bool,
    /// Upper bound for each API call made during a reconcile
    pub api_timeout: Duration,
    pub error_requeue: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            let value = lookup(key).with_context(|| format!("{} environment variable not set", key))?;
            if value.trim().is_empty() {
                bail!("{} environment variable is empty", key);
            }
            Ok(value)
        };

        let webhook_config_name = required("WEBHOOK_CONFIG_NAME")?;
        let cert_namespace = required("CERT_SECRET_NAMESPACE")?;
        let cert_secret_name =
            lookup("CERT_SECRET_NAME").unwrap_or_else(|| DEFAULT_CERT_SECRET_NAME.to_string());
        let injector_webhook_name = lookup("INJECTOR_WEBHOOK_NAME")
            .unwrap_or_else(|| DEFAULT_INJECTOR_WEBHOOK_NAME.to_string());
        let replace_stale_bundles: bool = parse_or(&lookup, "REPLACE_STALE_CA_BUNDLES", false)?;
        let api_timeout_secs: u64 =
            parse_or(&lookup, "API_TIMEOUT_SECS", timing::API_TIMEOUT_SECS)?;
        let error_requeue_secs: u64 =
            parse_or(&lookup, "ERROR_REQUEUE_SECS", timing::ERROR_REQUEUE_SECS)?;

        if api_timeout_secs == 0 {
            bail!("API_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            webhook_config_name,
            injector_webhook_name,
            cert_namespace,
            cert_secret_name,
            replace_stale_bundles,
            api_timeout: Duration::from_secs(api_timeout_secs),
            error_requeue: Duration::from_secs(error_requeue_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value '{}' for {}", raw, key)),
        None => Ok(default),
    }
}
