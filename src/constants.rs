// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Name of the injector hook entry inside the webhook configuration
pub const DEFAULT_INJECTOR_WEBHOOK_NAME: &str = "osm-inject.k8s.io";

/// Secret holding the injector webhook serving certificate
pub const DEFAULT_CERT_SECRET_NAME: &str = "mutating-webhook-cert-secret";

/// The field manager recorded on updates
pub const OPERATOR_NAME: &str = "webhook-ca-sync";

/// Keys inside the trust bundle secret
pub mod secret_keys {
    /// Certificate chain written into the webhook client config
    pub const CERT_CHAIN: &str = "tls.crt";
    /// Issuing CA, also used as the chain when `tls.crt` is absent
    pub const CA: &str = "ca.crt";
}

/// Error codes attached to error logs as the `error_code` field
pub mod error_codes {
    pub const FETCHING_WEBHOOK_CONFIG: &str = "E7001";
    /// Broken trust chain upstream
    pub const FETCHING_TRUST_BUNDLE: &str = "E7002";
    pub const UPDATING_CA_BUNDLE: &str = "E7003";
    pub const API_TIMEOUT: &str = "E7004";
}

/// Defaults for the timing knobs in [`crate::config::Config`]
pub mod timing {
    pub const API_TIMEOUT_SECS: u64 = 30;
    pub const ERROR_REQUEUE_SECS: u64 = 60;
}
