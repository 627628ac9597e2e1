// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes-backed collaborators: the webhook configuration store and the trust bundle source.

pub mod certificate;
pub mod store;

pub use certificate::{CertificateSource, KubeCertificateSource, TrustBundle};
pub use store::{KubeWebhookStore, WebhookStore};
