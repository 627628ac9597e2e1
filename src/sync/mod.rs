// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CA bundle synchronization logic.

pub mod ca_bundle;

pub use ca_bundle::{CaBundleSyncer, Completion, ReconcileOutcome, ReconcileRequest};
