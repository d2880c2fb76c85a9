/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::path::Path;

use k8s_openapi::api::apps::v1::DaemonSet;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use crate::errors::{ValidatorError, ValidatorResult};
use crate::metadata::apply_daemonset_metadata_to_pod;

/// Loads a validator pod manifest (YAML).
pub fn load_pod_template(path: &Path) -> ValidatorResult<Pod> {
    let template_error = |reason: String| ValidatorError::PodTemplate {
        path: path.to_path_buf(),
        reason,
    };
    let data = std::fs::read_to_string(path).map_err(|e| template_error(e.to_string()))?;
    serde_yaml::from_str(&data).map_err(|e| template_error(e.to_string()))
}

/// Turns a pod template into the validator pod for `node_name`, owned by `daemonset`.
pub fn build_validator_pod(mut pod: Pod, daemonset: &DaemonSet, node_name: &str) -> Pod {
    if let Some(name) = pod.metadata.name.as_mut() {
        *name = format!("{name}-{node_name}");
    }
    if pod.metadata.namespace.is_none() {
        pod.metadata.namespace = daemonset.metadata.namespace.clone();
    }

    pod.spec.get_or_insert_with(Default::default).node_name = Some(node_name.to_string());

    match (&daemonset.metadata.name, &daemonset.metadata.uid) {
        (Some(name), Some(uid)) => {
            let owner = OwnerReference {
                api_version: "apps/v1".to_string(),
                kind: "DaemonSet".to_string(),
                name: name.clone(),
                uid: uid.clone(),
                controller: Some(true),
                block_owner_deletion: Some(true),
            };
            let owners = pod.metadata.owner_references.get_or_insert_with(Vec::new);
            if !owners.iter().any(|o| o.uid == owner.uid) {
                owners.push(owner);
            }
        }
        _ => {
            tracing::warn!(
                daemonset = ?daemonset.metadata.name,
                "DaemonSet has no name or uid, validator pod will not be garbage collected with it"
            );
        }
    }

    apply_daemonset_metadata_to_pod(&mut pod, daemonset);
    pod
}
