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

use k8s_openapi::api::apps::v1::DaemonSet;
use k8s_openapi::api::core::v1::Pod;

pub const APP_LABEL: &str = "app";
pub const PART_OF_LABEL: &str = "app.kubernetes.io/part-of";

/// Labels the validator pod owns itself and never takes from the DaemonSet template.
const POD_OWNED_LABELS: [&str; 2] = [APP_LABEL, PART_OF_LABEL];

/// Copies custom labels and annotations from the DaemonSet's pod template onto `pod`.
///
/// Template values win for every key except the pod-owned identity labels, which
/// keep whatever the pod already had (including nothing). Label and annotation
/// maps are only created when there is something to put in them.
pub fn apply_daemonset_metadata_to_pod(pod: &mut Pod, daemonset: &DaemonSet) {
    let Some(template_meta) = daemonset
        .spec
        .as_ref()
        .and_then(|spec| spec.template.metadata.as_ref())
    else {
        return;
    };

    if let Some(template_labels) = &template_meta.labels {
        for (key, value) in template_labels {
            if POD_OWNED_LABELS.contains(&key.as_str()) {
                continue;
            }
            pod.metadata
                .labels
                .get_or_insert_with(Default::default)
                .insert(key.clone(), value.clone());
        }
    }

    if let Some(template_annotations) = &template_meta.annotations {
        for (key, value) in template_annotations {
            pod.metadata
                .annotations
                .get_or_insert_with(Default::default)
                .insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use k8s_openapi::api::apps::v1::DaemonSetSpec;
    use k8s_openapi::api::core::v1::PodTemplateSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pod(labels: Option<&[(&str, &str)]>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                labels: labels.map(map),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn daemonset(template_meta: Option<ObjectMeta>) -> DaemonSet {
        DaemonSet {
            spec: Some(DaemonSetSpec {
                template: PodTemplateSpec {
                    metadata: template_meta,
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_daemonset_metadata_to_pod() {
        struct Case {
            name: &'static str,
            pod: Pod,
            daemonset: DaemonSet,
            want_labels: Option<BTreeMap<String, String>>,
            want_annotations: Option<BTreeMap<String, String>>,
        }
        let cases = [
            Case {
                name: "empty daemonset template - no change",
                pod: pod(Some(&[("app", "nvidia-cuda-validator")])),
                daemonset: daemonset(Some(ObjectMeta::default())),
                want_labels: Some(map(&[("app", "nvidia-cuda-validator")])),
                want_annotations: None,
            },
            Case {
                name: "custom labels applied, app and app.kubernetes.io/part-of skipped",
                pod: pod(Some(&[("app", "nvidia-cuda-validator")])),
                daemonset: daemonset(Some(ObjectMeta {
                    labels: Some(map(&[
                        ("app", "should-be-skipped"),
                        ("app.kubernetes.io/part-of", "should-be-skipped"),
                        ("custom.company.com/team", "gpu-ops"),
                        ("custom.company.com/env", "prod"),
                    ])),
                    ..Default::default()
                })),
                want_labels: Some(map(&[
                    ("app", "nvidia-cuda-validator"),
                    ("custom.company.com/team", "gpu-ops"),
                    ("custom.company.com/env", "prod"),
                ])),
                want_annotations: None,
            },
            Case {
                name: "annotations applied",
                pod: pod(Some(&[("app", "nvidia-cuda-validator")])),
                daemonset: daemonset(Some(ObjectMeta {
                    annotations: Some(map(&[("custom.annotation/key", "value")])),
                    ..Default::default()
                })),
                want_labels: Some(map(&[("app", "nvidia-cuda-validator")])),
                want_annotations: Some(map(&[("custom.annotation/key", "value")])),
            },
            Case {
                name: "pod with nil labels gets labels and annotations",
                pod: pod(None),
                daemonset: daemonset(Some(ObjectMeta {
                    labels: Some(map(&[("extra", "label")])),
                    annotations: Some(map(&[("extra", "anno")])),
                    ..Default::default()
                })),
                want_labels: Some(map(&[("extra", "label")])),
                want_annotations: Some(map(&[("extra", "anno")])),
            },
            Case {
                name: "pod without app label does not inherit it",
                pod: pod(None),
                daemonset: daemonset(Some(ObjectMeta {
                    labels: Some(map(&[
                        ("app", "nvidia-operator-validator"),
                        ("app.kubernetes.io/part-of", "gpu-operator"),
                    ])),
                    ..Default::default()
                })),
                want_labels: None,
                want_annotations: None,
            },
            Case {
                name: "template values overwrite other pod labels",
                pod: pod(Some(&[("app", "nvidia-cuda-validator"), ("team", "old")])),
                daemonset: daemonset(Some(ObjectMeta {
                    labels: Some(map(&[("team", "new")])),
                    ..Default::default()
                })),
                want_labels: Some(map(&[("app", "nvidia-cuda-validator"), ("team", "new")])),
                want_annotations: None,
            },
            Case {
                name: "daemonset without template metadata",
                pod: pod(None),
                daemonset: daemonset(None),
                want_labels: None,
                want_annotations: None,
            },
            Case {
                name: "daemonset without spec",
                pod: pod(Some(&[("app", "nvidia-cuda-validator")])),
                daemonset: DaemonSet::default(),
                want_labels: Some(map(&[("app", "nvidia-cuda-validator")])),
                want_annotations: None,
            },
        ];

        for mut case in cases {
            let before = case.daemonset.clone();
            apply_daemonset_metadata_to_pod(&mut case.pod, &case.daemonset);
            assert_eq!(case.pod.metadata.labels, case.want_labels, "{}", case.name);
            assert_eq!(
                case.pod.metadata.annotations, case.want_annotations,
                "{}",
                case.name
            );
            assert_eq!(case.daemonset, before, "{}: daemonset mutated", case.name);
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let ds = daemonset(Some(ObjectMeta {
            labels: Some(map(&[("app", "other"), ("custom", "label")])),
            annotations: Some(map(&[("custom", "anno")])),
            ..Default::default()
        }));
        let mut once = pod(Some(&[("app", "nvidia-cuda-validator")]));
        apply_daemonset_metadata_to_pod(&mut once, &ds);
        let mut twice = once.clone();
        apply_daemonset_metadata_to_pod(&mut twice, &ds);
        assert_eq!(once, twice);
    }
}
