//! Field path configuration
//!
//! A [`PathConfig`] says where inside resources of a given type a transformer
//! should act. The built-in tables are produced by the constructors on
//! [`PathConfigs`] and handed to transformers by value.

use kinflate_core::Gvk;

use crate::error::{EngineError, Result};

/// A field path applying to resources selected by an optional Gvk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConfig {
    gvk: Option<Gvk>,
    path: Vec<String>,
    create_if_not_present: bool,
}

impl PathConfig {
    /// Build a path config, rejecting empty paths and empty segments
    pub fn new<I, S>(gvk: Option<Gvk>, path: I, create_if_not_present: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = Self {
            gvk,
            path: path.into_iter().map(Into::into).collect(),
            create_if_not_present,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from a dotted path such as `spec.template.metadata.labels`
    pub fn parse(gvk: Option<Gvk>, dotted: &str, create_if_not_present: bool) -> Result<Self> {
        Self::new(gvk, dotted.split('.'), create_if_not_present)
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(EngineError::InvalidPathConfig {
                message: "path must not be empty".to_string(),
            });
        }
        if self.path.iter().any(String::is_empty) {
            return Err(EngineError::InvalidPathConfig {
                message: format!("empty segment in `{}`", self.dotted()),
            });
        }
        Ok(())
    }

    pub fn gvk(&self) -> Option<&Gvk> {
        self.gvk.as_ref()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn create_if_not_present(&self) -> bool {
        self.create_if_not_present
    }

    pub fn dotted(&self) -> String {
        self.path.join(".")
    }

    /// Whether this config acts on resources of type `gvk`
    pub fn applies_to(&self, gvk: &Gvk) -> bool {
        self.gvk.as_ref().is_none_or(|selector| gvk.is_selected(selector))
    }
}

/// Where resources of one type are referred to by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePathConfig {
    referenced_gvk: Gvk,
    path_configs: Vec<PathConfig>,
}

impl ReferencePathConfig {
    pub fn new(referenced_gvk: Gvk, path_configs: Vec<PathConfig>) -> Self {
        Self {
            referenced_gvk,
            path_configs,
        }
    }

    pub fn referenced_gvk(&self) -> &Gvk {
        &self.referenced_gvk
    }

    pub fn path_configs(&self) -> &[PathConfig] {
        &self.path_configs
    }
}

/// Workload kinds whose pod template sits at `spec.template`
const TEMPLATED_WORKLOADS: &[&str] = &[
    "Deployment",
    "ReplicaSet",
    "DaemonSet",
    "StatefulSet",
    "Job",
    "ReplicationController",
];

/// Kinds with a `spec.selector.matchLabels` that owns its pods
const SELECTOR_WORKLOADS: &[&str] = &["Deployment", "ReplicaSet", "DaemonSet", "StatefulSet"];

/// Built-in path-config tables
pub struct PathConfigs;

impl PathConfigs {
    /// `metadata.name` on every kind
    pub fn default_name_prefix() -> Vec<PathConfig> {
        vec![builtin(None, "metadata.name", false)]
    }

    pub fn default_labels() -> Vec<PathConfig> {
        let mut configs = vec![
            builtin(None, "metadata.labels", true),
            builtin(Some("Service"), "spec.selector", true),
            builtin(Some("ReplicationController"), "spec.selector", true),
        ];
        for &kind in SELECTOR_WORKLOADS {
            configs.push(builtin(Some(kind), "spec.selector.matchLabels", true));
        }
        for &kind in TEMPLATED_WORKLOADS {
            configs.push(builtin(Some(kind), "spec.template.metadata.labels", true));
        }
        configs.extend([
            builtin(Some("Job"), "spec.selector.matchLabels", false),
            builtin(Some("CronJob"), "spec.jobTemplate.metadata.labels", true),
            builtin(Some("CronJob"), "spec.jobTemplate.spec.selector.matchLabels", false),
            builtin(
                Some("CronJob"),
                "spec.jobTemplate.spec.template.metadata.labels",
                true,
            ),
            builtin(Some("PodDisruptionBudget"), "spec.selector.matchLabels", false),
            builtin(Some("NetworkPolicy"), "spec.podSelector.matchLabels", false),
        ]);
        configs
    }

    pub fn default_annotations() -> Vec<PathConfig> {
        let mut configs = vec![builtin(None, "metadata.annotations", true)];
        for &kind in TEMPLATED_WORKLOADS {
            configs.push(builtin(Some(kind), "spec.template.metadata.annotations", true));
        }
        configs.extend([
            builtin(Some("CronJob"), "spec.jobTemplate.metadata.annotations", true),
            builtin(
                Some("CronJob"),
                "spec.jobTemplate.spec.template.metadata.annotations",
                true,
            ),
        ]);
        configs
    }

    pub fn default_name_references() -> Vec<ReferencePathConfig> {
        vec![
            ReferencePathConfig::new(
                Gvk::kind("ConfigMap"),
                pod_spec_paths(&[
                    "volumes.configMap.name",
                    "volumes.projected.sources.configMap.name",
                    "containers.env.valueFrom.configMapKeyRef.name",
                    "initContainers.env.valueFrom.configMapKeyRef.name",
                    "containers.envFrom.configMapRef.name",
                    "initContainers.envFrom.configMapRef.name",
                ]),
            ),
            ReferencePathConfig::new(Gvk::kind("Secret"), {
                let mut configs = pod_spec_paths(&[
                    "volumes.secret.secretName",
                    "volumes.projected.sources.secret.name",
                    "containers.env.valueFrom.secretKeyRef.name",
                    "initContainers.env.valueFrom.secretKeyRef.name",
                    "containers.envFrom.secretRef.name",
                    "initContainers.envFrom.secretRef.name",
                    "imagePullSecrets.name",
                ]);
                configs.extend([
                    builtin(Some("Ingress"), "spec.tls.secretName", false),
                    builtin(Some("ServiceAccount"), "imagePullSecrets.name", false),
                    builtin(Some("ServiceAccount"), "secrets.name", false),
                ]);
                configs
            }),
            ReferencePathConfig::new(
                Gvk::kind("Service"),
                vec![
                    builtin(Some("Ingress"), "spec.backend.serviceName", false),
                    builtin(
                        Some("Ingress"),
                        "spec.rules.http.paths.backend.serviceName",
                        false,
                    ),
                    builtin(
                        Some("Ingress"),
                        "spec.rules.http.paths.backend.service.name",
                        false,
                    ),
                    builtin(Some("StatefulSet"), "spec.serviceName", false),
                ],
            ),
            ReferencePathConfig::new(Gvk::kind("ServiceAccount"), {
                let mut configs = pod_spec_paths(&["serviceAccountName"]);
                configs.extend([
                    builtin(Some("RoleBinding"), "subjects.name", false),
                    builtin(Some("ClusterRoleBinding"), "subjects.name", false),
                ]);
                configs
            }),
            ReferencePathConfig::new(
                Gvk::kind("PersistentVolumeClaim"),
                pod_spec_paths(&["volumes.persistentVolumeClaim.claimName"]),
            ),
            ReferencePathConfig::new(
                Gvk::kind("Role"),
                vec![builtin(Some("RoleBinding"), "roleRef.name", false)],
            ),
            ReferencePathConfig::new(
                Gvk::kind("ClusterRole"),
                vec![
                    builtin(Some("RoleBinding"), "roleRef.name", false),
                    builtin(Some("ClusterRoleBinding"), "roleRef.name", false),
                ],
            ),
            ReferencePathConfig::new(
                Gvk::kind("Deployment"),
                vec![builtin(
                    Some("HorizontalPodAutoscaler"),
                    "spec.scaleTargetRef.name",
                    false,
                )],
            ),
        ]
    }
}

/// Paths relative to a pod spec, expanded for Pods, templated workloads and
/// CronJobs
fn pod_spec_paths(suffixes: &[&str]) -> Vec<PathConfig> {
    let mut configs = Vec::new();
    for suffix in suffixes {
        configs.push(builtin(Some("Pod"), &format!("spec.{suffix}"), false));
        for &kind in TEMPLATED_WORKLOADS {
            configs.push(builtin(
                Some(kind),
                &format!("spec.template.spec.{suffix}"),
                false,
            ));
        }
        configs.push(builtin(
            Some("CronJob"),
            &format!("spec.jobTemplate.spec.template.spec.{suffix}"),
            false,
        ));
    }
    configs
}

// Table entries are literals; `tests::test_default_tables_are_valid` checks them.
fn builtin(kind: Option<&str>, dotted: &str, create_if_not_present: bool) -> PathConfig {
    PathConfig {
        gvk: kind.map(Gvk::kind),
        path: dotted.split('.').map(str::to_string).collect(),
        create_if_not_present,
    }
}
