//! Core entities: Kubernetes resource ordering and apply plans

use std::fmt;
use std::path::PathBuf;

/// Kubernetes resource kinds in apply order.
///
/// The variant order IS the apply order: cluster-scoped prerequisites
/// first, then configuration, storage, RBAC, networking endpoints,
/// workloads, and finally ingress. `Other` kinds sort after all known
/// kinds, alphabetically by name (derived `Ord` gives both properties).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Namespace,
    ConfigMap,
    Secret,
    PersistentVolume,
    PersistentVolumeClaim,
    ServiceAccount,
    Role,
    RoleBinding,
    Service,
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    Ingress,
    Other(String),
}

impl ResourceKind {
    /// Parse a `k8s/<resource-type>/` directory name.
    ///
    /// Accepts singular, plural, and common kubectl short forms,
    /// case-insensitively. Unrecognized names become `Other`.
    pub fn from_dir_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "namespace" | "namespaces" | "ns" => Self::Namespace,
            "configmap" | "configmaps" | "cm" => Self::ConfigMap,
            "secret" | "secrets" => Self::Secret,
            "persistentvolume" | "persistentvolumes" | "pv" => Self::PersistentVolume,
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" => {
                Self::PersistentVolumeClaim
            }
            "serviceaccount" | "serviceaccounts" | "sa" => Self::ServiceAccount,
            "role" | "roles" => Self::Role,
            "rolebinding" | "rolebindings" => Self::RoleBinding,
            "service" | "services" | "svc" => Self::Service,
            "deployment" | "deployments" | "deploy" => Self::Deployment,
            "statefulset" | "statefulsets" | "sts" => Self::StatefulSet,
            "daemonset" | "daemonsets" | "ds" => Self::DaemonSet,
            "job" | "jobs" => Self::Job,
            "cronjob" | "cronjobs" | "cj" => Self::CronJob,
            "ingress" | "ingresses" | "ing" => Self::Ingress,
            other => Self::Other(other.to_string()),
        }
    }

    /// Parse a manifest's `kind:` field (CamelCase, as kubectl emits it).
    pub fn from_kind_name(kind: &str) -> Self {
        match kind {
            "Namespace" => Self::Namespace,
            "ConfigMap" => Self::ConfigMap,
            "Secret" => Self::Secret,
            "PersistentVolume" => Self::PersistentVolume,
            "PersistentVolumeClaim" => Self::PersistentVolumeClaim,
            "ServiceAccount" => Self::ServiceAccount,
            "Role" => Self::Role,
            "RoleBinding" => Self::RoleBinding,
            "Service" => Self::Service,
            "Deployment" => Self::Deployment,
            "StatefulSet" => Self::StatefulSet,
            "DaemonSet" => Self::DaemonSet,
            "Job" => Self::Job,
            "CronJob" => Self::CronJob,
            "Ingress" => Self::Ingress,
            other => Self::Other(other.to_lowercase()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Namespace => "namespace",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
            Self::PersistentVolume => "persistentvolume",
            Self::PersistentVolumeClaim => "persistentvolumeclaim",
            Self::ServiceAccount => "serviceaccount",
            Self::Role => "role",
            Self::RoleBinding => "rolebinding",
            Self::Service => "service",
            Self::Deployment => "deployment",
            Self::StatefulSet => "statefulset",
            Self::DaemonSet => "daemonset",
            Self::Job => "job",
            Self::CronJob => "cronjob",
            Self::Ingress => "ingress",
            Self::Other(name) => name,
        };
        write!(f, "{name}")
    }
}

/// A single manifest file with its resolved resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    pub kind: ResourceKind,
    pub path: PathBuf,
}

/// An ordered sequence of manifests ready for `kubectl apply`.
#[derive(Debug, Clone, Default)]
pub struct ApplyPlan {
    manifests: Vec<ManifestFile>,
}

impl ApplyPlan {
    /// Build a plan from unordered manifests.
    ///
    /// Sorting is by kind rank first, then by path, so the plan is
    /// deterministic regardless of filesystem iteration order.
    pub fn new(mut manifests: Vec<ManifestFile>) -> Self {
        manifests.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.path.cmp(&b.path))
        });
        Self { manifests }
    }

    pub fn manifests(&self) -> &[ManifestFile] {
        &self.manifests
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

/// What `docker cleanup` prunes, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneTarget {
    Containers,
    Images,
    Networks,
    Volumes,
}

impl PruneTarget {
    /// The docker object subcommand to prune.
    pub fn object(&self) -> &'static str {
        match self {
            Self::Containers => "container",
            Self::Images => "image",
            Self::Networks => "network",
            Self::Volumes => "volume",
        }
    }

    /// Whether `--filter until=<h>h` is accepted (volume prune rejects it).
    pub fn supports_until_filter(&self) -> bool {
        !matches!(self, Self::Volumes)
    }
}

impl fmt::Display for PruneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Containers => write!(f, "containers"),
            Self::Images => write!(f, "images"),
            Self::Networks => write!(f, "networks"),
            Self::Volumes => write!(f, "volumes"),
        }
    }
}
