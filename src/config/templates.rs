//! Container template registry
//!
//! Callers pick one of these named templates instead of supplying arbitrary
//! container definitions. The registry is built once on first use and never
//! mutated afterwards.

use k8s_openapi::api::core::v1::{
    Container, ContainerPort, ExecAction, HTTPGetAction, Probe, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Name given to the single container of every template
pub const CONTAINER_NAME: &str = "main";

/// Known container templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerTemplate {
    Ubuntu,
    Nginx,
    Busybox,
    Alpine,
}

impl ContainerTemplate {
    pub const ALL: [ContainerTemplate; 4] = [
        ContainerTemplate::Ubuntu,
        ContainerTemplate::Nginx,
        ContainerTemplate::Busybox,
        ContainerTemplate::Alpine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerTemplate::Ubuntu => "ubuntu",
            ContainerTemplate::Nginx => "nginx",
            ContainerTemplate::Busybox => "busybox",
            ContainerTemplate::Alpine => "alpine",
        }
    }

    /// Build the container specification for this template
    fn container(&self) -> Container {
        match self {
            ContainerTemplate::Ubuntu => Container {
                name: CONTAINER_NAME.to_string(),
                image: Some("ubuntu:latest".to_string()),
                command: Some(strings(&["/bin/bash"])),
                args: Some(strings(&["-c", "sleep infinity"])),
                resources: Some(default_resources()),
                liveness_probe: Some(exec_probe(&["cat", "/proc/1/status"])),
                ..Default::default()
            },
            ContainerTemplate::Nginx => Container {
                name: CONTAINER_NAME.to_string(),
                image: Some("nginx:latest".to_string()),
                ports: Some(vec![ContainerPort {
                    container_port: 80,
                    ..Default::default()
                }]),
                resources: Some(default_resources()),
                liveness_probe: Some(http_probe("/", 80)),
                readiness_probe: Some(http_probe("/", 80)),
                ..Default::default()
            },
            ContainerTemplate::Busybox => shell_container("busybox:latest"),
            ContainerTemplate::Alpine => shell_container("alpine:latest"),
        }
    }
}

impl fmt::Display for ContainerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|template| template.as_str() == s)
            .ok_or_else(|| format!("Invalid template: {}", s))
    }
}

static REGISTRY: LazyLock<BTreeMap<&'static str, Container>> = LazyLock::new(|| {
    ContainerTemplate::ALL
        .iter()
        .map(|template| (template.as_str(), template.container()))
        .collect()
});

/// Look up the container specification registered under `name`
pub fn resolve(name: &str) -> Option<&'static Container> {
    REGISTRY.get(name)
}

/// Names of all registered templates, in sorted order
pub fn template_names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

/// Iterate over every registered template
pub fn list() -> impl Iterator<Item = (&'static str, &'static Container)> {
    REGISTRY.iter().map(|(name, container)| (*name, container))
}

fn shell_container(image: &str) -> Container {
    Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(image.to_string()),
        command: Some(strings(&["sh"])),
        args: Some(strings(&["-c", "sleep infinity"])),
        resources: Some(default_resources()),
        liveness_probe: Some(exec_probe(&["true"])),
        ..Default::default()
    }
}

fn default_resources() -> ResourceRequirements {
    ResourceRequirements {
        limits: Some(quantities("200m", "256Mi")),
        requests: Some(quantities("100m", "128Mi")),
        ..Default::default()
    }
}

fn quantities(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.to_string())),
        ("memory".to_string(), Quantity(memory.to_string())),
    ])
}

fn exec_probe(command: &[&str]) -> Probe {
    Probe {
        exec: Some(ExecAction {
            command: Some(strings(command)),
        }),
        initial_delay_seconds: Some(5),
        period_seconds: Some(10),
        ..Default::default()
    }
}

fn http_probe(path: &str, port: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path.to_string()),
            port: IntOrString::Int(port),
            ..Default::default()
        }),
        initial_delay_seconds: Some(5),
        period_seconds: Some(10),
        ..Default::default()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
