use bollard::models::{ContainerSummary, Port};
use std::collections::HashMap;

/// 런타임에서 읽어온 컨테이너 스냅샷
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub id: String,
    pub names: Vec<String>,
    pub labels: HashMap<String, String>,
    pub ports: Vec<PortMapping>,
}

impl Container {
    /// 로그용 이름 (`/web` → `web`), 이름이 없으면 ID
    pub fn display_name(&self) -> &str {
        self.names.first()
            .map(|name| name.trim_start_matches('/'))
            .unwrap_or(self.id.as_str())
    }
}

/// 공개된 포트 매핑
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: Option<u16>,
    pub host_ip: Option<String>,
    pub protocol: Option<String>,
}

impl PortMapping {
    /// 와일드카드(`0.0.0.0`, `::`)나 빈 값이 아닌 실제 호스트 IP
    pub fn concrete_host_ip(&self) -> Option<&str> {
        self.host_ip.as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty() && *ip != "0.0.0.0" && *ip != "::")
    }
}

impl From<Port> for PortMapping {
    fn from(port: Port) -> Self {
        Self {
            container_port: port.private_port,
            host_port: port.public_port,
            host_ip: port.ip,
            protocol: port.typ.map(|typ| typ.to_string()),
        }
    }
}

impl From<ContainerSummary> for Container {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            names: summary.names.unwrap_or_default(),
            labels: summary.labels.unwrap_or_default(),
            ports: summary.ports
                .unwrap_or_default()
                .into_iter()
                .map(PortMapping::from)
                .collect(),
        }
    }
}
