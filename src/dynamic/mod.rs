//! Traefik 동적 설정(dynamic configuration) 모델.
//!
//! JSON 으로 직렬화했을 때 Traefik HTTP provider 가 그대로 읽을 수 있는 형태를 따릅니다.

pub mod http;
pub mod tcp;
pub mod udp;
mod merge;

pub use http::{
    Cookie, Domain, HttpConfiguration, ResponseForwarding, Router, RouterObservability, RouterTls,
    Server, ServerHealthCheck, ServersLoadBalancer, Service, Sticky,
};
pub use tcp::{
    ProxyProtocol, RouterTcpTls, TcpConfiguration, TcpRouter, TcpServer, TcpServersLoadBalancer,
    TcpService,
};
pub use udp::{UdpConfiguration, UdpRouter, UdpServer, UdpServersLoadBalancer, UdpService};
pub use merge::merge;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    pub http: HttpConfiguration,
    pub tcp: TcpConfiguration,
    pub udp: UdpConfiguration,
}

/// 비어있지 않은 프로토콜 섹션만 담은 응답 본문
#[derive(Debug, Serialize)]
pub struct ProviderSections<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<&'a HttpConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<&'a TcpConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<&'a UdpConfiguration>,
}

impl Configuration {
    pub fn is_empty(&self) -> bool {
        self.http.is_empty() && self.tcp.is_empty() && self.udp.is_empty()
    }

    pub fn provider_sections(&self) -> ProviderSections<'_> {
        ProviderSections {
            http: (!self.http.is_empty()).then_some(&self.http),
            tcp: (!self.tcp.is_empty()).then_some(&self.tcp),
            udp: (!self.udp.is_empty()).then_some(&self.udp),
        }
    }
}
