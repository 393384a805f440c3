use crate::dynamic::{UdpConfiguration, UdpServer};
use super::{parse_list, Entry, Result};

pub(super) fn apply_router(udp: &mut UdpConfiguration, entry: &Entry) -> Result<()> {
    let router = udp.routers.entry(entry.name.to_string()).or_default();

    match entry.path().as_slice() {
        ["entrypoints"] => router.entry_points = parse_list(entry.value),
        ["service"] => router.service = entry.value.to_string(),
        _ => return Err(entry.unknown()),
    }

    Ok(())
}

pub(super) fn apply_service(udp: &mut UdpConfiguration, entry: &Entry) -> Result<()> {
    let service = udp.services.entry(entry.name.to_string()).or_default();
    let servers = &mut service.load_balancer.servers;

    match entry.path().as_slice() {
        ["loadbalancer", "server", "port"] => {
            if servers.is_empty() {
                servers.push(UdpServer::default());
            }
            servers[0].port = entry.value.trim().to_string();
        }
        _ => return Err(entry.unknown()),
    }

    Ok(())
}
