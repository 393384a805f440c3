use crate::dynamic::{TcpConfiguration, TcpServer, TcpServersLoadBalancer};
use super::{apply_domain, parse_bool, parse_int, parse_list, Entry, Result};

pub(super) fn apply_router(tcp: &mut TcpConfiguration, entry: &Entry) -> Result<()> {
    let router = tcp.routers.entry(entry.name.to_string()).or_default();
    let value = entry.value.to_string();

    match entry.path().as_slice() {
        ["entrypoints"] => router.entry_points = parse_list(entry.value),
        ["middlewares"] => router.middlewares = parse_list(entry.value),
        ["service"] => router.service = value,
        ["rule"] => router.rule = value,
        ["rulesyntax"] => router.rule_syntax = Some(value),
        ["priority"] => router.priority = Some(parse_int(entry)?),
        ["tls"] => {
            if parse_bool(entry)? {
                router.tls.get_or_insert_with(Default::default);
            } else {
                router.tls = None;
            }
        }
        ["tls", "passthrough"] => router.tls.get_or_insert_with(Default::default).passthrough = parse_bool(entry)?,
        ["tls", "certresolver"] => router.tls.get_or_insert_with(Default::default).cert_resolver = Some(value),
        ["tls", "options"] => router.tls.get_or_insert_with(Default::default).options = Some(value),
        ["tls", domains, field] if domains.starts_with("domains[") => {
            let tls = router.tls.get_or_insert_with(Default::default);
            apply_domain(&mut tls.domains, entry, domains, field)?
        }
        _ => return Err(entry.unknown()),
    }

    Ok(())
}

pub(super) fn apply_service(tcp: &mut TcpConfiguration, entry: &Entry) -> Result<()> {
    let service = tcp.services.entry(entry.name.to_string()).or_default();
    let lb = &mut service.load_balancer;
    let value = entry.value.to_string();

    match entry.path().as_slice() {
        ["loadbalancer", "server", "port"] => first_server(lb).port = value.trim().to_string(),
        ["loadbalancer", "server", "tls"] => first_server(lb).tls = parse_bool(entry)?,
        ["loadbalancer", "proxyprotocol", "version"] => {
            lb.proxy_protocol.get_or_insert_with(Default::default).version = Some(parse_int(entry)?)
        }
        ["loadbalancer", "serverstransport"] => lb.servers_transport = Some(value),
        ["loadbalancer", "terminationdelay"] => lb.termination_delay = Some(parse_int(entry)?),
        _ => return Err(entry.unknown()),
    }

    Ok(())
}

fn first_server(lb: &mut TcpServersLoadBalancer) -> &mut TcpServer {
    if lb.servers.is_empty() {
        lb.servers.push(TcpServer::default());
    }
    &mut lb.servers[0]
}
