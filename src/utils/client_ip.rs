//! Client address extraction for access logs.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Returns the address to record for the visitor.
///
/// With `behind_proxy` set, the first parseable entry of `X-Forwarded-For`
/// wins and the peer address is the fallback. Otherwise only the peer
/// address is trusted, since the header is client-controlled.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> Option<IpAddr> {
    if behind_proxy {
        if let Some(ip) = forwarded_for(headers) {
            return Some(ip);
        }
    }

    peer.map(|addr| addr.ip())
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.2:51234".parse().unwrap())
    }

    fn headers(forwarded: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_str(forwarded).unwrap());
        headers
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let ip = client_ip(&headers("203.0.113.7"), peer(), false);
        assert_eq!(ip, Some("10.0.0.2".parse().unwrap()));
    }

    #[test]
    fn test_first_forwarded_entry_behind_proxy() {
        let ip = client_ip(&headers("203.0.113.7, 198.51.100.1"), peer(), true);
        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_ipv6_forwarded_entry() {
        let ip = client_ip(&headers("2001:db8::1"), peer(), true);
        assert_eq!(ip, Some("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_garbage_header_falls_back_to_peer() {
        let ip = client_ip(&headers("unknown"), peer(), true);
        assert_eq!(ip, Some("10.0.0.2".parse().unwrap()));
    }

    #[test]
    fn test_no_address_available() {
        assert_eq!(client_ip(&HeaderMap::new(), None, true), None);
    }
}
