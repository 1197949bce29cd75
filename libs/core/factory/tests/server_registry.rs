use core_config::ServerCfg;
use grpc_kit::{LocalAddr, ServerInterceptor};
use service_factory::{Bound, FactoryError, ServerRegistry, server};
use std::sync::Barrier;

fn free_tcp_uri() -> String {
    let scratch = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = scratch.local_addr().unwrap();
    drop(scratch);
    format!("tcp://{addr}")
}

#[test]
fn same_uri_twice_shares_the_binding() {
    let registry = ServerRegistry::new();
    let cfg = ServerCfg::new(free_tcp_uri());

    let first = server(&cfg, &registry).unwrap();
    let second = server(&cfg, &registry).unwrap();

    assert!(matches!(first, Bound::New(_)));
    assert!(second.already_bound());
    assert!(first.binding().same_binding(second.binding()));
    assert_eq!(registry.len(), 1);

    let err = second.into_result().unwrap_err();
    assert!(matches!(err, FactoryError::AlreadyBound { ref uri } if *uri == cfg.listen_uri));
}

#[test]
fn concurrent_requests_bind_once() {
    const CALLERS: usize = 8;
    let registry = ServerRegistry::new();
    let cfg = ServerCfg::new(free_tcp_uri());
    let barrier = Barrier::new(CALLERS);

    let results: Vec<Bound> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    server(&cfg, &registry)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    let fresh = results.iter().filter(|b| !b.already_bound()).count();
    assert_eq!(fresh, 1);
    assert_eq!(results.len() - fresh, CALLERS - 1);
    let first = results[0].binding();
    assert!(results.iter().all(|b| b.binding().same_binding(first)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn registries_are_independent() {
    let cfg = ServerCfg::new("tcp://127.0.0.1:0");
    let a = ServerRegistry::new();
    let b = ServerRegistry::new();

    let from_a = server(&cfg, &a).unwrap();
    let from_b = server(&cfg, &b).unwrap();
    assert!(!from_a.already_bound());
    assert!(!from_b.already_bound());
    assert!(!from_a.binding().same_binding(from_b.binding()));
}

#[test]
fn filtered_metered_server() {
    let registry = ServerRegistry::new();
    let cfg = ServerCfg {
        allowed: vec!["10.0.0.0/8".to_string()],
        metrics: true,
        ..ServerCfg::new("tcp://127.0.0.1:0")
    };

    let binding = server(&cfg, &registry).unwrap().into_result().unwrap();

    match binding.listener.local_addr() {
        LocalAddr::Tcp(addr) => assert_ne!(addr.port(), 0),
        other => panic!("tcp listener expected, got {other}"),
    }
    let stages = binding.server.interceptors().stages();
    assert_eq!(stages.len(), 2);
    assert!(matches!(stages[0], ServerInterceptor::PeerFilter(_)));
    assert_eq!(stages[1], ServerInterceptor::Metrics);
}

#[test]
fn unknown_scheme_creates_nothing() {
    let registry = ServerRegistry::new();
    let err = server(&ServerCfg::new("udp://127.0.0.1:0"), &registry).unwrap_err();
    assert!(matches!(err, FactoryError::InvalidConfig { .. }));
    assert!(registry.is_empty());
}

#[test]
fn failed_bind_leaves_no_entry() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("tcp://{}", occupied.local_addr().unwrap());
    let registry = ServerRegistry::new();

    let err = server(&ServerCfg::new(uri.clone()), &registry).unwrap_err();
    assert!(matches!(err, FactoryError::ResourceUnavailable { stage: "listening server", .. }));
    assert!(!registry.contains(&uri));

    drop(occupied);
    assert!(server(&ServerCfg::new(uri), &registry).is_ok());
}

#[cfg(unix)]
#[test]
fn unix_socket_server() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xlist.socket");
    let registry = ServerRegistry::new();
    let cfg = ServerCfg::new(format!("unix://{}", path.display()));

    let bound = server(&cfg, &registry).unwrap();
    assert!(!bound.already_bound());
    assert!(path.exists());
    assert!(server(&cfg, &registry).unwrap().already_bound());
}

#[tokio::test]
async fn shared_server_is_served_once() {
    let registry = ServerRegistry::new();
    let cfg = ServerCfg::new("tcp://127.0.0.1:0");
    let binding = server(&cfg, &registry).unwrap().into_binding();
    let shared = server(&cfg, &registry).unwrap().into_binding();

    binding
        .server
        .serve_with_shutdown(&binding.listener, async {})
        .await
        .unwrap();
    assert!(shared
        .server
        .serve_with_shutdown(&shared.listener, async {})
        .await
        .is_err());
}
