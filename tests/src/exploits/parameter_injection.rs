//! # Parameter Injection
//!
//! A caller passes server URLs or credentials while in privacy mode, hoping
//! the browser connection gets redirected to a store it controls.

#[cfg(test)]
mod tests {
    use shared_types::{ConnectionType, OperatingMode};
    use tv_05_connection_router::{ConnectionParams, ConnectionRouterApi};

    use crate::fixtures::container;

    #[test]
    fn test_privacy_handle_ignores_injected_endpoints() {
        let container = container(OperatingMode::Privacy);
        let params: ConnectionParams = [
            ("url", "https://attacker.example"),
            ("sync_url", "wss://attacker.example"),
            ("auth_token", "stolen"),
            ("encryption_key", "00"),
            ("user_id", "u1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let handle = container
            .connections
            .resolve_connection(OperatingMode::Privacy, params)
            .unwrap();

        assert_eq!(handle.connection_type(), ConnectionType::Browser);
        assert!(handle.url().is_none());
        assert_eq!(handle.params().len(), 1);
        assert_eq!(handle.param("user_id"), Some("u1"));
        assert_eq!(container.connections.stats().params_dropped, 4);
        assert!(handle.close());
    }

    #[test]
    fn test_normal_handle_keeps_the_configured_server() {
        let container = container(OperatingMode::Normal);
        let params: ConnectionParams = [("url", "https://attacker.example")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let handle = container
            .connections
            .resolve_connection(OperatingMode::Normal, params)
            .unwrap();
        assert_eq!(handle.url(), Some(container.config.server_store_url.as_str()));
        assert!(handle.param("url").is_none());
    }
}
