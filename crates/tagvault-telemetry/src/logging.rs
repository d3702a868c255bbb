//! Audit log macros.
//!
//! Every privacy or isolation event is logged with the tenant's ids and
//! nothing else from the record.

/// Log an event with `user_id` / `workspace_id` fields taken from anything
/// exposing those two fields (a `TenantKey`).
///
/// ```rust,ignore
/// log_tenant_event!(warn, tenant, "Rejected payload", fields = ?fields);
/// ```
#[macro_export]
macro_rules! log_tenant_event {
    ($level:ident, $tenant:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            user_id = %$tenant.user_id,
            workspace_id = %$tenant.workspace_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log an event tagged with a component name.
#[macro_export]
macro_rules! log_component_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    struct Tenant {
        user_id: String,
        workspace_id: String,
    }

    #[test]
    fn test_macros_expand() {
        let tenant = Tenant {
            user_id: "u1".into(),
            workspace_id: "w1".into(),
        };
        log_tenant_event!(info, tenant, "tenant event");
        log_tenant_event!(warn, tenant, "tenant event with fields", count = 3, reason = "test");
        log_component_event!(debug, "router", "component event", handles = 1);
    }
}
