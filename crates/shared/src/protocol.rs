use serde::{Deserialize, Serialize};

use crate::domain::EntityKind;

pub const EVENTS_ROUTE: &str = "/api/events";
pub const PARTNERS_ROUTE: &str = "/api/partners";
pub const STATIC_PARAMS_ROUTE: &str = "/api/static-params";
pub const HEALTH_ROUTE: &str = "/healthz";

pub fn collection_route(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Event => EVENTS_ROUTE,
        EntityKind::Partner => PARTNERS_ROUTE,
    }
}

pub fn static_params_route(kind: EntityKind) -> String {
    format!("{STATIC_PARAMS_ROUTE}/{}", kind.plural())
}

/// Loose view of an error payload. Only the text is needed on the client; the
/// hosted store and this server both put it under `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_routes_per_kind() {
        assert_eq!(collection_route(EntityKind::Event), "/api/events");
        assert_eq!(collection_route(EntityKind::Partner), "/api/partners");
        assert_eq!(
            static_params_route(EntityKind::Event),
            "/api/static-params/events"
        );
    }

    #[test]
    fn error_payload_ignores_unknown_fields() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"code":"internal","error":"db down"}"#).expect("payload");
        assert_eq!(payload.error.as_deref(), Some("db down"));

        let payload: ErrorPayload = serde_json::from_str("{}").expect("payload");
        assert!(payload.error.is_none());
    }
}
