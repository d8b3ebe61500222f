//! Cross-cutting helpers shared by the service and server crates:
//! tracing setup, startup environment checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn health_serializes_status_field() {
        let v = serde_json::to_value(types::Health { status: "ok" }).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn log_format_parses_loosely() {
        assert_eq!(utils::logging::LogFormat::parse(" JSON "), utils::logging::LogFormat::Json);
        assert_eq!(utils::logging::LogFormat::parse("compact"), utils::logging::LogFormat::Compact);
        assert_eq!(utils::logging::LogFormat::parse("whatever"), utils::logging::LogFormat::Compact);
    }
}
