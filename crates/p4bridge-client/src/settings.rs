use p4bridge_protocol::ConnectionSettings;

/// Build connection settings from the standard `P4*` environment
/// variables. Anything unset stays `None`, leaving the engine's own
/// defaulting in charge.
pub fn settings_from_env() -> ConnectionSettings {
    ConnectionSettings {
        port: env_var("P4PORT"),
        user: env_var("P4USER"),
        client: env_var("P4CLIENT"),
        host: env_var("P4HOST"),
        password: env_var("P4PASSWD"),
        charset: env_var("P4CHARSET"),
        ticket_file: env_var("P4TICKETS"),
        ..ConnectionSettings::default()
    }
}

fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
