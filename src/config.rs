// Server configuration, deserialized from TOML. Grounded on
// `hr-dns`'s `config.rs`: one `#[serde(default = "...")]` function per
// field, plus a hand-rolled `Default` impl (that crate derives its default
// config by deserializing `"{}"` through `serde_json`; we don't depend on
// `serde_json`, so `Default` just calls the same per-field defaults
// directly instead of round-tripping through an empty TOML document).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tcp: bool,
    #[serde(default = "default_true")]
    pub udp: bool,
    #[serde(default)]
    pub reuseport: bool,
}

fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5300
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_address: default_listen_address(),
            port: default_port(),
            tcp: default_true(),
            udp: default_true(),
            reuseport: false,
        }
    }
}

impl ServerConfig {
    pub fn from_toml(text: &str) -> Result<ServerConfig, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_teachers_single_shot_loop_address() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "127.0.0.1:5300");
        assert!(config.tcp);
        assert!(config.udp);
        assert!(!config.reuseport);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = ServerConfig::from_toml("port = 5353\n").unwrap();
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.port, 5353);
        assert!(config.tcp);
    }

    #[test]
    fn full_toml_overrides_every_field() {
        let toml_text = "listen_address = \"0.0.0.0\"\nport = 53\ntcp = false\nudp = true\nreuseport = true\n";
        let config = ServerConfig::from_toml(toml_text).unwrap();
        assert_eq!(config.listen_address, "0.0.0.0");
        assert_eq!(config.port, 53);
        assert!(!config.tcp);
        assert!(config.reuseport);
    }
}
