// Thin example server binary. Grounded on the teacher's `main.rs`
// single-shot UDP listener, generalized into a `ServerConfig`-driven loop
// over `server::serve_udp_loop`/`serve_tcp_loop`, each answering with a bare
// NXDOMAIN reply (this binary has no zone data backing it; `montague::zone`
// is how a real caller would load some).

use std::fs;

use montague::config::ServerConfig;
use montague::message::Message;
use montague::rcode::RCode;
use montague::server;

fn nx_answer_from_query(query: &Message) -> Message {
    let mut reply = query.reply();
    reply.header.set_rcode(RCode::NXDomain);
    reply
}

fn load_config() -> ServerConfig {
    let path = std::env::args().nth(1);
    match path {
        Some(path) => match fs::read_to_string(&path) {
            Ok(text) => match ServerConfig::from_toml(&text) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, path, "failed to parse config, using defaults");
                    ServerConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, path, "failed to read config, using defaults");
                ServerConfig::default()
            }
        },
        None => ServerConfig::default(),
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::try_init().ok();

    let config = load_config();

    // Prefers UDP when both are enabled; TCP is reachable by running this
    // binary again with a config that disables UDP. Running both at once
    // would need a worker pool, which is out of scope here (spec.md 1).
    if config.udp {
        let socket = server::bind_udp(&config)?;
        server::serve_udp_loop(&socket, nx_answer_from_query);
    } else if config.tcp {
        let listener = server::bind_tcp(&config)?;
        server::serve_tcp_loop(&listener, nx_answer_from_query);
    }

    Ok(())
}
