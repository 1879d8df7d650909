// Command-line query client. Grounded on `dandyvica-dnsquery`'s CLI surface
// (server/domain/qtype/debug flags) but built on `clap`'s derive API, which
// this crate's `Cargo.toml` already enables, rather than that example's
// builder-style `App`/`Arg` calls.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use montague::class::DnsClass;
use montague::rrtype::RrType;
use montague::message::Message;
use montague::server::{send_query, send_query_tcp};

#[derive(Parser, Debug)]
#[clap(name = "dnsquery", version, about = "A simple DNS query client")]
struct Cli {
    /// Domain name to query
    #[clap(short = 'd', long)]
    domain: String,

    /// Record type to query (A, AAAA, MX, TXT, ...)
    #[clap(short = 'q', long, default_value = "A")]
    qtype: String,

    /// DNS server to query
    #[clap(short = 'n', long, default_value = "127.0.0.1")]
    server: String,

    /// Server port
    #[clap(short = 'p', long, default_value = "53")]
    port: u16,

    /// Always use TCP instead of UDP
    #[clap(short = 't', long)]
    tcp: bool,

    /// Retry over TCP automatically if the UDP reply is truncated
    #[clap(short = 'r', long)]
    retry_tcp: bool,

    /// Print the raw response bytes as hex alongside the decoded message
    #[clap(short = 'x', long)]
    hex: bool,

    /// Query timeout in milliseconds
    #[clap(long, default_value = "5000")]
    timeout_ms: u64,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::try_init().ok();

    let qtype = RrType::code_of(&cli.qtype.to_ascii_uppercase())?;
    let query = Message::question(&cli.domain, qtype, DnsClass::IN.to_u16());
    let timeout = Duration::from_millis(cli.timeout_ms);
    let server = (cli.server.as_str(), cli.port);

    let mut response = if cli.tcp {
        send_query_tcp(&query, server, timeout)?
    } else {
        send_query(&query, server, timeout)?
    };

    if !cli.tcp && cli.retry_tcp && response.header.tc {
        tracing::info!("response truncated, retrying over TCP");
        response = send_query_tcp(&query, server, timeout)?;
    }

    if cli.hex {
        let bytes = response.pack()?;
        println!("{}", bytes.iter().map(|b| format!("{:02x}", b)).collect::<String>());
    }
    print!("{}", response.to_zone()?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dnsquery: {}", e);
            ExitCode::FAILURE
        }
    }
}
