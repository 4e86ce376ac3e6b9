mod keymap;

use anyhow::{Context, Result};
use clap::Parser;
use keymap::{translate, Action, HELP};
use motorcontrol_shared::{encode_line, protocol};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Terminal client for the motor control server
#[derive(Parser, Debug)]
#[command(name = "motorcontrol-client", version)]
struct Cli {
    /// Server host
    #[arg(default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(default_value_t = protocol::DEFAULT_PORT)]
    port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let address = format!("{}:{}", cli.host, cli.port);
    let mut stream = TcpStream::connect(&address)
        .await
        .with_context(|| format!("connecting to {}", address))?;
    info!("Connected to {}", address);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match translate(&line) {
            Action::Skip => continue,
            Action::Send(command) => {
                debug!("Sending {:?}", command);
                stream.write_all(&encode_line(&command)).await?;
            }
            Action::Quit => {
                stream.write_all(&encode_line(protocol::QUIT)).await?;
                break;
            }
        }
    }

    stream.shutdown().await?;
    info!("Disconnected");
    Ok(())
}
