use anyhow::Result;
use clap::Parser;
use motorcontrol::actuator::{ActuatorDriver, GpioSink, SimulatedGpio, SysfsGpio};
use motorcontrol::command::{CommandDispatcher, CommandRegistry};
use motorcontrol::config::{Cli, GpioBackend, ServerConfig};
use motorcontrol::session::ControlServer;
use motorcontrol::shutdown::shutdown_signal;
use motorcontrol::transport::{TcpTransportListener, TransportListener};

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::resolve(&cli)?;

    info!("Motor control server starting");
    info!("  GPIO backend: {:?}", config.gpio);
    info!("  Receive buffer: {} bytes", config.buffer_size);

    let address = config.listen_address();
    info!("Setting up host on {}...", address);
    let listener = TcpTransportListener::bind(&address).await?;
    info!("Listening on {}", listener.local_addr()?);

    match config.gpio {
        GpioBackend::Simulated => serve(listener, SimulatedGpio::new(), &config).await,
        GpioBackend::Sysfs => serve(listener, SysfsGpio::new(&config.sysfs_root), &config).await,
    }
}

async fn serve<G: GpioSink>(
    listener: TcpTransportListener,
    gpio: G,
    config: &ServerConfig,
) -> Result<()> {
    let mut driver = ActuatorDriver::new(gpio, config.pins);
    driver.configure()?;

    let dispatcher = CommandDispatcher::new(CommandRegistry::standard());
    let mut server = ControlServer::new(listener, driver, dispatcher, config.buffer_size);
    server.run(shutdown_signal()).await?;

    info!("Served {} session(s), exiting", server.sessions_served());
    Ok(())
}
