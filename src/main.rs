use clap::{Parser, Subcommand};
use navien_rs::{
    init_logger, log_info, GasStatus, NavienDeviceHandle, NavienError, NavienVisitor, SerialConfig,
    WaterStatus,
};

#[derive(Parser)]
#[command(name = "navien-cli")]
#[command(about = "CLI tool for the Navien RS-485 protocol")]
struct Cli {
    /// Serial port path, e.g. /dev/ttyUSB0
    #[arg(short, long)]
    port: String,

    #[arg(short, long, default_value = "19200")]
    baudrate: u32,

    /// Print decoded telemetry as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the bus and print decoded water/gas telemetry
    Monitor,
    /// Turn the unit on
    TurnOn,
    /// Turn the unit off
    TurnOff,
    /// Press and release the HotButton (demand recirculation)
    HotButton,
    /// Set the domestic hot water target temperature (Celsius)
    SetTemp { temp: f32 },
    /// Enable scheduled-mode recirculation
    RecircOn,
    /// Disable scheduled-mode recirculation
    RecircOff,
}

struct PrintVisitor {
    json: bool,
}

impl NavienVisitor for PrintVisitor {
    fn on_water(&mut self, water: &WaterStatus, src: u8) {
        if self.json {
            if let Ok(line) = serde_json::to_string(water) {
                log_info(&format!("SRC:0x{src:02X} water {line}"));
            }
        } else {
            log_info(&format!(
                "SRC:0x{src:02X} water: power={} set={:.1}C outlet={:.1}C inlet={:.1}C \
                 flow={:.1}l/min capacity={:.1}%",
                water.power_on,
                water.set_temp_c,
                water.outlet_temp_c,
                water.inlet_temp_c,
                water.flow_lpm,
                water.operating_capacity_pct,
            ));
        }
    }

    fn on_gas(&mut self, gas: &GasStatus, src: u8) {
        if self.json {
            if let Ok(line) = serde_json::to_string(gas) {
                log_info(&format!("SRC:0x{src:02X} gas {line}"));
            }
        } else {
            log_info(&format!(
                "SRC:0x{src:02X} gas: controller v{} current={:.1}m3 total={:.1}m3 capacity={:.1}%",
                gas.controller_version, gas.current_gas_m3, gas.cumulative_gas_m3,
                gas.heat_capacity_pct,
            ));
        }
    }

    fn on_error(&mut self) {
        log_info("communication error");
    }
}

#[tokio::main]
async fn main() -> Result<(), NavienError> {
    init_logger();

    let cli = Cli::parse();
    let config = SerialConfig {
        baudrate: cli.baudrate,
        ..SerialConfig::default()
    };
    let mut handle = NavienDeviceHandle::connect_with_config(&cli.port, config).await?;
    handle.add_visitor(Box::new(PrintVisitor { json: cli.json }), 0);

    match cli.command {
        Commands::Monitor => loop {
            handle.poll().await?;
        },
        Commands::TurnOn => handle.link_mut().send_turn_on_cmd(),
        Commands::TurnOff => handle.link_mut().send_turn_off_cmd(),
        Commands::HotButton => handle.link_mut().send_hot_button_cmd(),
        Commands::SetTemp { temp } => handle.link_mut().send_set_temp_cmd(temp),
        Commands::RecircOn => handle.link_mut().send_scheduled_recirculation_on_cmd(),
        Commands::RecircOff => handle.link_mut().send_scheduled_recirculation_off_cmd(),
    }

    // Commands go out one per received frame; keep polling until the
    // queue drains.
    while handle.link().pending_commands() > 0 {
        handle.poll().await?;
    }
    log_info("done");
    Ok(())
}
