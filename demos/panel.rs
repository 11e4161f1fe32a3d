// SPDX-License-Identifier: MPL-2.0

//! Interactive control panel for an LED controller.
//!
//! Reads commands from stdin while polling the device status in the
//! background. Configuration comes from `LED_PANEL_*` environment variables.
//!
//! # Usage
//!
//! ```bash
//! LED_PANEL_HOST=192.168.4.1 cargo run --example panel
//! LED_PANEL_MOCK=true RUST_LOG=led_panel=debug cargo run --example panel
//! ```
//!
//! # Commands
//!
//! `on`, `off`, `toggle`, `color <#hex>`, `brightness <0-255>`,
//! `preset <name>`, `presets`, `raw <endpoint> <json>`, `status`, `quit`

use std::io::{self, Write};

use led_panel::command::{Command, Endpoint};
use led_panel::event::PanelEvent;
use led_panel::types::{Brightness, Preset, RgbColor};
use led_panel::{CommandOutcome, Panel, PanelConfig, PanelSnapshot, Protocol};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("led_panel=info")),
        )
        .init();

    let config = PanelConfig::from_env()?;
    if config.mock_mode() {
        println!("Mock mode: using a simulated controller");
    } else {
        println!("Controller at {}", config.http().base_url());
    }

    let panel = config.build_panel()?;
    let _poller = panel.start_polling();

    let mut events = panel.events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let PanelEvent::ConnectionChanged { status, error } = event {
                match error {
                    Some(error) => println!("\n[connection] {status}: {error}"),
                    None => println!("\n[connection] {status}"),
                }
            }
        }
    });

    println!("Type 'help' for commands.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = read_line().await? else {
            break;
        };

        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };
        let arg = parts.collect::<Vec<_>>().join(" ");

        match cmd {
            "on" => report(panel.set_power(true).await),
            "off" => report(panel.set_power(false).await),
            "toggle" => report(panel.toggle_power().await),
            "color" => match arg.parse::<RgbColor>() {
                Ok(color) => report(panel.set_color(color).await),
                Err(e) => println!("Error: {e}"),
            },
            "brightness" => match arg.parse::<Brightness>() {
                Ok(brightness) => report(panel.set_brightness(brightness).await),
                Err(e) => println!("Error: {e}"),
            },
            "preset" => match panel.apply_preset(&arg).await {
                Ok(outcome) => report(outcome),
                Err(e) => println!("Error: {e}"),
            },
            "raw" => match parse_raw(&arg) {
                Ok(command) => report(panel.dispatch(command).await),
                Err(e) => println!("Error: {e}"),
            },
            "presets" => {
                for preset in Preset::ALL {
                    println!("  {:<8} {}", preset.name(), preset.color());
                }
            }
            "status" => {
                panel.check_status().await;
                print_snapshot(&panel);
            }
            "help" => {
                println!("on | off | toggle | color <#hex> | brightness <0-255>");
                println!("preset <name> | presets | raw <endpoint> <json> | status | quit");
            }
            "quit" | "exit" => break,
            other => println!("Unknown command: {other}"),
        }
    }

    println!("Done!");
    Ok(())
}

/// Reads one line from stdin off the async workers. `None` on end of input.
async fn read_line() -> Result<Option<String>, Box<dyn std::error::Error>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|n| (n > 0).then_some(line))
    })
    .await??;
    Ok(line)
}

/// Parses `<endpoint> <json body>`, e.g. `brightness {"value": 64}`.
fn parse_raw(arg: &str) -> Result<Command, Box<dyn std::error::Error>> {
    let (endpoint, body) = arg.split_once(' ').unwrap_or((arg, ""));
    let endpoint: Endpoint = endpoint.parse()?;
    Ok(Command::from_body(endpoint, body.trim().as_bytes())?)
}

fn report(outcome: CommandOutcome) {
    match outcome {
        CommandOutcome::Applied { connection } => println!("OK ({connection})"),
        CommandOutcome::Failed { kind, rolled_back } => {
            println!("Failed: {kind:?} (rolled back: {rolled_back})");
        }
    }
}

fn print_snapshot<P: Protocol>(panel: &Panel<P>) {
    let snapshot = panel.snapshot();
    let PanelSnapshot { connection, device } = snapshot;

    println!("Connection: {connection}");
    println!("Power:      {}", if device.power() { "ON" } else { "OFF" });
    println!("Color:      {}", device.color());
    println!(
        "Brightness: {} ({})",
        device.brightness().value(),
        device.brightness()
    );

    if snapshot.show_connection_warning() {
        println!("Not connected. Join the LED-Control Wi-Fi network and retry.");
    }
}
