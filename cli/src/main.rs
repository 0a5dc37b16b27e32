use log::{info, warn};
use popuptip_core::{Config, PopupTip, PopupTipResult};
use std::sync::Arc;

mod cli;
mod demo;
mod logger;
mod terminal_surface;

use demo::{run_sequence, TipSequence};
use terminal_surface::TerminalSurfaceProvider;

fn main() -> PopupTipResult<()> {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(args.quiet, args.verbose) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    info!("Starting PopupTip {}", popuptip_core::version());

    let config = if args.use_defaults {
        Config::default()
    } else {
        Config::load(args.config_path.as_deref(), true)?
    };

    if let Some(path) = &args.write_config {
        config.save_to_file(path)?;
        info!("Wrote configuration to {}", path.display());
    }

    if args.messages.is_empty() {
        return Ok(());
    }

    let tip = Arc::new(PopupTip::with_config(TerminalSurfaceProvider::new(), &config)?);
    let duration_ms = args.duration_ms.unwrap_or(tip.default_duration_ms());

    let tip_weak = Arc::downgrade(&tip);
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C, hiding tip...");
        if let Some(tip) = tip_weak.upgrade() {
            tip.hide();
        }
    }) {
        warn!("Error setting Ctrl+C handler: {e}");
    }

    run_sequence(
        &tip,
        &TipSequence {
            owner: &args.owner,
            messages: &args.messages,
            x: args.x,
            y: args.y,
            duration_ms,
            interval_ms: args.interval_ms,
        },
    );

    info!("PopupTip stopped");
    Ok(())
}
