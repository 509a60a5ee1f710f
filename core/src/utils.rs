use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::types::NetcapError;

/// Flag cleared by SIGINT / SIGTERM.
pub fn install_shutdown_handler() -> Result<Arc<AtomicBool>, NetcapError> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("received signal, shutting down");
        r.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}

/// Human-readable byte count.
pub fn format_bytes(n: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
