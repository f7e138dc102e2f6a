//! Startup banner
//!
//! Reads the logo file, substitutes the `PORT` and `PTHREAD_ID`
//! placeholders, and prints the two server start lines.

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::warn;

pub fn print_logo(path: &Path, port: u16) {
    let logo = match fs::read_to_string(path) {
        Ok(logo) => logo,
        Err(e) => {
            warn!("logo file {} not readable: {}", path.display(), e);
            return;
        }
    };
    let pid = std::process::id().to_string();
    for line in logo.lines() {
        let line = line
            .replace("PORT", &port.to_string())
            .replace("PTHREAD_ID", &pid);
        println!("{}", line);
    }
}

pub fn print_start_message(port: u16) {
    let pid = std::process::id();
    let date = Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("[{}] {} # Server started.", pid, date);
    println!(
        "[{}] {} * The server is now ready to accept connections on port {}",
        pid, date, port
    );
}
