//! unidb - university schema and query catalogue
//!
//! A single-binary CLI that builds a small SQLite database and runs a fixed
//! set of example queries against it.

use std::io::Write;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Err(e) = unidb::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
