//! `unifi-restore` - replay a UniFi autobackup dump into MongoDB.
//!
//! Streams the dump line by line and pipes every document into
//! `mongoimport`, targeting the collection named by the latest selector.

use unifi_restore::{exit_code, run};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(exit_code(&e));
    }
}
