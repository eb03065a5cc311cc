//! `unifi-dump` — streaming reader for UniFi controller autobackup dumps.
//!
//! A dump is newline-delimited JSON where selector lines name the MongoDB
//! collection for the documents that follow them. This crate classifies
//! lines and scans them with a bounded, reused buffer; it never spawns
//! anything or parses documents.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use unifi_dump::{DumpLine, LineScanner, ScanLimits};
//!
//! let file = BufReader::new(File::open("dump.json").unwrap());
//! let mut scanner = LineScanner::new(file, ScanLimits::from_units(1, 64).unwrap()).unwrap();
//!
//! while let Some((number, line)) = scanner.next_line().unwrap() {
//!     match DumpLine::classify(line) {
//!         DumpLine::Select(collection) => println!("{number}: now in {collection}"),
//!         DumpLine::Record(payload) => println!("{number}: {} bytes", payload.len()),
//!     }
//! }
//! ```

pub mod error;
pub mod line;
pub mod scanner;

pub use error::{DumpError, Result};
pub use line::{DumpLine, selected_collection};
pub use scanner::{DEFAULT_BUFFER_SIZE_GB, DEFAULT_TOKEN_SIZE_MB, LineScanner, ScanLimits};
