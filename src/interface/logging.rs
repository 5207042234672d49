use std::io::Write;
use std::sync::Once;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

static INIT: Once = Once::new();

/// `ERROR | message`, `INFO  | message`: the level padded to five columns, then the message.
pub fn format_line(level: Level, message: &std::fmt::Arguments) -> String {
    format!("{:<5} | {}", level, message)
}

/// Sets up the global logger, writing to stdout. `filter` takes the `env_logger` filter syntax
/// and wins over `RUST_LOG`; with neither, everything down to DEBUG is shown.
///
/// Only the first call has any effect.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = Builder::new();

        match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => { builder.parse_filters(&filter); }
            None => { builder.filter_level(LevelFilter::Debug); }
        }

        builder
            .target(Target::Stdout)
            // Route through the test harness's output capture
            .is_test(cfg!(test))
            .format(|buf, record| writeln!(buf, "{}", format_line(record.level(), record.args())));

        // Another logger may already be installed (e.g. by a test harness)
        let _ = builder.try_init();
    });
}
