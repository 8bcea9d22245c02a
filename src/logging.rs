use log::LevelFilter;

/// Logger for the binary: dependencies at `Warn`, this crate at `Debug`.
///
/// Call `parse_default_env` on the result to let `RUST_LOG` override it.
pub fn builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn) // Default warn
        .filter_module("relayrs", LevelFilter::Debug); // relayrs debug
    builder
}
