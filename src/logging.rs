//! Logger setup.

use std::path::Path;

use crate::error::Error;

/// Installs the global logger: stdout, plus `file` when given.
pub fn setup_logger(level: log::LevelFilter, file: Option<&Path>) -> Result<(), Error> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(file) = file {
        dispatch = dispatch.chain(fern::log_file(file).map_err(fern::InitError::Io)?);
    }

    dispatch.apply().map_err(fern::InitError::SetLoggerError)?;
    Ok(())
}
