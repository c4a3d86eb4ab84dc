//! Decode command - render a binary result as text or JSON

use crate::reporters::{read_binary, write_result, OutputFormat};
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;

pub fn run(file: &Path, format: OutputFormat) -> Result<()> {
    if format.is_binary() {
        bail!("decode renders to text or json");
    }

    let result = if file == Path::new("-") {
        read_binary(&mut std::io::stdin().lock())?
    } else {
        let mut reader = std::io::BufReader::new(
            std::fs::File::open(file)
                .with_context(|| format!("Failed to open {}", file.display()))?,
        );
        read_binary(&mut reader).with_context(|| format!("Failed to decode {}", file.display()))?
    };

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    write_result(&result, format, &mut writer)?;
    writer.flush().context("Failed to write to stdout")
}
