//! Prints `factorial(10)=3628800` without a trailing newline.

use std::io::{self, Write};

use coder::factorial::{self, FIXTURE_INPUT};

fn main() -> anyhow::Result<()> {
    coder::init_tracing();

    let value = factorial::recursive(FIXTURE_INPUT)?;
    tracing::debug!("computed factorial({FIXTURE_INPUT}) recursively");

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", factorial::report(FIXTURE_INPUT, value))?;
    stdout.flush()?;
    Ok(())
}
