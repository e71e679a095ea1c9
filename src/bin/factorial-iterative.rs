//! Prints `factorial(10)=3628800` followed by a newline.

use coder::factorial::{self, FIXTURE_INPUT};

fn main() -> anyhow::Result<()> {
    coder::init_tracing();

    let value = factorial::iterative(FIXTURE_INPUT)?;
    tracing::debug!("computed factorial({FIXTURE_INPUT}) iteratively");

    println!("{}", factorial::report(FIXTURE_INPUT, value));
    Ok(())
}
