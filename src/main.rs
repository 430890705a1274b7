use anyhow::Result;
use minish::{Interpreter, Options, signal};

fn main() -> Result<()> {
    let options: Options = argh::from_env();
    signal::install_interrupt_policy()?;
    Interpreter::with_options(options).repl()
}
