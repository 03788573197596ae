use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate_to, Shell};
use std::env;
use std::io::Error;

include!("src/cli.rs");

// Shell completions for netmd-client land in OUT_DIR.
fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let Some(outdir) = env::var_os("OUT_DIR") else {
        return Ok(());
    };

    let mut app = Cli::command();
    for shell in Shell::value_variants() {
        generate_to(*shell, &mut app, "netmd-client", &outdir)?;
    }
    Ok(())
}
