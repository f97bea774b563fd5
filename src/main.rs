//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::io;

use log::info;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use wordpack::compression::compress::compress;
use wordpack::compression::decompress::{decompress, test};
use wordpack::tools::cli::{init_opts, log_opts, Mode};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), io::Error> {
    let opts = init_opts()?;

    // Log to stderr so that -c output on stdout stays clean.
    TermLogger::init(
        opts.verbosity,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log_opts(&opts);

    //----- Figure out what we need to do and go do it
    let result = match opts.op_mode {
        Mode::Zip => compress(&opts),
        Mode::Unzip => decompress(&opts),
        Mode::Test => test(&opts),
    };

    info!("Done.");
    result
}
