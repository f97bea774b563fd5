use clap::Parser;
use log::{info, warn, LevelFilter};
use std::io;
use std::{fmt::Display, fmt::Formatter};

/// Compress, Decompress, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which codec (or chain of codecs) a container holds. The discriminant is the tag stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Run-length encoding only
    Rle = 0,
    /// Huffman coding only
    Huffman = 1,
    /// Run-length encoding, then Huffman coding of the RLE words
    Chain = 2,
}
impl Display for Codec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl TryFrom<u8> for Codec {
    type Error = io::Error;
    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Codec::Rle),
            1 => Ok(Codec::Huffman),
            2 => Ok(Codec::Chain),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown codec tag {}", other),
            )),
        }
    }
}

/// Word width used to split input files into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}
impl Width {
    /// Width in bits.
    pub fn bits(self) -> u8 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }
}
impl Display for Width {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bit", self.bits())
    }
}
impl TryFrom<u8> for Width {
    type Error = io::Error;
    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Width::W8),
            16 => Ok(Width::W16),
            32 => Ok(Width::W32),
            64 => Ok(Width::W64),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported word width {} (use 8, 16, 32 or 64)", other),
            )),
        }
    }
}

/// All user settable options that control program behavior
#[derive(Debug)]
pub struct Opts {
    /// Name of file to read for input
    pub file: Option<String>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Codec used when compressing. Decompression reads it from the file.
    pub codec: Codec,
    /// Word width used when compressing. Decompression reads it from the file.
    pub width: Width,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Location where output is sent
    pub output: Output,
    /// Level of log output
    pub verbosity: LevelFilter,
}

impl Opts {
    pub fn new() -> Self {
        Self {
            file: None,
            op_mode: Mode::Zip,
            codec: Codec::Chain,
            width: Width::W8,
            keep_input_files: false,
            force_overwrite: false,
            output: Output::File,
            verbosity: LevelFilter::Info,
        }
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Run-length and Huffman compression of fixed-width words",
    long_about = None
)]
pub struct Args {
    /// Filename of file to process
    #[clap()]
    filename: Option<String>,

    /// Compress the input file (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input file
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Keep input file
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Use run-length encoding only
    #[clap(long = "rle")]
    rle: bool,

    /// Use Huffman coding only
    #[clap(long = "huffman")]
    huffman: bool,

    /// Use run-length encoding followed by Huffman coding (the default)
    #[clap(long = "chain")]
    chain: bool,

    /// Word width in bits: 8, 16, 32 or 64
    #[clap(short = 'w', long = "width", default_value_t = 8)]
    width: u8,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Parse the process arguments into Opts.
pub fn init_opts() -> io::Result<Opts> {
    opts_from_args(Args::parse())
}

/// Put command line information from CLAP into our internal structure.
pub fn opts_from_args(args: Args) -> io::Result<Opts> {
    let mut opts = Opts::new();

    opts.file = args.filename;

    // Later flags win if several modes are given
    if args.compress {
        opts.op_mode = Mode::Zip
    };
    if args.decompress {
        opts.op_mode = Mode::Unzip
    };
    if args.test {
        opts.op_mode = Mode::Test
    };

    if args.rle {
        opts.codec = Codec::Rle
    };
    if args.huffman {
        opts.codec = Codec::Huffman
    };
    if args.chain {
        opts.codec = Codec::Chain
    };

    opts.width = Width::try_from(args.width)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    opts.keep_input_files = args.keep;
    opts.force_overwrite = args.force;
    if args.stdout {
        opts.output = Output::Stdout
    };

    // Set the log level
    opts.verbosity = match args.v {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if opts.file.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "No input file given",
        ));
    }
    Ok(opts)
}

/// Report the settings in effect. Call after the logger is up.
pub fn log_opts(opts: &Opts) {
    info!("---- wordpack Initialization Start ----",);
    info!("Verbosity set to {}", opts.verbosity);
    info!("Operational mode set to {}", opts.op_mode);
    if let Some(s) = &opts.file {
        info!("Getting input from the file {}", s)
    }
    if opts.op_mode == Mode::Zip {
        info!("Codec set to {}", opts.codec);
        info!("Word width set to {}", opts.width);
    }
    if opts.output == Output::Stdout {
        warn!("Sending output to stdout")
    };
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- wordpack Initialization End ----");
}
