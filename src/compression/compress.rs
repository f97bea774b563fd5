use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};

use log::{debug, error, info};

use super::{bytes_from_words, words_from_bytes};
use crate::bitstream::bitwriter::{BitWriter, Header, HEADER_LEN};
use crate::bitstream::Bitstream;
use crate::huffman_coding::huffman::huf_encode_with;
use crate::tools::cli::{Codec, Opts, Output, Width};
use crate::tools::report::{LogReport, Report};
use crate::tools::rle::rle_encode;
use crate::tools::word::Word;

/// Compress `data` into a complete container and write it to `writer`. Returns bytes written.
pub fn compress_to<O: Write>(
    data: &[u8],
    codec: Codec,
    width: Width,
    writer: O,
    report: &mut dyn Report,
) -> io::Result<usize> {
    match width {
        Width::W8 => pack::<u8, O>(data, codec, width, writer, report),
        Width::W16 => pack::<u16, O>(data, codec, width, writer, report),
        Width::W32 => pack::<u32, O>(data, codec, width, writer, report),
        Width::W64 => pack::<u64, O>(data, codec, width, writer, report),
    }
}

/// Compress `data` into an in-memory container.
pub fn compress_bytes(
    data: &[u8],
    codec: Codec,
    width: Width,
    report: &mut dyn Report,
) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + data.len() / 2);
    compress_to(data, codec, width, &mut out, report)?;
    Ok(out)
}

/// Split into words of type W, run the codec(s), and write the container.
fn pack<W: Word, O: Write>(
    data: &[u8],
    codec: Codec,
    width: Width,
    writer: O,
    report: &mut dyn Report,
) -> io::Result<usize> {
    let (words, pad) = words_from_bytes::<W>(data);

    let payload = match codec {
        Codec::Rle => rle_stream(&words)?,
        Codec::Huffman => huf_encode_with(&words, report)?,
        Codec::Chain => {
            let runs = rle_encode(&words)?;
            debug!("RLE reduced {} words to {}", words.len(), runs.len());
            huf_encode_with(&runs, report)?
        }
    };

    let header = Header {
        codec,
        width,
        pad,
        bit_len: payload.bit_len,
    };
    BitWriter::new(writer).write_container(&header, &payload.bytes)
}

/// RLE words laid out big-endian, as a bitstream.
fn rle_stream<W: Word>(words: &[W]) -> io::Result<Bitstream> {
    let runs = rle_encode(words)?;
    debug!("RLE reduced {} words to {}", words.len(), runs.len());
    Ok(Bitstream::new(
        bytes_from_words(&runs),
        runs.len() as u64 * W::BITS as u64,
    ))
}

/// Open `path` for writing. Refuse to clobber an existing file unless forced.
pub(crate) fn open_output(path: &str, force: bool) -> io::Result<File> {
    if force {
        return File::create(path);
    }
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                error!("Output file {} already exists. Use -f to overwrite.", path);
            }
            e
        })
}

/// Compress the input file defined in opts <Opts>.
pub fn compress(opts: &Opts) -> io::Result<()> {
    let fname = opts
        .file
        .as_deref()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "No input file given"))?;

    // Read all the data. The codecs work on whole sequences.
    let data = fs::read(fname)?;
    info!("Read {} bytes from {}", data.len(), fname);
    if data.is_empty() {
        error!("{} is empty, nothing to compress.", fname);
    }

    let written = match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let lock = stdout.lock();
            compress_to(&data, opts.codec, opts.width, lock, &mut LogReport)?
        }
        Output::File => {
            // Encode first so a failure leaves any existing output alone
            let packed = compress_bytes(&data, opts.codec, opts.width, &mut LogReport)?;
            let out_name = format!("{}.wpk", fname);
            let mut f_out = open_output(&out_name, opts.force_overwrite)?;
            f_out.write_all(&packed)?;
            info!("Wrote {}", out_name);
            packed.len()
        }
    };

    if !data.is_empty() {
        info!(
            "Compressed {} bytes to {} bytes ({:.1}%)",
            data.len(),
            written,
            written as f64 * 100.0 / data.len() as f64
        );
    }

    if opts.output == Output::File && !opts.keep_input_files {
        fs::remove_file(fname)?;
        debug!("Removed {}", fname);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{compress, compress_bytes};
    use crate::bitstream::bitwriter::HEADER_LEN;
    use crate::error::CodecError;
    use crate::tools::cli::{Codec, Opts, Output, Width};
    use crate::tools::report::NoReport;
    use std::fs;

    #[test]
    fn rle_container_test() {
        let data = [7_u8, 7, 7, 7, 1];
        let out = compress_bytes(&data, Codec::Rle, Width::W8, &mut NoReport).unwrap();
        assert_eq!(&out[..3], b"WPK");
        // Run(4, 7) then Literal(1): three words of payload
        assert_eq!(&out[HEADER_LEN..], &[0x84, 7, 1]);
        assert_eq!(&out[7..HEADER_LEN], &24_u64.to_be_bytes());
    }

    #[test]
    fn empty_input_test() {
        for codec in [Codec::Rle, Codec::Huffman, Codec::Chain] {
            let err = compress_bytes(&[], codec, Width::W16, &mut NoReport).unwrap_err();
            assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
            let inner = err.into_inner().unwrap();
            assert_eq!(
                inner.downcast_ref::<CodecError>(),
                Some(&CodecError::EmptyInput)
            );
        }
    }

    #[test]
    fn failed_compress_keeps_old_output_test() {
        let dir = std::env::temp_dir().join(format!("wordpack-compress-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("empty.bin");
        let output = dir.join("empty.bin.wpk");
        fs::write(&input, b"").unwrap();
        fs::write(&output, b"previous container").unwrap();

        let opts = Opts {
            file: Some(input.to_string_lossy().into_owned()),
            force_overwrite: true,
            keep_input_files: false,
            output: Output::File,
            ..Opts::default()
        };
        let err = compress(&opts).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        // Neither the old container nor the input were touched
        assert_eq!(fs::read(&output).unwrap(), b"previous container");
        assert!(input.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
