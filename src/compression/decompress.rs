use std::fs;
use std::io::{self, Error, Write};

use log::{debug, error, info};

use super::compress::open_output;
use super::{bytes_from_words, words_from_bytes};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::{Header, HEADER_LEN, MAGIC, VERSION};
use crate::bitstream::Bitstream;
use crate::error::CodecError;
use crate::huffman_coding::huffman::huf_decode_with;
use crate::tools::cli::{Codec, Opts, Output, Width};
use crate::tools::report::{LogReport, Report};
use crate::tools::rle::rle_decode;
use crate::tools::word::Word;

const EOF_MESSAGE: &str = "Unexpected End Of File";

/// Read and validate a container header.
pub fn read_header(br: &mut BitReader<'_>) -> io::Result<Header> {
    let eof = || Error::new(io::ErrorKind::UnexpectedEof, EOF_MESSAGE);

    // Look for a valid signature.
    let mut magic = [0_u8; 3];
    for b in magic.iter_mut() {
        *b = br.byte().ok_or_else(eof)?;
    }
    if magic != MAGIC {
        error!("Fatal error: not a valid wordpack compressed file.");
        return Err(Error::new(
            io::ErrorKind::InvalidData,
            "Invalid compressed file.",
        ));
    }

    let version = br.byte().ok_or_else(eof)?;
    if version != VERSION {
        error!("Fatal error: unsupported container version {}.", version);
        return Err(Error::new(
            io::ErrorKind::InvalidData,
            format!("Unsupported container version {}", version),
        ));
    }

    let codec = Codec::try_from(br.byte().ok_or_else(eof)?)?;
    let width = Width::try_from(br.byte().ok_or_else(eof)?)?;
    let pad = br.byte().ok_or_else(eof)?;
    if pad >= width.bits() / 8 {
        return Err(Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid pad count {} for {} words", pad, width),
        ));
    }
    let bit_len = br.bint(64).ok_or_else(eof)?;

    Ok(Header {
        codec,
        width,
        pad,
        bit_len,
    })
}

/// Decompress an in-memory container back to the original bytes.
pub fn decompress_bytes(container: &[u8], report: &mut dyn Report) -> io::Result<Vec<u8>> {
    let header = read_header(&mut BitReader::new(container))?;
    debug!("Found {:?}", header);

    let payload = &container[HEADER_LEN..];
    if header.bit_len > payload.len() as u64 * 8 {
        error!(
            "Payload holds {} bits but the header promises {}.",
            payload.len() as u64 * 8,
            header.bit_len
        );
        return Err(CodecError::TruncatedStream.into());
    }

    match header.width {
        Width::W8 => unpack::<u8>(&header, payload, report),
        Width::W16 => unpack::<u16>(&header, payload, report),
        Width::W32 => unpack::<u32>(&header, payload, report),
        Width::W64 => unpack::<u64>(&header, payload, report),
    }
}

/// Decode the payload as words of type W, then turn them back into bytes.
fn unpack<W: Word>(header: &Header, payload: &[u8], report: &mut dyn Report) -> io::Result<Vec<u8>> {
    let words: Vec<W> = match header.codec {
        Codec::Rle => rle_decode(&rle_words::<W>(header, payload)?)?,
        Codec::Huffman => huf_decode_with(&huffman_stream(header, payload), report)?,
        Codec::Chain => {
            let runs: Vec<W> = huf_decode_with(&huffman_stream(header, payload), report)?;
            rle_decode(&runs)?
        }
    };

    let mut out = bytes_from_words(&words);
    out.truncate(out.len().saturating_sub(header.pad as usize));
    Ok(out)
}

/// The payload bytes bounded by the header's bit count.
fn huffman_stream(header: &Header, payload: &[u8]) -> Bitstream {
    let used = ((header.bit_len + 7) / 8) as usize;
    Bitstream::new(payload[..used].to_vec(), header.bit_len)
}

/// RLE payloads are whole words, so the bit count must be a multiple of the width.
fn rle_words<W: Word>(header: &Header, payload: &[u8]) -> io::Result<Vec<W>> {
    if header.bit_len % W::BITS as u64 != 0 {
        return Err(CodecError::TruncatedStream.into());
    }
    let (words, _) = words_from_bytes::<W>(&payload[..(header.bit_len / 8) as usize]);
    Ok(words)
}

/// Pick the output name: strip `.wpk`, or add `.out` if it isn't there.
fn output_name(fname: &str) -> String {
    match fname.strip_suffix(".wpk") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", fname),
    }
}

/// Decompress the file specified in opts (Opts).
pub fn decompress(opts: &Opts) -> io::Result<()> {
    let fname = opts
        .file
        .as_deref()
        .ok_or_else(|| Error::new(io::ErrorKind::InvalidInput, "No input file given"))?;

    let container = fs::read(fname)?;
    let data = decompress_bytes(&container, &mut LogReport).map_err(|e| {
        error!("Fatal error: could not decompress {}: {}", fname, e);
        e
    })?;
    info!("Decompressed {} bytes to {} bytes", container.len(), data.len());

    match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&data)?;
            lock.flush()?;
        }
        Output::File => {
            let out_name = output_name(fname);
            let mut f_out = open_output(&out_name, opts.force_overwrite)?;
            f_out.write_all(&data)?;
            info!("Wrote {}", out_name);
            if !opts.keep_input_files {
                fs::remove_file(fname)?;
                debug!("Removed {}", fname);
            }
        }
    }
    Ok(())
}

/// Check that the file specified in opts (Opts) decompresses cleanly. Writes nothing.
pub fn test(opts: &Opts) -> io::Result<()> {
    let fname = opts
        .file
        .as_deref()
        .ok_or_else(|| Error::new(io::ErrorKind::InvalidInput, "No input file given"))?;

    let container = fs::read(fname)?;
    match decompress_bytes(&container, &mut LogReport) {
        Ok(data) => {
            info!("{}: ok ({} bytes)", fname, data.len());
            Ok(())
        }
        Err(e) => {
            error!("{}: failed: {}", fname, e);
            Err(e)
        }
    }
}
