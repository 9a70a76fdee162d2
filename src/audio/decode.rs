//! Audio decoding using symphonia.

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Bit depth used for sources without an integer width (float, lossy codecs).
const FALLBACK_SAMPLE_WIDTH: u16 = 16;

/// Decode an audio file into an interleaved integer buffer.
///
/// Channel layout is preserved. Integer PCM keeps its bit depth; other
/// sources are quantized to 16 bits.
pub fn decode_audio_file(path: &Path) -> Result<AudioBuffer> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    // Create hint from file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let mut channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);
    let sample_width = track
        .codec_params
        .bits_per_sample
        .and_then(|bits| u16::try_from(bits).ok())
        .filter(|bits| (8..=32).contains(bits))
        .unwrap_or(FALLBACK_SAMPLE_WIDTH);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let shift = 32 - u32::from(sample_width);
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let spec = *decoded.spec();
        channels = spec.channels.count();

        // Symphonia scales every sample format to full-range i32
        let mut converted = SampleBuffer::<i32>::new(decoded.capacity() as u64, spec);
        converted.copy_interleaved_ref(decoded);
        samples.extend(converted.samples().iter().map(|&s| s >> shift));
    }

    let channels = u16::try_from(channels).map_err(|_| Error::InvalidBuffer {
        reason: format!("{channels} channels"),
    })?;

    AudioBuffer::new(samples, sample_rate, channels, sample_width)
}
