//! WAV container encoding for synthesised speech.
//!
//! The synthesis service hands back bare PCM samples; media players want a
//! self-contained file.  [`encode_wav`] wraps normalised `f32` samples into a
//! complete WAV byte stream — RIFF header, `fmt ` chunk declaring 16-bit PCM,
//! and the `data` chunk — via `hound` writing into an in-memory cursor.
//!
//! Sample conversion deliberately uses asymmetric scaling (negative values
//! × 32768, non-negative × 32767).  This matches the usual PCM convention
//! and must not be "normalised" to a single factor: existing fixtures are
//! bit-exact against it.

use std::io::Cursor;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of the RIFF + `fmt ` + `data` headers for a 16-bit PCM file.
///
/// A zero-sample input therefore encodes to exactly this many bytes.
pub const WAV_HEADER_LEN: usize = 44;

// ---------------------------------------------------------------------------
// sample_to_i16
// ---------------------------------------------------------------------------

/// Convert one normalised `f32` sample to int16 PCM.
///
/// The sample is clamped to [-1.0, 1.0] first; non-finite input (NaN cannot
/// be ordered by the clamp) becomes silence.  Scaling is asymmetric:
///
/// * negative samples × 32768 (so -1.0 → -32768)
/// * non-negative samples × 32767 (so 1.0 → 32767)
pub fn sample_to_i16(sample: f32) -> i16 {
    if !sample.is_finite() {
        return 0;
    }
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

// ---------------------------------------------------------------------------
// encode_wav
// ---------------------------------------------------------------------------

/// Encode interleaved `f32` samples as a complete 16-bit PCM WAV file.
///
/// # Contract
///
/// - `samples` holds interleaved frames; its length should be divisible by
///   `channels` (a ragged final frame is written as-is, shorter).
/// - `sample_rate` and `channels` are positive (24000 Hz mono for the
///   synthesis service).
/// - The output length is exactly `WAV_HEADER_LEN + samples.len() * 2`
///   bytes; the declared RIFF length is total − 8 and the declared data
///   chunk length is `samples.len() * 2`.
/// - Zero samples yield a valid, header-only 44-byte file.
pub fn encode_wav(
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample_to_i16(sample))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    // ---- sample_to_i16 ---

    #[test]
    fn asymmetric_scaling_at_the_rails() {
        assert_eq!(sample_to_i16(-1.0), -32768);
        assert_eq!(sample_to_i16(1.0), 32767);
        assert_eq!(sample_to_i16(0.0), 0);
    }

    #[test]
    fn midpoints_scale_asymmetrically() {
        assert_eq!(sample_to_i16(-0.5), -16384);
        // 0.5 × 32767 = 16383.5, truncated toward zero.
        assert_eq!(sample_to_i16(0.5), 16383);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        assert_eq!(sample_to_i16(3.5), 32767);
        assert_eq!(sample_to_i16(-7.0), -32768);
    }

    #[test]
    fn non_finite_samples_become_silence() {
        assert_eq!(sample_to_i16(f32::NAN), 0);
        assert_eq!(sample_to_i16(f32::INFINITY), 32767);
        assert_eq!(sample_to_i16(f32::NEG_INFINITY), -32768);
    }

    // ---- encode_wav: container shape ---

    #[test]
    fn empty_input_yields_header_only_file() {
        let wav = encode_wav(&[], 24_000, 1).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // data chunk declares zero payload bytes
        assert_eq!(u32_at(&wav, 40), 0);
    }

    #[test]
    fn output_length_is_header_plus_two_bytes_per_sample() {
        let samples = vec![0.25_f32; 480];
        let wav = encode_wav(&samples, 24_000, 1).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN + 480 * 2);
    }

    #[test]
    fn declared_lengths_match_the_container() {
        let samples = vec![0.1_f32; 100];
        let wav = encode_wav(&samples, 24_000, 1).unwrap();

        // RIFF chunk size = total file length - 8
        assert_eq!(u32_at(&wav, 4) as usize, wav.len() - 8);
        // data chunk size = sample count × 2 bytes
        assert_eq!(u32_at(&wav, 40) as usize, samples.len() * 2);
    }

    #[test]
    fn fmt_chunk_declares_pcm_16bit() {
        let wav = encode_wav(&[0.0, 0.5], 24_000, 1).unwrap();

        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16); // fmt chunk length
        assert_eq!(u16_at(&wav, 20), 1); // PCM format code
        assert_eq!(u16_at(&wav, 22), 1); // channels
        assert_eq!(u32_at(&wav, 24), 24_000); // sample rate
        assert_eq!(u32_at(&wav, 28), 24_000 * 2); // byte rate
        assert_eq!(u16_at(&wav, 32), 2); // block align
        assert_eq!(u16_at(&wav, 34), 16); // bits per sample
    }

    #[test]
    fn stereo_length_counts_all_channels() {
        // 3 frames × 2 channels
        let samples = vec![0.0_f32; 6];
        let wav = encode_wav(&samples, 44_100, 2).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN + 6 * 2);
        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u16_at(&wav, 32), 4); // block align = channels × 2
    }

    // ---- encode_wav: round trip ---

    #[test]
    fn round_trip_is_within_one_lsb() {
        let samples: Vec<f32> = (0..1000).map(|i| ((i as f32) / 500.0) - 1.0).collect();
        let wav = encode_wav(&samples, 24_000, 1).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);

        for (i, decoded) in reader.samples::<i16>().enumerate() {
            let decoded = decoded.unwrap();
            let original = samples[i].clamp(-1.0, 1.0);
            let recovered = if decoded < 0 {
                decoded as f32 / 32768.0
            } else {
                decoded as f32 / 32767.0
            };
            // one LSB of quantisation error at int16 resolution
            assert!(
                (original - recovered).abs() <= 1.0 / 32767.0,
                "sample {i}: {original} vs {recovered}"
            );
        }
    }
}
