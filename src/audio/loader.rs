use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as PacketBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::types::{AudioFormat, SampleBuffer};
use crate::error::{AudioError, Result};

/// Turns encoded audio bytes into a [`SampleBuffer`]
pub trait AudioDecoder: Send + Sync {
    /// Decode `bytes`; `hint` is a file extension used to guide probing
    fn decode(&self, bytes: &[u8], hint: Option<&str>) -> Result<SampleBuffer>;
}

/// Audio loader supporting WAV through hound and everything else symphonia probes
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioLoader;

impl AudioLoader {
    /// Read and decode an audio file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<SampleBuffer> {
        let (bytes, hint) = Self::read_file(path).await?;
        AudioLoader.decode(&bytes, hint.as_deref())
    }

    /// Read a file's bytes along with the extension hint used for probing
    pub async fn read_file<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, Option<String>)> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|_| AudioError::LoadFailed {
            path: path.display().to_string(),
        })?;

        tracing::debug!("Read {} bytes from {:?}", bytes.len(), path);
        Ok((bytes, Self::detect_format(path)))
    }

    /// Decode WAV data using the hound crate (most reliable for WAV)
    fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer> {
        let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| {
            AudioError::DecodeFailed {
                reason: format!("invalid WAV data: {}", e),
            }
        })?;

        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| AudioError::DecodeFailed {
                    reason: format!("corrupt WAV samples: {}", e),
                })?,
            hound::SampleFormat::Int => {
                let bit_depth = spec.bits_per_sample;
                reader
                    .into_samples::<i32>()
                    .map(|sample| sample.map(|s| Self::int_to_float(s, bit_depth)))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| AudioError::DecodeFailed {
                        reason: format!("corrupt WAV samples: {}", e),
                    })?
            }
        };

        let buffer = SampleBuffer::from_interleaved(spec.sample_rate, spec.channels, &samples)?;
        Ok(buffer.with_format(AudioFormat {
            extension: "wav".to_string(),
            bit_depth: Some(spec.bits_per_sample),
            codec: None,
        }))
    }

    /// Decode other formats using Symphonia
    fn decode_with_symphonia(bytes: &[u8], extension: Option<&str>) -> Result<SampleBuffer> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = extension {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|e| match e {
                SymphoniaError::Unsupported(_) => AudioError::UnsupportedFormat {
                    format: extension.unwrap_or("unknown").to_string(),
                },
                other => AudioError::DecodeFailed {
                    reason: other.to_string(),
                },
            })?;

        let mut format = probed.format;

        // Find the first audio track with a known (decodable) codec
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::DecodeFailed {
                reason: "no decodable audio track".to_string(),
            })?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let mut sample_rate = codec_params.sample_rate;

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &dec_opts)
            .map_err(|e| AudioError::DecodeFailed {
                reason: e.to_string(),
            })?;

        let mut channels: Vec<Vec<f32>> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                // End of stream
                Err(SymphoniaError::IoError(_)) => break,
                Err(e) => {
                    return Err(AudioError::DecodeFailed {
                        reason: e.to_string(),
                    }
                    .into())
                }
            };

            // Consume any new metadata
            while !format.metadata().is_latest() {
                format.metadata().pop();
            }

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let channel_count = spec.channels.count();
                    if channels.is_empty() {
                        channels = vec![Vec::new(); channel_count];
                    }
                    if sample_rate.is_none() {
                        sample_rate = Some(spec.rate);
                    }

                    let frames = decoded.frames();
                    if frames == 0 {
                        continue;
                    }
                    if channel_count != channels.len() {
                        tracing::warn!(
                            "Skipping packet with {} channel(s), stream started with {}",
                            channel_count,
                            channels.len()
                        );
                        continue;
                    }

                    let mut planar = PacketBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    planar.copy_planar_ref(decoded);
                    for (channel, chunk) in channels.iter_mut().zip(planar.samples().chunks(frames)) {
                        channel.extend_from_slice(chunk);
                    }
                }
                Err(SymphoniaError::IoError(_)) => break,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(AudioError::DecodeFailed {
                        reason: e.to_string(),
                    }
                    .into())
                }
            }
        }

        let buffer = Self::assemble(sample_rate, channels)?;
        Ok(buffer.with_format(AudioFormat {
            extension: extension.unwrap_or("unknown").to_string(),
            bit_depth: codec_params.bits_per_sample.map(|b| b as u16),
            codec: symphonia::default::get_codecs()
                .get_codec(codec_params.codec)
                .map(|descriptor| descriptor.short_name.to_string()),
        }))
    }

    /// Build the buffer from decoded channels; a stream with no frames is a decode failure
    fn assemble(sample_rate: Option<u32>, channels: Vec<Vec<f32>>) -> Result<SampleBuffer> {
        if channels.first().map_or(true, Vec::is_empty) {
            return Err(AudioError::DecodeFailed {
                reason: "no audio frames decoded".to_string(),
            }
            .into());
        }

        let sample_rate = sample_rate.ok_or_else(|| AudioError::DecodeFailed {
            reason: "no sample rate found".to_string(),
        })?;

        SampleBuffer::new(sample_rate, channels)
    }

    /// Convert integer sample to float (-1.0 to 1.0).
    ///
    /// hound already yields 8-bit samples as signed values.
    fn int_to_float(sample: i32, bit_depth: u16) -> f32 {
        match bit_depth {
            8 => sample as f32 / 128.0,
            16 => sample as f32 / 32768.0,
            24 => sample as f32 / 8388608.0,
            32 => sample as f32 / 2147483648.0,
            _ => sample as f32 / 32768.0, // Default to 16-bit
        }
    }

    /// Whether the bytes carry a RIFF/WAVE header
    fn looks_like_wav(bytes: &[u8]) -> bool {
        bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
    }

    /// Detect audio format from file extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Check if a file format is one of the commonly supported extensions
    pub fn is_format_supported(extension: &str) -> bool {
        matches!(
            extension.to_lowercase().as_str(),
            "wav" | "mp3" | "flac" | "ogg" | "m4a" | "aac" | "aiff"
        )
    }
}

impl AudioDecoder for AudioLoader {
    fn decode(&self, bytes: &[u8], hint: Option<&str>) -> Result<SampleBuffer> {
        let buffer = if hint == Some("wav") || Self::looks_like_wav(bytes) {
            Self::decode_wav(bytes)?
        } else {
            Self::decode_with_symphonia(bytes, hint)?
        };

        tracing::debug!(
            "Decoded {:.2}s of audio: {} Hz, {} channel(s)",
            buffer.duration(),
            buffer.sample_rate(),
            buffer.channel_count()
        );
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MomentsError;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: &[[i16; 2]]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &sample in &frame[..channels as usize] {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(AudioLoader::detect_format("test.wav"), Some("wav".to_string()));
        assert_eq!(AudioLoader::detect_format("test.MP3"), Some("mp3".to_string()));
        assert_eq!(AudioLoader::detect_format("test"), None);
    }

    #[test]
    fn test_format_support() {
        assert!(AudioLoader::is_format_supported("wav"));
        assert!(AudioLoader::is_format_supported("mp3"));
        assert!(AudioLoader::is_format_supported("FLAC"));
        assert!(!AudioLoader::is_format_supported("xyz"));
    }

    #[test]
    fn test_int_to_float_conversion() {
        assert_eq!(AudioLoader::int_to_float(0, 16), 0.0);
        assert_eq!(AudioLoader::int_to_float(32767, 16), 32767.0 / 32768.0);
        assert_eq!(AudioLoader::int_to_float(-32768, 16), -1.0);

        assert_eq!(AudioLoader::int_to_float(0, 8), 0.0);
        assert_eq!(AudioLoader::int_to_float(-128, 8), -1.0);
        assert_eq!(AudioLoader::int_to_float(-8388608, 24), -1.0);
    }

    #[tokio::test]
    async fn test_load_stereo_wav() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("stereo.wav");
        let frames: Vec<[i16; 2]> = (0..800).map(|_| [16384, -16384]).collect();
        write_wav(&file_path, 2, 8000, &frames);

        let buffer = AudioLoader::load(&file_path).await.unwrap();
        assert_eq!(buffer.sample_rate(), 8000);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.len(), 800);
        assert_eq!(buffer.duration(), 0.1);
        assert_eq!(buffer.channel(0).unwrap()[0], 0.5);
        assert_eq!(buffer.channel(1).unwrap()[0], -0.5);
        assert_eq!(buffer.format().unwrap().bit_depth, Some(16));
    }

    #[test]
    fn test_wav_detected_without_hint() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("mono.wav");
        write_wav(&file_path, 1, 1000, &[[1000, 0]; 50]);

        let bytes = std::fs::read(&file_path).unwrap();
        let buffer = AudioLoader.decode(&bytes, None).unwrap();
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.len(), 50);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = AudioLoader::load("/definitely/not/here.wav").await;
        match result {
            Err(MomentsError::Audio(AudioError::LoadFailed { path })) => {
                assert!(path.contains("here.wav"));
            }
            other => panic!("Expected LoadFailed error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_to_decode() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("test.xyz");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"dummy content that is not audio").unwrap();

        let result = AudioLoader::load(&file_path).await;
        assert!(matches!(
            result,
            Err(MomentsError::Audio(
                AudioError::UnsupportedFormat { .. } | AudioError::DecodeFailed { .. }
            ))
        ));
    }

    #[test]
    fn test_truncated_wav_header() {
        let result = AudioLoader.decode(b"RIFF\0\0\0\0WAVE", Some("wav"));
        assert!(matches!(
            result,
            Err(MomentsError::Audio(AudioError::DecodeFailed { .. }))
        ));
    }

    #[test]
    fn test_no_decoded_frames_is_decode_failure() {
        for channels in [vec![], vec![vec![], vec![]]] {
            let result = AudioLoader::assemble(Some(44100), channels);
            match result {
                Err(MomentsError::Audio(AudioError::DecodeFailed { reason })) => {
                    assert_eq!(reason, "no audio frames decoded");
                }
                other => panic!("Expected DecodeFailed error, got {:?}", other),
            }
        }

        let buffer = AudioLoader::assemble(Some(8000), vec![vec![0.25; 4]]).unwrap();
        assert_eq!(buffer.len(), 4);
        assert!(AudioLoader::assemble(None, vec![vec![0.25; 4]]).is_err());
    }

    #[tokio::test]
    async fn test_read_file_returns_hint() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("Clip.WAV");
        write_wav(&file_path, 1, 1000, &[[0, 0]; 10]);

        let (bytes, hint) = AudioLoader::read_file(&file_path).await.unwrap();
        assert!(AudioLoader::looks_like_wav(&bytes));
        assert_eq!(hint.as_deref(), Some("wav"));

        let missing = AudioLoader::read_file(temp_dir.path().join("gone.flac")).await;
        assert!(matches!(
            missing,
            Err(MomentsError::Audio(AudioError::LoadFailed { .. }))
        ));
    }
}
