//! Integration tests: siren-format against files produced and consumed by `hound`.
//!
//! `hound` is an independent WAV implementation, so agreement in both
//! directions checks the on-disk layout rather than just self-consistency.

use std::path::Path;

use siren_format::{read_wav, Container, FormatDescriptor, SampleMatrix, WavError, WavWriter};

/// Helper: write interleaved integer samples with hound.
fn write_with_hound(path: &Path, channels: u16, sample_rate: u32, bits: u16, samples: &[i32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        match bits {
            8 => writer.write_sample(s as i8).unwrap(),
            16 => writer.write_sample(s as i16).unwrap(),
            _ => writer.write_sample(s).unwrap(),
        }
    }
    writer.finalize().unwrap();
}

/// Helper: a short stereo ramp that touches both extremes of 16-bit range.
fn ramp_16(frames: usize) -> Vec<i32> {
    (0..frames)
        .flat_map(|i| {
            let v = (i as i32 * 997) % 65536 - 32768;
            [v, -(v + 1)]
        })
        .collect()
}

#[test]
fn test_read_hound_16bit_stereo() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hound16.wav");
    let samples = ramp_16(1000);
    write_with_hound(&path, 2, 44100, 16, &samples);

    let container = read_wav(&path).unwrap();
    assert_eq!(container.format.channel_count(), 2);
    assert_eq!(container.format.sample_rate(), 44100);
    assert_eq!(container.format.bits_per_sample(), 16);
    assert_eq!(container.format.byte_rate(), 176_400);
    assert_eq!(container.format.block_align(), 4);
    assert_eq!(container.frame_count(), 1000);
    assert_eq!(container.data_size, 4000);
    assert_eq!(container.samples.as_interleaved(), samples.as_slice());
}

#[test]
fn test_read_hound_32bit_mono() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hound32.wav");
    let samples = vec![i32::MIN, -1, 0, 1, i32::MAX];
    write_with_hound(&path, 1, 48000, 32, &samples);

    let container = read_wav(&path).unwrap();
    assert_eq!(container.format.bits_per_sample(), 32);
    assert_eq!(container.samples.as_interleaved(), samples.as_slice());
}

#[test]
fn test_read_hound_8bit_is_unsigned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hound8.wav");
    // hound takes signed 8-bit samples and stores them offset by 128.
    write_with_hound(&path, 1, 8000, 8, &[-128, 0, 127]);

    let container = read_wav(&path).unwrap();
    assert_eq!(container.samples.as_interleaved(), &[0, 128, 255]);
}

#[test]
fn test_hound_reads_our_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ours.wav");

    let format = FormatDescriptor::pcm(2, 22050, 16).unwrap();
    let samples = SampleMatrix::from_interleaved(2, ramp_16(256)).unwrap();
    let container = Container::new(format, samples.clone()).unwrap();
    WavWriter::new().write(&container, &path).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 16);
    let read: Vec<i32> = reader
        .samples::<i16>()
        .map(|s| s.unwrap() as i32)
        .collect();
    assert_eq!(read, samples.into_interleaved());
}

#[test]
fn test_file_round_trip_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.wav");
    let copy = dir.path().join("copy.wav");
    write_with_hound(&source, 2, 44100, 16, &ramp_16(500));

    let container = read_wav(&source).unwrap();
    WavWriter::new().write(&container, &copy).unwrap();

    assert_eq!(std::fs::read(&source).unwrap(), std::fs::read(&copy).unwrap());
}

#[test]
fn test_replaced_samples_keep_header() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.wav");
    let derived_path = dir.path().join("derived.wav");
    write_with_hound(&source, 2, 44100, 16, &ramp_16(100));

    let container = read_wav(&source).unwrap();
    let silence = SampleMatrix::from_interleaved(2, vec![0; 200]).unwrap();
    WavWriter::new()
        .write(&container.with_samples(silence), &derived_path)
        .unwrap();

    let original = std::fs::read(&source).unwrap();
    let derived = std::fs::read(&derived_path).unwrap();
    assert_eq!(original.len(), derived.len());
    assert_eq!(original[..44], derived[..44]);
    assert!(derived[44..].iter().all(|&b| b == 0));
}

#[test]
fn test_truncated_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.wav");
    write_with_hound(&path, 2, 44100, 16, &ramp_16(100));

    let mut bytes = std::fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 3);
    std::fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        read_wav(&path),
        Err(WavError::UnexpectedEndOfStream { .. })
    ));
}
