//! Example: write a generated tone, read it back, and check the samples survive.
//!
//! Run with `cargo run -p siren-format --example round_trip [bits]`.

use siren_format::{read_wav, Container, FormatDescriptor, SampleMatrix, WavWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bits: u16 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(16);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("round_trip.wav");

    println!("=== WAV Round-Trip ({bits}-bit) ===\n");

    let format = FormatDescriptor::pcm(1, 48000, bits)?;
    let peak = format.bit_depth().max_value() as f64;
    let samples: Vec<i32> = (0..48000)
        .map(|i| {
            let s = (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 48000.0).sin();
            if bits == 8 {
                (s * 127.0) as i32 + 128
            } else {
                (s * peak) as i32
            }
        })
        .collect();
    let matrix = SampleMatrix::from_interleaved(1, samples)?;

    let container = Container::new(format, matrix)?;
    WavWriter::new().write(&container, &path)?;
    println!(
        "Wrote:  {} frames, {} data bytes, RIFF size {}",
        container.frame_count(),
        container.data_size,
        container.file_size
    );

    let decoded = read_wav(&path)?;
    println!(
        "Read:   {} frames, {} Hz, {} bits",
        decoded.frame_count(),
        decoded.format.sample_rate(),
        decoded.format.bits_per_sample()
    );

    if decoded == container {
        println!("\nPASS: container round-trip is exact");
        Ok(())
    } else {
        Err("decoded container differs from the one written".into())
    }
}
