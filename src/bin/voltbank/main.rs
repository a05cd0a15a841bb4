//! voltbank - plays the demo patch on the default output device
//!
//! Run with: cargo run --bin voltbank
//! Set RUST_LOG=voltbank=debug to see module construction.

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing_subscriber::EnvFilter;

use voltbank::{
    patch::{DemoRack, RackPreset},
    rack::{control::CONTROL_QUEUE_SIZE, control_channel, filter::FilterParam},
};

const SWEEP_SECONDS: f32 = 8.0;
const SWEEP_STEPS: u32 = 400;
const SWEEP_LOW_HZ: f32 = 150.0;
const SWEEP_HIGH_HZ: f32 = 4_000.0;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let preset = RackPreset::default();
    tracing::info!(preset = %preset.name, sample_rate, channels, "starting");

    let mut rack = DemoRack::new(&preset, sample_rate);
    let (mut knobs, mut queue) = control_channel::<FilterParam>(CONTROL_QUEUE_SIZE);

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                queue.apply_pending(&mut rack.filter);
                rack.render_interleaved(data, channels);
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    // Cutoff sweeps up and back down on an exponential curve
    let step = Duration::from_secs_f32(SWEEP_SECONDS / SWEEP_STEPS as f32);
    for i in 0..=SWEEP_STEPS {
        let t = i as f32 / SWEEP_STEPS as f32;
        let triangle = 1.0 - (2.0 * t - 1.0).abs();
        let cutoff = SWEEP_LOW_HZ * (SWEEP_HIGH_HZ / SWEEP_LOW_HZ).powf(triangle);

        if !knobs.set(FilterParam::LpCutoff, cutoff) {
            tracing::warn!(cutoff, "control queue full, dropping cutoff change");
        }
        std::thread::sleep(step);
    }

    tracing::info!("done");
    Ok(())
}
