//! Command-line companion for the radius decal pass.
//!
//! ```text
//! radius-decals shader [OPTIONS.toml]   write the configured WGSL module
//! radius-decals schema                  write the options JSON schema
//! radius-decals probe [OPTIONS.toml]    compare GPU and CPU results
//! ```

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use glam::{Vec2, Vec3};
use radius_decals::compositor::{radius_cursor_decal_color, TextureArray};
use radius_decals::decal::{RadiusCursorDecal, RadiusCursorDecalSet};
use radius_decals::error::DecalError;
use radius_decals::gpu::{
    decal_module_source, DecalProbe, DecalTextureArray, RadiusDecalResources,
    RenderContext, ShaderComposer,
};
use radius_decals::options::Options;

/// Largest per-channel difference accepted between GPU and CPU results.
const PROBE_TOLERANCE: f32 = 1.0 / 128.0;

fn load_options(path: Option<&str>) -> Result<Options, DecalError> {
    path.map_or_else(
        || Ok(Options::default()),
        |path| {
            log::info!("loading options from {path}");
            Options::load(Path::new(path))
        },
    )
}

fn write_shader(path: Option<&str>) -> Result<(), DecalError> {
    let options = load_options(path)?;
    // Registering the module parses it, so broken bindings fail here.
    let _composer = ShaderComposer::new(&options.bindings)?;
    let mut out = std::io::stdout().lock();
    out.write_all(decal_module_source(&options.bindings).as_bytes())?;
    Ok(())
}

fn write_schema() -> Result<(), DecalError> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())
        .map_err(|e| DecalError::OptionsParse(e.to_string()))?;
    writeln!(std::io::stdout().lock(), "{schema}")?;
    Ok(())
}

/// Flat colors of the synthetic probe layers, RGBA8.
const PROBE_LAYERS: [[u8; 4]; 3] =
    [[255, 64, 0, 255], [0, 128, 255, 128], [32, 255, 96, 200]];

fn probe(path: Option<&str>) -> Result<(), DecalError> {
    let options = load_options(path)?;
    let context = pollster::block_on(RenderContext::new_headless())?;

    let srgb = options.sampler.srgb;
    let textures = DecalTextureArray::solid(
        &context.device,
        &context.queue,
        &PROBE_LAYERS,
        srgb,
    )?;
    let mut resources = RadiusDecalResources::new(&context, &options, textures)?;
    let layer_count = resources.textures().layer_count();
    let mut composer = ShaderComposer::new(&options.bindings)?;
    let probe = DecalProbe::new(&context, &mut composer, &resources)?;

    let mut set = RadiusCursorDecalSet::new(
        options.decals.max_decals,
        layer_count,
        options.decals.overflow,
    );
    let decals = [
        RadiusCursorDecal::from_center_radius(Vec2::new(0.0, 0.0), 4.0, 0, 1.0),
        RadiusCursorDecal::from_center_radius(Vec2::new(3.0, 1.0), 2.5, 1, 0.6),
        RadiusCursorDecal::from_center_radius(Vec2::new(-2.0, 2.0), 3.0, 2, 0.3),
    ];
    let _ = set.update(&decals)?;
    let _ = resources.upload(&context, &set);

    let points: Vec<Vec3> = (-4..=4)
        .flat_map(|y| (-4..=4).map(move |x| Vec3::new(x as f32, y as f32, 0.0)))
        .collect();
    let gpu = probe.run(&context, &resources, &points)?;

    let layers: Vec<&[u8]> = PROBE_LAYERS.iter().map(<[u8; 4]>::as_slice).collect();
    // Match the sampler the device built, including any border fallback.
    let reference = TextureArray::from_rgba8(
        1,
        1,
        &layers,
        resources.sampler_state(),
        srgb,
    )?;

    let mut out = std::io::stdout().lock();
    let mut mismatches = 0usize;
    for (point, gpu_color) in points.iter().zip(&gpu) {
        let cpu_color = radius_cursor_decal_color(
            *point,
            &set.constants(),
            set.decals(),
            &reference,
        );
        let delta = (*gpu_color - cpu_color).abs().max_element();
        if delta > PROBE_TOLERANCE {
            mismatches += 1;
            log::warn!("mismatch at {point}: gpu {gpu_color} cpu {cpu_color}");
        }
        writeln!(
            out,
            "{:>5.1} {:>5.1}  gpu {gpu_color:.3}  cpu {cpu_color:.3}",
            point.x, point.y,
        )?;
    }
    writeln!(out, "{mismatches} of {} points differ", points.len())?;

    if mismatches > 0 {
        return Err(DecalError::Readback(format!(
            "{mismatches} probe points disagree with the CPU reference"
        )));
    }
    Ok(())
}

fn usage() -> ExitCode {
    log::error!("usage: radius-decals <shader|schema|probe> [OPTIONS.toml]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args: Vec<String> = std::env::args().collect();
    let options_path = args.get(2).map(String::as_str);

    let result = match args.get(1).map(String::as_str) {
        Some("shader") => write_shader(options_path),
        Some("schema") => write_schema(),
        Some("probe") => probe(options_path),
        _ => return usage(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
