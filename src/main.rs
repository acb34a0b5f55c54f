// Copyright 2020 TwoCookingMice

use std::env;
use std::path::PathBuf;

use lumiere::core::error::{ RenderError, Result };
use lumiere::core::intersector::{ select_device, IntersectionDevice };
use lumiere::core::scene_loader::load_scene;
use lumiere::intersectors::bvh::BvhDevice;
use lumiere::io::save_output;
use lumiere::renderers::progressive::ProgressiveRenderer;

struct Args {
    scene: PathBuf,
    output: PathBuf,
    frames: Option<u32>,
    bounces: Option<usize>,
    tile_size: Option<usize>,
}

fn usage(program: &str) -> String {
    format!("Usage: {} <scene.xml> <output.{{tga,png,exr}}> [--frames N] [--bounces N] [--tile N]", program)
}

fn parse_flag<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    value.and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| RenderError::InvalidSettings(format!("{} expects a number", flag)))
}

fn parse_args(args: &[String]) -> Result<Args> {
    if args.len() < 3 {
        let program = args.first().map(|s| s.as_str()).unwrap_or("lumiere");
        return Err(RenderError::InvalidSettings(usage(program)));
    }

    let mut parsed = Args {
        scene: PathBuf::from(&args[1]),
        output: PathBuf::from(&args[2]),
        frames: None,
        bounces: None,
        tile_size: None,
    };

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" => {
                i += 1;
                parsed.frames = Some(parse_flag("--frames", args.get(i))?);
            }
            "--bounces" => {
                i += 1;
                parsed.bounces = Some(parse_flag("--bounces", args.get(i))?);
            }
            "--tile" => {
                i += 1;
                parsed.tile_size = Some(parse_flag("--tile", args.get(i))?);
            }
            other => log::warn!("Ignoring unknown argument {}.", other),
        }
        i += 1;
    }
    Ok(parsed)
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    let loaded = load_scene(&args.scene)?;
    let mut settings = loaded.settings;
    settings.frames = args.frames.unwrap_or(settings.frames);
    settings.bounces = args.bounces.unwrap_or(settings.bounces);
    settings.tile_size = args.tile_size.unwrap_or(settings.tile_size);
    settings.output = Some(args.output.clone());

    let devices: Vec<Box<dyn IntersectionDevice>> = vec![Box::new(BvhDevice)];
    let device = select_device(&devices)?;

    let mut renderer = ProgressiveRenderer::setup(loaded.scene, device, &settings)?;
    renderer.render(settings.frames);
    save_output(&args.output, renderer.film(), renderer.frame())
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
