use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError};
use kscope_core::{load_pattern, PatternData, ViewMode};
use kscope_render::{
    load_settings, pattern_channel, CapturedFrame, ExportFormat, ExportOptions, FeedState, FrameClock,
    PatternRenderer, PatternSink, RenderSettings, RgbaSurface,
};

const USAGE: &str = "usage: kaleidoscope-render <pattern.json|-> <out.png|out.jpg> [--mode 2d|3d] [--size N] \
                     [--mirrors N] [--settings file.json] [--frames N] [--format png|jpg] [--scale 1-4]";
const STREAM_FPS: u32 = 60;

struct Args {
    input: String,
    output: PathBuf,
    mode: ViewMode,
    size: u32,
    mirrors: Option<u32>,
    settings: Option<PathBuf>,
    frames: u64,
    export: ExportOptions,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut mode = ViewMode::Flat;
    let mut size = 800;
    let mut mirrors = None;
    let mut settings = None;
    let mut frames = 0;
    let mut format = None;
    let mut scale = 1;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--mode" => {
                let name = value("--mode")?;
                mode = ViewMode::from_name(&name).ok_or_else(|| format!("unknown view mode '{name}'"))?;
            }
            "--size" => size = parse_number("--size", &value("--size")?)?,
            "--mirrors" => mirrors = Some(parse_number("--mirrors", &value("--mirrors")?)?),
            "--settings" => settings = Some(PathBuf::from(value("--settings")?)),
            "--frames" => frames = parse_number("--frames", &value("--frames")?)?,
            "--format" => {
                let name = value("--format")?;
                format = Some(ExportFormat::from_name(&name).ok_or_else(|| format!("unknown format '{name}'"))?);
            }
            "--scale" => scale = parse_number("--scale", &value("--scale")?)?,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => return Err(format!("unknown option {other}\n{USAGE}")),
            other => positional.push(other.to_string()),
        }
    }

    let [input, output]: [String; 2] = positional.try_into().map_err(|_| USAGE.to_string())?;
    if size == 0 {
        return Err("--size must be positive".to_string());
    }
    let output = PathBuf::from(output);
    let format = format.or_else(|| ExportFormat::from_path(&output)).unwrap_or_default();
    let export = ExportOptions::new(format, scale)?;
    Ok(Args {
        input,
        output,
        mode,
        size,
        mirrors,
        settings,
        frames,
        export,
    })
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("{name}: invalid number '{raw}'"))
}

fn load_render_settings(path: Option<&Path>) -> Result<RenderSettings, String> {
    match path {
        Some(path) => load_settings(path).map_err(|e| format!("failed to load settings {}: {e}", path.display())),
        None => Ok(RenderSettings::default()),
    }
}

fn apply_mirrors(pattern: PatternData, mirrors: Option<u32>) -> PatternData {
    match mirrors {
        Some(m) => pattern.with_mirror_count(m),
        None => pattern,
    }
}

fn render_file(renderer: &mut PatternRenderer<RgbaSurface>, args: &Args) -> Result<(), String> {
    let pattern = apply_mirrors(load_pattern(Path::new(&args.input))?, args.mirrors);
    let report = renderer.render(&pattern, args.mode);
    log::info!(
        "Rendered {} samples ({} skipped) with {} symmetry",
        report.drawn,
        report.skipped,
        report.symmetry
    );

    if args.frames > 0 {
        renderer.start_animation();
        for _ in 0..args.frames {
            renderer.on_frame_tick();
        }
        renderer.stop_animation();
    }
    Ok(())
}

fn spawn_stdin_reader(sink: PatternSink) -> Result<thread::JoinHandle<()>, String> {
    thread::Builder::new()
        .name("kscope-stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::warn!("stdin read failed: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = sink.send_message(&line) {
                    log::warn!("Ignoring message: {e}");
                }
            }
        })
        .map_err(|e| format!("Failed to spawn stdin reader: {e}"))
}

/// Render newline-delimited JSON messages from stdin until it closes or
/// `--frames` animation ticks have elapsed.
fn render_stream(renderer: &mut PatternRenderer<RgbaSurface>, args: &Args) -> Result<(), String> {
    let (sink, feed) = pattern_channel(8);
    let reader = spawn_stdin_reader(sink)?;

    let (tick_tx, tick_rx) = bounded(2);
    let mut clock = FrameClock::start(STREAM_FPS, tick_tx)?;
    renderer.start_animation();

    let mut ticks = 0u64;
    loop {
        match tick_rx.recv_timeout(Duration::from_secs(1)) {
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let mut newest = None;
        let mut closed = false;
        loop {
            match feed.poll() {
                FeedState::Pattern(pattern) => newest = Some(pattern),
                FeedState::Idle => break,
                FeedState::Closed => {
                    closed = true;
                    break;
                }
            }
        }

        if let Some(pattern) = newest {
            renderer.render(&apply_mirrors(pattern, args.mirrors), args.mode);
        } else if renderer.on_frame_tick() {
            ticks += 1;
        }

        if closed || (args.frames > 0 && ticks >= args.frames) {
            break;
        }
    }

    renderer.stop_animation();
    clock.stop();
    if reader.is_finished() {
        let _ = reader.join();
    }
    Ok(())
}

fn run() -> Result<(), String> {
    let args = parse_args(std::env::args().skip(1))?;
    let settings = load_render_settings(args.settings.as_deref())?;
    let surface = RgbaSurface::new(args.size, args.size)?;
    let mut renderer = PatternRenderer::new(surface, settings)?;

    if args.input == "-" {
        render_stream(&mut renderer, &args)?;
    } else {
        render_file(&mut renderer, &args)?;
    }

    CapturedFrame::capture(renderer.surface()).save(&args.output, &args.export)
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
