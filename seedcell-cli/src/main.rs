//! Voronoi diagram CLI
//!
//! Colors a surface after its nearest seed points, either in one pass or
//! as an animation whose search radius grows every frame.
//!
//! ## YAML scene file
//!
//! ```yaml
//! width: 800
//! height: 600
//! seed: 7
//! points: 25          # random points, when no fixed ones are listed
//! fixed:
//!   - [120, 80]
//!   - [400, 300]
//! animated: true
//! speed: 15
//! fps: 30
//! hold: 2
//! background: "#f8f9fa"
//! ```
//!
//! Run with: `seedcell -o out.gif -f gif --scene scene.yaml`
//!
//! ## Inline points
//!
//!   seedcell -o out.png --point 120,80 --point 400,300
//!
//! ## Graceful interruption
//!
//! Frames are streamed to the encoder as they render. Press Ctrl+C to
//! cancel the animation and finalize the frames rendered so far.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use seedcell_core::{
    fill_instant, AnimationSpeed, ColorToken, Generation, GenerationRun, Raster, Rgb, RunStatus,
    SeedSet, Session, SessionConfig, DEFAULT_BACKGROUND,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Png,
    Gif,
    Mp4,
}

/// YAML scene file format. Every field is optional; CLI flags win.
#[derive(Debug, Default, Deserialize)]
struct SceneSpec {
    width: Option<u32>,
    height: Option<u32>,
    seed: Option<u64>,
    points: Option<usize>,
    #[serde(default)]
    fixed: Vec<[f64; 2]>,
    animated: Option<bool>,
    speed: Option<f64>,
    fps: Option<u32>,
    hold: Option<f64>,
    background: Option<String>,
}

fn default_fps() -> u32 { 30 }
fn default_hold() -> f64 { 2.0 }

fn load_scene(path: &PathBuf) -> anyhow::Result<SceneSpec> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene file: {:?}", path))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse scene file: {:?}", path))
}

/// Parse a point like "120,80" or "120.5, 80"
fn parse_point(spec: &str) -> anyhow::Result<[f64; 2]> {
    let (x, y) = spec
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("invalid point '{}' (expected x,y)", spec))?;
    let x: f64 = x.trim().parse().with_context(|| format!("invalid x in '{}'", spec))?;
    let y: f64 = y.trim().parse().with_context(|| format!("invalid y in '{}'", spec))?;
    if !(x.is_finite() && y.is_finite()) {
        anyhow::bail!("point '{}' is not finite", spec);
    }
    Ok([x, y])
}

/// Parse "#rrggbb" or "hsl(h, s%, l%)"
fn parse_background(spec: &str) -> anyhow::Result<Rgb> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() != 6 {
            anyhow::bail!("invalid hex color '{}' (expected #rrggbb)", spec);
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex color '{}'", spec))
        };
        return Ok([channel(0)?, channel(2)?, channel(4)?]);
    }
    let token: ColorToken = spec.parse()?;
    Ok(token.to_rgb())
}

/// Where the seeds of a scene come from
#[derive(Debug, Clone, PartialEq)]
enum PointSource {
    /// `Some(n)` random points, or the default random count
    Random(Option<usize>),
    Fixed(Vec<[f64; 2]>),
}

/// Scene settings after merging the scene file with CLI flags
#[derive(Debug, Clone, PartialEq)]
struct Scene {
    width: u32,
    height: u32,
    seed: u64,
    points: PointSource,
    animated: bool,
    speed: AnimationSpeed,
    fps: u32,
    hold: f64,
    background: Rgb,
}

impl Scene {
    fn resolve(args: &Args, spec: SceneSpec) -> anyhow::Result<Self> {
        let defaults = SessionConfig::default();

        let fixed = if args.point.is_empty() {
            spec.fixed
        } else {
            args.point.iter().map(|p| parse_point(p)).collect::<anyhow::Result<Vec<_>>>()?
        };
        let count = args.points.or(spec.points);
        // An explicit count beats points listed in the scene file
        let points = if !args.point.is_empty() || (count.is_none() && !fixed.is_empty()) {
            PointSource::Fixed(fixed)
        } else {
            PointSource::Random(count)
        };

        let speed = match args.speed.or(spec.speed) {
            Some(v) => {
                let speed = AnimationSpeed::new(v)?;
                let clamped = AnimationSpeed::clamped(v);
                if clamped != speed {
                    eprintln!(
                        "Warning: speed {} outside {}..={}, using {}",
                        v, AnimationSpeed::MIN, AnimationSpeed::MAX, clamped.get()
                    );
                }
                clamped
            }
            None => AnimationSpeed::default(),
        };

        let background = match args.background.as_deref().or(spec.background.as_deref()) {
            Some(text) => parse_background(text)?,
            None => DEFAULT_BACKGROUND,
        };

        let fps = args.fps.or(spec.fps).unwrap_or_else(default_fps);
        if fps == 0 {
            anyhow::bail!("fps must be at least 1");
        }
        let hold = args.hold.or(spec.hold).unwrap_or_else(default_hold);
        if !hold.is_finite() || hold < 0.0 {
            anyhow::bail!("hold must be a non-negative number of seconds, got {}", hold);
        }

        Ok(Self {
            width: args.width.or(spec.width).unwrap_or(defaults.width),
            height: args.height.or(spec.height).unwrap_or(defaults.height),
            seed: args.seed.or(spec.seed).unwrap_or(0),
            points,
            animated: args.animated || spec.animated.unwrap_or(false),
            speed,
            fps,
            hold,
            background,
        })
    }

    fn session(&self) -> anyhow::Result<Session> {
        let config = SessionConfig {
            width: self.width,
            height: self.height,
            background: self.background,
            animated: self.animated,
            speed: self.speed,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, self.seed)?;
        match &self.points {
            PointSource::Random(count) => {
                session.generate_random_points(*count);
            }
            PointSource::Fixed(points) => {
                for &[x, y] in points {
                    session.add_point(x, y);
                }
            }
        }
        Ok(session)
    }
}

#[derive(Parser, Debug)]
#[command(name = "seedcell")]
#[command(about = "Render Voronoi diagrams and their animated growth", long_about = None)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "png")]
    format: OutputFormat,

    /// Surface width in pixels [default: 800]
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels [default: 600]
    #[arg(long)]
    height: Option<u32>,

    /// Number of random points [default: 15 to 34]
    #[arg(short = 'n', long)]
    points: Option<usize>,

    /// Fixed point as x,y (repeatable; replaces random points)
    #[arg(short = 'p', long = "point")]
    point: Vec<String>,

    /// Random seed for point placement and colors [default: 0]
    #[arg(long)]
    seed: Option<u64>,

    /// Radius growth per frame in pixels, 1 to 100 [default: 15]
    #[arg(long)]
    speed: Option<f64>,

    /// Grow regions frame by frame (always on for gif/mp4)
    #[arg(short, long)]
    animated: bool,

    /// Frames per second for gif/mp4 [default: 30]
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds to hold the finished diagram at the end of gif/mp4 [default: 2]
    #[arg(long)]
    hold: Option<f64>,

    /// Background color, #rrggbb or hsl(h, s%, l%) [default: #f8f9fa]
    #[arg(long)]
    background: Option<String>,

    /// YAML scene file
    #[arg(long, alias = "spec")]
    scene: Option<PathBuf>,

    /// Time instant fills against animated runs
    #[arg(long)]
    benchmark: bool,

    /// Number of timed runs in benchmark mode
    #[arg(long, default_value = "5")]
    bench_runs: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let spec = args.scene.as_ref().map(load_scene).transpose()?.unwrap_or_default();
    let mut scene = Scene::resolve(&args, spec)?;

    if args.benchmark {
        return run_benchmark(&scene, args.bench_runs);
    }

    let output = args.output.as_ref()
        .ok_or_else(|| anyhow::anyhow!("Output path required (use -o/--output)"))?;

    if args.format != OutputFormat::Png && !scene.animated {
        scene.animated = true;
    }

    let mut session = scene.session()?;
    println!(
        "Surface {}x{}, {} points (seed: {})",
        scene.width, scene.height, session.point_count(), scene.seed
    );

    if args.format == OutputFormat::Png {
        return render_still(&mut session, output);
    }
    render_animation(&mut session, &scene, output, args.format)
}

/// Draw one finished diagram and save it as PNG
fn render_still(session: &mut Session, output: &Path) -> anyhow::Result<()> {
    let start = Instant::now();
    if session.generate()? == Generation::Started {
        println!("Animating at {} px/frame", session.speed());
        let mut frames = 0usize;
        while session.tick().is_some() {
            frames += 1;
        }
        println!("Resolved in {} frames", frames);
    }
    session.surface().save(output)
        .with_context(|| format!("failed to save {:?}", output))?;
    println!("Output saved to: {:?} ({:.1?})", output, start.elapsed());
    Ok(())
}

fn render_animation(
    session: &mut Session,
    scene: &Scene,
    output: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    // Set up SIGINT handler
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || {
            interrupted.store(true, Ordering::SeqCst);
        }).context("failed to set Ctrl-C handler")?;
    }

    let (width, height) = session.dimensions();
    let diagonal = (width as f64).hypot(height as f64);
    let expected_frames = (diagonal / session.speed()).ceil() as u64;
    let hold_frames = (scene.hold * scene.fps as f64).round() as usize;

    println!(
        "Animating ~{} frames at {} fps ({} px/frame), holding {:.1}s",
        expected_frames, scene.fps, session.speed(), scene.hold
    );

    let progress = ProgressBar::new(expected_frames);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut encoder = spawn_encoder(output, format, width, height, scene.fps)?;
    session.generate()?;

    let render_start = Instant::now();
    let mut frames_rendered = 0usize;
    // Per-frame timing data: (resolved fraction, ms)
    let mut frame_timings: Vec<(f64, f64)> = Vec::with_capacity(expected_frames as usize);
    let mut status = RunStatus::Running;

    while status == RunStatus::Running {
        if interrupted.load(Ordering::Relaxed) {
            session.cancel();
            status = RunStatus::Cancelled;
            progress.abandon_with_message("Interrupted");
            eprintln!(
                "Interrupted after {} frames, finalizing partial output...",
                frames_rendered
            );
            break;
        }

        let frame_start = Instant::now();
        let Some(next) = session.tick() else {
            break;
        };
        status = next;
        encoder.write_frame(session.surface().as_raw())?;

        let frame_ms = frame_start.elapsed().as_secs_f64() * 1000.0;
        let fraction = session.resolved_fraction().unwrap_or(1.0);
        frame_timings.push((fraction, frame_ms));
        frames_rendered += 1;
        progress.inc(1);
    }

    if status == RunStatus::Complete {
        progress.finish_with_message("Rendering complete");
        for _ in 0..hold_frames {
            encoder.write_frame(session.surface().as_raw())?;
        }
    }

    if frames_rendered == 0 {
        encoder.discard(output)?;
        eprintln!("No frames rendered, nothing written to {:?}.", output);
        return Ok(());
    }

    encoder.finish()?;

    let total_wall = render_start.elapsed();
    let avg_fps = frames_rendered as f64 / total_wall.as_secs_f64();
    let partial = if status == RunStatus::Complete { "complete" } else { "partial" };
    println!(
        "Output saved to: {:?} ({} frames + {} held, {})",
        output, frames_rendered,
        if status == RunStatus::Complete { hold_frames } else { 0 },
        partial
    );
    println!(
        "Render time: {:.1}s wall, {:.2} fps avg",
        total_wall.as_secs_f64(), avg_fps,
    );

    print_timing_summary(&frame_timings);
    Ok(())
}

/// Frame timings bucketed by the share of the surface resolved
fn print_timing_summary(frame_timings: &[(f64, f64)]) {
    if frame_timings.is_empty() {
        return;
    }
    println!("\nFrame timing by resolved fraction:");
    println!("{:>10} {:>8} {:>8} {:>8} {:>6}", "resolved", "frames", "avg_ms", "max_ms", "fps");

    // Tenths; a fully resolved frame lands in the last bucket
    let mut buckets: std::collections::BTreeMap<u32, Vec<f64>> = std::collections::BTreeMap::new();
    for &(fraction, ms) in frame_timings {
        let bucket = ((fraction * 10.0).floor() as u32).min(9);
        buckets.entry(bucket).or_default().push(ms);
    }
    for (bucket, times) in &buckets {
        let count = times.len();
        let avg = times.iter().sum::<f64>() / count as f64;
        let max = times.iter().cloned().fold(0.0f64, f64::max);
        let fps = 1000.0 / avg;
        let label = format!("{}-{}%", bucket * 10, bucket * 10 + 10);
        println!("{:>10} {:>8} {:>8.1} {:>8.1} {:>6.1}", label, count, avg, max, fps);
    }
}

/// Benchmark the instant fill against a full animated run
fn run_benchmark(scene: &Scene, runs: usize) -> anyhow::Result<()> {
    let runs = runs.max(1);
    let session = scene.session()?;
    let seeds = SeedSet::from(session.seeds().to_vec());
    if seeds.is_empty() {
        anyhow::bail!("benchmark needs at least one point");
    }

    println!("\n=== Voronoi Benchmark ===");
    println!("Surface: {}x{}", scene.width, scene.height);
    println!("Points: {}", seeds.len());
    println!("Speed: {} px/frame", scene.speed.get());
    println!("Runs: {}", runs);
    println!();

    println!("Benchmarking instant fill...");
    let instant_time = time_runs(runs, || {
        let mut raster = Raster::filled(scene.width, scene.height, scene.background);
        fill_instant(&mut raster, seeds.as_slice());
    });
    report("Instant", instant_time, runs);

    println!("Benchmarking animated run...");
    let mut frames = 0;
    let animated_time = time_runs(runs, || {
        let raster = Raster::filled(scene.width, scene.height, scene.background);
        let mut run = GenerationRun::new(raster, seeds.as_slice(), scene.speed);
        run.run_to_end();
        frames = run.frame_count();
    });
    report("Animated", animated_time, runs);
    println!(
        "  {} frames per run, {:.2} ms/frame",
        frames,
        animated_time.as_secs_f64() * 1000.0 / (runs as f64 * frames.max(1) as f64)
    );

    println!();
    println!("=== Summary ===");
    let ratio = animated_time.as_secs_f64() / instant_time.as_secs_f64();
    println!("Animated run takes {:.2}x the instant fill", ratio);
    Ok(())
}

/// Time `runs` calls after one warmup call
fn time_runs<F: FnMut()>(runs: usize, mut f: F) -> Duration {
    f();
    let start = Instant::now();
    for _ in 0..runs {
        f();
    }
    start.elapsed()
}

fn report(name: &str, total: Duration, runs: usize) {
    println!(
        "  {}: {:?} total, {:.2} ms/run",
        name,
        total,
        total.as_secs_f64() * 1000.0 / runs as f64
    );
}

/// Sink for rendered frames. MP4 frames go to an ffmpeg child as raw RGBA;
/// GIF frames are palettized and written by the `gif` crate.
enum FrameEncoder {
    Mp4 {
        child: std::process::Child,
    },
    Gif {
        encoder: gif::Encoder<std::fs::File>,
        width: u16,
        height: u16,
        /// Hundredths of a second
        frame_delay: u16,
    },
}

impl FrameEncoder {
    fn write_frame(&mut self, rgba_data: &[u8]) -> anyhow::Result<()> {
        match self {
            FrameEncoder::Mp4 { child } => {
                use std::io::Write;
                let stdin = child.stdin.as_mut()
                    .ok_or_else(|| anyhow::anyhow!("ffmpeg stdin closed"))?;
                stdin.write_all(rgba_data)
                    .context("failed to write frame to ffmpeg")?;
            }
            FrameEncoder::Gif { encoder, width, height, frame_delay } => {
                let (indices, palette) = Palette::indexed(rgba_data);
                let mut frame = gif::Frame::from_palette_pixels(
                    *width, *height, indices, palette.into_flat(), None,
                );
                frame.delay = *frame_delay;
                encoder.write_frame(&frame)?;
            }
        }
        Ok(())
    }

    /// Flush the output; for MP4 this closes ffmpeg's input and waits on it
    fn finish(self) -> anyhow::Result<()> {
        match self {
            FrameEncoder::Mp4 { mut child } => {
                drop(child.stdin.take());
                let status = child.wait()?;
                if !status.success() {
                    anyhow::bail!("ffmpeg exited with {}", status);
                }
            }
            FrameEncoder::Gif { encoder, .. } => {
                encoder.into_inner().context("failed to finish GIF")?;
            }
        }
        Ok(())
    }

    /// Stop encoding and delete the partial output file
    fn discard(self, output: &Path) -> anyhow::Result<()> {
        match self {
            FrameEncoder::Mp4 { mut child } => {
                drop(child.stdin.take());
                // Nothing was written, so ffmpeg's exit status is meaningless
                child.wait().context("failed to wait for ffmpeg")?;
            }
            FrameEncoder::Gif { encoder, .. } => drop(encoder),
        }
        match std::fs::remove_file(output) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).with_context(|| format!("failed to remove {:?}", output))
            }
            _ => Ok(()),
        }
    }
}

/// GIF color table built from the colors of one frame, first come first
/// served. Once 256 entries are taken, further colors map to the closest
/// existing entry.
#[derive(Debug, Default)]
struct Palette {
    colors: Vec<[u8; 3]>,
    lookup: std::collections::HashMap<[u8; 3], u8>,
}

impl Palette {
    const CAPACITY: usize = 256;

    /// Palette indices for every pixel of an opaque RGBA frame
    fn indexed(rgba_data: &[u8]) -> (Vec<u8>, Self) {
        let mut palette = Self::default();
        let indices = rgba_data
            .chunks_exact(4)
            .map(|px| palette.index_of([px[0], px[1], px[2]]))
            .collect();
        (indices, palette)
    }

    fn index_of(&mut self, rgb: [u8; 3]) -> u8 {
        if let Some(&index) = self.lookup.get(&rgb) {
            return index;
        }
        let index = if self.colors.len() < Self::CAPACITY {
            self.colors.push(rgb);
            (self.colors.len() - 1) as u8
        } else {
            self.closest(rgb)
        };
        self.lookup.insert(rgb, index);
        index
    }

    fn closest(&self, rgb: [u8; 3]) -> u8 {
        let dist_sq = |c: &[u8; 3]| -> i32 {
            c.iter()
                .zip(rgb)
                .map(|(&a, b)| (a as i32 - b as i32).pow(2))
                .sum()
        };
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| dist_sq(c))
            .map_or(0, |(i, _)| i as u8)
    }

    /// Flat RGB table padded to a full 256 entries
    fn into_flat(self) -> Vec<u8> {
        let mut flat: Vec<u8> = self.colors.into_iter().flatten().collect();
        flat.resize(Self::CAPACITY * 3, 0);
        flat
    }
}

/// Spawn a streaming encoder
fn spawn_encoder(
    output: &Path,
    format: OutputFormat,
    width: u32,
    height: u32,
    fps: u32,
) -> anyhow::Result<FrameEncoder> {
    match format {
        OutputFormat::Mp4 => {
            use std::process::{Command, Stdio};
            let child = Command::new("ffmpeg")
                .args([
                    "-y",
                    "-f", "rawvideo",
                    "-pix_fmt", "rgba",
                    "-s", &format!("{}x{}", width, height),
                    "-r", &fps.to_string(),
                    "-i", "-", // read from stdin
                    "-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2",
                    "-c:v", "libx264",
                    "-pix_fmt", "yuv420p",
                    "-crf", "18",
                ])
                .arg(output)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .context("failed to spawn ffmpeg")?;
            Ok(FrameEncoder::Mp4 { child })
        }
        OutputFormat::Gif => {
            use gif::{Encoder, Repeat};
            let (w, h) = (u16::try_from(width), u16::try_from(height));
            let (Ok(width), Ok(height)) = (w, h) else {
                anyhow::bail!("GIF frames are limited to 65535x65535, got {}x{}", width, height);
            };
            let file = std::fs::File::create(output)
                .with_context(|| format!("failed to create {:?}", output))?;
            let mut encoder = Encoder::new(file, width, height, &[])?;
            encoder.set_repeat(Repeat::Infinite)?;
            let frame_delay = (100 / fps).max(1) as u16;
            Ok(FrameEncoder::Gif { encoder, width, height, frame_delay })
        }
        OutputFormat::Png => anyhow::bail!("PNG output is a single frame, not a stream"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["seedcell", "-o", "out.png"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("120,80").unwrap(), [120.0, 80.0]);
        assert_eq!(parse_point(" 1.5 , -2 ").unwrap(), [1.5, -2.0]);
        assert!(parse_point("120").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }

    #[test]
    fn test_parse_background() {
        assert_eq!(parse_background("#f8f9fa").unwrap(), DEFAULT_BACKGROUND);
        assert_eq!(parse_background("hsl(0, 100%, 50%)").unwrap(), [255, 0, 0]);
        assert!(parse_background("#fff").is_err());
        assert!(parse_background("#gggggg").is_err());
        assert!(parse_background("red").is_err());
    }

    #[test]
    fn test_defaults() {
        let scene = Scene::resolve(&args(&[]), SceneSpec::default()).unwrap();
        assert_eq!((scene.width, scene.height), (800, 600));
        assert_eq!(scene.points, PointSource::Random(None));
        assert_eq!(scene.speed, AnimationSpeed::default());
        assert_eq!(scene.fps, 30);
        assert_eq!(scene.hold, 2.0);
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert!(!scene.animated);
    }

    #[test]
    fn test_cli_overrides_scene_file() {
        let spec: SceneSpec = serde_yaml::from_str(
            "width: 320\nheight: 200\nseed: 9\nspeed: 30\nfixed:\n  - [10, 20]\n",
        )
        .unwrap();
        let scene = Scene::resolve(&args(&["--width", "640", "--speed", "5"]), spec).unwrap();
        assert_eq!((scene.width, scene.height), (640, 200));
        assert_eq!(scene.seed, 9);
        assert_eq!(scene.speed.get(), 5.0);
        assert_eq!(scene.points, PointSource::Fixed(vec![[10.0, 20.0]]));
    }

    #[test]
    fn test_point_flags_replace_random_points() {
        let scene = Scene::resolve(
            &args(&["-n", "12", "-p", "1,2", "-p", "3,4"]),
            SceneSpec::default(),
        )
        .unwrap();
        assert_eq!(scene.points, PointSource::Fixed(vec![[1.0, 2.0], [3.0, 4.0]]));

        let session = scene.session().unwrap();
        assert_eq!(session.point_count(), 2);
    }

    #[test]
    fn test_speed_is_validated_then_clamped() {
        let scene = Scene::resolve(&args(&["--speed", "500"]), SceneSpec::default()).unwrap();
        assert_eq!(scene.speed.get(), AnimationSpeed::MAX);
        assert!(Scene::resolve(&args(&["--speed", "0"]), SceneSpec::default()).is_err());
    }

    #[test]
    fn test_palette_shares_entries() {
        let rgba = [10, 20, 30, 255, 10, 20, 30, 255, 1, 2, 3, 255];
        let (indices, palette) = Palette::indexed(&rgba);
        assert_eq!(indices, vec![0, 0, 1]);
        let flat = palette.into_flat();
        assert_eq!(flat.len(), 256 * 3);
        assert_eq!(&flat[..6], &[10, 20, 30, 1, 2, 3]);
    }

    #[test]
    fn test_full_palette_maps_to_closest() {
        let mut palette = Palette::default();
        for i in 0..=255u8 {
            assert_eq!(palette.index_of([i, 0, 0]), i);
        }
        assert_eq!(palette.index_of([200, 3, 1]), 200);
        assert_eq!(palette.colors.len(), 256);
    }

    #[test]
    fn test_discarded_gif_leaves_no_file() {
        let path = std::env::temp_dir().join(format!("seedcell-discard-{}.gif", std::process::id()));
        let encoder = spawn_encoder(&path, OutputFormat::Gif, 8, 6, 30).unwrap();
        assert!(path.exists());
        encoder.discard(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_finished_gif_is_readable() {
        let path = std::env::temp_dir().join(format!("seedcell-finish-{}.gif", std::process::id()));
        let mut encoder = spawn_encoder(&path, OutputFormat::Gif, 4, 2, 30).unwrap();
        let frame: Vec<u8> = [9, 8, 7, 255].repeat(8);
        encoder.write_frame(&frame).unwrap();
        encoder.write_frame(&frame).unwrap();
        encoder.finish().unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(3, 1).0, [9, 8, 7, 255]);
    }
}
