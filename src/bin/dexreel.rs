use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use dexreel::VoiceOut;
use dexreel::compose::draw_frame;
use dexreel::encode::sink::write_png;
use dexreel::render::FrameTarget as _;

#[derive(Parser, Debug)]
#[command(name = "dexreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Play the video in realtime and record it to MP4 (requires `ffmpeg` on PATH).
    Record(RecordArgs),
    /// Play the video in realtime without recording.
    Preview(PreviewArgs),
    /// Wrap raw mono 16-bit PCM in a WAV header.
    Wav(WavArgs),
    /// Remove the white background of an image.
    Cutout(CutoutArgs),
}

#[derive(Args, Debug)]
struct StudioArgs {
    /// Project manifest JSON.
    #[arg(long)]
    project: PathBuf,

    /// Studio options JSON; unset fields keep their defaults.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Font used for all on-screen text.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    studio: StudioArgs,

    /// Elapsed time of the frame in milliseconds.
    #[arg(long)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[command(flatten)]
    studio: StudioArgs,

    /// Output MP4 path. Defaults to `<Name>_Pokemon.mp4` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    studio: StudioArgs,

    /// Show the video in an `ffplay` window.
    #[arg(long, default_value_t = false)]
    window: bool,

    /// Save the last displayed frame as a PNG (ignored with `--window`).
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Do not play narration and sound cues on the audio output.
    #[arg(long, default_value_t = false)]
    mute: bool,
}

#[derive(Args, Debug)]
struct WavArgs {
    /// Raw little-endian 16-bit mono PCM input.
    #[arg(long)]
    pcm: PathBuf,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,

    /// Sample rate written into the header.
    #[arg(long, default_value_t = dexreel::audio::wav::DEFAULT_PCM_SAMPLE_RATE)]
    sample_rate: u32,
}

#[derive(Args, Debug)]
struct CutoutArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also turn the cutout into a black silhouette.
    #[arg(long, default_value_t = false)]
    silhouette: bool,
}

fn main() -> anyhow::Result<()> {
    dexreel::logging::init_default_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Record(args) => cmd_record(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Wav(args) => cmd_wav(args),
        Command::Cutout(args) => cmd_cutout(args),
    }
}

fn load_opts(args: &StudioArgs) -> anyhow::Result<dexreel::StudioOpts> {
    let mut opts = match args.opts.as_deref() {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("open studio options '{}'", path.display()))?;
            serde_json::from_reader(std::io::BufReader::new(f))
                .with_context(|| format!("parse studio options '{}'", path.display()))?
        }
        None => dexreel::StudioOpts::default(),
    };
    if let Some(font) = args.font.clone() {
        opts.font_path = Some(font);
    }
    opts.validate()?;
    Ok(opts)
}

fn load_project(args: &StudioArgs) -> anyhow::Result<(dexreel::Project, dexreel::RenderResources)> {
    let project = dexreel::Project::from_path(&args.project)?;
    let res = dexreel::RenderResources::load(&project)?;
    Ok((project, res))
}

fn stop_on_ctrlc(studio: &dexreel::Studio) -> anyhow::Result<()> {
    let stop = studio.stop_handle();
    ctrlc::set_handler(move || stop.request_stop()).context("install Ctrl-C handler")?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let opts = load_opts(&args.studio)?;
    let (_, res) = load_project(&args.studio)?;
    let timeline = res.timeline()?;

    let mut surface = dexreel::CpuSurface::new(opts.canvas, opts.surface_opts()?)?;
    surface.begin_frame();
    draw_frame(&mut surface, timeline.scene_at(args.at_ms), &timeline, &res);
    let frame = surface.finish_frame()?;
    write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let mut opts = load_opts(&args.studio)?;
    if args.no_overwrite {
        opts.overwrite = false;
    }
    let (project, res) = load_project(&args.studio)?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(project.output_file_name()));

    let mut sink = dexreel::FfmpegSink::new(opts.ffmpeg_opts(&out));
    let mut driver = dexreel::RealtimeDriver::new(opts.tick_ms);
    let mut studio = dexreel::Studio::new(opts);
    stop_on_ctrlc(&studio)?;

    let summary = studio.record(&res, &mut sink, &mut driver)?;
    if summary.completed {
        eprintln!("wrote {}", out.display());
    } else {
        eprintln!("recording stopped; nothing written");
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let opts = load_opts(&args.studio)?;
    let (_, res) = load_project(&args.studio)?;
    let mut driver = dexreel::RealtimeDriver::new(opts.tick_ms);
    let bg = opts.bg_rgba;
    let mut studio = dexreel::Studio::new(opts);
    stop_on_ctrlc(&studio)?;

    let mut live = if args.mute { None } else { open_live_audio() };
    let mut play = |display: &mut dyn dexreel::FrameSink| match live.as_mut() {
        Some(live) => studio.preview_with_audio(&res, display, &mut **live, &mut driver),
        None => studio.preview(&res, display, &mut driver),
    };

    if args.window {
        let mut sink = dexreel::FfplaySink::new(bg);
        play(&mut sink)?;
        return Ok(());
    }

    let mut sink = dexreel::LatestFrameSink::new();
    let summary = play(&mut sink)?;
    eprintln!(
        "played {} ticks up to {:.0} ms",
        summary.ticks, summary.last_elapsed_ms
    );
    if let Some(path) = args.snapshot.as_deref() {
        sink.save_png(path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "live-audio")]
fn open_live_audio() -> Option<Box<dyn VoiceOut>> {
    match dexreel::audio::live::LiveAudio::open_default() {
        Ok(live) => Some(Box::new(live)),
        Err(e) => {
            tracing::warn!(error = %e, "previewing without sound");
            None
        }
    }
}

#[cfg(not(feature = "live-audio"))]
fn open_live_audio() -> Option<Box<dyn VoiceOut>> {
    tracing::info!("built without the `live-audio` feature; previewing without sound");
    None
}

fn cmd_wav(args: WavArgs) -> anyhow::Result<()> {
    let pcm = std::fs::read(&args.pcm)
        .with_context(|| format!("read pcm '{}'", args.pcm.display()))?;
    let wav = dexreel::audio::wav::pcm16_to_wav(&pcm, args.sample_rate)?;
    write_bytes(&args.out, &wav)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_cutout(args: CutoutArgs) -> anyhow::Result<()> {
    let mut img = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    let cleared = dexreel::assets::cutout::remove_background(&mut img);
    if args.silhouette {
        dexreel::assets::cutout::make_silhouette(&mut img);
    }
    dexreel::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    img.save(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("cleared {cleared} pixels; wrote {}", args.out.display());
    Ok(())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    dexreel::encode::ffmpeg::ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
