use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use clipmux::{
    CancelToken, ClipExporter, EncodeParams, ExporterConfig, FfmpegTool, ImageBuffer, NodeInputs,
    NodeOutput, NodeRegistry, NodeValue, register_builtin_nodes,
};

#[derive(Parser, Debug)]
#[command(name = "clipmux", version)]
struct Cli {
    /// JSON exporter config. CLI flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn an image into a still clip and mux it with an audio file (requires `ffmpeg`).
    Export(ExportArgs),
    /// Print the duration of an audio file in seconds (requires `ffmpeg`/`ffprobe`).
    Duration(DurationArgs),
    /// Print the registered node descriptors as JSON.
    Nodes,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Input audio (any file `ffmpeg` can decode).
    #[arg(long)]
    audio: PathBuf,

    /// Clip duration in seconds, (0, 10] in 0.1 steps.
    #[arg(long, default_value_t = 1.0)]
    duration: f64,

    /// Filename prefix relative to the output directory.
    #[arg(long, default_value = clipmux::DEFAULT_FILENAME_PREFIX)]
    prefix: String,

    /// Output directory (overrides the config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    codec: Option<String>,

    #[arg(long)]
    audio_codec: Option<String>,

    #[arg(long)]
    audio_bitrate: Option<String>,

    /// Treat the image as a grayscale mask.
    #[arg(long)]
    mask: bool,

    /// Take mask values from the alpha channel (implies --mask semantics).
    #[arg(long)]
    from_alpha: bool,

    /// Discard the alpha channel.
    #[arg(long)]
    opaque: bool,

    /// Write a PNG preview of the converted frame.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DurationArgs {
    /// Input audio (any file `ffmpeg` can decode).
    #[arg(long)]
    audio: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = match cli.config.as_deref() {
        Some(path) => ExporterConfig::load(path)?,
        None => ExporterConfig::default(),
    };

    match cli.cmd {
        Command::Export(args) => cmd_export(&mut cfg, args),
        Command::Duration(args) => cmd_duration(&cfg, args),
        Command::Nodes => cmd_nodes(&cfg),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry(cfg: &ExporterConfig) -> anyhow::Result<NodeRegistry> {
    let exporter = Arc::new(ClipExporter::from_config(cfg));
    let mut registry = NodeRegistry::new();
    register_builtin_nodes(&mut registry, exporter, &cfg.defaults)?;
    Ok(registry)
}

fn apply_overrides(params: &mut EncodeParams, args: &ExportArgs) {
    if let Some(fps) = args.fps {
        params.fps = fps;
    }
    if let Some(codec) = &args.codec {
        params.video_codec = codec.clone();
    }
    if let Some(codec) = &args.audio_codec {
        params.audio_codec = codec.clone();
    }
    if let Some(bitrate) = &args.audio_bitrate {
        params.audio_bitrate = bitrate.clone();
    }
}

fn cmd_export(cfg: &mut ExporterConfig, args: ExportArgs) -> anyhow::Result<()> {
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = dir.clone();
    }
    let mut params = cfg.defaults.clone();
    apply_overrides(&mut params, &args);
    cfg.validate()?;

    let image = load_image(&args.image)?;
    let tool = FfmpegTool::new(&cfg.ffmpeg_path, &cfg.ffprobe_path);
    let audio = tool.decode_audio_file(&args.audio)?;

    let registry = build_registry(cfg)?;
    let cancel = CancelToken::new();

    let clip_inputs = NodeInputs::new()
        .with("image", NodeValue::Image(image))
        .with("is_mask", NodeValue::Bool(args.mask || args.from_alpha))
        .with("transparent", NodeValue::Bool(!args.opaque))
        .with("fromalpha", NodeValue::Bool(args.from_alpha))
        .with("duration", NodeValue::Float(args.duration));
    let clip = match registry.run("ImageClipNode", clip_inputs, &cancel)? {
        NodeOutput::Values(mut values) if values.len() == 1 => values.remove(0),
        other => anyhow::bail!("ImageClipNode returned an unexpected output: {other:?}"),
    };
    if let (Some(path), NodeValue::Clip(c)) = (&args.preview, &clip) {
        c.save_preview(path)?;
        eprintln!("wrote {}", path.display());
    }

    let save_inputs = NodeInputs::new()
        .with("video_clip", clip)
        .with("audio", NodeValue::Audio(audio))
        .with("filename_prefix", NodeValue::Str(args.prefix.clone()))
        .with("fps", NodeValue::Int(i64::from(params.fps)))
        .with("codec", NodeValue::Str(params.video_codec))
        .with("audio_codec", NodeValue::Str(params.audio_codec))
        .with("audio_bitrate", NodeValue::Str(params.audio_bitrate));
    match registry.run("SaveVideo", save_inputs, &cancel)? {
        NodeOutput::Ui(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        other => anyhow::bail!("SaveVideo returned an unexpected output: {other:?}"),
    }
    Ok(())
}

fn cmd_duration(cfg: &ExporterConfig, args: DurationArgs) -> anyhow::Result<()> {
    let tool = FfmpegTool::new(&cfg.ffmpeg_path, &cfg.ffprobe_path);
    let audio = tool.decode_audio_file(&args.audio)?;
    let registry = build_registry(cfg)?;

    let inputs = NodeInputs::new().with("audio", NodeValue::Audio(audio));
    match registry.run("AudioDurationNode", inputs, &CancelToken::new())? {
        NodeOutput::Values(values) => match values.as_slice() {
            [NodeValue::Float(secs)] => println!("{secs}"),
            _ => anyhow::bail!("AudioDurationNode returned {} values", values.len()),
        },
        NodeOutput::Ui(_) => anyhow::bail!("AudioDurationNode returned a UI payload"),
    }
    Ok(())
}

fn cmd_nodes(cfg: &ExporterConfig) -> anyhow::Result<()> {
    let registry = build_registry(cfg)?;
    let json = serde_json::to_string_pretty(&registry.descriptors())?;
    println!("{json}");
    Ok(())
}

fn load_image(path: &Path) -> anyhow::Result<ImageBuffer> {
    let rgba = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(ImageBuffer::from_u8(
        (1, h as usize, w as usize, 4),
        rgba.into_raw(),
    )?)
}
