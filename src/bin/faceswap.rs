//! CLI for faceswap - face replacement via Gemini.

use clap::{Args, Parser, Subcommand, ValueEnum};
use faceswap::{
    compile_prompt, load_pair, AspectRatio, Credentials, FaceScale, FaceSwapProvider,
    GeminiProvider, GenerationOptions, ImageSize, Lighting, Phase, Session, SkinTone,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "faceswap")]
#[command(about = "Swap a face onto another photo with Gemini image models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Gemini API key for this run (overrides GOOGLE_API_KEY / API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "FACESWAP_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "FACESWAP_TIMEOUT_SECS")]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Put the source face onto the target body
    Swap(SwapArgs),

    /// Print the prompt that would be sent, without calling the API
    Prompt(OptionArgs),

    /// List the available option values
    Options,

    /// Verify that the API key is accepted
    CheckKey,
}

#[derive(Args)]
struct SwapArgs {
    /// Image supplying the face
    #[arg(short, long)]
    source: PathBuf,

    /// Image supplying the body, pose and scene
    #[arg(short, long)]
    target: PathBuf,

    /// Output file path (defaults to gemini-faceswap-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Args)]
struct OptionArgs {
    /// Output aspect ratio
    #[arg(long, value_enum, default_value = "1:1")]
    aspect_ratio: AspectRatioArg,

    /// Output resolution
    #[arg(long, value_enum, default_value = "2K")]
    size: ImageSizeArg,

    /// Skin tone handling
    #[arg(long, value_enum, default_value = "match-target")]
    skin_tone: SkinToneArg,

    /// Lighting adjustment
    #[arg(long, value_enum, default_value = "natural")]
    lighting: LightingArg,

    /// Facial feature scale
    #[arg(long, value_enum, default_value = "default")]
    face_scale: FaceScaleArg,

    /// Extra free-text instruction (e.g. "remove glasses")
    #[arg(short, long, default_value = "")]
    instructions: String,
}

impl OptionArgs {
    fn to_options(&self) -> GenerationOptions {
        GenerationOptions::new()
            .with_aspect_ratio(self.aspect_ratio.into())
            .with_image_size(self.size.into())
            .with_skin_tone(self.skin_tone.into())
            .with_lighting(self.lighting.into())
            .with_face_scale(self.face_scale.into())
            .with_instructions(self.instructions.clone())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectRatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "3:4")]
    StandardPortrait,
    #[value(name = "4:3")]
    Standard,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "16:9")]
    Landscape,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::StandardPortrait => AspectRatio::StandardPortrait,
            AspectRatioArg::Standard => AspectRatio::Standard,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
            AspectRatioArg::Landscape => AspectRatio::Landscape,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImageSizeArg {
    #[value(name = "1K")]
    OneK,
    #[value(name = "2K")]
    TwoK,
    #[value(name = "4K")]
    FourK,
}

impl From<ImageSizeArg> for ImageSize {
    fn from(arg: ImageSizeArg) -> Self {
        match arg {
            ImageSizeArg::OneK => ImageSize::OneK,
            ImageSizeArg::TwoK => ImageSize::TwoK,
            ImageSizeArg::FourK => ImageSize::FourK,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SkinToneArg {
    MatchTarget,
    PreserveSource,
    Lighter,
    Darker,
}

impl From<SkinToneArg> for SkinTone {
    fn from(arg: SkinToneArg) -> Self {
        match arg {
            SkinToneArg::MatchTarget => SkinTone::MatchTarget,
            SkinToneArg::PreserveSource => SkinTone::PreserveSource,
            SkinToneArg::Lighter => SkinTone::Lighter,
            SkinToneArg::Darker => SkinTone::Darker,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LightingArg {
    Natural,
    Warm,
    Cool,
    #[value(alias = "high-contrast")]
    Contrast,
}

impl From<LightingArg> for Lighting {
    fn from(arg: LightingArg) -> Self {
        match arg {
            LightingArg::Natural => Lighting::Natural,
            LightingArg::Warm => Lighting::Warm,
            LightingArg::Cool => Lighting::Cool,
            LightingArg::Contrast => Lighting::Contrast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FaceScaleArg {
    Smaller,
    Default,
    Larger,
}

impl From<FaceScaleArg> for FaceScale {
    fn from(arg: FaceScaleArg) -> Self {
        match arg {
            FaceScaleArg::Smaller => FaceScale::Smaller,
            FaceScaleArg::Default => FaceScale::Default,
            FaceScaleArg::Larger => FaceScale::Larger,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut credentials = Credentials::from_env();
    if let Some(ref key) = cli.api_key {
        credentials.set_user_key(key);
    }

    match cli.command {
        Commands::Swap(ref args) => {
            let provider = build_provider(&cli)?;
            swap(args, credentials, &provider, cli.json).await?;
        }
        Commands::Prompt(ref args) => {
            let prompt = compile_prompt(&args.to_options());
            if cli.json {
                println!("{}", serde_json::json!({ "prompt": prompt }));
            } else {
                println!("{prompt}");
            }
        }
        Commands::Options => {
            list_options(cli.json)?;
        }
        Commands::CheckKey => {
            let provider = build_provider(&cli)?;
            check_key(&credentials, &provider, cli.json).await?;
        }
    }

    Ok(())
}

fn build_provider(cli: &Cli) -> anyhow::Result<GeminiProvider> {
    let mut builder = GeminiProvider::builder();
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

async fn swap(
    args: &SwapArgs,
    credentials: Credentials,
    provider: &GeminiProvider,
    json_output: bool,
) -> anyhow::Result<()> {
    let (source, target) = load_pair(&args.source, &args.target).await?;

    let mut session = Session::new(credentials);
    session.set_source(Some(source));
    session.set_target(Some(target));
    session.options = args.options.to_options();

    let phase = session.submit(provider).await?.clone();
    match phase {
        Phase::Succeeded(image) => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(image.download_file_name()));
            image.save(&output)?;

            if json_output {
                let result = serde_json::json!({
                    "success": true,
                    "output": output.display().to_string(),
                    "model": image.metadata.model,
                    "duration_ms": image.metadata.duration_ms,
                    "aspect_ratio": session.options.aspect_ratio,
                    "image_size": session.options.image_size,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Generated image: {} via {}", output.display(), provider.name());
                if let Some(duration) = image.metadata.duration_ms {
                    println!("Duration: {}ms", duration);
                }
            }
            Ok(())
        }
        Phase::Failed(notice) => {
            if json_output {
                let result = serde_json::json!({
                    "success": false,
                    "error": notice.message,
                    "reconfigure_credential": notice.reconfigure_credential,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            if notice.reconfigure_credential {
                eprintln!("Set GOOGLE_API_KEY (or API_KEY), or pass --api-key.");
            }
            anyhow::bail!("{notice}")
        }
        Phase::Idle | Phase::Pending => anyhow::bail!("generation did not complete"),
    }
}

async fn check_key(
    credentials: &Credentials,
    provider: &GeminiProvider,
    json_output: bool,
) -> anyhow::Result<()> {
    let credential = credentials.resolve()?;
    let source = if credentials.has_user_key() {
        "--api-key"
    } else {
        "environment"
    };

    let outcome = provider.health_check(credential).await;
    if json_output {
        let result = serde_json::json!({
            "valid": outcome.is_ok(),
            "source": source,
            "error": outcome.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match outcome {
        Ok(()) => {
            if !json_output {
                println!("API key from {source} accepted by {}", provider.name());
            }
            Ok(())
        }
        Err(e) if e.is_auth_failure() => {
            anyhow::bail!("{}", faceswap::session::INVALID_CREDENTIAL_MESSAGE)
        }
        Err(e) => Err(e.into()),
    }
}

fn list_options(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct OptionInfo {
        name: &'static str,
        values: Vec<&'static str>,
        default: &'static str,
    }

    let options = vec![
        OptionInfo {
            name: "aspect-ratio",
            values: AspectRatio::ALL.iter().map(|r| r.as_str()).collect(),
            default: AspectRatio::default().as_str(),
        },
        OptionInfo {
            name: "size",
            values: ImageSize::ALL.iter().map(|s| s.as_str()).collect(),
            default: ImageSize::default().as_str(),
        },
        OptionInfo {
            name: "skin-tone",
            values: SkinTone::ALL.iter().map(|t| t.as_str()).collect(),
            default: SkinTone::default().as_str(),
        },
        OptionInfo {
            name: "lighting",
            values: Lighting::ALL.iter().map(|l| l.as_str()).collect(),
            default: Lighting::default().as_str(),
        },
        OptionInfo {
            name: "face-scale",
            values: FaceScale::ALL.iter().map(|s| s.as_str()).collect(),
            default: FaceScale::default().as_str(),
        },
    ];

    if json_output {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        println!("Available options:\n");
        for o in &options {
            println!("  --{} (default: {})", o.name, o.default);
            println!("    {}", o.values.join(", "));
        }
        println!("\nValues are shown as the library spells them; on the command line use dashes (e.g. match-target).");
    }

    Ok(())
}
