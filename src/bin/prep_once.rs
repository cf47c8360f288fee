use clap::Parser;
use meeting_prep::app::{build_engine, build_provider};
use meeting_prep::core::ConfigProvider;
use meeting_prep::utils::error::ErrorSeverity;
use meeting_prep::utils::{logger, validation::Validate};
use meeting_prep::{CliConfig, MeetingRequest};

#[derive(Parser)]
#[command(name = "prep-once")]
#[command(about = "Run a single meeting prep and print the briefing")]
struct Args {
    /// Comma-separated participant names or emails
    #[arg(long)]
    participants: String,

    /// Industry or company context of the meeting
    #[arg(long)]
    context: String,

    /// What the meeting should achieve
    #[arg(long)]
    objective: String,

    #[command(flatten)]
    settings: CliConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.settings.json_logs {
        logger::init_json_logger(args.settings.verbose);
    } else {
        logger::init_cli_logger(args.settings.verbose);
    }

    let request = MeetingRequest::new(args.participants, args.context, args.objective);

    let toml = match args.settings.load_toml() {
        Ok(toml) => toml,
        Err(e) => fail(e),
    };
    match toml {
        Some(config) => prep_once(config, &request).await,
        None => prep_once(args.settings, &request).await,
    }
}

async fn prep_once<C: ConfigProvider + Validate + 'static>(
    config: C,
    request: &MeetingRequest,
) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let provider = build_provider(&config)?;
    let engine = build_engine(config, provider);

    match engine.run(request).await {
        Ok(briefing) => {
            println!("{}", briefing);
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn fail(e: meeting_prep::PrepError) -> ! {
    tracing::error!(
        "❌ Meeting prep failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 一律非零：High→1, Medium→2, Critical→3, Low(輸入錯誤)→4
    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
        ErrorSeverity::Low => 4,
    };
    std::process::exit(exit_code);
}
