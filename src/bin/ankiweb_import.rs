use ankiweb_bridge::config::registry_with;
use ankiweb_bridge::core::batch::submit_batch;
use ankiweb_bridge::core::import::read_cards_from_file;
use ankiweb_bridge::utils::validation::{validate_delay, Validate};
use ankiweb_bridge::utils::{error::BridgeError, logger};
use ankiweb_bridge::{encode_payload, AnkiWebClient, UpstreamArgs};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ankiweb-import")]
#[command(about = "Add cards from a CSV file (front,back per row) to an AnkiWeb deck")]
struct Args {
    /// CSV file with front and back columns
    #[arg(short, long)]
    file: PathBuf,

    /// Deck to file the cards into
    #[arg(short, long, default_value = "default")]
    deck: String,

    /// Seconds to wait between requests
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Treat the first row as a header
    #[arg(long)]
    has_header: bool,

    /// Show what would be sent without contacting AnkiWeb
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    upstream: UpstreamArgs,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn fail(e: BridgeError) -> ! {
    tracing::error!(
        "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    validate_delay("delay", args.delay).unwrap_or_else(|e| fail(e));

    let file_config = args.upstream.load_file().unwrap_or_else(|e| fail(e)).unwrap_or_default();
    let extra_decks = file_config.deck_formats().unwrap_or_else(|e| fail(e));
    let decks = Arc::new(registry_with(&extra_decks));

    let cards = read_cards_from_file(&args.file, args.has_header).unwrap_or_else(|e| fail(e));
    if cards.is_empty() {
        println!("No cards found in {}", args.file.display());
        return Ok(());
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be sent");
        let deck = decks.resolve(&args.deck);
        for (i, card) in cards.iter().enumerate() {
            let payload = encode_payload(&card.front, &card.back, deck);
            println!(
                "  [{}] {:?} -> deck '{}', {} bytes",
                i + 1,
                card.front,
                deck.name(),
                payload.len()
            );
        }
        return Ok(());
    }

    let upstream = args.upstream.resolve(&file_config).unwrap_or_else(|e| fail(e));
    upstream.validate().unwrap_or_else(|e| fail(e));
    let client = AnkiWebClient::new(&upstream, decks).unwrap_or_else(|e| fail(e));

    println!(
        "🚀 Adding {} cards to deck '{}' ({}s between requests)",
        cards.len(),
        args.deck,
        args.delay
    );
    let summary = submit_batch(&client, &cards, &args.deck, args.delay).await;

    for outcome in summary.results.iter().filter(|o| !o.success) {
        println!("  ❌ card {}: {}", outcome.index + 1, outcome.message);
    }
    println!("\nSummary:");
    println!("  Total cards: {}", summary.total);
    println!("  Successfully added: {}", summary.success);
    println!("  Failed: {}", summary.failed);

    if summary.failed > 0 {
        std::process::exit(2);
    }
    Ok(())
}
