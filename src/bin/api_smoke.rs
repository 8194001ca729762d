use ankiweb_bridge::utils::logger;
use clap::Parser;
use reqwest::Client;
use serde_json::{json, Value};

/// 針對執行中的 ankiweb-bridge 服務做手動檢查
#[derive(Parser)]
#[command(name = "api_smoke")]
#[command(about = "Exercise a running ankiweb-bridge REST API")]
struct Args {
    /// Base URL of the running service
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Deck used for the add-card checks
    #[arg(long, default_value = "default")]
    deck: String,

    /// Only run the read-only checks (health, decks)
    #[arg(long)]
    read_only: bool,
}

async fn check(label: &str, request: reqwest::RequestBuilder) -> bool {
    match request.send().await {
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let pretty = serde_json::from_str::<Value>(&body)
                .map(|v| v.to_string())
                .unwrap_or(body);
            println!("{}: {}", label, status.as_u16());
            println!("{}", pretty);
            println!("{}", "-".repeat(40));
            status.is_success()
        }
        Err(e) => {
            println!("{}: request failed: {}", label, e);
            println!("{}", "-".repeat(40));
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(false);

    let client = Client::new();
    let base = args.base_url.trim_end_matches('/');

    println!("Running API tests against {}...\n", base);

    let mut results: Vec<(&str, bool)> = Vec::new();
    results.push((
        "health",
        check("Health check", client.get(format!("{}/health", base))).await,
    ));
    results.push((
        "decks",
        check("List decks", client.get(format!("{}/decks", base))).await,
    ));

    if !args.read_only {
        let card = json!({
            "front": "API Test Card",
            "back": "This card was added via the API",
            "deck_name": args.deck,
        });
        results.push((
            "add_card",
            check(
                "Add card",
                client.post(format!("{}/add-card", base)).json(&card),
            )
            .await,
        ));

        let batch = json!({
            "cards": [
                {"front": "API Test Card 1", "back": "This is test card 1"},
                {"front": "API Test Card 2", "back": "This is test card 2"}
            ],
            "deck_name": args.deck,
            "delay": 1.0,
        });
        results.push((
            "add_multiple_cards",
            check(
                "Add multiple cards",
                client.post(format!("{}/add-multiple-cards", base)).json(&batch),
            )
            .await,
        ));
    }

    println!("\nTest Results:");
    for (name, passed) in &results {
        println!("{}: {}", name, if *passed { "PASS" } else { "FAIL" });
    }

    let all_passed = results.iter().all(|(_, passed)| *passed);
    println!("\nOverall result: {}", if all_passed { "PASS" } else { "FAIL" });

    if !all_passed {
        std::process::exit(1);
    }
    Ok(())
}
