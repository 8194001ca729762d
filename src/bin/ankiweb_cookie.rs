use ankiweb_bridge::cookies::{env_line, extract_anki_cookie, write_env_file, Browser};
use ankiweb_bridge::utils::logger;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ankiweb-cookie")]
#[command(about = "Extract the AnkiWeb session cookie from a local browser profile")]
struct Args {
    /// Browser to extract the cookie from
    #[arg(short, long, value_enum, default_value_t = Browser::Chrome)]
    browser: Browser,

    /// Read this cookie database instead of the browser's default location
    #[arg(long)]
    cookie_db: Option<PathBuf>,

    /// Write an ANKI_COOKIE="..." line to this file (e.g. .env)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

const MANUAL_STEPS: &str = "\
You can manually extract the cookie using browser developer tools:
1. Open your browser and go to https://ankiweb.net
2. Log in to your account
3. Open developer tools (F12 or Ctrl+Shift+I)
4. Go to the 'Application' or 'Storage' tab
5. Look for 'Cookies' in the sidebar and find the 'ankiweb' cookie
6. Copy the value and use it in your .env file";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    println!("Extracting Anki cookie from {}...", args.browser);

    let cookie = match extract_anki_cookie(args.browser, args.cookie_db.as_deref()) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("\n❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            eprintln!("\n{}", MANUAL_STEPS);
            std::process::exit(e.severity().exit_code());
        }
    };

    println!("\nFound Anki cookie:");
    println!("{}", cookie);

    if let Some(output) = &args.output {
        write_env_file(output, &cookie)?;
        println!("\n📁 Cookie saved to {}", output.display());
    }

    println!("\nTo use this cookie in your .env file:");
    println!("{}", env_line(&cookie));

    Ok(())
}
