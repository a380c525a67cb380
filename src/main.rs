// scan-recall - keeps the last 50 things you scanned
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use scan_recall_lib::{
    core::{
        HistoryReader, HistoryStore, Recorder, ScanOutcome, Searcher, HISTORY_CAP, HISTORY_KEY,
    },
    logging,
    platform::Platform,
    settings::{parse_switch, SettingName, SettingsStore},
    Config, Database, Result, ScanRecord,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    logging::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let result = match command.as_str() {
        "scan" => handle_scan(&args[2..]).await,
        "history" => handle_history(&args[2..]).await,
        "search" => handle_search(&args[2..]).await,
        "open" => handle_open(&args[2..]).await,
        "clear" => handle_clear().await,
        "watch" => handle_watch().await,
        "settings" => handle_settings(&args[2..]).await,
        "status" => handle_status().await,
        "version" | "-v" | "--version" => {
            println!("scan-recall v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e.user_message());
        std::process::exit(1);
    }
}

async fn handle_scan(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        eprintln!("Usage: scan-recall scan <kind> <payload>");
        return Ok(());
    }

    let kind = &args[0];
    let payload = args[1..].join(" ");

    let (_config, db) = open().await?;
    let recorder = Recorder::new(
        HistoryStore::new(Arc::clone(&db)),
        SettingsStore::new(db),
        Platform::console(),
    );

    if let ScanOutcome::Suppressed = recorder.handle_scan(kind, &payload).await {
        println!("Scanner is cooling down, try again in a moment.");
    }

    Ok(())
}

async fn handle_history(args: &[String]) -> Result<()> {
    let limit = args
        .first()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(HISTORY_CAP);

    let (_config, db) = open().await?;
    let reader = HistoryReader::new(HistoryStore::new(db), Platform::console().browser);

    let items = reader.display_items().await;

    if items.is_empty() {
        println!("No scans yet");
        println!("Scanned QR codes will appear here");
        return Ok(());
    }

    println!("\nScan History");
    println!("{}", "=".repeat(60));
    for (i, item) in items.iter().take(limit).enumerate() {
        let marker = if item.is_link { "↗" } else { " " };
        println!("{:3}. {} {}", i + 1, marker, item.payload);
        println!("        {} · {}", item.kind, item.time_label);
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_search(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: No search query provided");
        return Ok(());
    }

    let query = args.join(" ");
    let (_config, db) = open().await?;
    let searcher = Searcher::new(HistoryStore::new(db));

    let results = searcher.search(&query, 20).await;

    if results.is_empty() {
        println!("No scans found matching '{}'", query);
    } else {
        println!("\nFound {} scan(s) matching '{}':", results.len(), query);
        println!("{}", "=".repeat(60));
        for (i, result) in results.iter().enumerate() {
            print_record(i + 1, &result.record);
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

async fn handle_open(args: &[String]) -> Result<()> {
    // 1-based, matching what `history` prints
    let position = match args.first().and_then(|s| s.parse::<usize>().ok()) {
        Some(n) if n > 0 => n,
        _ => {
            eprintln!("Usage: scan-recall open <number>");
            return Ok(());
        }
    };

    let (_config, db) = open().await?;
    let reader = HistoryReader::new(HistoryStore::new(db), Platform::console().browser);

    if !reader.activate(position - 1).await? {
        println!("Scan {} is not a link.", position);
    }

    Ok(())
}

async fn handle_clear() -> Result<()> {
    let (_config, db) = open().await?;
    let reader = HistoryReader::new(HistoryStore::new(db), Platform::console().browser);

    reader.clear().await;
    println!("✓ History cleared");

    Ok(())
}

async fn handle_watch() -> Result<()> {
    let (config, db) = open().await?;
    let reader = HistoryReader::new(HistoryStore::new(db), Platform::console().browser);

    println!(
        "Watching scan history (every {} ms). Ctrl-C to stop.",
        config.poll_interval.as_millis()
    );

    let mut last_seen: Option<Vec<ScanRecord>> = None;
    let handle = reader.poll(config.poll_interval, move |history| {
        if last_seen.as_ref() == Some(&history) {
            return;
        }

        println!("\n{} scan(s):", history.len());
        for (i, record) in history.iter().take(10).enumerate() {
            print_record(i + 1, record);
        }

        last_seen = Some(history);
    });

    tokio::signal::ctrl_c().await?;
    handle.stop().await;

    Ok(())
}

async fn handle_settings(args: &[String]) -> Result<()> {
    let (_config, db) = open().await?;
    let store = SettingsStore::new(db);

    let settings = match args {
        [] => store.load().await,
        [action] if action == "reset" => store.reset().await?,
        [name] => {
            let name: SettingName = name.parse()?;
            store.toggle(name, Platform::console().haptics.as_ref()).await?
        }
        [name, value, ..] => {
            let name: SettingName = name.parse()?;
            store.set(name, parse_switch(value)?).await?
        }
    };

    println!("\nSettings");
    println!("{}", "=".repeat(60));
    for name in SettingName::ALL {
        let state = if settings.get(name) { "on" } else { "off" };
        println!("  {:<18} {}", format!("{}:", name), state);
    }
    println!("{}", "=".repeat(60));
    println!("Note: sound and auto-open-links are saved but not used yet.");

    Ok(())
}

async fn handle_status() -> Result<()> {
    let (config, db) = open().await?;
    let stats = db.stats().await?;
    let keys = db.keys().await?;
    let saved = db.get_stored_item(HISTORY_KEY).await?;
    let history = HistoryStore::new(Arc::clone(&db)).load().await;

    println!("\nscan-recall Status");
    println!("{}", "=".repeat(60));
    println!("  Database:      {}", db.path().display());
    println!(
        "  Connections:   {} open, {} idle",
        stats.pool_size, stats.idle_connections
    );
    println!("  Stored keys:   {} ({})", stats.total_items, keys.join(", "));
    println!("  Scans:         {} / {}", history.len(), HISTORY_CAP);
    if let Some(item) = saved {
        println!("  Last saved:    {} UTC", item.updated_at);
    }
    println!("  Poll interval: {} ms", config.poll_interval.as_millis());
    if let Some(latest) = history.first() {
        println!("  Last scan:     {} ({})", latest.payload, latest.local_time_label());
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_record(position: usize, record: &ScanRecord) {
    println!(
        "{:3}. [{}] {} ({})",
        position,
        record.kind,
        record.payload,
        record.local_time_label()
    );
}

async fn open() -> Result<(Config, Arc<Database>)> {
    let config = Config::from_env()?;
    let db = Database::new(config.db_path()).await?;
    Ok((config, Arc::new(db)))
}

fn print_usage() {
    println!(
        r#"scan-recall v{} - Your scanner remembers everything

USAGE:
    scan-recall <COMMAND> [OPTIONS]

COMMANDS:
    scan <kind> <payload>  Record a decoded barcode (e.g. scan qr https://...)
    history [limit]        Show recent scans, newest first (max {})
    search <query>         Fuzzy search scanned payloads
    open <number>          Open a scanned link from the history
    clear                  Delete all scan history
    watch                  Print the history whenever it changes
    settings [name [on|off]]
                           Show, toggle, or set haptics / sound / auto-open-links
    settings reset         Restore default settings
    status                 Show status and stats
    version                Show version
    help                   Show this help

ENVIRONMENT:
    SCAN_RECALL_HOME       Data directory (default: ~/.scan-recall)
    SCAN_RECALL_POLL_MS    Watch interval in milliseconds (default: 1000)
    RUST_LOG               Log level (default: info)
"#,
        env!("CARGO_PKG_VERSION"),
        HISTORY_CAP
    );
}
