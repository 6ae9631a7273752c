use clap::Parser;
use fastmover::coin::CoinRecord;
use fastmover::config::{load_config, ScreenerConfig};
use fastmover::filtering;
use fastmover::paths;
use fastmover::screener::{HttpRowSource, RowSource, SnapshotRowSource};
use std::error::Error;

#[derive(Parser)]
#[command(name = "debug_page")]
#[command(about = "Debug tool for the dashboard page: rows and filter verdicts", long_about = None)]
struct Args {
  /// Parse a saved HTML page instead of fetching
  #[arg(short, long)]
  file: Option<String>,

  /// Dashboard URL (defaults to the configured one)
  #[arg(short, long)]
  url: Option<String>,

  /// Maximum number of rows to display
  #[arg(short, long, default_value = "20")]
  limit: usize,

  /// Hour bound for the pair age filter (defaults to the configured one)
  #[arg(long)]
  max_age_hours: Option<f64>,

  /// Print every column of each row
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  let args = Args::parse();

  println!("Dashboard Page Debug Tool\n");
  println!("{}", "=".repeat(80));

  let config = load_config(&paths::get_config_path())?;
  let max_age_hours = args.max_age_hours.unwrap_or(config.filters.max_pair_age_hours);

  let source: Box<dyn RowSource> = match &args.file {
    Some(path) => Box::new(SnapshotRowSource::new(path)),
    None => {
      let screener = ScreenerConfig {
        url: args.url.clone().unwrap_or_else(|| config.screener.url.clone()),
        ..config.screener.clone()
      };
      Box::new(HttpRowSource::from_config(&screener)?)
    }
  };

  println!("\n[FETCH] source={}\n", source.name());
  let started = chrono::Utc::now();
  let rows = source.fetch_rows().await?;
  let elapsed = chrono::Utc::now() - started;
  println!("Found {} rows in {}ms", rows.len(), elapsed.num_milliseconds());

  let mut passed = 0;
  println!("\n[ROWS (showing first {})]\n", args.limit);
  for (i, row) in rows.iter().enumerate().take(args.limit) {
    let record = CoinRecord::from_row(row);
    let verdict = match filtering::evaluate(&record, max_age_hours) {
      Ok(()) => {
        passed += 1;
        "PASS".to_string()
      }
      Err(rejection) => format!("reject: {}", rejection),
    };

    println!(
      "{:>3}. {:<12} age={:<5} 5m/1h/6h/24h={:?} -> {}",
      i + 1,
      record.display_symbol(),
      record.pair_age.as_deref().unwrap_or("-"),
      record.price_changes(),
      verdict
    );
    println!(
      "     address={}",
      record.token_address().unwrap_or_else(|| "<none>".to_string())
    );

    if args.verbose {
      let mut fields: Vec<_> = row.fields.iter().collect();
      fields.sort();
      for (label, value) in fields {
        println!("     {:<18} {}", label, value);
      }
    }
  }

  println!("\n{}", "=".repeat(80));
  println!(
    "\n{} of {} displayed rows pass the filters (max pair age {}h)",
    passed,
    rows.len().min(args.limit),
    max_age_hours
  );

  Ok(())
}
