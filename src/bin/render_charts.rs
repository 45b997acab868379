//! Render a user's consistency and weight charts without the MCP server
//!
//! Usage: render_charts <email> [YYYY-MM]

use chrono::{Local, NaiveDate};

use lifelog::calendar::YearMonth;
use lifelog::charts::{self, ChartError, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use lifelog::config::Config;
use lifelog::controller::TrackerState;
use lifelog::models::{Habit, User, WeightEntry};
use lifelog::stats;

fn parse_month(s: &str) -> Option<YearMonth> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()?;
    Some(YearMonth::of(date))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(email) = args.get(1) else {
        eprintln!("Usage: {} <email> [YYYY-MM]", args[0]);
        std::process::exit(2);
    };
    let month = match args.get(2) {
        Some(s) => parse_month(s).ok_or_else(|| format!("Invalid month (expected YYYY-MM): {}", s))?,
        None => YearMonth::of(Local::now().date_naive()),
    };

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    let database = lifelog::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        lifelog::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let state = database
        .with_conn(|conn| match User::get_by_email(conn, email.trim())? {
            Some(user) => Ok(Some(TrackerState::from_records(
                Habit::list_for_user(conn, user.id)?,
                Vec::new(),
                Vec::new(),
                Vec::new(),
                WeightEntry::list_for_user(conn, user.id)?,
            ))),
            None => Ok(None),
        })?
        .ok_or_else(|| format!("No account for {}", email))?;
    let (habits, weights) = (&state.habits, &state.weights);

    let counts = stats::monthly_counts(habits, month);
    let ratios = stats::completion_ratios(&counts, habits.len());
    let png = charts::render_consistency_chart(
        &format!("Consistency {}", month.label()),
        counts.len(),
        ratios.as_deref(),
        DEFAULT_WIDTH,
        DEFAULT_HEIGHT,
    )?;
    let file_name = format!("consistency-{}-{:02}.png", month.year, month.month);
    let path = charts::save_png(&config.chart_dir, &file_name, &png)?;
    println!("Consistency chart: {}", path.display());

    match charts::render_weight_chart(weights, DEFAULT_WIDTH, DEFAULT_HEIGHT) {
        Ok(png) => {
            let path = charts::save_png(&config.chart_dir, "weight.png", &png)?;
            println!("Weight chart: {}", path.display());
        }
        Err(ChartError::NoData) => println!("Weight chart: no entries"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
