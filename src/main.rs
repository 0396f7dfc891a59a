use std::path::Path;
use std::sync::Arc;

use shift_matrix::backend::HttpBackend;
use shift_matrix::config::{AppConfig, DEFAULT_PORT};
use shift_matrix::display::{print_matrix, write_matrix_to_file};
use shift_matrix::web::{self, AppState};
use shift_matrix::ScheduleData;

fn usage() -> &'static str {
    "usage:\n  shift-matrix web [port]\n  shift-matrix show <year> <month>\n  shift-matrix export <year> <month> <path>"
}

fn parse_month(args: &[String]) -> Result<(i32, u32), Box<dyn std::error::Error>> {
    let year = args.get(2).and_then(|y| y.parse::<i32>().ok()).ok_or(usage())?;
    let month = args
        .get(3)
        .and_then(|m| m.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or(usage())?;
    Ok((year, month))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::from_env();
    let backend = Arc::new(HttpBackend::new(&config.api_base, config.timeout)?);
    let schedule = ScheduleData::new(backend, config.fill_hc);

    match args.get(1).map(String::as_str) {
        Some("web") => {
            let port = args.get(2).and_then(|p| p.parse::<u16>().ok()).unwrap_or(DEFAULT_PORT);
            log::info!("Starting web server on port {}, backend {}", port, config.api_base);
            web::start_server(
                port,
                AppState {
                    schedule,
                    admin_password: config.admin_password,
                },
            )
            .await?;
        }
        Some("show") => {
            let (year, month) = parse_month(&args)?;
            schedule.load(year, month).await?;
            let view = schedule.view()?;
            print_matrix(&view);
            let report = schedule.validate().await?;
            if !report.conflicts.is_empty() {
                println!("\nServer reported {} conflict(s):", report.conflicts.len());
                for conflict in &report.conflicts {
                    println!("  - {}: {}", conflict.kind.as_deref().unwrap_or("unknown"), conflict.detail);
                }
            }
        }
        Some("export") => {
            let (year, month) = parse_month(&args)?;
            let path = args.get(4).ok_or(usage())?;
            schedule.load(year, month).await?;
            let view = schedule.view()?;
            write_matrix_to_file(&view, Path::new(path))?;
            println!("Matrix for {:02}/{} saved to {}", month, year, path);
        }
        _ => {
            eprintln!("{}", usage());
        }
    }

    Ok(())
}
