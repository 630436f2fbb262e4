// ==========================================
// 生产追踪系统 - 命令行入口
// ==========================================
// 子命令: dashboard / report / breakdown-preview / dies / config
// 运行时: 单线程 tokio，请求按顺序等待
// ==========================================

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use production_tracking::api::breakdown_api::{duration_preview, BreakdownTimes};
use production_tracking::api::{ApiError, ReportView};
use production_tracking::app::AppState;
use production_tracking::config::ConfigManager;
use production_tracking::domain::metrics::format_percent_or_na;
use production_tracking::engine::document_number::lkd_number_preview;
use production_tracking::{i18n, logging, GroupLine};

#[derive(Parser)]
#[command(name = "production-tracking")]
#[command(version, about = "Production tracking dashboards, entry previews and report export")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (defaults to <config dir>/production-tracking/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load achievement data and print the machine summary
    Dashboard {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        machine: Option<String>,
        #[arg(long)]
        part_name: Option<String>,
        #[arg(long)]
        part_no: Option<String>,
        /// Production line letter (repeatable)
        #[arg(long = "line")]
        lines: Vec<String>,
        /// Export the machine metrics as CSV into this directory
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Prepare the report payload and render it
        #[arg(long)]
        handoff: bool,
        /// Document sequence number for the prepared report
        #[arg(long)]
        sequence: Option<u32>,
    },
    /// Estimate and generate the production report for a date range
    Report {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Production line letter (repeatable)
        #[arg(long = "line")]
        lines: Vec<String>,
        /// Only print per-line record estimates
        #[arg(long)]
        estimate_only: bool,
    },
    /// Preview the LKD number and repair/downtime durations
    BreakdownPreview {
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        time: Option<NaiveTime>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        start_time: Option<NaiveTime>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        end_time: Option<NaiveTime>,
    },
    /// Search the dies master data
    Dies {
        #[arg(default_value = "")]
        query: String,
    },
    /// Print the effective configuration
    Config,
}

fn parse_lines(raw: &[String]) -> Result<Vec<GroupLine>> {
    raw.iter()
        .map(|s| GroupLine::parse(s).ok_or_else(|| anyhow!("invalid production line: {}", s)))
        .collect()
}

fn notify(err: ApiError) -> anyhow::Error {
    anyhow!(err.user_message())
}

fn print_report(view: &ReportView) {
    println!("{}", view.header.date_display);
    println!("{}  No: {}", view.header.line_label, view.header.achievement_no);
    for row in &view.rows {
        println!(
            "{:<24} {:<12} {:<12} {:>6} {:>6} {:>7.2} {:>6} {:>7.1}%",
            row.part_name,
            row.process,
            row.machine,
            row.qty_spk,
            row.qty_prod,
            row.process_time,
            row.sph_act,
            row.performance_score
        );
    }
    for (machine, hours) in &view.capacity {
        println!("capacity {:<16} {:>8.2} h", machine, hours);
    }
    println!("pdf: {}", view.pdf_filename);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_default(if cli.verbose { "debug" } else { "info" });

    let config = ConfigManager::load(cli.config.as_deref()).context("failed to load config")?;
    i18n::set_locale(&config.locale());

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config.get_config_snapshot())?);
        }

        Commands::BreakdownPreview {
            number,
            date,
            time,
            start_date,
            start_time,
            end_date,
            end_time,
        } => {
            println!("{}", lkd_number_preview(number.as_deref(), date));
            let preview = duration_preview(&BreakdownTimes {
                breakdown_date: date,
                breakdown_time: time,
                repair_start_date: start_date,
                repair_start_time: start_time,
                repair_end_date: end_date,
                repair_end_time: end_time,
            });
            if let Some(repair) = preview.repair {
                println!(
                    "repair:   {:.2} h ({})",
                    repair.hours,
                    i18n::severity_label(repair.severity)
                );
            }
            if let Some(downtime) = preview.downtime {
                println!(
                    "downtime: {:.2} h ({})",
                    downtime.hours,
                    i18n::severity_label(downtime.severity)
                );
            }
        }

        Commands::Dies { query } => {
            let mut state = AppState::new(&config).await?;
            state.breakdown_api.load_master_dies().await.map_err(notify)?;
            for dies in state.breakdown_api.search_dies(&query).map_err(notify)? {
                println!(
                    "{:<12} {:<32} {:<16} {}",
                    dies.id_dies, dies.nama_dies, dies.nama_proses, dies.id_cust
                );
            }
        }

        Commands::Dashboard {
            from,
            to,
            machine,
            part_name,
            part_no,
            lines,
            csv,
            handoff,
            sequence,
        } => {
            let mut state = AppState::new(&config).await?;
            let api = &mut state.dashboard_api;
            let mut view = api.load().await.map_err(notify)?;

            let mut criteria = api.criteria().clone();
            if from.is_some() || to.is_some() {
                criteria.date_from = from;
                criteria.date_to = to;
            }
            if let Some(m) = machine {
                criteria = criteria.with_machine(m);
            }
            if let Some(p) = part_name {
                criteria = criteria.with_part_name(p);
            }
            if let Some(p) = part_no {
                criteria = criteria.with_part_number(p);
            }
            criteria = criteria.with_group_lines(parse_lines(&lines)?);
            if criteria != *api.criteria() {
                view = api.apply_filters(criteria).map_err(notify)?;
            }

            println!(
                "records: {}  overall: {}",
                view.summary.total_records,
                format_percent_or_na(view.summary.overall_average)
            );
            for bar in &view.machine_bars {
                println!(
                    "{:<20} {:>7.1}%  {}",
                    bar.machine,
                    bar.average_performance,
                    i18n::category_label(bar.category)
                );
            }

            if let Some(dir) = csv {
                let path = api.export_csv(&dir).map_err(notify)?;
                println!("csv: {}", path.display());
            }
            if handoff {
                api.prepare_report(sequence).map_err(notify)?;
                let report = state.report_api.open_prepared().map_err(notify)?;
                print_report(&report);
            }
        }

        Commands::Report {
            from,
            to,
            lines,
            estimate_only,
        } => {
            let mut state = AppState::new(&config).await?;
            let api = &mut state.report_api;
            api.load_group_lines().await.map_err(notify)?;
            let options = api.estimate(from, to).await.map_err(notify)?.to_vec();
            for option in &options {
                let estimate = option
                    .estimate
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {:<10} {:>5}{}",
                    option.line,
                    option.descriptor.name,
                    estimate,
                    if option.enabled() { "" } else { "  (disabled)" }
                );
            }
            if estimate_only {
                return Ok(());
            }

            for line in parse_lines(&lines)? {
                api.toggle_line(line).map_err(notify)?;
            }
            if let Some(preview) = api.preview() {
                if preview.too_many_lines {
                    eprintln!("max {} lines", api.settings().max_lines);
                }
            }
            let view = api.generate().await.map_err(notify)?;
            print_report(&view);
        }
    }

    Ok(())
}
