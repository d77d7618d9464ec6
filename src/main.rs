mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod insights;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::{App, Screen};
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dialoguer::{Input, MultiSelect, Select};
use error::AgroInsightError;
use logic::pipeline::{AdvisoryPipeline, AnalysisReport};
use logic::rules::SuggestionEngine;
use models::{Coordinate, Crop, DatePolicy, ParameterCode, SelectionForm, SizeCategory};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{InsightsScreen, ReportScreen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive(cli.config)?;
            Ok(())
        }
        Some(Commands::Check) => run_check(load_config(cli.config)).await,
        Some(Commands::Parameters) => {
            println!("Weather parameters");
            for parameter in ParameterCode::ALL {
                println!("  {:<20} {}", parameter.as_str(), parameter.label());
            }
            println!();
            println!("Advisory rules");
            for (id, name) in SuggestionEngine::new().list_rules() {
                println!("  {:<26} {}", id, name);
            }
            Ok(())
        }
        Some(Commands::Analyze(args)) => run_analyze(load_config(cli.config), args).await,
        None => {
            let args = AnalyzeArgs {
                interactive: true,
                ..AnalyzeArgs::default()
            };
            run_analyze(load_config(cli.config), args).await
        }
    }
}

/// Load config, offering first-run setup when none exists.
fn load_config(path: Option<std::path::PathBuf>) -> Config {
    let result = if Config::exists(path.as_ref()) {
        Config::load(path)
    } else {
        println!("No configuration found.");
        Config::setup_interactive(path).map(|(config, _)| config)
    };

    match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run `agroinsight init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    }
}

async fn run_check(config: Config) -> anyhow::Result<()> {
    let pipeline = AdvisoryPipeline::from_config(&config)?;
    println!("Configuration OK");

    let (power, insights) = pipeline.check_connections().await;
    match &power {
        Ok(true) => println!("NASA POWER: OK"),
        Ok(false) => println!("NASA POWER: unexpected response"),
        Err(e) => println!("NASA POWER: OFFLINE ({})", e),
    }
    if insights {
        println!("Insights ({}): OK", pipeline.backend_name());
    } else {
        println!("Insights ({}): OFFLINE", pipeline.backend_name());
    }

    if !matches!(power, Ok(true)) || !insights {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_analyze(config: Config, args: AnalyzeArgs) -> anyhow::Result<()> {
    let pipeline = AdvisoryPipeline::from_config(&config)?;

    let mut form = form_from_args(&args);
    if args.interactive {
        fill_form_interactive(&mut form, pipeline.date_policy())
            .context("Interactive input failed")?;
    }

    let report = match pipeline.submit(&form).await {
        Ok(report) => report,
        Err(AgroInsightError::Validation(e)) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.view {
        run_viewer(report)?;
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ui::text::render_report(&report));
    }

    Ok(())
}

fn form_from_args(args: &AnalyzeArgs) -> SelectionForm {
    SelectionForm {
        crops: args.crops.iter().copied().collect(),
        size: args.size,
        coordinate: match (args.lat, args.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        },
        start: args.start,
        end: args.end,
    }
}

/// Prompt only for fields still missing; validation happens on submit.
fn fill_form_interactive(form: &mut SelectionForm, policy: &DatePolicy) -> anyhow::Result<()> {
    if form.crops.is_empty() {
        let picked = MultiSelect::new()
            .with_prompt("Crop types (space to select)")
            .items(&Crop::ALL.map(|c| c.as_str()))
            .interact()?;
        form.crops = picked.into_iter().map(|i| Crop::ALL[i]).collect();
    }

    if form.size.is_none() {
        let picked = Select::new()
            .with_prompt("Crop area size")
            .items(&SizeCategory::ALL.map(|s| s.as_str()))
            .default(0)
            .interact()?;
        form.size = Some(SizeCategory::ALL[picked]);
    }

    if form.coordinate.is_none() {
        let latitude: f64 = Input::new().with_prompt("Latitude").interact_text()?;
        let longitude: f64 = Input::new().with_prompt("Longitude").interact_text()?;
        form.coordinate = Some(Coordinate::new(latitude, longitude));
    }

    if form.start.is_none() {
        let start: chrono::NaiveDate = Input::new()
            .with_prompt(format!(
                "Start date ({} to {})",
                policy.min_date, policy.max_date
            ))
            .interact_text()?;
        form.start = Some(start);
    }

    if form.end.is_none() {
        let mut prompt = Input::<chrono::NaiveDate>::new().with_prompt("End date");
        if let Some(start) = form.start {
            prompt = prompt.default(start);
        }
        form.end = Some(prompt.interact_text()?);
    }

    Ok(())
}

fn run_viewer(report: AnalysisReport) -> anyhow::Result<()> {
    let mut app = App::new(report);
    if app.report.insights.is_fallback() {
        app.set_status("Insights unavailable");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            match app.screen {
                Screen::Parameters => {
                    let screen = ReportScreen::new(&app.report)
                        .with_selection(app.parameters_state.selected_index)
                        .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Insights => {
                    let max_scroll = InsightsScreen::new(&app.report).max_scroll(area);
                    app.insights_state.set_max_scroll(max_scroll);
                    let screen =
                        InsightsScreen::new(&app.report).with_scroll(app.insights_state.scroll);
                    f.render_widget(screen, area);
                }
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char(c) => {
            if let Some(screen) = Screen::from_key(c) {
                app.switch_screen(screen);
            }
        }
        KeyCode::Tab => app.switch_screen(match app.screen {
            Screen::Parameters => Screen::Insights,
            Screen::Insights => Screen::Parameters,
        }),
        KeyCode::Up => match app.screen {
            Screen::Parameters => app.select_prev(),
            Screen::Insights => app.insights_state.up(),
        },
        KeyCode::Down => match app.screen {
            Screen::Parameters => app.select_next(),
            Screen::Insights => app.insights_state.down(),
        },
        _ => {}
    }
}
