use picpurge::app::{App, AppParts};
use picpurge::cli::{AppConfig, Args};
use picpurge::config::UserConfig;
use picpurge::domain::{AssetSampler, DeleteQueue, SamplerOptions, SwipeSession, TrashReview};
use picpurge::library::DirectoryLibrary;
use picpurge::logging::{default_log_path, init_logging};
use picpurge::review::ReviewService;
use picpurge::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use picpurge::update::{JsonFileVersionSource, UpdateChecker};
use picpurge::{PicPurgeError, Result};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // The TUI owns the terminal, so logs go to a file unless we only print
    let log_file = if args.list_trash {
        None
    } else {
        default_log_path()
    };
    if let Err(e) = init_logging(args.verbose, args.quiet, log_file.as_deref()) {
        eprintln!("Warning: {}", e);
    }

    let user_config = UserConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load user config: {}", e);
        UserConfig::default()
    });
    let config = AppConfig::from_args(args, &user_config);

    if let Err(e) = run(config, user_config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    if config.dry_run {
        log::info!("Dry run: the trash is kept in memory");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = match &config.store {
        Some(path) => path.clone(),
        None => JsonFileStore::default_path().ok_or_else(|| {
            PicPurgeError::ConfigError("Could not determine data directory".to_string())
        })?,
    };
    log::debug!("Using storage file {}", path.display());
    Ok(Arc::new(JsonFileStore::new(path)))
}

async fn run(config: AppConfig, user_config: UserConfig) -> Result<()> {
    let store = open_store(&config)?;
    let queue = Arc::new(DeleteQueue::new(Arc::clone(&store)));

    if config.list_trash {
        let entries = queue.get_all().await?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut library = DirectoryLibrary::new(&config.directory);
    library.set_dry_run(config.dry_run);
    let library = Arc::new(library);

    let sampler = AssetSampler::with_options(
        library.clone(),
        SamplerOptions {
            target_size: config.queue_size,
            page_size: config.page_size,
            seed: None,
        },
    );

    let checker = UpdateChecker::for_current_build();
    let update_available = match &config.versions_file {
        Some(path) => {
            checker
                .check_for_update(&JsonFileVersionSource::new(path))
                .await
        }
        None => false,
    };

    let mut app = App::new(AppParts {
        session: SwipeSession::new(sampler, Arc::clone(&queue)),
        review: TrashReview::new(library.clone(), Arc::clone(&queue)),
        gate: library.clone(),
        reviews: ReviewService::new(store),
        directory_label: config.directory.display().to_string(),
        dry_run: config.dry_run,
        store_url: checker.store_url().to_string(),
        update_available,
        show_welcome: config.show_welcome,
        user_config,
        config_path: UserConfig::config_path(),
    });
    app.start().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let stats = app.session().statistics();
    let prefix = if config.dry_run { "[DRY RUN] " } else { "" };
    println!(
        "{}Shown {} photos: {} kept, {} marked for deletion",
        prefix, stats.shown, stats.skipped, stats.marked
    );
    println!(
        "{}{} waiting in the trash",
        prefix,
        picpurge::tui::photo_count(app.session().queue_count())
    );

    result
}

async fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        // Short poll so finished photo decodes show up without a key press
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key).await {
                    return Ok(());
                }
            }
        } else {
            app.tick();
        }
    }
}
