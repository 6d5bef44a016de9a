//! Subcommand handlers.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tokio::sync::mpsc::UnboundedReceiver;

use docusearch_api_client::ApiClient;
use docusearch_search::{
    FOCUS_PROMPT, MonitorOutcome, PlaceholderRotator, ProgressMonitor, ProgressUpdate, load_topics,
    question_pool, suggestions, validate_query,
};
use docusearch_thumbnail::{ThumbnailManager, ThumbnailStatus};
use docusearch_tour::{TourController, TourStep, plan_steps};
use docusearch_transfer::validation::{FormKind, classify_selection, validate_single};
use docusearch_transfer::{SelectionPlan, UploadFile};
use docusearch_upload::{BatchOutcome, UploadBatch, UploadEvent, UploadOptions};

use crate::cli::{Commands, ConfigCommands, ThumbnailCommands, TourCommands};
use crate::config::{ClientConfig, config_path};

/// Awaits `fut` while printing everything that arrives on `rx`.
async fn drive<F, T>(fut: F, rx: &mut UnboundedReceiver<T>, mut print: impl FnMut(T)) -> F::Output
where
    F: Future,
{
    tokio::pin!(fut);
    let output = loop {
        tokio::select! {
            output = &mut fut => break output,
            Some(item) = rx.recv() => print(item),
        }
    };
    while let Ok(item) = rx.try_recv() {
        print(item);
    }
    output
}

fn client(config: &ClientConfig) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::with_session(
        &config.base_url,
        config.session_cookie.as_deref(),
    )?)
}

pub async fn run(
    command: Commands,
    config: ClientConfig,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Upload {
            files,
            category,
            chunk_size,
            basic,
        } => {
            let options = UploadOptions {
                category: category.unwrap_or_else(|| config.upload.category.clone()),
                chunk_size: chunk_size.unwrap_or(config.upload.chunk_size),
            };
            upload(&client(&config)?, options, &files, basic).await
        }
        Commands::Search { query, query_id } => {
            search(&config, &client(&config)?, &query, &query_id).await
        }
        Commands::Suggest { limit } => {
            let limit = limit.unwrap_or(config.search.suggestion_limit);
            suggest(&config, &client(&config)?, limit).await
        }
        Commands::Placeholders { count } => {
            placeholders(&config, count);
            Ok(())
        }
        Commands::Tour(cmd) => tour(&config, config_file, &client(&config)?, cmd).await,
        Commands::Thumbnail {
            document_id,
            action,
        } => thumbnail(&client(&config)?, document_id, action).await,
        Commands::Config(cmd) => config_command(&config, config_file, cmd),
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

async fn upload(
    client: &ApiClient,
    options: UploadOptions,
    paths: &[PathBuf],
    basic: bool,
) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        files.push(file);
    }

    let plan = if basic {
        let [file] = <[UploadFile; 1]>::try_from(files)
            .map_err(|_| anyhow::anyhow!("--basic accepts exactly one file"))?;
        validate_single(&file, FormKind::Basic)?;
        SelectionPlan {
            direct: vec![file],
            ..SelectionPlan::default()
        }
    } else {
        classify_selection(files)
    };

    for rejected in &plan.rejected {
        eprintln!(
            "{}: {}",
            rejected.file_name().unwrap_or("selection"),
            rejected
        );
    }
    if plan.is_empty() {
        bail!("no valid files to upload");
    }

    let mut batch = UploadBatch::new(options);
    let mut events = batch
        .take_events()
        .context("upload events already taken")?;
    let result = drive(batch.run_plan(client, plan), &mut events, print_upload_event).await;

    match result.outcome() {
        BatchOutcome::FullSuccess => {
            println!("All {} file(s) uploaded.", result.total);
            Ok(())
        }
        BatchOutcome::Partial { completed, failed } => {
            println!("{completed} uploaded, {failed} failed:");
            for failure in &result.failures {
                println!("  {}: {}", failure.file_name, failure.message);
            }
            bail!("{failed} of {} upload(s) failed", result.total)
        }
    }
}

fn print_upload_event(event: UploadEvent) {
    match event {
        UploadEvent::SessionStarted { file, total_chunks } => {
            println!("{file}: uploading ({total_chunks} part(s))");
        }
        UploadEvent::ChunkUploaded {
            file,
            chunk,
            total_chunks,
            file_percent,
            batch_percent,
        } => {
            println!(
                "{file}: {chunk}/{total_chunks} ({file_percent:.0}%), overall {batch_percent:.0}%"
            );
        }
        UploadEvent::SessionCompleted {
            file,
            document_id,
            badges_earned,
        } => {
            match document_id {
                Some(id) => println!("{file}: done (document {id})"),
                None => println!("{file}: done"),
            }
            for badge in badges_earned {
                println!("  badge earned: {} (level {})", badge.name, badge.level);
            }
        }
        UploadEvent::SessionFailed { file, error } => eprintln!("{file}: failed: {error}"),
        UploadEvent::BatchFinished { .. } => {}
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

async fn search(
    config: &ClientConfig,
    client: &ApiClient,
    query: &str,
    query_id: &str,
) -> anyhow::Result<()> {
    let query = validate_query(query)?;
    println!("Searching for \"{query}\"");
    if !config.features.search_overlay {
        return Ok(());
    }

    let mut monitor = ProgressMonitor::with_interval(config.search.poll_interval());
    let mut updates = monitor
        .take_updates()
        .context("progress updates already taken")?;
    let outcome = drive(monitor.run(client, query_id), &mut updates, print_progress).await;

    if outcome == MonitorOutcome::Simulated {
        println!("(server progress unavailable, estimate shown)");
    }
    Ok(())
}

fn print_progress(update: ProgressUpdate) {
    println!(
        "[{:>3.0}%] {}: {}",
        update.progress, update.stage, update.detail
    );
}

async fn suggest(config: &ClientConfig, client: &ApiClient, limit: usize) -> anyhow::Result<()> {
    if !config.features.example_suggestions {
        println!("Example suggestions are disabled.");
        return Ok(());
    }
    let topics = load_topics(client).await;
    for topic in suggestions(&topics, limit) {
        println!("{topic}");
    }
    Ok(())
}

fn placeholders(config: &ClientConfig, count: usize) {
    if !config.features.placeholder_rotation {
        println!("{FOCUS_PROMPT}");
        return;
    }
    let mut rotator = PlaceholderRotator::new(question_pool());
    println!("{}", rotator.current());
    for _ in 1..count {
        if let Some(question) = rotator.tick() {
            println!("{question}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tour
// ---------------------------------------------------------------------------

fn print_step(step: &TourStep, position: Option<(usize, usize)>) {
    match position {
        Some((n, total)) => println!("[{n}/{total}] {}", step.title),
        None => println!("{}", step.title),
    }
    if !step.content.is_empty() {
        println!("    {}", step.content);
    }
}

/// Records the dismissal in the configuration file, leaving every other
/// setting as stored on disk.
fn persist_dismissed(config_file: Option<&Path>, dismissed: bool) -> anyhow::Result<()> {
    let mut stored = ClientConfig::load(config_file)?;
    if stored.tour_dismissed != dismissed {
        stored.tour_dismissed = dismissed;
        stored.save(config_file)?;
    }
    Ok(())
}

async fn walk(tour: &mut TourController<'_>, first: TourStep) {
    print_step(&first, tour.position());
    while let Some(step) = tour.next().await {
        print_step(&step, tour.position());
    }
}

async fn tour(
    config: &ClientConfig,
    config_file: Option<&Path>,
    client: &ApiClient,
    cmd: TourCommands,
) -> anyhow::Result<()> {
    if let TourCommands::Dismiss = cmd {
        persist_dismissed(config_file, true)?;
        println!("The tour will no longer open by itself.");
        return Ok(());
    }

    let mut tour = TourController::new(client, config.features, config.is_authenticated());
    tour.set_dismissed(config.tour_dismissed);
    if !tour.load().await {
        bail!("could not load the tour configuration");
    }

    match cmd {
        TourCommands::Status => {
            if let Some(tour_config) = tour.config() {
                println!("complete: {}", tour_config.is_complete);
                for step in plan_steps(tour_config, &config.features.tour_targets) {
                    let done = if tour_config.is_step_completed(&step.id) {
                        "x"
                    } else {
                        " "
                    };
                    println!("[{done}] {} ({})", step.title, step.id);
                }
            }
            println!("opens automatically: {}", tour.should_auto_show());
        }
        TourCommands::Run => match tour.start().await {
            Some(first) => {
                walk(&mut tour, first).await;
                if tour.is_dismissed() {
                    persist_dismissed(config_file, true)?;
                }
            }
            None => println!("The tour is not available on this page."),
        },
        TourCommands::Reset => match tour.reset().await {
            Some(first) => {
                persist_dismissed(config_file, false)?;
                walk(&mut tour, first).await;
            }
            None => bail!("tour reset failed"),
        },
        TourCommands::Dismiss => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Thumbnail
// ---------------------------------------------------------------------------

async fn thumbnail(
    client: &ApiClient,
    document_id: String,
    action: ThumbnailCommands,
) -> anyhow::Result<()> {
    let mut manager = ThumbnailManager::new(client, document_id);
    let mut status = manager
        .take_status()
        .context("thumbnail status already taken")?;

    let operation = async {
        match &action {
            ThumbnailCommands::Upload { image } => manager.upload(image.as_deref()).await,
            ThumbnailCommands::Generate => manager.generate().await,
            ThumbnailCommands::Reset => manager.reset().await,
        }
    };
    let message = drive(operation, &mut status, |s: ThumbnailStatus| {
        println!("[{:>2}s] {}", s.elapsed, s.text)
    })
    .await?;

    if !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_command(
    config: &ClientConfig,
    config_file: Option<&Path>,
    cmd: ConfigCommands,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => print!("{}", toml::to_string_pretty(config)?),
        ConfigCommands::Path => {
            let path = match config_file {
                Some(p) => p.to_path_buf(),
                None => config_path()?,
            };
            println!("{}", path.display());
        }
        ConfigCommands::Init => {
            let path = config.save(config_file)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn drive_prints_everything_sent_before_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut seen = Vec::new();

        let work = async {
            for i in 0..3 {
                tx.send(i).unwrap();
                tokio::task::yield_now().await;
            }
            tx.send(3).unwrap();
            "done"
        };
        let out = drive(work, &mut rx, |i| seen.push(i)).await;

        assert_eq!(out, "done");
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn dismissal_is_persisted_without_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("client.toml");
        let stored = ClientConfig {
            base_url: "https://docs.example.com".into(),
            ..ClientConfig::default()
        };
        stored.save(Some(&path)).unwrap();

        persist_dismissed(Some(&path), true).unwrap();

        let loaded = ClientConfig::load(Some(&path)).unwrap();
        assert!(loaded.tour_dismissed);
        assert_eq!(loaded.base_url, "https://docs.example.com");
    }

    #[tokio::test]
    async fn basic_upload_rejects_multiple_files() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.pdf");
        let b = tmp.path().join("b.pdf");
        std::fs::write(&a, b"%PDF").unwrap();
        std::fs::write(&b, b"%PDF").unwrap();

        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = upload(&client, UploadOptions::default(), &[a, b], true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exactly one file"));
    }

    #[tokio::test]
    async fn non_pdf_selection_fails_before_any_request() {
        let tmp = tempfile::tempdir().unwrap();
        let notes = tmp.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();

        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = upload(&client, UploadOptions::default(), &[notes], false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no valid files to upload");
    }
}
