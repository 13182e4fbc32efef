use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use faq_intent::config::DEFAULT_ADDR;
use faq_intent::dataset::{self, DatasetStats, IngestSource};
use faq_intent::{
    evaluation, server, training, AppState, ArtifactStore, ResponseTable, TrainingConfig,
    Workspace,
};

/// College FAQ intent classifier: data pipeline, training and HTTP serving
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace directory holding data/ and artifacts/
    #[arg(long, global = true, env = "FAQ_INTENT_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the built-in seed dataset to the raw slot
    Collect,
    /// Validate a CSV file or URL and copy it into the raw slot
    Ingest {
        /// Path or http(s) URL; validates the raw slot in place when omitted
        #[arg(long)]
        source: Option<String>,
    },
    /// Clean the raw dataset into the processed slot
    Preprocess,
    /// Print shape and intent distribution of the processed dataset
    Eda,
    /// Fit and persist the classifier
    Train(TrainArgs),
    /// Print a classification report over the processed dataset
    Evaluate,
    /// Classify one question
    Predict {
        text: String,
    },
    /// Smoke checks on the processed dataset
    Check,
    /// Serve /health, /predict and /chat
    Serve {
        #[arg(long, env = "FAQ_INTENT_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
        /// JSON object of intent -> answer overriding the built-in answers
        #[arg(long)]
        responses: Option<PathBuf>,
    },
    /// Collect (if needed), preprocess and train
    Pipeline(TrainArgs),
}

#[derive(Args, Debug, Clone)]
struct TrainArgs {
    /// Fraction of rows held out for scoring
    #[arg(long, default_value_t = 0.2)]
    test_size: f32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Inverse regularization strength
    #[arg(long, default_value_t = 1.0)]
    c: f32,
    #[arg(long, default_value_t = 500)]
    max_iter: usize,
    /// Remove existing artifacts before training
    #[arg(long)]
    fresh: bool,
}

impl TrainArgs {
    fn config(&self) -> TrainingConfig {
        TrainingConfig {
            test_size: self.test_size,
            seed: self.seed,
            c: self.c,
            max_iter: self.max_iter,
            ..TrainingConfig::default()
        }
    }
}

fn collect(workspace: &Workspace) -> Result<()> {
    let path = workspace.raw_path();
    let rows = dataset::collect(&path).with_context(|| format!("writing {:?}", path))?;
    println!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

async fn ingest(workspace: &Workspace, source: Option<String>) -> Result<()> {
    let dest = workspace.raw_path();
    let source = match source {
        Some(source) => IngestSource::parse(&source),
        None => IngestSource::Path(dest.clone()),
    };
    let rows = dataset::ingest(&source, &dest)
        .await
        .with_context(|| format!("ingesting {}", source))?;
    println!("Ingested {} rows into {}", rows, dest.display());
    Ok(())
}

fn preprocess(workspace: &Workspace) -> Result<()> {
    let summary = dataset::preprocess(&workspace.raw_path(), &workspace.processed_path())
        .context("preprocessing raw dataset")?;
    println!(
        "Kept {} of {} rows ({} dropped) -> {}",
        summary.kept,
        summary.read,
        summary.dropped,
        workspace.processed_path().display()
    );
    Ok(())
}

fn eda(workspace: &Workspace) -> Result<()> {
    let path = workspace.processed_path();
    let records = dataset::read_records(&path).with_context(|| format!("reading {:?}", path))?;
    print!("{}", DatasetStats::from_records(&records));
    Ok(())
}

fn train(workspace: &Workspace, args: &TrainArgs) -> Result<()> {
    let store = ArtifactStore::new(workspace.artifacts_dir())
        .context("creating artifacts directory")?;
    if args.fresh {
        info!("Fresh training requested - removing any existing artifacts...");
        store.remove()?;
    }

    let start_time = Instant::now();
    let (classifier, report) =
        training::train_from_file(&workspace.processed_path(), &args.config())
            .context("training classifier")?;
    store.save(&classifier).context("saving artifacts")?;
    store.save_report(&report)?;
    info!("=== Classifier trained (took {:.2?}) ===", start_time.elapsed());

    println!(
        "Trained on {} rows, {} intents, {} terms",
        report.train_rows,
        report.labels.len(),
        report.vocabulary_size
    );
    match report.accuracy {
        Some(acc) => println!("Holdout accuracy: {:.3} ({} rows)", acc, report.test_rows),
        None => println!("No rows held out"),
    }
    Ok(())
}

fn load_store(workspace: &Workspace) -> Result<faq_intent::Classifier> {
    let store = ArtifactStore::new(workspace.artifacts_dir())?;
    store.load().context("loading trained artifacts")
}

fn evaluate(workspace: &Workspace) -> Result<()> {
    let classifier = load_store(workspace)?;
    let path = workspace.processed_path();
    let records = dataset::read_records(&path).with_context(|| format!("reading {:?}", path))?;
    let report = evaluation::evaluate(&classifier, &records)?;
    print!("{}", report);
    Ok(())
}

fn predict(workspace: &Workspace, text: &str) -> Result<()> {
    let state = AppState::new(load_store(workspace)?, ResponseTable::default());
    let (intent, answer, confidence) = state.answer(text)?;
    println!("Intent: {} ({:.3})", intent, confidence);
    println!("Answer: {}", answer);
    Ok(())
}

fn check(workspace: &Workspace) -> Result<()> {
    let path = workspace.processed_path();
    let summary = dataset::validate_file(&path).with_context(|| format!("checking {:?}", path))?;
    println!(
        "OK: {} rows, columns [{}]",
        summary.rows,
        summary.columns.join(", ")
    );
    Ok(())
}

async fn serve(workspace: &Workspace, addr: SocketAddr, responses: Option<PathBuf>) -> Result<()> {
    let classifier = load_store(workspace)?;
    let responses = match responses {
        Some(path) => ResponseTable::from_file(&path)
            .with_context(|| format!("loading responses from {:?}", path))?,
        None => ResponseTable::default(),
    };
    let info = classifier.info();
    info!(
        "Serving {} intents: {}",
        info.num_classes,
        info.class_labels.join(", ")
    );
    server::serve(addr, AppState::new(classifier, responses))
        .await
        .with_context(|| format!("serving on {}", addr))
}

fn pipeline(workspace: &Workspace, args: &TrainArgs) -> Result<()> {
    let path = workspace.raw_path();
    if let Some(rows) =
        dataset::collect_if_missing(&path).with_context(|| format!("writing {:?}", path))?
    {
        println!("Wrote {} rows to {}", rows, path.display());
    }
    preprocess(workspace)?;
    train(workspace, args)
}

#[tokio::main]
async fn main() -> Result<()> {
    faq_intent::init_logger();
    let cli = Cli::parse();
    let workspace = Workspace::resolve(cli.home);
    info!("Workspace: {:?}", workspace.home());

    match cli.command {
        Command::Collect => collect(&workspace),
        Command::Ingest { source } => ingest(&workspace, source).await,
        Command::Preprocess => preprocess(&workspace),
        Command::Eda => eda(&workspace),
        Command::Train(args) => train(&workspace, &args),
        Command::Evaluate => evaluate(&workspace),
        Command::Predict { text } => {
            if text.trim().is_empty() {
                bail!("question must not be empty");
            }
            predict(&workspace, &text)
        }
        Command::Check => check(&workspace),
        Command::Serve { addr, responses } => serve(&workspace, addr, responses).await,
        Command::Pipeline(args) => pipeline(&workspace, &args),
    }
}
