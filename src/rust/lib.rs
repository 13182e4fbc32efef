//! A college FAQ intent classifier: CSV datasets in, a TF-IDF + logistic
//! regression model out, served over HTTP.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use faq_intent::{Classifier, ResponseTable};
//!
//! let classifier = Classifier::builder()
//!     .add_example("what is the fee structure", "fees")?
//!     .add_example("how much are the tuition fees", "fees")?
//!     .add_example("is hostel facility available", "hostel")?
//!     .add_example("can i stay in the hostel", "hostel")?
//!     .build()?;
//!
//! let (intent, scores) = classifier.predict("Is there a hostel?")?;
//! println!("Predicted intent: {} ({:.2})", intent, scores[&intent]);
//! println!("{}", ResponseTable::default().answer(&intent));
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! Each stage reads and writes fixed paths under a [`Workspace`]:
//!
//! ```no_run
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use faq_intent::{dataset, training, ArtifactStore, TrainingConfig, Workspace};
//!
//! let workspace = Workspace::resolve(None);
//! dataset::collect(&workspace.raw_path())?;
//! dataset::preprocess(&workspace.raw_path(), &workspace.processed_path())?;
//!
//! let (classifier, report) =
//!     training::train_from_file(&workspace.processed_path(), &TrainingConfig::default())?;
//! let store = ArtifactStore::new(workspace.artifacts_dir())?;
//! store.save(&classifier)?;
//! store.save_report(&report)?;
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod responses;
pub mod server;
pub mod training;

pub use artifacts::{ArtifactError, ArtifactStore, Manifest};
pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo};
pub use config::Workspace;
pub use dataset::{DatasetError, FaqRecord};
pub use evaluation::ClassificationReport;
pub use responses::{ResponseTable, FALLBACK_ANSWER};
pub use server::AppState;
pub use training::{TrainingConfig, TrainingError, TrainingReport};

/// Initializes `env_logger`, defaulting to the `info` level when `RUST_LOG`
/// is unset. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
