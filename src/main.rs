use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use moodscan::{ArtifactStore, Classifier, Dataset, DatasetSchema, Trainer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct SchemaArgs {
    /// Name of the free-text column
    #[arg(long, default_value = "clean_text")]
    text_column: String,

    /// Name of the binary-label column
    #[arg(long, default_value = "is_depression")]
    label_column: String,
}

impl SchemaArgs {
    fn schema(&self) -> DatasetSchema {
        DatasetSchema::new(&self.text_column, &self.label_column)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Normalize the text column of a dataset and write it back out
    Preprocess {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Destination CSV file (overwritten if present)
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Train a classifier and persist the artifact
    Train {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Artifact directory (defaults to the platform cache location)
        #[arg(long)]
        artifact_dir: Option<PathBuf>,

        /// Vocabulary size cap
        #[arg(long, default_value_t = 5000)]
        max_features: usize,

        /// Gradient descent iteration cap
        #[arg(long, default_value_t = 200)]
        max_iter: usize,

        /// Fraction of the balanced dataset held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        test_ratio: f64,

        /// Random seed for balancing and splitting
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Classify lines of text read from standard input
    Predict {
        /// Artifact directory (defaults to the platform cache location)
        #[arg(long)]
        artifact_dir: Option<PathBuf>,
    },
}

fn open_store(artifact_dir: Option<PathBuf>) -> anyhow::Result<ArtifactStore> {
    let store = match artifact_dir {
        Some(dir) => ArtifactStore::new(dir)?,
        None => ArtifactStore::new_default()?,
    };
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    moodscan::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Command::Preprocess {
            input,
            output,
            schema,
        } => {
            let schema = schema.schema();
            let dataset = Dataset::load(&input, &schema)
                .with_context(|| format!("failed to load dataset from {:?}", input))?;
            let processed = dataset.normalized();
            processed
                .write_csv(&output, &schema)
                .with_context(|| format!("failed to write processed dataset to {:?}", output))?;
            println!("Preprocessing complete. Saved at: {}", output.display());
        }

        Command::Train {
            input,
            artifact_dir,
            max_features,
            max_iter,
            test_ratio,
            seed,
            schema,
        } => {
            let dataset = Dataset::load(&input, &schema.schema())
                .with_context(|| format!("failed to load dataset from {:?}", input))?;

            let outcome = Trainer::new()
                .with_max_features(max_features)
                .with_max_iter(max_iter)
                .with_test_ratio(test_ratio)
                .with_seed(seed)
                .train(&dataset)?;

            let store = open_store(artifact_dir)?;
            store.save(outcome.classifier.vectorizer(), outcome.classifier.model())?;

            if let Some(report) = &outcome.report {
                println!("Classification report ({} held-out samples):", outcome.test_size);
                println!("{}", report);
            }
            println!("Model and vectorizer saved to {}", store.artifact_dir().display());
        }

        Command::Predict { artifact_dir } => {
            let store = open_store(artifact_dir)?;
            let classifier = Classifier::load(&store)
                .context("failed to load artifact; train a model first")?;
            info!("Artifact loaded; entering interactive loop");
            run_predict_loop(&classifier)?;
        }
    }

    Ok(())
}

/// Reads one line per prompt and classifies it until the user types `exit`.
/// Each line is classified independently; no state is carried between calls.
fn run_predict_loop(classifier: &Classifier) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\nEnter a social media post (or 'exit' to quit): ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        let label = classifier.classify(input)?;
        println!("Prediction: {}", label);
    }

    Ok(())
}
