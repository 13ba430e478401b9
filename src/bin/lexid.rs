use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use lexid::evaluate::{evaluate_test_file, evaluate_training_dir};
use lexid::normalize::build_training_files;
use lexid::serialization::{load_model, model_summary_json, save_model};
use lexid::{LanguageModel, Scorer, Trainer, TrainerConfig};
use log::info;
use rayon::ThreadPoolBuilder;
use serde_json::json;

const DEFAULT_MODEL: &str = "lexid.model";

#[derive(Parser, Debug)]
#[command(author, version, about = "Word-frequency language identification toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Filter a raw corpus into one training file per language
    Normalize(NormalizeArgs),
    /// Train a model from normalized corpus files
    Train(TrainArgs),
    /// Classify sentences with a trained model
    Score(ScoreArgs),
    /// Measure the error rate over labeled test data
    Eval(EvalArgs),
    /// Inspect model metadata
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Raw corpus root with one sub-directory per language
    input_dir: PathBuf,

    /// Output directory for the lang-<code>.txt training files
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Directory holding one lang-<code>.txt file per language
    corpus_dir: PathBuf,

    /// Output path for the trained model blob
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_MODEL)]
    output: PathBuf,

    /// Cap on distinct words per language (0 = unlimited)
    #[arg(long, value_name = "COUNT")]
    max_words: Option<usize>,

    /// Sentences between progress reports (0 = silent)
    #[arg(long, value_name = "COUNT")]
    report_interval: Option<usize>,

    /// Scale factor applied to the minimum word probability for OOV words
    #[arg(long, value_name = "FACTOR")]
    oov_scale: Option<f64>,

    /// Drop the empty tokens produced by consecutive spaces
    #[arg(long)]
    drop_empty_tokens: bool,

    /// Disable per-language logging/progress
    #[arg(long)]
    no_progress: bool,

    /// Limit Rayon worker threads
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Optional path for a JSON training-statistics report
    #[arg(long, value_name = "PATH")]
    stats_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Model blob to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Sentences to classify when --input is omitted
    #[arg(value_name = "SENTENCE", required_unless_present = "input")]
    sentences: Vec<String>,

    /// Path to a file with one sentence per line
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Model blob to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Labeled test file with <code><TAB><sentence> lines
    #[arg(long, value_name = "PATH", required_unless_present = "on_train")]
    test_file: Option<PathBuf>,

    /// Replay the recorded training directory instead of a test file
    #[arg(long, conflicts_with = "test_file")]
    on_train: bool,

    /// Sentences between running-count reports (0 = silent)
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    report_interval: usize,

    /// Emit a machine-readable JSON report
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Model blob to inspect
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Emit the machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Normalize(args) => run_normalize(args),
        Commands::Train(args) => run_train(args),
        Commands::Score(args) => run_score(args),
        Commands::Eval(args) => run_eval(args),
        Commands::Info(args) => run_info(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            0 => LevelFilter::Info,
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let summary = build_training_files(&args.input_dir, &args.output_dir)
        .with_context(|| format!("failed to normalize {}", args.input_dir.display()))?;
    println!(
        "✅ wrote {} language files ({} lines) to {}",
        summary.languages_written,
        summary.lines_kept,
        args.output_dir.display()
    );
    if summary.files_skipped > 0 {
        println!(
            "   {} of {} input files skipped (bad encoding)",
            summary.files_skipped,
            summary.files_read + summary.files_skipped
        );
    }
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("unable to configure Rayon thread pool")?;
    }

    let mut cfg = TrainerConfig::builder();
    if let Some(max_words) = args.max_words {
        cfg = cfg.max_words_per_lang(max_words);
    }
    if let Some(report_interval) = args.report_interval {
        cfg = cfg.report_interval(report_interval);
    }
    if let Some(oov_scale) = args.oov_scale {
        cfg = cfg.oov_scale(oov_scale);
    }
    cfg = cfg.drop_empty_tokens(args.drop_empty_tokens);
    cfg = cfg.show_progress(!args.no_progress);
    let trainer_cfg = cfg.build()?;

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} counting words... {elapsed}")
            .expect("valid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let trainer = Trainer::new(trainer_cfg);
    let start = Instant::now();
    let artifacts = trainer
        .train(&args.corpus_dir)
        .with_context(|| format!("failed to train from {}", args.corpus_dir.display()))?;
    if let Some(pb) = spinner {
        pb.finish_with_message("training complete");
    }

    let elapsed = start.elapsed();
    let languages = artifacts.model.language_count();
    let total_words: u64 = artifacts
        .metrics
        .languages
        .iter()
        .map(|stats| stats.total_word_count)
        .sum();

    save_model(&artifacts.model, &args.output)
        .with_context(|| format!("failed to save model to {}", args.output.display()))?;
    if let Some(stats_path) = &args.stats_json {
        let stats = serde_json::to_string_pretty(&artifacts.metrics)?;
        fs::write(stats_path, stats)
            .with_context(|| format!("failed to write {}", stats_path.display()))?;
    }

    info!("training complete: languages={languages} words={total_words} duration={elapsed:.2?}");
    println!(
        "✅ wrote model with {} languages ({} words) to {}",
        languages,
        total_words,
        args.output.display()
    );
    println!("   duration {elapsed:.2?}");

    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let model = load_model_arg(&args.model)?;
    let scorer = Scorer::new(&model)?;

    let sentences = if let Some(input_path) = &args.input {
        let file = File::open(input_path)
            .with_context(|| format!("failed to open {}", input_path.display()))?;
        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("failed to read {}", input_path.display()))?
    } else {
        args.sentences
    };
    if sentences.is_empty() {
        return Err(anyhow!("no sentences to score"));
    }

    for sentence in &sentences {
        let prediction = scorer.classify(sentence)?;
        if args.json {
            let record = json!({
                "sentence": sentence,
                "language": prediction.language,
                "log_prob": prediction.log_prob,
            });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}\t{:.4}\t{}", prediction.language, prediction.log_prob, sentence);
        }
    }

    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    let model = load_model_arg(&args.model)?;

    let report = if args.on_train {
        evaluate_training_dir(&model, args.report_interval)?
    } else {
        let test_file = args
            .test_file
            .as_ref()
            .expect("clap enforces --test-file unless --on-train");
        evaluate_test_file(&model, test_file, args.report_interval)
            .with_context(|| format!("failed to evaluate {}", test_file.display()))?
    };

    if args.json {
        let record = json!({
            "sentence_count": report.sentence_count,
            "error_count": report.error_count,
            "error_rate": report.error_rate(),
        });
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!(
            "Error count: {} sentence count: {} percent error rate: {:.4}",
            report.error_count,
            report.sentence_count,
            report.error_rate()
        );
    }

    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let model = load_model_arg(&args.model)?;

    if args.json {
        println!("{}", model_summary_json(&model, true)?);
        return Ok(());
    }

    println!("Languages    : {}", model.language_count());
    println!("Trained      : {}", model.is_trained());
    println!("OOV prob     : {:e}", model.out_of_vocab_prob());
    match model.training_dir() {
        Some(dir) => println!("Training dir : {}", dir.display()),
        None => println!("Training dir : (none)"),
    }
    for (code, profile) in model.profiles() {
        let top = profile
            .most_probable_word()
            .map(|(word, prob)| format!("{word:?} ({prob:.4})"))
            .unwrap_or_else(|| "(none)".to_string());
        println!(
            "  {code}: {} distinct words, {} sentences, {} words, most probable {top}",
            profile.distinct_words(),
            profile.sentence_count(),
            profile.total_word_count()
        );
    }

    Ok(())
}

fn load_model_arg(path: &PathBuf) -> Result<LanguageModel> {
    load_model(path).with_context(|| format!("failed to load model from {}", path.display()))
}
