use crate::infra::build_pipeline;
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use talent_screen::config::AppConfig;
use talent_screen::error::AppError;
use talent_screen::screening::dataset::{self, SyntheticOptions};
use talent_screen::screening::{CandidateSubmission, LanguageVocabulary, ScreeningReport};

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Years of professional experience
    #[arg(long)]
    pub(crate) experience_years: i64,
    /// Highest education level (Degree, Master, or Bootcamp)
    #[arg(long)]
    pub(crate) education: String,
    /// Technical assessment score (0-100)
    #[arg(long)]
    pub(crate) technical_score: i64,
    /// Soft skill rating (1-5)
    #[arg(long)]
    pub(crate) soft_skill_score: i64,
    /// Months since the last position ended
    #[arg(long)]
    pub(crate) months_unemployed: i64,
    /// Programming language the candidate knows; repeat for several
    #[arg(long = "language")]
    pub(crate) languages: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DatasetExportArgs {
    /// Destination CSV file
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Number of records (defaults to SCREENING_SAMPLES)
    #[arg(long)]
    pub(crate) samples: Option<usize>,
    /// Generator seed (defaults to SCREENING_SEED)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let pipeline = build_pipeline(&config.screening)?;

    let submission = CandidateSubmission {
        experience_years: args.experience_years,
        education: args.education,
        technical_score: args.technical_score,
        soft_skill_score: args.soft_skill_score,
        months_unemployed: args.months_unemployed,
        languages: args.languages,
    };
    let report = pipeline.screen(submission)?;
    print!("{}", render_report(&report));
    Ok(())
}

pub(crate) fn run_dataset_export(args: DatasetExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let options = SyntheticOptions {
        samples: args.samples.unwrap_or(config.screening.samples),
        seed: args.seed.unwrap_or(config.screening.seed),
    };

    let records = dataset::generate(&options, &LanguageVocabulary::default());
    let file = File::create(&args.output)?;
    dataset::write_csv(file, &records)?;

    println!(
        "Wrote {} labeled candidates (seed {}) to {}",
        records.len(),
        options.seed,
        args.output.display()
    );
    Ok(())
}

fn render_report(report: &ScreeningReport) -> String {
    let mut out = format!("Screening decision: {}\n", report.decision);

    out.push_str("Class probabilities:\n");
    for (decision, probability) in report.probabilities.iter() {
        out.push_str(&format!("  - {decision}: {:.1}%\n", probability * 100.0));
    }

    match (&report.explanation, &report.explanation_error) {
        (Some(factors), _) => {
            out.push_str("Deciding factors:\n");
            for (rank, factor) in factors.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {} = {} ({:+.3})\n",
                    rank + 1,
                    factor.feature,
                    factor.value,
                    factor.attribution
                ));
            }
        }
        (None, Some(error)) => {
            out.push_str(&format!("Explanation unavailable: {error}\n"));
        }
        (None, None) => {}
    }

    out
}
