use std::path::Path;

use anyhow::Result;
use apac_core::RowProgress;
use indicatif::{ProgressBar, ProgressStyle};

use apac_cli::pipeline::{GenerateOptions, GenerateResult, InputPaths, generate};

use crate::cli::GenerateArgs;

/// Build [`GenerateOptions`] from the flags and run the pipeline with a
/// progress bar on stderr.
pub fn run_generate(args: &GenerateArgs, show_progress: bool) -> Result<GenerateResult> {
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.patients
            .parent()
            .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf)
    });
    let options = GenerateOptions {
        inputs: InputPaths {
            patients: args.patients.clone(),
            numbers: args.numbers.clone(),
            physicians: args.physicians.clone(),
            facilities: args.facilities.clone(),
        },
        output_dir,
        period: args.period.clone(),
        layout_version: args.layout_version.clone(),
        profile: args.profile.clone(),
        backup: !args.no_backup,
        dry_run: args.dry_run,
    };

    let progress = if show_progress {
        ProgressBar::new(0)
    } else {
        ProgressBar::hidden()
    };
    apply_progress_style(&progress);
    let result = generate(&options, |update: RowProgress| {
        if progress.length() != Some(update.total as u64) {
            progress.set_length(update.total as u64);
        }
        progress.set_position(update.row as u64);
        progress.set_message(format!(
            "{} generated, {} skipped",
            update.generated, update.failed
        ));
    });
    progress.finish_and_clear();
    result
}

fn apply_progress_style(progress: &ProgressBar) {
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
}
