use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use sizetailor::{
    format_file_size, format_kb_mb, parse_target_size, BatchProcessor, Cli, Commands,
    FileProcessor, Loader, MetadataProcessor, Mode, ProcessConfig, SizeBoundsCalculator,
    TailorReport,
};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Compress {
            input,
            target,
            output,
            unchecked,
        } => process_single(Mode::Compress, &input, target, output, unchecked),
        Commands::Inflate {
            input,
            target,
            output,
            unchecked,
        } => process_single(Mode::Inflate, &input, target, output, unchecked),
        Commands::Batch {
            input,
            output,
            mode,
            target,
            threads,
            recursive,
            unchecked,
        } => process_batch(
            &input,
            &output,
            mode.map(Mode::from),
            target,
            threads,
            recursive,
            unchecked,
        ),
        Commands::Info { input } => process_info(&input),
    }
}

fn build_config(
    mode: Option<Mode>,
    target: Option<String>,
    unchecked: bool,
) -> Result<ProcessConfig> {
    let target_bytes = target.as_deref().map(parse_target_size).transpose()?;

    Ok(ProcessConfig {
        mode,
        target_bytes,
        enforce_bounds: !unchecked,
        ..Default::default()
    })
}

fn process_single(
    mode: Mode,
    input: &Path,
    target: Option<String>,
    output: Option<PathBuf>,
    unchecked: bool,
) -> Result<()> {
    let config = build_config(Some(mode), target, unchecked)?;
    let processor = FileProcessor::new(config);

    let report = processor
        .process(input, output.as_deref())
        .with_context(|| format!("Failed to {} {}", mode, input.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &TailorReport) {
    println!("Saved to: {}", report.output_path.display());
    println!("Original size: {}", format_kb_mb(report.original_size));
    println!("New size:      {}", format_kb_mb(report.achieved_size));

    if report.achieved_size < report.original_size {
        let reduction = report.original_size - report.achieved_size;
        println!(
            "Reduction:     {} ({}%)",
            format_file_size(reduction),
            (reduction as f64 * 100.0 / report.original_size as f64).round()
        );
    } else if report.achieved_size > report.original_size {
        println!(
            "Increase:      {}",
            format_file_size(report.achieved_size - report.original_size)
        );
    }

    if let Some(quality) = report.quality {
        println!("Quality:       {:.1}%", quality * 100.0);
    }

    if !report.met_target {
        println!(
            "Warning: could not get under {} even at the lowest quality.",
            format_file_size(report.target_bytes)
        );
    }
}

fn process_batch(
    input: &Path,
    output: &Path,
    mode: Option<Mode>,
    target: Option<String>,
    threads: usize,
    recursive: bool,
    unchecked: bool,
) -> Result<()> {
    let config = build_config(mode, target, unchecked)?;
    let processor = BatchProcessor::new(config, threads)?;

    let stats = processor.process_directory(input, output, recursive)?;

    println!(
        "Batch processing complete. Processed {} files to: {}",
        stats.processed_count,
        output.display()
    );
    println!(
        "Total size: {} -> {}",
        format_file_size(stats.total_size_before),
        format_file_size(stats.total_size_after)
    );

    if stats.missed_targets > 0 {
        println!("{} files could not reach their target size", stats.missed_targets);
    }

    for (file, reason) in &stats.skipped {
        println!("Skipped {}: {}", file, reason);
    }

    for (file, error) in &stats.errors {
        eprintln!("Error in {}: {}", file, error);
    }

    Ok(())
}

fn process_info(input: &Path) -> Result<()> {
    let loader = Loader::new();
    let source = loader
        .load(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("=== File Information ===");
    println!("File: {}", input.display());
    println!("Size: {}", format_kb_mb(source.size()));
    println!("Type: {}", source.media_type);

    if let Some((width, height)) = loader.image_dimensions(&source) {
        println!("Dimensions: {} x {} pixels", width, height);
    }

    let metadata = MetadataProcessor::new();
    match metadata.read_metadata(&source) {
        Some(exif) => {
            println!("EXIF fields: {} (dropped when compressing)", metadata.field_count(&exif));
            for (label, value) in metadata.common_fields(&exif) {
                println!("  {:20}: {}", label, value);
            }
        }
        None => println!("EXIF fields: none"),
    }

    println!("\n=== Available Modes ===");
    for mode in SizeBoundsCalculator::available_modes(&source) {
        let bounds = SizeBoundsCalculator::bounds(source.size(), mode);
        let marker = if mode == SizeBoundsCalculator::default_mode(&source) {
            " (default)"
        } else {
            ""
        };
        println!(
            "{}{}: {} to {}, suggested {}",
            mode,
            marker,
            format_file_size(bounds.min),
            format_file_size(bounds.max),
            format_file_size(SizeBoundsCalculator::default_target(source.size(), mode))
        );
    }

    Ok(())
}
