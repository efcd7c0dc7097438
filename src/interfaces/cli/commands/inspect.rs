//! Offline inspection commands: heuristic, signals, pattern

use colored::Colorize;

use super::print_candidate;
use crate::cli::MetadataArgs;
use crate::config::get_config;
use crate::interfaces::cli::{CliError, print_json};
use crate::models::{PageMetadata, SignalPriority};
use crate::services::{HeuristicGenerator, detect_promotional_signals, learn_pattern};

pub fn heuristic_slug(url: String, json: bool) -> Result<(), CliError> {
    let generator = HeuristicGenerator::new(get_config().slug.clone());
    let candidate = generator.generate_from_str(&url);
    if json {
        return print_json(&candidate);
    }
    print_candidate(&candidate);
    Ok(())
}

pub fn show_signals(metadata: MetadataArgs, json: bool) -> Result<(), CliError> {
    let metadata = PageMetadata {
        title: metadata.title,
        description: metadata.description,
        price: metadata.price,
    };
    if metadata.is_empty() {
        return Err(CliError::ParseError(
            "pass at least one of --title, --description, --price".to_string(),
        ));
    }

    let signals = detect_promotional_signals(&metadata);
    if json {
        return print_json(&signals);
    }
    if signals.is_empty() {
        println!("{}", "No promotional signals found".dimmed());
        return Ok(());
    }

    println!("{}", "Promotional signals:".bold().green());
    for signal in &signals {
        let priority = match signal.priority {
            SignalPriority::High => signal.priority.as_ref().red(),
            SignalPriority::Medium => signal.priority.as_ref().yellow(),
            SignalPriority::Low => signal.priority.as_ref().dimmed(),
        };
        println!(
            "  {} {:<10} {:<7} {}",
            "•".blue(),
            signal.signal_type.as_ref().cyan(),
            priority,
            signal.matched_text
        );
    }
    Ok(())
}

pub fn learn_slug_pattern(slugs: Vec<String>, json: bool) -> Result<(), CliError> {
    let pattern = learn_pattern(&slugs, &get_config().pattern);
    if json {
        return print_json(&pattern);
    }

    match &pattern.structure {
        Some(structure) => println!(
            "{} {} {}",
            "Structure:".bold(),
            structure.cyan(),
            format!("(confidence {:.2})", pattern.confidence).dimmed()
        ),
        None => println!(
            "{} {}",
            "ℹ".bold().blue(),
            format!(
                "Not enough history ({} slugs), no pattern learned",
                pattern.sample_size
            )
            .yellow()
        ),
    }
    println!("  {} {:.1}", "avg segments:".dimmed(), pattern.avg_word_count);
    println!("  {} {:?}", "separator:".dimmed(), pattern.separator);
    println!("  {} {}", "capitalization:".dimmed(), pattern.capitalization);
    println!(
        "  {} brand={} year={} cta={}",
        "flags:".dimmed(),
        pattern.includes_brand,
        pattern.includes_year,
        pattern.uses_cta
    );
    Ok(())
}
