//! CLI command implementations

mod config_gen;
mod generate;
mod inspect;

pub use config_gen::config_generate;
pub use generate::{GenerateOptions, generate_slug};
pub use inspect::{heuristic_slug, learn_slug_pattern, show_signals};

use colored::Colorize;

use crate::models::{Confidence, SlugCandidate, SlugSource};

/// Colored one-candidate summary shared by `generate` and `heuristic`
pub(crate) fn print_candidate(candidate: &SlugCandidate) {
    let source = match candidate.source {
        SlugSource::Ai => candidate.source.as_ref().green(),
        SlugSource::Regex => candidate.source.as_ref().yellow(),
        SlugSource::Cache => candidate.source.as_ref().blue(),
    };
    let confidence = match candidate.confidence {
        Confidence::High => candidate.confidence.as_ref().green(),
        Confidence::Medium => candidate.confidence.as_ref().yellow(),
        Confidence::Low => candidate.confidence.as_ref().red(),
    };

    println!("{} {}", "✓".bold().green(), candidate.slug.cyan().bold());
    println!("  {} {}  {} {}", "source:".dimmed(), source, "confidence:".dimmed(), confidence);
    if let Some(model) = &candidate.ai_model {
        println!("  {} {}", "model:".dimmed(), model.magenta());
    }
    if let Some(reasoning) = &candidate.reasoning {
        println!("  {} {}", "why:".dimmed(), reasoning);
    }
    if candidate.source == SlugSource::Regex && candidate.confidence == Confidence::Low {
        println!(
            "  {} {}",
            "ℹ".bold().blue(),
            "Low-confidence fallback, consider editing it manually".yellow()
        );
    }
}
