use chrono::{DateTime, Local};

use crate::analysis::ConflictAnalysis;
use crate::assign::Assignment;
use crate::evaluate::Comparison;
use crate::store::{rank_of, Preferences};

/// Qualitative verdict on a satisfaction percentage.
pub fn rating_label(satisfaction_pct: f64) -> &'static str {
    if satisfaction_pct >= 90.0 {
        "EXCELLENT"
    } else if satisfaction_pct >= 75.0 {
        "GOOD"
    } else if satisfaction_pct >= 50.0 {
        "ACCEPTABLE"
    } else {
        "PROBLEMATIC"
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Renders the conflict analysis for the console.
pub fn format_conflict_analysis(analysis: &ConflictAnalysis) -> String {
    let mut lines = vec![
        "=== CONFLICT AND RISK ANALYSIS ===".to_string(),
        String::new(),
        "📊 General statistics:".to_string(),
        format!("   • People: {}", analysis.n_people),
        format!("   • Items: {}", analysis.n_items),
        format!(
            "   • Average preferences per person: {:.1}",
            analysis.mean_preferences
        ),
        String::new(),
    ];

    if !analysis.most_requested.is_empty() {
        lines.push("🔥 Most requested items:".to_string());
        for (item, count) in &analysis.most_requested {
            lines.push(format!(
                "   • {item}: {count} people ({:.1}%)",
                percentage(*count, analysis.n_people)
            ));
        }
        lines.push(String::new());
    }

    if !analysis.critical.is_empty() {
        lines.push("⚠️ CRITICAL CONFLICTS:".to_string());
        for (item, count) in &analysis.critical {
            lines.push(format!("   • {item}: requested by {count} people!"));
        }
        lines.push(String::new());
    }

    if !analysis.at_risk.is_empty() {
        lines.push("🚨 People at risk of dissatisfaction:".to_string());
        for person in &analysis.at_risk {
            lines.push(format!(
                "   • {}: {} preferences, {} in conflict",
                person.person, person.preferences, person.conflicts
            ));
        }
        lines.push(String::new());
    }

    if !analysis.never_requested.is_empty() {
        lines.push("😴 Never requested items:".to_string());
        lines.push(format!("   • {}", analysis.never_requested.join(", ")));
        lines.push(String::new());
    }

    if !analysis.suggestions.is_empty() {
        lines.push("💡 SUGGESTIONS:".to_string());
        for suggestion in &analysis.suggestions {
            lines.push(format!("   {suggestion}"));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Groups people by how well they were served and closes with the totals.
///
/// `unmatched_penalty` is added to the total cost for each person outside
/// their own list. People flagged by `analysis` as at risk are marked.
pub fn format_detailed_results(
    assignment: &Assignment,
    preferences: &Preferences,
    analysis: Option<&ConflictAnalysis>,
    unmatched_penalty: u32,
) -> String {
    let mut excellent = Vec::new();
    let mut good = Vec::new();
    let mut acceptable = Vec::new();
    let mut problematic = Vec::new();
    let mut total_cost = 0u64;
    let mut satisfied = 0usize;

    for (person, item) in assignment {
        let risk = if analysis.is_some_and(|a| a.is_at_risk(person)) {
            " 🚨"
        } else {
            ""
        };
        match preferences.get(person).and_then(|list| rank_of(list, item)) {
            Some(rank) => {
                total_cost += rank as u64;
                satisfied += 1;
                let (bucket, medal) = match rank {
                    0 => (&mut excellent, "🥇"),
                    1 => (&mut good, "🥈"),
                    _ => (&mut acceptable, "🥉"),
                };
                bucket.push(format!(
                    "{medal} {person}: {item} (preference #{}){risk}",
                    rank + 1
                ));
            }
            None => {
                total_cost += u64::from(unmatched_penalty);
                problematic.push(format!("😞 {person}: {item} (NOT in preferences){risk}"));
            }
        }
    }

    let mut lines = vec!["=== ASSIGNMENT RESULTS ===".to_string(), String::new()];
    for (title, entries) in [
        ("EXCELLENT", excellent),
        ("GOOD", good),
        ("ACCEPTABLE", acceptable),
        ("PROBLEMATIC", problematic),
    ] {
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("{title}:"));
        lines.extend(entries.into_iter().map(|entry| format!("  {entry}")));
        lines.push(String::new());
    }

    let pct = percentage(satisfied, assignment.len());
    lines.push("📊 FINAL STATISTICS:".to_string());
    lines.push(format!("   • Total cost: {total_cost}"));
    lines.push(format!(
        "   • Satisfied preferences: {satisfied}/{} ({pct:.1}%)",
        assignment.len()
    ));
    lines.push(format!("   • Rating: {}", rating_label(pct)));

    lines.join("\n")
}

/// One block per compared strategy, then failures and the winner.
pub fn format_comparison(comparison: &Comparison) -> String {
    let mut lines = vec!["=== STRATEGY COMPARISON ===".to_string(), String::new()];

    for result in &comparison.results {
        lines.push(format!("✅ {}:", result.strategy.name().to_uppercase()));
        lines.push(format!("   Total cost: {}", result.total_cost));
        lines.push(format!(
            "   Satisfaction: {:.1}% ({}/{})",
            result.satisfaction_pct, result.satisfied, result.people
        ));
        lines.push(String::new());
    }

    for failure in &comparison.failures {
        lines.push(format!("❌ {}: {}", failure.strategy, failure.error));
        lines.push(String::new());
    }

    if comparison.optimal_skipped {
        lines.push("⚠️ optimal skipped: no solver configured".to_string());
        lines.push(String::new());
    }

    lines.push(format!(
        "✨ Best strategy: {}",
        comparison.best().name().to_uppercase()
    ));
    lines.join("\n")
}

/// Builds the plain-text report saved next to the assignment CSV.
///
/// People are listed alphabetically. Satisfaction counts people whose item is
/// anywhere in their own list.
pub fn build_text_report(
    preferences: &Preferences,
    analysis: &ConflictAnalysis,
    assignment: &Assignment,
    strategy: &str,
    generated_at: DateTime<Local>,
) -> String {
    let n_people = preferences.len();
    let mut lines = vec![
        "=== CHARACTER ASSIGNMENT REPORT ===".to_string(),
        format!("Date: {}", generated_at.format("%d/%m/%Y %H:%M")),
        format!("Strategy used: {}", strategy.to_uppercase()),
        String::new(),
        "GENERAL STATISTICS:".to_string(),
        format!("• Number of people: {n_people}"),
        format!("• Number of available items: {}", analysis.n_items),
        format!(
            "• Average preferences per person: {:.1}",
            analysis.mean_preferences
        ),
        String::new(),
        "ASSIGNMENTS:".to_string(),
    ];

    let mut people: Vec<(&String, &String)> = assignment.iter().collect();
    people.sort_by(|a, b| a.0.cmp(b.0));

    let mut satisfied = 0usize;
    for (person, item) in people {
        match preferences.get(person).and_then(|list| rank_of(list, item)) {
            Some(rank) => {
                satisfied += 1;
                lines.push(format!("• {person}: {item} (choice #{})", rank + 1));
            }
            None => lines.push(format!("• {person}: {item} (not in preferences)")),
        }
    }

    let pct = percentage(satisfied, n_people);
    lines.push(String::new());
    lines.push("FINAL RESULTS:".to_string());
    lines.push(format!(
        "• People who received one of their choices: {satisfied}/{n_people}"
    ));
    lines.push(format!("• Satisfaction percentage: {pct:.1}%"));
    lines.push(format!("• Evaluation: {}", rating_label(pct)));

    lines.join("\n")
}
