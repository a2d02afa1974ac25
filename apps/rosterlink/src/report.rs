//! Plain-text rendering of run results

use rosterlink_core::{MatchScore, RunReport, StageKind};

/// Human-readable run report
pub fn render_run(report: &RunReport) -> String {
    let resolution = &report.resolution;
    let mut lines: Vec<String> = Vec::new();

    for stage in &resolution.stages {
        lines.push(format!(
            "[{}] {} queries, {} pool names -> {} linked, {} unresolved, {} pool names consumed",
            stage.label,
            stage.queries_in,
            stage.pool_in,
            stage.linked_queries(),
            stage.unresolved.len(),
            stage.consumed.len(),
        ));
        lines.extend(
            stage
                .known_without_record
                .iter()
                .map(|query| format!("  known name without record: {}", query)),
        );
        if stage.kind == StageKind::Fuzzy {
            lines.extend(stage.decisions.iter().map(|decision| {
                let best = decision.best_match.as_deref().unwrap_or("-");
                let score = decision
                    .best_score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "  {} -> {} ({}) {}",
                    decision.query,
                    best,
                    score,
                    decision.outcome.as_str()
                )
            }));
        }
    }

    let summary = resolution.summary();
    lines.push(String::new());
    lines.push(format!(
        "{} queries: {} exact, {} fuzzy, {} unresolved; {} pool names left",
        summary.queries, summary.exact, summary.fuzzy, summary.unresolved, summary.pool_remaining
    ));

    let export = &report.export;
    lines.push(format!(
        "export: {} added, {} already stored{}",
        export.added,
        export.skipped,
        if export.dry_run { " (dry run)" } else { "" }
    ));

    if !resolution.unresolved.is_empty() {
        lines.push(String::new());
        lines.push("unresolved:".to_string());
        lines.extend(resolution.unresolved.iter().map(|query| format!("  {}", query)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Score breakdown for the `score` command
pub fn render_score(a: &str, b: &str, score: &MatchScore) -> String {
    format!(
        "{} <-> {}\n  composite     {:>6.2}\n  surname       {:>6.2}\n  token overlap {:>6.2}\n  fuzzy         {:>6.2}\n",
        a, b, score.composite, score.surname_match, score.token_overlap, score.fuzzy
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterlink_core::{ExportSummary, Pool, RawRecord, Resolver, RosterConfig, Scorer};
    use serde_json::json;

    fn report() -> RunReport {
        let records: Vec<RawRecord> = vec![
            json!({"id": 1, "display_name": "Hee-chan Hwang"}),
            json!({"id": 2, "display_name": "Ben Doak"}),
        ]
        .into_iter()
        .filter_map(RawRecord::from_value)
        .collect();
        let pool = Pool::from_records(&records, &["display_name"]);
        let resolution = Resolver::new(&RosterConfig::default())
            .unwrap()
            .resolve(&["Ben Doak", "Hwang Hee-Chan", "John Doe"], &pool, &records);
        RunReport {
            resolution,
            links: Vec::new(),
            export: ExportSummary {
                added: 2,
                skipped: 0,
                dry_run: true,
            },
        }
    }

    #[test]
    fn test_render_run() {
        let text = render_run(&report());
        assert!(text.contains("[exact:display_name] 3 queries"));
        assert!(text.contains("Hwang Hee-Chan -> Hee-chan Hwang (100.00) linked"));
        assert!(text.contains("3 queries: 1 exact, 1 fuzzy, 1 unresolved"));
        assert!(text.contains("(dry run)"));
        assert!(text.ends_with("\nunresolved:\n  John Doe\n"));
    }

    #[test]
    fn test_render_run_without_unresolved() {
        let mut report = report();
        report.resolution.unresolved.clear();
        let text = render_run(&report);
        assert!(!text.contains("unresolved:"));
        assert!(text.ends_with("(dry run)\n"));
    }

    #[test]
    fn test_render_score() {
        let score = Scorer::default().score("Ben Gannon-Doak", "Ben Doak");
        let text = render_score("Ben Gannon-Doak", "Ben Doak", &score);
        assert!(text.contains("composite      93.00"));
    }
}
