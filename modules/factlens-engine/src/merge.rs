//! Source deduplication and merge.
//!
//! Dedup key is the normalized URL (see `factlens_common::normalize`).
//! Walk order is fixed — findings in check order, sources in given
//! order — so identical inputs always produce identical output.

use std::collections::HashSet;

use factlens_common::normalize::normalize_source_url;
use factlens_common::{AspectFinding, SourceEvidence};

/// Deduplicated sources across all findings, first-seen snippet retained.
pub fn merge_sources(findings: &[AspectFinding]) -> Vec<SourceEvidence> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    append_unseen(
        findings.iter().flat_map(|f| f.sources.iter()),
        &mut seen,
        &mut merged,
    );
    merged
}

/// Final report source list: sources the judge echoed back keep their
/// position at the front, then any finding sources not already present.
pub fn merge_report_sources(
    report_sources: &[SourceEvidence],
    findings: &[AspectFinding],
) -> Vec<SourceEvidence> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    append_unseen(report_sources.iter(), &mut seen, &mut merged);
    append_unseen(
        findings.iter().flat_map(|f| f.sources.iter()),
        &mut seen,
        &mut merged,
    );
    merged
}

fn append_unseen<'a>(
    sources: impl Iterator<Item = &'a SourceEvidence>,
    seen: &mut HashSet<String>,
    merged: &mut Vec<SourceEvidence>,
) {
    for source in sources {
        let key = normalize_source_url(&source.url);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            merged.push(source.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factlens_common::EvidenceSignal;

    fn source(url: &str, snippet: &str) -> SourceEvidence {
        SourceEvidence {
            title: "t".to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
            publisher: None,
            published_at: None,
        }
    }

    fn finding(sources: Vec<SourceEvidence>) -> AspectFinding {
        AspectFinding {
            aspect_id: "a".to_string(),
            question: "q".to_string(),
            signal: EvidenceSignal::Supports,
            summary: "s".to_string(),
            confidence: 0.9,
            sources,
            caveats: vec![],
        }
    }

    #[test]
    fn url_variants_collapse_to_first_seen_snippet() {
        let findings = vec![
            finding(vec![source("http://x.com/a", "first")]),
            finding(vec![
                source("http://x.com/a/", "second"),
                source("HTTP://X.COM/a", "third"),
            ]),
        ];
        let merged = merge_sources(&findings);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].snippet, "first");
    }

    #[test]
    fn tracking_params_do_not_defeat_dedup() {
        let findings = vec![finding(vec![
            source("https://x.com/a?utm_source=tw", "first"),
            source("https://x.com/a", "second"),
        ])];
        assert_eq!(merge_sources(&findings).len(), 1);
    }

    #[test]
    fn merge_is_idempotent() {
        let findings = vec![
            finding(vec![source("https://x.com/a", "a"), source("https://y.com/b", "b")]),
            finding(vec![source("https://x.com/a", "dup")]),
        ];
        let once = merge_sources(&findings);
        let again = merge_sources(&[finding(once.clone())]);
        let urls_once: Vec<&str> = once.iter().map(|s| s.url.as_str()).collect();
        let urls_again: Vec<&str> = again.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls_once, urls_again);
    }

    #[test]
    fn empty_urls_are_skipped() {
        let findings = vec![finding(vec![source("  ", "blank"), source("https://x.com", "ok")])];
        let merged = merge_sources(&findings);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].snippet, "ok");
    }

    #[test]
    fn judge_echoed_sources_come_first() {
        let echoed = vec![source("https://judge.example/1", "from judge")];
        let findings = vec![finding(vec![
            source("https://judge.example/1/", "dup of judge"),
            source("https://finding.example/2", "from finding"),
        ])];
        let merged = merge_report_sources(&echoed, &findings);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].snippet, "from judge");
        assert_eq!(merged[1].snippet, "from finding");
    }
}
