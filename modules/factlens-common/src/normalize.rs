//! Plan and URL normalization.
//!
//! Planner output arrives from an LLM and is repaired, never rejected:
//! every function here is total. The URL canonicalization defines what
//! "duplicate source" means for the whole pipeline.

use url::Url;

use crate::types::{InvestigationPlan, VerificationCheck};

/// Coerce a raw aspect id into a lowercase `[a-z0-9_]` token.
/// Empty or fully-invalid input falls back to `check_<n>`.
pub fn sanitize_aspect_id(raw: &str, fallback_index: usize) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    let mut last_was_underscore = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            cleaned.push(ch);
            last_was_underscore = false;
        } else if !last_was_underscore {
            cleaned.push('_');
            last_was_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        format!("check_{fallback_index}")
    } else {
        trimmed.to_string()
    }
}

/// Trim, drop empties, case-insensitively dedup (first spelling wins),
/// and cap at `max(1, max_queries)`. Fallback candidates are appended
/// after the primary queries so they only fill remaining slots.
pub fn normalize_query_list(
    queries: &[String],
    fallback: &[String],
    max_queries: usize,
) -> Vec<String> {
    let limit = max_queries.max(1);
    let mut normalized = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for candidate in queries.iter().chain(fallback.iter()) {
        let query = candidate.trim();
        if query.is_empty() {
            continue;
        }
        if !seen.insert(query.to_lowercase()) {
            continue;
        }
        normalized.push(query.to_string());
        if normalized.len() >= limit {
            break;
        }
    }

    normalized
}

/// Repair a planner draft into a usable plan: drop checks with empty
/// questions, slugify and dedup aspect ids, normalize query lists with
/// the question and claim as fallbacks, and truncate to `max_checks`
/// keeping the prefix (plan order is priority order). A draft with no
/// usable checks yields a single direct check on the claim itself, so
/// the pipeline always has at least one check to research.
pub fn normalize_plan(
    claim: &str,
    draft: InvestigationPlan,
    max_checks: usize,
    max_search_queries_per_check: usize,
) -> InvestigationPlan {
    let limit = max_checks.max(1);
    let mut checks: Vec<VerificationCheck> = Vec::new();
    let mut used_ids = std::collections::HashSet::new();

    for (index, check) in draft.checks.into_iter().enumerate() {
        let question = check.question.trim().to_string();
        if question.is_empty() {
            continue;
        }

        let base_id = sanitize_aspect_id(&check.aspect_id, index + 1);
        let mut aspect_id = base_id.clone();
        let mut suffix = 2;
        while used_ids.contains(&aspect_id) {
            aspect_id = format!("{base_id}_{suffix}");
            suffix += 1;
        }
        used_ids.insert(aspect_id.clone());

        let search_queries = normalize_query_list(
            &check.search_queries,
            &[question.clone(), claim.to_string()],
            max_search_queries_per_check,
        );

        checks.push(VerificationCheck {
            aspect_id,
            question,
            rationale: check.rationale.trim().to_string(),
            search_queries,
        });

        if checks.len() >= limit {
            break;
        }
    }

    if checks.is_empty() {
        checks.push(VerificationCheck {
            aspect_id: "claim_direct_check".to_string(),
            question: format!("Is this claim accurate: {claim}"),
            rationale: "Fallback direct verification when planning produced no usable checks."
                .to_string(),
            search_queries: normalize_query_list(
                &[claim.to_string()],
                &[],
                max_search_queries_per_check,
            ),
        });
    }

    InvestigationPlan {
        claim: claim.to_string(),
        checks,
        assumptions: draft.assumptions,
    }
}

/// Canonicalize a source URL for dedup: lowercase scheme and host,
/// strip the trailing slash, drop `utm_*` tracking params and the
/// fragment. Unparseable input falls back to the lowercased trimmed
/// string; empty input stays empty (callers skip empty keys).
pub fn normalize_source_url(url: &str) -> String {
    let stripped = url.trim();
    if stripped.is_empty() {
        return String::new();
    }

    let mut parsed = match Url::parse(stripped) {
        Ok(parsed) => parsed,
        Err(_) => return stripped.to_lowercase(),
    };

    parsed.set_fragment(None);

    let kept_pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !key.to_lowercase().starts_with("utm_"))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept_pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept_pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);

    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(aspect_id: &str, question: &str, queries: &[&str]) -> VerificationCheck {
        VerificationCheck {
            aspect_id: aspect_id.to_string(),
            question: question.to_string(),
            rationale: "because".to_string(),
            search_queries: queries.iter().map(|q| q.to_string()).collect(),
        }
    }

    fn draft(claim: &str, checks: Vec<VerificationCheck>) -> InvestigationPlan {
        InvestigationPlan {
            claim: claim.to_string(),
            checks,
            assumptions: vec![],
        }
    }

    #[test]
    fn sanitize_slugifies_and_falls_back() {
        assert_eq!(sanitize_aspect_id("  Timeline #1 ", 3), "timeline_1");
        assert_eq!(sanitize_aspect_id("!!!", 3), "check_3");
        assert_eq!(sanitize_aspect_id("", 7), "check_7");
    }

    #[test]
    fn query_list_dedups_case_insensitively_and_caps() {
        let queries = vec![
            "Eiffel Tower 1889".to_string(),
            "  ".to_string(),
            "eiffel tower 1889".to_string(),
        ];
        let fallback = vec!["World's Fair".to_string()];
        let normalized = normalize_query_list(&queries, &fallback, 5);
        assert_eq!(normalized, vec!["Eiffel Tower 1889", "World's Fair"]);

        let capped = normalize_query_list(&queries, &fallback, 0);
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn plan_dedups_colliding_aspect_ids() {
        let plan = normalize_plan(
            "claim",
            draft(
                "claim",
                vec![
                    check("timeline", "q1", &[]),
                    check("Timeline!", "q2", &[]),
                    check("timeline", "q3", &[]),
                ],
            ),
            4,
            5,
        );
        let ids: Vec<&str> = plan.checks.iter().map(|c| c.aspect_id.as_str()).collect();
        assert_eq!(ids, vec!["timeline", "timeline_2", "timeline_3"]);
    }

    #[test]
    fn plan_truncates_to_max_checks_keeping_prefix() {
        let plan = normalize_plan(
            "claim",
            draft(
                "claim",
                vec![
                    check("a", "q1", &[]),
                    check("b", "q2", &[]),
                    check("c", "q3", &[]),
                ],
            ),
            2,
            5,
        );
        assert_eq!(plan.checks.len(), 2);
        assert_eq!(plan.checks[0].aspect_id, "a");
        assert_eq!(plan.checks[1].aspect_id, "b");
    }

    #[test]
    fn empty_draft_synthesizes_one_direct_check() {
        let plan = normalize_plan("The moon is made of cheese", draft("", vec![]), 0, 5);
        assert_eq!(plan.checks.len(), 1);
        assert_eq!(plan.checks[0].aspect_id, "claim_direct_check");
        assert_eq!(
            plan.checks[0].search_queries,
            vec!["The moon is made of cheese"]
        );
    }

    #[test]
    fn empty_questions_are_dropped() {
        let plan = normalize_plan(
            "claim",
            draft(
                "claim",
                vec![check("a", "  ", &[]), check("b", "real question", &[])],
            ),
            4,
            5,
        );
        assert_eq!(plan.checks.len(), 1);
        assert_eq!(plan.checks[0].aspect_id, "b");
    }

    #[test]
    fn queries_fall_back_to_question_and_claim() {
        let plan = normalize_plan("the claim", draft("the claim", vec![check("a", "q?", &[])]), 4, 5);
        assert_eq!(plan.checks[0].search_queries, vec!["q?", "the claim"]);
    }

    #[test]
    fn url_normalization_collapses_variants() {
        let a = normalize_source_url("http://x.com/a");
        let b = normalize_source_url("http://x.com/a/");
        let c = normalize_source_url("HTTP://X.COM/a");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn url_normalization_strips_tracking_and_fragment() {
        let normalized =
            normalize_source_url("https://news.example.com/story?utm_source=tw&id=7#top");
        assert_eq!(normalized, "https://news.example.com/story?id=7");
    }

    #[test]
    fn unparseable_url_falls_back_to_lowercase() {
        assert_eq!(normalize_source_url("Not A Url"), "not a url");
        assert_eq!(normalize_source_url("   "), "");
    }
}
