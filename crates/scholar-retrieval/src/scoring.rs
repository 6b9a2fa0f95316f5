//! Composite ranking: cross-encoder score boosted by citation count.

use scholar_core::PaperMetadata;

use crate::citations::CitationCounts;

/// One ranked result.
#[derive(Debug, Clone)]
pub struct ScoredPaper {
    pub paper: PaperMetadata,
    /// `None` when the citation provider does not know the paper.
    pub citations: Option<u64>,
    pub score: f64,
}

/// Composite score. An unknown or zero citation count leaves the
/// semantic score untouched; the boost grows with the decimal magnitude
/// of the count.
pub fn composite_score(semantic: f32, citations: Option<u64>, boost_weight: f64) -> f64 {
    let count = citations.unwrap_or(0);
    let citation_factor = ((count + 1) as f64).log10();
    f64::from(semantic) * (1.0 + boost_weight * citation_factor)
}

/// Score, sort descending, cut to `limit`. The sort is stable: papers
/// with equal composite scores keep their hydration order.
pub fn rank(
    papers: Vec<PaperMetadata>,
    semantic_scores: &[f32],
    citation_counts: &CitationCounts,
    boost_weight: f64,
    limit: usize,
) -> Vec<ScoredPaper> {
    let mut scored: Vec<ScoredPaper> = papers
        .into_iter()
        .zip(semantic_scores)
        .map(|(paper, &semantic)| {
            let citations = citation_counts.get(&paper.fqn()).copied().flatten();
            ScoredPaper {
                score: composite_score(semantic, citations, boost_weight),
                citations,
                paper,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;

    fn paper(id: &str) -> PaperMetadata {
        PaperMetadata {
            source: "arxiv".into(),
            id: id.into(),
            authors: "A".into(),
            title: format!("Paper {id}"),
            doi: None,
            license: None,
            abstract_text: "abs".into(),
            categories: BTreeSet::new(),
            journal_ref: None,
            updated_at: Utc::now(),
            versions: vec![],
        }
    }

    #[test]
    fn unknown_and_zero_citations_leave_the_semantic_score() {
        assert_eq!(composite_score(0.9, None, 0.1), f64::from(0.9_f32));
        assert_eq!(composite_score(0.9, Some(0), 0.1), f64::from(0.9_f32));
    }

    #[test]
    fn boost_is_monotone_in_citation_count() {
        let none = composite_score(0.5, Some(0), 0.1);
        let few = composite_score(0.5, Some(9), 0.1);
        let many = composite_score(0.5, Some(999), 0.1);
        assert!(none < few && few < many);
    }

    #[test]
    fn boost_can_reorder_close_semantic_scores() {
        let counts: CitationCounts = [
            ("arxiv/1".to_string(), Some(0)),
            ("arxiv/2".to_string(), Some(100)),
            ("arxiv/3".to_string(), None),
        ]
        .into();

        let ranked = rank(
            vec![paper("1"), paper("2"), paper("3")],
            &[0.9, 0.8, 0.95],
            &counts,
            0.1,
            10,
        );

        // 0.8 * (1 + 0.1*log10(101)) ≈ 0.961 beats both raw scores.
        let ids: Vec<&str> = ranked.iter().map(|s| s.paper.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert!(ranked[0].score > 0.96 && ranked[0].score < 0.962);
        assert_eq!(ranked[1].citations, None);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let counts = CitationCounts::new();
        let ranked = rank(
            vec![paper("first"), paper("second")],
            &[0.5, 0.5],
            &counts,
            0.1,
            10,
        );
        assert_eq!(ranked[0].paper.id, "first");
        assert_eq!(ranked[1].paper.id, "second");
    }

    #[test]
    fn results_are_cut_to_the_limit() {
        let counts = CitationCounts::new();
        let ranked = rank(
            vec![paper("1"), paper("2"), paper("3")],
            &[0.3, 0.2, 0.1],
            &counts,
            0.1,
            2,
        );
        assert_eq!(ranked.len(), 2);
    }
}
