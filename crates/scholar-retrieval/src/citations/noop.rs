use super::CitationCounts;

pub(super) fn all_unknown(fqns: &[String]) -> CitationCounts {
    fqns.iter().map(|fqn| (fqn.clone(), None)).collect()
}
