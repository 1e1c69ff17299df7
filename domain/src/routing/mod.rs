//! Keyword-based query routing.
//!
//! Routing is a pure function over (query text, capability table): score
//! each routable agent by case-insensitive keyword hits, pick the winner,
//! and fan out when the query clearly spans domains. Identical input always
//! produces the identical ordered agent list; ambiguity resolves to the
//! supervisor instead of an error.

use crate::agent::name::AgentName;

/// Minimum keyword hits for an agent to be considered at all.
pub const SCORE_THRESHOLD: usize = 1;

/// Maximum number of agents a single query fans out to.
pub const MAX_FAN_OUT: usize = 3;

/// Capability keywords per routable agent.
///
/// These mirror the domains the agents advertise: stock and ordering for
/// inventory, workflow and layout for operations, Six Sigma vocabulary for
/// quality, and calculation terms for math.
pub fn capability_keywords(agent: AgentName) -> &'static [&'static str] {
    match agent {
        AgentName::Inventory => &[
            "inventory",
            "stock",
            "sku",
            "reorder",
            "replenish",
            "order quantity",
            "eoq",
            "safety stock",
            "holding cost",
            "abc",
            "storage",
            "warehouse space",
        ],
        AgentName::Operations => &[
            "operations",
            "workflow",
            "process",
            "layout",
            "picking",
            "packing",
            "shipping",
            "receiving",
            "throughput",
            "takt",
            "lead time",
            "labor",
            "equipment",
            "bottleneck",
        ],
        AgentName::Quality => &[
            "quality",
            "defect",
            "sigma",
            "dpmo",
            "pareto",
            "capability",
            "cpk",
            "control limit",
            "variation",
            "yield",
            "six sigma",
            "dmaic",
        ],
        AgentName::Math => &[
            "calculate",
            "compute",
            "math",
            "formula",
            "equation",
            "average",
            "percentage",
            "optimize",
            "how many",
            "statistics",
        ],
        // The supervisor is the fallback, not a routing target.
        AgentName::Supervisor => &[],
    }
}

/// Count case-insensitive keyword hits in the query. Pure so routing stays
/// unit-testable without any agent in scope.
pub fn score(query_text: &str, keywords: &[&str]) -> usize {
    let lowered = query_text.to_lowercase();
    keywords.iter().filter(|k| lowered.contains(*k)).count()
}

/// Route a query to an ordered list of agents.
///
/// Policy: agents scoring at least [`SCORE_THRESHOLD`] are candidates. A
/// single candidate handles the query alone; several candidates mean a
/// multi-domain query and all of them (capped at [`MAX_FAN_OUT`]) are
/// selected, ordered by score descending with ties broken by the fixed
/// precedence order. No candidates at all falls back to the supervisor.
pub fn route(query_text: &str) -> Vec<AgentName> {
    let mut scored: Vec<(AgentName, usize)> = AgentName::routable()
        .into_iter()
        .map(|agent| (agent, score(query_text, capability_keywords(agent))))
        .filter(|(_, s)| *s >= SCORE_THRESHOLD)
        .collect();

    if scored.is_empty() {
        return vec![AgentName::Supervisor];
    }

    scored.sort_by(|(a, sa), (b, sb)| sb.cmp(sa).then(a.precedence().cmp(&b.precedence())));

    if scored.len() == 1 {
        return vec![scored[0].0];
    }

    scored
        .into_iter()
        .take(MAX_FAN_OUT)
        .map(|(agent, _)| agent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_case_insensitive() {
        assert_eq!(score("What is our EOQ?", &["eoq"]), 1);
        assert_eq!(score("STOCK levels and stock counts", &["stock"]), 1);
    }

    #[test]
    fn test_single_domain_routes_to_one_agent() {
        assert_eq!(
            route("When should we reorder this SKU?"),
            vec![AgentName::Inventory]
        );
        assert_eq!(
            route("Show me the picking workflow"),
            vec![AgentName::Operations]
        );
    }

    #[test]
    fn test_multi_domain_fans_out() {
        let agents = route("How do defect rates affect our safety stock levels?");
        assert!(agents.len() >= 2);
        assert!(agents.contains(&AgentName::Inventory));
        assert!(agents.contains(&AgentName::Quality));
    }

    #[test]
    fn test_fan_out_ordered_by_score_then_precedence() {
        // Two quality hits, one inventory hit: quality first
        let agents = route("pareto analysis of defect causes in stock");
        assert_eq!(agents[0], AgentName::Quality);
        assert!(agents.contains(&AgentName::Inventory));
    }

    #[test]
    fn test_tie_broken_by_precedence() {
        // One hit each for inventory and operations
        let agents = route("stock in the shipping area");
        assert_eq!(agents, vec![AgentName::Inventory, AgentName::Operations]);
    }

    #[test]
    fn test_no_match_falls_back_to_supervisor() {
        assert_eq!(route("hello there"), vec![AgentName::Supervisor]);
    }

    #[test]
    fn test_routing_is_deterministic() {
        let q = "calculate the reorder point for defective units";
        assert_eq!(route(q), route(q));
    }

    #[test]
    fn test_fan_out_capped() {
        let q = "calculate stock picking defect statistics for the warehouse workflow";
        assert!(route(q).len() <= MAX_FAN_OUT);
    }
}
