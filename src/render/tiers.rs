//! Degree-based rendering tiers.
//!
//! Every graph node is assigned one of five rendering treatments based on
//! its degree. Tiers have fixed capacity budgets; whole degree groups are
//! placed together so that two nodes of equal degree always render the
//! same way, even when that pushes a tier past its nominal capacity.

use std::collections::HashMap;

/// Rendering treatment for a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Full cube thumbnail.
    Cube,
    /// Circle with the node id as label.
    CircleWithLabel,
    /// Bare label, no shape.
    LabelOnly,
    /// Plain filled circle.
    Circle,
    /// Suppressed to a point.
    Hidden,
}

/// The budgeted tiers in priority order; everything past the last budget
/// falls into [`Tier::Hidden`].
pub const TIER_PRIORITY: [Tier; 4] = [
    Tier::Cube,
    Tier::CircleWithLabel,
    Tier::LabelOnly,
    Tier::Circle,
];

/// Result of categorization: tier per degree plus the node lists.
#[derive(Debug, Clone)]
pub struct TierAssignment {
    tier_by_degree: HashMap<usize, Tier>,
    nodes_by_degree: HashMap<usize, Vec<u32>>,
}

impl TierAssignment {
    pub fn tier_of(&self, degree: usize) -> Tier {
        self.tier_by_degree
            .get(&degree)
            .copied()
            .unwrap_or(Tier::Hidden)
    }

    /// All degrees present, highest first.
    pub fn degrees_desc(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = self.nodes_by_degree.keys().copied().collect();
        degrees.sort_unstable_by(|a, b| b.cmp(a));
        degrees
    }

    pub fn nodes_with_degree(&self, degree: usize) -> &[u32] {
        self.nodes_by_degree
            .get(&degree)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All nodes in one tier, ascending by id.
    pub fn nodes_in_tier(&self, tier: Tier) -> Vec<u32> {
        let mut nodes: Vec<u32> = self
            .nodes_by_degree
            .iter()
            .filter(|(degree, _)| self.tier_of(**degree) == tier)
            .flat_map(|(_, nodes)| nodes.iter().copied())
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Rank of each circle-tier degree, 0 for the highest degree. Drives
    /// the geometrically shrinking circle sizes.
    pub fn circle_ranks(&self) -> HashMap<usize, usize> {
        let mut degrees: Vec<usize> = self
            .tier_by_degree
            .iter()
            .filter(|(_, tier)| **tier == Tier::Circle)
            .map(|(degree, _)| *degree)
            .collect();
        degrees.sort_unstable_by(|a, b| b.cmp(a));
        degrees
            .into_iter()
            .enumerate()
            .map(|(rank, degree)| (degree, rank))
            .collect()
    }
}

/// Assign every node to a tier.
///
/// Degree groups are processed from the highest degree down; each whole
/// group goes to the first tier whose cumulative capacity threshold has
/// not yet been strictly exceeded by the nodes placed so far. A capacity
/// boundary therefore never splits a degree group.
pub fn categorize(node_degrees: &[(u32, usize)], budgets: &[(Tier, usize)]) -> TierAssignment {
    let mut nodes_by_degree: HashMap<usize, Vec<u32>> = HashMap::new();
    for &(node, degree) in node_degrees {
        nodes_by_degree.entry(degree).or_default().push(node);
    }
    for nodes in nodes_by_degree.values_mut() {
        nodes.sort_unstable();
    }

    let mut thresholds = Vec::with_capacity(budgets.len());
    let mut cumulative = 0usize;
    for &(_, capacity) in budgets {
        cumulative += capacity;
        thresholds.push(cumulative);
    }

    let mut degrees: Vec<usize> = nodes_by_degree.keys().copied().collect();
    degrees.sort_unstable_by(|a, b| b.cmp(a));

    let mut tier_by_degree = HashMap::new();
    let mut placed = 0usize;
    for degree in degrees {
        placed += nodes_by_degree[&degree].len();
        let rank = thresholds.iter().filter(|&&t| t < placed).count();
        let tier = budgets.get(rank).map(|&(t, _)| t).unwrap_or(Tier::Hidden);
        tier_by_degree.insert(degree, tier);
    }

    TierAssignment {
        tier_by_degree,
        nodes_by_degree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budgets(cube: usize, cwl: usize, label: usize, circle: usize) -> Vec<(Tier, usize)> {
        vec![
            (Tier::Cube, cube),
            (Tier::CircleWithLabel, cwl),
            (Tier::LabelOnly, label),
            (Tier::Circle, circle),
        ]
    }

    /// Nodes 0..n all with the given degree.
    fn group(start: u32, count: usize, degree: usize) -> Vec<(u32, usize)> {
        (0..count as u32).map(|k| (start + k, degree)).collect()
    }

    #[test]
    fn capacity_boundaries_never_split_a_degree_group() {
        // The 3-node degree-8 group exceeds the cube budget of 2, so the
        // whole group overflows into the next tier together.
        let mut nodes = group(0, 3, 8);
        nodes.extend(group(3, 4, 2));
        let assignment = categorize(&nodes, &budgets(2, 10, 0, 10));
        assert_eq!(assignment.tier_of(8), Tier::CircleWithLabel);
        assert_eq!(assignment.tier_of(2), Tier::CircleWithLabel);
        assert_eq!(assignment.nodes_in_tier(Tier::Cube), Vec::<u32>::new());
    }

    #[test]
    fn higher_degree_never_ranks_below_lower() {
        let mut nodes = Vec::new();
        for (i, degree) in [9, 7, 5, 4, 3, 2, 1].iter().enumerate() {
            nodes.extend(group(i as u32 * 100, 4, *degree));
        }
        let assignment = categorize(&nodes, &budgets(4, 4, 4, 4));
        let rank = |tier: Tier| match tier {
            Tier::Cube => 0,
            Tier::CircleWithLabel => 1,
            Tier::LabelOnly => 2,
            Tier::Circle => 3,
            Tier::Hidden => 4,
        };
        let degrees = assignment.degrees_desc();
        for pair in degrees.windows(2) {
            assert!(rank(assignment.tier_of(pair[0])) <= rank(assignment.tier_of(pair[1])));
        }
        // 7 groups of 4 against 4 budgets of 4: the tail is hidden.
        assert_eq!(assignment.tier_of(1), Tier::Hidden);
        assert_eq!(assignment.tier_of(9), Tier::Cube);
    }

    #[test]
    fn exact_fit_fills_the_tier() {
        let mut nodes = group(0, 10, 6);
        nodes.extend(group(10, 5, 3));
        let assignment = categorize(&nodes, &budgets(10, 50, 0, 2500));
        assert_eq!(assignment.tier_of(6), Tier::Cube);
        assert_eq!(assignment.tier_of(3), Tier::CircleWithLabel);
    }

    #[test]
    fn zero_capacity_tier_is_skipped() {
        // label_only has capacity 0, so overflow from circle_with_label
        // lands directly in circle.
        let mut nodes = group(0, 1, 9);
        nodes.extend(group(1, 59, 5));
        nodes.extend(group(100, 3, 2));
        let assignment = categorize(&nodes, &budgets(10, 50, 0, 2500));
        assert_eq!(assignment.tier_of(9), Tier::Cube);
        assert_eq!(assignment.tier_of(5), Tier::CircleWithLabel);
        assert_eq!(assignment.tier_of(2), Tier::Circle);
    }

    #[test]
    fn circle_ranks_follow_descending_degree() {
        let mut nodes = group(0, 15, 9);
        nodes.extend(group(100, 5, 4));
        nodes.extend(group(200, 5, 3));
        nodes.extend(group(300, 5, 2));
        let assignment = categorize(&nodes, &budgets(1, 2, 0, 100));
        assert_eq!(assignment.tier_of(9), Tier::Circle);
        let ranks = assignment.circle_ranks();
        assert_eq!(ranks[&9], 0);
        assert_eq!(ranks[&4], 1);
        assert_eq!(ranks[&3], 2);
        assert_eq!(ranks[&2], 3);
    }

    #[test]
    fn nodes_in_tier_are_sorted() {
        let nodes = vec![(5u32, 2usize), (1, 2), (9, 2), (3, 7)];
        let assignment = categorize(&nodes, &budgets(1, 10, 0, 10));
        assert_eq!(assignment.nodes_in_tier(Tier::Cube), vec![3]);
        assert_eq!(assignment.nodes_in_tier(Tier::CircleWithLabel), vec![1, 5, 9]);
    }
}
