//! Set difference over relationship records

/// Result of comparing a desired and a current collection.
///
/// `unchanged` holds the desired-side copies so callers keep what the
/// user declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<R> {
    pub to_add: Vec<R>,
    pub to_remove: Vec<R>,
    pub unchanged: Vec<R>,
}

impl<R> Partition<R> {
    /// Whether any remote call is needed
    pub fn has_changes(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty()
    }
}

impl<R> Default for Partition<R> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

/// Split `desired` and `current` by equality, preserving input order.
///
/// Equality is whatever `R: PartialEq` says; relationship records
/// exclude their owner id from it.
pub fn partition<R: PartialEq + Clone>(desired: &[R], current: &[R]) -> Partition<R> {
    let mut result = Partition::default();

    for record in desired {
        if current.contains(record) {
            result.unchanged.push(record.clone());
        } else {
            result.to_add.push(record.clone());
        }
    }

    result.to_remove = current
        .iter()
        .filter(|record| !desired.contains(record))
        .cloned()
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Edge {
        owner: Option<i64>,
        gp: &'static str,
        role: &'static str,
    }

    impl PartialEq for Edge {
        fn eq(&self, other: &Self) -> bool {
            self.gp == other.gp && self.role == other.role
        }
    }

    fn edge(gp: &'static str, role: &'static str) -> Edge {
        Edge {
            owner: None,
            gp,
            role,
        }
    }

    fn gps(edges: &[Edge]) -> Vec<&'static str> {
        edges.iter().map(|e| e.gp).collect()
    }

    #[test]
    fn test_partition_inject_scenario() {
        let desired = [edge("1", "inject"), edge("3", "inject")];
        let current = [edge("2", "inject"), edge("3", "inject")];

        let p = partition(&desired, &current);
        assert_eq!(gps(&p.to_add), ["1"]);
        assert_eq!(gps(&p.to_remove), ["2"]);
        assert_eq!(gps(&p.unchanged), ["3"]);
        assert!(p.has_changes());
    }

    #[test]
    fn test_partition_ignores_owner() {
        let mut desired = edge("1", "inject");
        desired.owner = Some(7);
        let p = partition(&[desired], &[edge("1", "inject")]);
        assert!(p.to_add.is_empty());
        assert!(p.to_remove.is_empty());
        assert_eq!(p.unchanged[0].owner, Some(7));
        assert!(!p.has_changes());
    }

    #[test]
    fn test_partition_role_change_is_remove_and_add() {
        let p = partition(&[edge("1", "checkout")], &[edge("1", "inject")]);
        assert_eq!(p.to_add[0].role, "checkout");
        assert_eq!(p.to_remove[0].role, "inject");
        assert!(p.unchanged.is_empty());
    }

    #[test]
    fn test_partition_empty_sides() {
        let p = partition(&[edge("1", "inject")], &[]);
        assert_eq!(gps(&p.to_add), ["1"]);

        let p = partition(&[], &[edge("1", "inject")]);
        assert_eq!(gps(&p.to_remove), ["1"]);

        let p: Partition<Edge> = partition(&[], &[]);
        assert!(!p.has_changes());
    }

    #[test]
    fn test_partition_completeness() {
        let pool = [
            edge("1", "inject"),
            edge("2", "inject"),
            edge("3", "checkout"),
            edge("4", "inject"),
            edge("5", "manage"),
        ];

        // every desired/current combination over the pool
        for desired_mask in 0u32..32 {
            for current_mask in 0u32..32 {
                let pick = |mask: u32| -> Vec<Edge> {
                    pool.iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, e)| e.clone())
                        .collect()
                };
                let desired = pick(desired_mask);
                let current = pick(current_mask);
                let p = partition(&desired, &current);

                for e in &p.to_add {
                    assert!(!p.unchanged.contains(e));
                    assert!(!p.to_remove.contains(e));
                }
                for e in &p.to_remove {
                    assert!(!p.unchanged.contains(e));
                }

                let mut added_back: Vec<_> = gps(&p.unchanged);
                added_back.extend(gps(&p.to_add));
                added_back.sort_unstable();
                assert_eq!(added_back, gps(&desired));

                let mut removed_back: Vec<_> = gps(&p.unchanged);
                removed_back.extend(gps(&p.to_remove));
                removed_back.sort_unstable();
                assert_eq!(removed_back, gps(&current));
            }
        }
    }
}
