use std::collections::HashSet;

use crate::record::RID;

/// Intersects RID lists pairwise, keeping the first list's order.
///
/// Each step builds a membership set from the next list and filters the
/// running result through it, so the cost of intersecting lists of lengths
/// m and n is O(m + n) rather than the quadratic scan-and-remove approach.
pub fn intersect_all(mut lists: Vec<Vec<RID>>) -> Vec<RID> {
    if lists.is_empty() {
        return Vec::new();
    }
    let mut result = lists.remove(0);
    for list in lists {
        let members: HashSet<RID> = list.into_iter().collect();
        result.retain(|rid| members.contains(rid));
        if result.is_empty() {
            break;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(block: i32, slot: usize) -> RID {
        RID::new(block, slot)
    }

    #[test]
    fn test_intersect_keeps_first_list_order() {
        let a = vec![rid(0, 3), rid(1, 0), rid(0, 1), rid(2, 5)];
        let b = vec![rid(2, 5), rid(0, 1), rid(9, 9), rid(0, 3)];
        let result = intersect_all(vec![a, b]);
        assert_eq!(result, vec![rid(0, 3), rid(0, 1), rid(2, 5)]);
    }

    #[test]
    fn test_intersect_three_lists() {
        let a = vec![rid(0, 0), rid(0, 1), rid(0, 2)];
        let b = vec![rid(0, 1), rid(0, 2), rid(0, 3)];
        let c = vec![rid(0, 2), rid(0, 1)];
        let result = intersect_all(vec![a, b, c]);
        assert_eq!(result, vec![rid(0, 1), rid(0, 2)]);
    }

    #[test]
    fn test_intersect_disjoint_lists_is_empty() {
        let a = vec![rid(0, 0), rid(0, 1)];
        let b = vec![rid(1, 0), rid(1, 1)];
        assert!(intersect_all(vec![a, b]).is_empty());
    }

    #[test]
    fn test_intersect_no_lists_is_empty() {
        assert!(intersect_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_intersect_single_list_is_identity() {
        let a = vec![rid(0, 2), rid(0, 0)];
        assert_eq!(intersect_all(vec![a.clone()]), a);
    }

    #[test]
    fn test_duplicates_in_later_lists_do_not_duplicate_output() {
        let a = vec![rid(0, 0), rid(0, 1)];
        let b = vec![rid(0, 0), rid(0, 0), rid(0, 0)];
        assert_eq!(intersect_all(vec![a, b]), vec![rid(0, 0)]);
    }
}
