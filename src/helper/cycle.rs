pub fn prev(idx: Option<usize>, all: usize) -> Option<usize> {
    if all == 0 {
        return None;
    }
    if let Some(idx) = idx {
        idx.checked_sub(1).or(Some(all - 1))
    } else {
        Some(all - 1)
    }
}

pub fn next(idx: Option<usize>, all: usize) -> Option<usize> {
    if let Some(idx) = idx {
        let next = idx + 1;
        if next < all {
            Some(next)
        } else {
            (all > 0).then_some(0)
        }
    } else {
        (all > 0).then_some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{next, prev};

    #[test]
    fn wraps_around_both_directions() {
        assert_eq!(next(Some(2), 3), Some(0));
        assert_eq!(prev(Some(0), 3), Some(2));
    }

    #[test]
    fn starts_from_edges_when_unset() {
        assert_eq!(next(None, 3), Some(0));
        assert_eq!(prev(None, 3), Some(2));
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert_eq!(next(None, 0), None);
        assert_eq!(prev(Some(1), 0), None);
    }
}
