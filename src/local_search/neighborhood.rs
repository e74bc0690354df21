//! Restricted block-boundary neighborhood.
//!
//! # Reference
//! Nowicki & Smutnicki (1996), "A Fast Taboo Search Algorithm for the Job
//! Shop Problem", Management Science 42(6).

use serde::{Deserialize, Serialize};

use super::Block;
use crate::models::ResourceOrder;

/// Exchange of two positions in one machine's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub machine: usize,
    pub a: usize,
    pub b: usize,
}

impl Swap {
    pub fn new(machine: usize, a: usize, b: usize) -> Self {
        Self { machine, a, b }
    }

    /// Returns a copy of `order` with the two positions exchanged.
    ///
    /// `order` itself is left untouched.
    pub fn applied_to(&self, order: &ResourceOrder) -> ResourceOrder {
        let mut next = order.clone();
        self.apply_in_place(&mut next);
        next
    }

    /// Exchanges the two positions of `order` in place.
    #[inline]
    pub fn apply_in_place(&self, order: &mut ResourceOrder) {
        order.swap(self.machine, self.a, self.b);
    }
}

/// Boundary swaps of a block.
///
/// A two-operation block yields its single swap. Longer blocks yield the
/// swap of their first two and of their last two positions; interior pairs
/// are never generated.
pub fn neighbors_of(block: &Block) -> Vec<Swap> {
    let Block {
        machine,
        first,
        last,
    } = *block;

    if last - first == 1 {
        vec![Swap::new(machine, first, last)]
    } else {
        vec![
            Swap::new(machine, first, first + 1),
            Swap::new(machine, last - 1, last),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn sample_order() -> ResourceOrder {
        let seq = |m: usize| (0..4).map(|j| Operation::new(j, m)).collect::<Vec<_>>();
        ResourceOrder::from_sequences(vec![seq(0), seq(1)])
    }

    #[test]
    fn test_two_position_block() {
        let block = Block {
            machine: 1,
            first: 2,
            last: 3,
        };
        assert_eq!(neighbors_of(&block), vec![Swap::new(1, 2, 3)]);
    }

    #[test]
    fn test_long_block_boundaries_only() {
        let block = Block {
            machine: 0,
            first: 1,
            last: 5,
        };
        assert_eq!(
            neighbors_of(&block),
            vec![Swap::new(0, 1, 2), Swap::new(0, 4, 5)]
        );

        let three = Block {
            machine: 0,
            first: 0,
            last: 2,
        };
        assert_eq!(
            neighbors_of(&three),
            vec![Swap::new(0, 0, 1), Swap::new(0, 1, 2)]
        );
    }

    #[test]
    fn test_swap_exchanges_exactly_two() {
        let order = sample_order();
        let swap = Swap::new(0, 1, 2);
        let next = swap.applied_to(&order);

        assert_eq!(next.get(0, 1), order.get(0, 2));
        assert_eq!(next.get(0, 2), order.get(0, 1));
        assert_eq!(next.get(0, 0), order.get(0, 0));
        assert_eq!(next.get(0, 3), order.get(0, 3));
        assert_eq!(next.machine(1), order.machine(1));
    }

    #[test]
    fn test_swap_is_involution() {
        let order = sample_order();
        let swap = Swap::new(1, 0, 3);
        assert_eq!(swap.applied_to(&swap.applied_to(&order)), order);
    }

    #[test]
    fn test_applied_to_leaves_source_untouched() {
        let order = sample_order();
        let before = order.clone();

        let mut branch = Swap::new(0, 0, 1).applied_to(&order);
        Swap::new(1, 2, 3).apply_in_place(&mut branch);
        branch.set(0, 3, Operation::new(0, 0));

        assert_eq!(order, before);
    }
}
