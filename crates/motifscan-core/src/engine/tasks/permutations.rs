/// Number of full assignments in the product of `lists`, or `None` on overflow.
pub fn product_size<T>(lists: &[Vec<T>]) -> Option<usize> {
    if lists.is_empty() {
        return Some(0);
    }
    lists
        .iter()
        .try_fold(1usize, |acc, list| acc.checked_mul(list.len()))
}

/// Every combination taking one element from each list, in odometer order.
///
/// Any empty list (or no lists at all) yields no combinations.
pub fn cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    Permutations::new(lists, |_: &[T]| true).collect()
}

/// Lazy, depth-first enumeration of the product of candidate lists.
///
/// `accept` is evaluated on every partial assignment as it grows; a rejected prefix is never
/// extended, so whole subtrees of the product are skipped. Full assignments come out in the
/// same order [`cartesian_product`] produces them, minus the rejected ones.
pub struct Permutations<'a, T, F> {
    lists: &'a [Vec<T>],
    positions: Vec<usize>,
    partial: Vec<T>,
    accept: F,
    exhausted: bool,
}

impl<'a, T, F> Permutations<'a, T, F>
where
    T: Clone,
    F: FnMut(&[T]) -> bool,
{
    pub fn new(lists: &'a [Vec<T>], accept: F) -> Self {
        Self {
            lists,
            positions: vec![0; lists.len()],
            partial: Vec::with_capacity(lists.len()),
            accept,
            exhausted: lists.is_empty() || lists.iter().any(|l| l.is_empty()),
        }
    }
}

impl<T, F> Iterator for Permutations<'_, T, F>
where
    T: Clone,
    F: FnMut(&[T]) -> bool,
{
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            let depth = self.partial.len();
            if depth == self.lists.len() {
                let assignment = self.partial.clone();
                self.partial.pop();
                return Some(assignment);
            }

            let position = self.positions[depth];
            if position < self.lists[depth].len() {
                self.positions[depth] += 1;
                self.partial.push(self.lists[depth][position].clone());
                if !(self.accept)(&self.partial) {
                    self.partial.pop();
                } else if depth + 1 < self.lists.len() {
                    self.positions[depth + 1] = 0;
                }
            } else if depth == 0 {
                self.exhausted = true;
                return None;
            } else {
                self.partial.pop();
            }
        }
    }
}
