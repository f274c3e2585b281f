//! Iterator utilities.
use std::cmp::Ordering;

/// The index of a maximal element in a collection, according to a comparison function.
///
/// # Example
/// Get the argmax of an iterator of floats:
///
/// ```
/// use banditlab::utils::iter::ArgMaxBy;
///
/// let v = vec![1.0, 2.5, -3.0, 2.5];
/// let argmax = v.into_iter().argmax_by(|a: &f64, b| a.partial_cmp(b));
/// assert_eq!(argmax, Some(1));
/// ```
pub trait ArgMaxBy {
    type Item;

    /// The index of an element that gives the maximum value from the specified function.
    ///
    /// If several elements are equally maximum, the first index is returned.
    /// Elements that are incomparable with the current maximum (like NaN) are skipped.
    /// If the iterator is empty, None is returned.
    fn argmax_by<F>(self, compare: F) -> Option<usize>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Option<Ordering>;
}

impl<I: Iterator> ArgMaxBy for I {
    type Item = <Self as Iterator>::Item;

    fn argmax_by<F>(self, mut compare: F) -> Option<usize>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Option<Ordering>,
    {
        self.enumerate()
            .fold(None, |best: Option<(usize, Self::Item)>, (i, x)| match best {
                None => Some((i, x)),
                Some((j, y)) => match compare(&x, &y) {
                    Some(Ordering::Greater) => Some((i, x)),
                    // An incomparable running maximum (NaN) is replaced by anything
                    None if compare(&y, &y).is_none() => Some((i, x)),
                    _ => Some((j, y)),
                },
            })
            .map(|(i, _)| i)
    }
}

/// Index of the largest float, ties broken by the lowest index.
#[inline]
pub fn argmax_f64<I: IntoIterator<Item = f64>>(values: I) -> Option<usize> {
    values.into_iter().argmax_by(|a, b| a.partial_cmp(b))
}
