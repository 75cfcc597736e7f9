//! Equality comparers used by `contains_with`.

// == Equality Comparer ==
/// Custom equality between two cached values.
///
/// Implemented for any `Fn(&T, &T) -> bool`, so a closure works anywhere a
/// comparer object does.
pub trait EqualityComparer<T: ?Sized> {
    fn equals(&self, left: &T, right: &T) -> bool;
}

impl<T: ?Sized, F> EqualityComparer<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}
