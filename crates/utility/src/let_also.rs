/// Lets long iterator chains flow into a final wrapper.
pub trait LetAlso: Sized {
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> LetAlso for T {}

#[cfg(test)]
mod tests {
    use super::LetAlso;

    #[test]
    fn let_owned_passes_value_through() {
        let wrapped = vec![1, 2, 3].let_owned(|values| Some(values.len()));
        assert_eq!(wrapped, Some(3));
    }
}
