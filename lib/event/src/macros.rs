/// Build [`Tags`](crate::Tags) from `key => value` pairs.
///
/// ```
/// let tags = event::tags!(
///     "driver" => "intel-rapl",
///     "name" => "package-0",
/// );
/// assert_eq!(tags.len(), 2);
/// ```
#[macro_export]
macro_rules! tags {
    ( $($x:expr => $y:expr),* ) => ({
        let mut _tags = $crate::Tags::new();
        $(
            _tags.insert($x, $y);
        )*
        _tags
    });
    ( $($x:expr => $y:expr,)* ) => (
        $crate::tags!{$($x => $y),*}
    );
}

#[cfg(test)]
mod tests {
    #[test]
    fn trailing_comma() {
        let tags = tags!(
            "foo" => "bar",
            "key" => String::from("value"),
        );

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("foo"), Some("bar"));
        assert_eq!(tags.get("key"), Some("value"));
    }

    #[test]
    fn empty() {
        let tags = tags!();
        assert!(tags.is_empty());
    }
}
