//! Value-to-text rendering for bound test arguments
//!
//! When a test method is registered with pre-bound arguments, the argument
//! values are rendered once, at registration time, into the display string
//! that appears in `name(args)` listings and reports. Strings are quoted so
//! they remain distinguishable from other values; everything else falls back
//! to its natural textual form.

/// Renders a value for display inside a test method's argument list.
///
/// Implement this for custom argument types to control how they appear in
/// test listings and reports.
pub trait ArgFormat {
    fn format_arg(&self) -> String;
}

macro_rules! impl_arg_format_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArgFormat for $ty {
                fn format_arg(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_arg_format_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool
);

impl ArgFormat for char {
    fn format_arg(&self) -> String {
        format!("'{}'", self)
    }
}

impl ArgFormat for str {
    fn format_arg(&self) -> String {
        format!("\"{}\"", self)
    }
}

impl ArgFormat for String {
    fn format_arg(&self) -> String {
        format!("\"{}\"", self)
    }
}

impl<T: ArgFormat + ?Sized> ArgFormat for &T {
    fn format_arg(&self) -> String {
        (**self).format_arg()
    }
}

impl<T: ArgFormat> ArgFormat for Option<T> {
    fn format_arg(&self) -> String {
        match self {
            Some(value) => value.format_arg(),
            None => "(none)".to_string(),
        }
    }
}

impl<T: ArgFormat> ArgFormat for [T] {
    fn format_arg(&self) -> String {
        format!("[{}]", join_args(self.iter()))
    }
}

impl<T: ArgFormat> ArgFormat for Vec<T> {
    fn format_arg(&self) -> String {
        self.as_slice().format_arg()
    }
}

impl<T: ArgFormat, const N: usize> ArgFormat for [T; N] {
    fn format_arg(&self) -> String {
        self.as_slice().format_arg()
    }
}

// Tuples render as a comma-separated argument list, so a test registered
// with (2, 3) displays as name(2, 3).
macro_rules! impl_arg_format_tuple {
    ($($name:ident),+) => {
        impl<$($name: ArgFormat),+> ArgFormat for ($($name,)+) {
            fn format_arg(&self) -> String {
                #[allow(non_snake_case)]
                let ($($name,)+) = self;
                let parts: Vec<String> = vec![$($name.format_arg()),+];
                parts.join(", ")
            }
        }
    };
}

impl_arg_format_tuple!(A);
impl_arg_format_tuple!(A, B);
impl_arg_format_tuple!(A, B, C);
impl_arg_format_tuple!(A, B, C, D);

fn join_args<'a, T: ArgFormat + 'a>(values: impl Iterator<Item = &'a T>) -> String {
    values
        .map(|value| value.format_arg())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(42, "42")]
    #[case(-7, "-7")]
    fn renders_integers(#[case] value: i32, #[case] expected: &str) {
        assert_eq!(value.format_arg(), expected);
    }

    #[rstest]
    #[case("", "\"\"")]
    #[case("hello", "\"hello\"")]
    #[case("with space", "\"with space\"")]
    fn quotes_strings(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(value.format_arg(), expected);
        assert_eq!(value.to_string().format_arg(), expected);
    }

    #[test]
    fn renders_floats_and_bools() {
        assert_eq!(1.5f64.format_arg(), "1.5");
        assert_eq!(true.format_arg(), "true");
        assert_eq!('x'.format_arg(), "'x'");
    }

    #[test]
    fn renders_tuples_as_argument_list() {
        assert_eq!((2, 3).format_arg(), "2, 3");
        assert_eq!((1, "two", 3.0).format_arg(), "1, \"two\", 3");
    }

    #[test]
    fn renders_containers() {
        assert_eq!(vec![1, 2, 3].format_arg(), "[1, 2, 3]");
        assert_eq!(Some(5).format_arg(), "5");
        assert_eq!(None::<i32>.format_arg(), "(none)");
    }
}
