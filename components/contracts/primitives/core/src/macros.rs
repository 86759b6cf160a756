/// A trait for querying a single value from a type.
///
/// It is not required that the value is constant.
pub trait Get<T> {
    /// Return the current value.
    fn get() -> T;
}

impl<T: Default> Get<T> for () {
    fn get() -> T {
        T::default()
    }
}

/// Create new implementations of the [`Get`] trait.
///
/// ```ignore
/// parameter_types! {
///     pub const MaxSlashEvents: u64 = 1000;
///     pub Genesis: Vec<u8> = vec![1, 2, 3];
/// }
/// ```
#[macro_export]
macro_rules! parameter_types {
    (
        $( #[ $attr:meta ] )*
        $vis:vis const $name:ident: $type:ty = $value:expr;
        $( $rest:tt )*
    ) => (
        $( #[ $attr ] )*
        $vis struct $name;
        $crate::parameter_types!(IMPL_CONST $name , $type , $value);
        $crate::parameter_types!( $( $rest )* );
    );
    (
        $( #[ $attr:meta ] )*
        $vis:vis $name:ident: $type:ty = $value:expr;
        $( $rest:tt )*
    ) => (
        $( #[ $attr ] )*
        $vis struct $name;
        $crate::parameter_types!(IMPL $name, $type, $value);
        $crate::parameter_types!( $( $rest )* );
    );
    () => ();
    (IMPL_CONST $name:ident, $type:ty, $value:expr) => {
        impl $name {
            /// Returns the value of this parameter type.
            pub const fn get() -> $type {
                $value
            }
        }

        impl<I: From<$type>> $crate::macros::Get<I> for $name {
            fn get() -> I {
                I::from($value)
            }
        }
    };
    (IMPL $name:ident, $type:ty, $value:expr) => {
        impl $name {
            /// Returns the value of this parameter type.
            pub fn get() -> $type {
                $value
            }
        }

        impl<I: From<$type>> $crate::macros::Get<I> for $name {
            fn get() -> I {
                I::from($value)
            }
        }
    };
}

/// Return early with an error built by `eg!` unless the condition holds.
#[macro_export]
macro_rules! ensure {
    ( $x:expr, $y:expr $(,)? ) => {{
        if !$x {
            return Err(ruc::eg!($y));
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::Get;

    parameter_types! {
        pub const MaxEvents: u64 = 42;
        pub Name: String = "distribution".to_string();
    }

    fn guarded(v: u64) -> ruc::Result<u64> {
        ensure!(v < MaxEvents::get(), "too many");
        Ok(v)
    }

    #[test]
    fn parameter_types_work() {
        assert_eq!(<MaxEvents as Get<u64>>::get(), 42);
        assert_eq!(<Name as Get<String>>::get(), "distribution");
        assert!(guarded(1).is_ok());
        assert!(guarded(42).is_err());
    }
}
