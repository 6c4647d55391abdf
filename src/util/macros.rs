/// Generate enums for codepoints in protocols.
///
/// # Example 
///
/// ```rust
/// # #[macro_use] extern crate bgpframe;
/// # fn main() {
/// typeenum!(NotificationCode, u8,
///     1 => MessageHeaderError,
///     2 => OpenMessageError,
///     6 => Cease,
/// );
///
/// assert_eq!(NotificationCode::from(6), NotificationCode::Cease);
/// assert_eq!(u8::from(NotificationCode::Unimplemented(9)), 9);
/// # }
/// ```
/// This will create a `pub enum NotificationCode`, comprised of variants
/// `MessageHeaderError`, `OpenMessageError`, `Cease` and the catch-all
/// `Unimplemented(u8)`. On this enum, the [`From`] (for conversion between
/// the variants and `u8`) and [`std::fmt::Display`] traits are implemented.
///
#[macro_export]
macro_rules! typeenum {
    ($(#[$attr:meta])* $name:ident, $ty:ty, $($x:expr => $y:ident),+ $(,)*) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize)
        )]
        pub enum $name {
            $($y),+,
            Unimplemented($ty),
        }

        impl From<$ty> for $name {
            fn from(f: $ty) -> $name {
                match f {
                    $($x => $name::$y,)+
                    u => $name::Unimplemented(u),
                }
            }
        }

        impl From<$name> for $ty {
            fn from(s: $name) -> $ty {
                match s {
                    $($name::$y => $x,)+
                    $name::Unimplemented(u) => u,
                }
            }

        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter)
                -> Result<(), std::fmt::Error>
            {
                match self {
                    $($name::$y => write!(f, stringify!($y))),+,
                    $name::Unimplemented(u) =>
                        write!(f, "unknown-{}-{}", stringify!($name), u)
                }
            }
        }
    }
}
