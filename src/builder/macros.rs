//! Macros for declaring event enums.

/// Generate an event enum together with its `Event` implementation.
///
/// The generated enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
/// `Debug` and the serde traits, and gets a `VARIANTS` constant listing every
/// variant in declaration order. Coverage tests and the graph validator use
/// `VARIANTS` to feed each event to each state.
///
/// Events carrying data can implement [`Event`](crate::core::Event) by hand.
///
/// # Example
///
/// ```
/// use turnstile::event_enum;
/// use turnstile::core::Event;
///
/// event_enum! {
///     pub enum DoorEvent {
///         Push,
///         Coin,
///     }
/// }
///
/// assert_eq!(DoorEvent::VARIANTS, &[DoorEvent::Push, DoorEvent::Coin]);
/// assert_eq!(DoorEvent::Coin.name(), "Coin");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
