//! Strongly typed identifier wrappers.
//!
//! Infrastructure ids (`LinkId`, `ReceiverId`) are dense integers assigned by
//! the network and receiver builders, so they stay `Copy` and double as
//! `Vec` indices.  Population ids (`PersonId`, `VehicleId`) come from the
//! traffic simulation as opaque strings and carry meaning in their prefix
//! (heavy-goods vehicles), so they wrap a `String`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Generate an owned string identifier.
macro_rules! named_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id! {
    /// Index of a network link.
    pub struct LinkId(u32);
}

typed_id! {
    /// Index of a receiver point (a location where exposure is evaluated).
    pub struct ReceiverId(u32);
}

named_id! {
    /// Identifier of a simulated person.
    pub struct PersonId;
}

named_id! {
    /// Identifier of a simulated vehicle.
    pub struct VehicleId;
}

impl VehicleId {
    /// The person driving this vehicle.
    ///
    /// Vehicles and their drivers share an identifier in the upstream traffic
    /// simulation, so this is a plain re-labelling.
    pub fn driver(&self) -> PersonId {
        PersonId(self.0.clone())
    }
}
