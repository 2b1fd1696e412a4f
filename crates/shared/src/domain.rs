use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// First season offered by the year picker.
pub const FIRST_SEASON: u16 = 1990;
/// Last season offered by the year picker.
pub const LAST_SEASON: u16 = 2024;

macro_rules! number_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                crate::lenient::number::<D, $inner>(deserializer).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

number_newtype!(Year, u16);
number_newtype!(Round, u32);

/// Seasons offered for selection, oldest first.
pub fn selectable_years() -> Vec<Year> {
    (FIRST_SEASON..=LAST_SEASON).map(Year).collect()
}
