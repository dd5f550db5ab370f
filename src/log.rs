//! Logging macros which forward to [defmt](https://defmt.ferrous-systems.com/) when the `defmt`
//! feature is enabled, and compile to nothing otherwise (so host-side unit tests don't need a
//! global logger).

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

macro_rules! warn_ {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}

#[allow(unused_imports)]
pub(crate) use {debug, info};
// `warn` itself clashes with the built-in lint attribute
#[allow(unused_imports)]
pub(crate) use warn_ as warn;
