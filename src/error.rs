use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(feature = "pico1")]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("LED strip refresh timed out")]
    RefreshTimeout,

    #[display("Wi-Fi connection failed after {attempts} attempts")]
    WifiConnectFailed { attempts: u8 },

    #[display("Wi-Fi SSID is longer than 32 bytes")]
    SsidTooLong,

    #[display("Wi-Fi password is longer than 64 bytes")]
    PasswordTooLong,
}

#[cfg(feature = "pico1")]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
