//! Bounded-retry station connection logic, independent of the radio driver.
//!
//! The radio task feeds [`ConnectionEvent`]s into a [`Connection`] and carries out the returned
//! [`ConnectionAction`]. The first time the connection settles, either with an address or by
//! running out of retries, the action carries the [`ConnectionOutcome`] to publish. That happens
//! once per [`Connection`].

use crate::{Error, Result};

/// Where the station currently is in its connection attempts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Radio up, no join attempted yet.
    Disconnected,
    /// A join is in flight. `retries` counts the attempts made after the first.
    Connecting { retries: u8 },
    /// Associated and holding an address.
    Connected,
    /// Out of retries. Terminal.
    Failed { attempts: u8 },
}

/// What the radio reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionEvent {
    /// The station interface is up.
    Started,
    /// A join failed or an established link dropped.
    Disconnected,
    /// DHCP handed us an address.
    GotIp,
}

/// How the connection settled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionOutcome {
    Connected,
    Failed { attempts: u8 },
}

impl ConnectionOutcome {
    /// # Errors
    ///
    /// Returns [`Error::WifiConnectFailed`] for [`ConnectionOutcome::Failed`].
    pub const fn into_result(self) -> Result<()> {
        match self {
            Self::Connected => Ok(()),
            Self::Failed { attempts } => Err(Error::WifiConnectFailed { attempts }),
        }
    }
}

/// What the radio task should do next.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionAction {
    None,
    /// Start a join attempt.
    Connect,
    /// Publish the outcome to whoever waits for the connection.
    Complete(ConnectionOutcome),
}

/// Connection state plus the retry budget and the one-shot outcome latch.
///
/// ```
/// use strip_flicker::connection::{Connection, ConnectionAction, ConnectionEvent, ConnectionOutcome};
///
/// let mut connection = Connection::new(1);
/// assert_eq!(connection.handle(ConnectionEvent::Started), ConnectionAction::Connect);
/// assert_eq!(connection.handle(ConnectionEvent::Disconnected), ConnectionAction::Connect);
/// assert_eq!(
///     connection.handle(ConnectionEvent::Disconnected),
///     ConnectionAction::Complete(ConnectionOutcome::Failed { attempts: 2 })
/// );
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connection {
    state: ConnectionState,
    max_retries: u8,
    completed: bool,
}

impl Connection {
    #[must_use]
    pub const fn new(max_retries: u8) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            max_retries,
            completed: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub const fn max_retries(&self) -> u8 {
        self.max_retries
    }

    /// Whether the outcome has already been handed out.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed
    }

    /// Applies `event` and returns what the radio task should do about it.
    pub const fn handle(&mut self, event: ConnectionEvent) -> ConnectionAction {
        match (self.state, event) {
            (ConnectionState::Failed { .. }, _) => ConnectionAction::None,
            (_, ConnectionEvent::GotIp) => {
                self.state = ConnectionState::Connected;
                self.complete(ConnectionOutcome::Connected)
            }
            (ConnectionState::Disconnected, ConnectionEvent::Started)
            | (ConnectionState::Connected, ConnectionEvent::Disconnected) => {
                self.state = ConnectionState::Connecting { retries: 0 };
                ConnectionAction::Connect
            }
            (ConnectionState::Connecting { retries }, ConnectionEvent::Disconnected) => {
                if retries < self.max_retries {
                    self.state = ConnectionState::Connecting {
                        retries: retries.saturating_add(1),
                    };
                    ConnectionAction::Connect
                } else {
                    let attempts = retries.saturating_add(1);
                    self.state = ConnectionState::Failed { attempts };
                    self.complete(ConnectionOutcome::Failed { attempts })
                }
            }
            (ConnectionState::Disconnected, ConnectionEvent::Disconnected)
            | (
                ConnectionState::Connecting { .. } | ConnectionState::Connected,
                ConnectionEvent::Started,
            ) => ConnectionAction::None,
        }
    }

    const fn complete(&mut self, outcome: ConnectionOutcome) -> ConnectionAction {
        if self.completed {
            ConnectionAction::None
        } else {
            self.completed = true;
            ConnectionAction::Complete(outcome)
        }
    }
}

/// Station credentials, bounded to what 802.11 allows.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WifiCredentials {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

impl WifiCredentials {
    /// # Errors
    ///
    /// Returns [`Error::SsidTooLong`] or [`Error::PasswordTooLong`] if a field does not fit.
    pub fn new(ssid: &str, password: &str) -> Result<Self> {
        let ssid = heapless::String::try_from(ssid).map_err(|()| Error::SsidTooLong)?;
        let password = heapless::String::try_from(password).map_err(|()| Error::PasswordTooLong)?;
        Ok(Self { ssid, password })
    }

    /// An empty password means the access point is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// Logs the SSID only.
#[cfg(feature = "defmt")]
impl defmt::Format for WifiCredentials {
    fn format(&self, fmt: defmt::Formatter<'_>) {
        defmt::write!(fmt, "WifiCredentials {{ ssid: {} }}", self.ssid.as_str());
    }
}
