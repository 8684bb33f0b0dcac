//! Host-level tests for the Wi-Fi connection state machine.
#![cfg(feature = "host")]

use strip_flicker::Error;
use strip_flicker::connection::{
    Connection, ConnectionAction, ConnectionEvent, ConnectionOutcome, ConnectionState,
    WifiCredentials,
};
use strip_flicker::shared_constants::MAX_CONNECT_RETRIES;

fn started(max_retries: u8) -> Connection {
    let mut connection = Connection::new(max_retries);
    assert_eq!(
        connection.handle(ConnectionEvent::Started),
        ConnectionAction::Connect
    );
    connection
}

#[test]
fn starts_disconnected() {
    let connection = Connection::new(MAX_CONNECT_RETRIES);
    assert_eq!(connection.state(), ConnectionState::Disconnected);
    assert!(!connection.is_complete());
}

#[test]
fn start_triggers_first_attempt() {
    let connection = started(MAX_CONNECT_RETRIES);
    assert_eq!(connection.state(), ConnectionState::Connecting { retries: 0 });
}

#[test]
fn gives_up_after_retry_budget() {
    let mut connection = started(MAX_CONNECT_RETRIES);
    let mut attempts = 1;
    loop {
        match connection.handle(ConnectionEvent::Disconnected) {
            ConnectionAction::Connect => attempts += 1,
            ConnectionAction::Complete(outcome) => {
                assert_eq!(outcome, ConnectionOutcome::Failed { attempts: 6 });
                break;
            }
            ConnectionAction::None => panic!("disconnect while connecting must act"),
        }
    }
    assert_eq!(attempts, usize::from(MAX_CONNECT_RETRIES) + 1);
    assert_eq!(connection.state(), ConnectionState::Failed { attempts: 6 });
}

#[test]
fn zero_retries_fails_on_first_disconnect() {
    let mut connection = started(0);
    assert_eq!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Complete(ConnectionOutcome::Failed { attempts: 1 })
    );
}

#[test]
fn failure_is_terminal_and_reported_once() {
    let mut connection = started(1);
    connection.handle(ConnectionEvent::Disconnected);
    assert!(matches!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Complete(ConnectionOutcome::Failed { .. })
    ));
    for event in [
        ConnectionEvent::Disconnected,
        ConnectionEvent::Started,
        ConnectionEvent::GotIp,
    ] {
        assert_eq!(connection.handle(event), ConnectionAction::None);
    }
    assert_eq!(connection.state(), ConnectionState::Failed { attempts: 2 });
}

#[test]
fn got_ip_completes_once() {
    let mut connection = started(MAX_CONNECT_RETRIES);
    assert_eq!(
        connection.handle(ConnectionEvent::GotIp),
        ConnectionAction::Complete(ConnectionOutcome::Connected)
    );
    assert_eq!(connection.state(), ConnectionState::Connected);
    assert!(connection.is_complete());

    // Link drops and comes back: reconnect, but no second outcome.
    assert_eq!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Connect
    );
    assert_eq!(
        connection.handle(ConnectionEvent::GotIp),
        ConnectionAction::None
    );
    assert_eq!(connection.state(), ConnectionState::Connected);
}

#[test]
fn got_ip_resets_retry_count() {
    let mut connection = started(2);
    connection.handle(ConnectionEvent::Disconnected);
    connection.handle(ConnectionEvent::Disconnected);
    assert_eq!(connection.state(), ConnectionState::Connecting { retries: 2 });
    connection.handle(ConnectionEvent::GotIp);

    // A full budget is available again after the link drops.
    assert_eq!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Connect
    );
    assert_eq!(connection.state(), ConnectionState::Connecting { retries: 0 });
    assert_eq!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Connect
    );
    assert_eq!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Connect
    );
    assert_eq!(
        connection.handle(ConnectionEvent::Disconnected),
        ConnectionAction::Complete(ConnectionOutcome::Failed { attempts: 3 })
    );
}

#[test]
fn duplicate_start_is_ignored() {
    let mut connection = started(MAX_CONNECT_RETRIES);
    assert_eq!(
        connection.handle(ConnectionEvent::Started),
        ConnectionAction::None
    );
    assert_eq!(connection.state(), ConnectionState::Connecting { retries: 0 });
}

#[test]
fn outcome_into_result() {
    assert!(ConnectionOutcome::Connected.into_result().is_ok());
    assert!(matches!(
        ConnectionOutcome::Failed { attempts: 6 }.into_result(),
        Err(Error::WifiConnectFailed { attempts: 6 })
    ));
}

#[test]
fn credentials_respect_802_11_limits() {
    let credentials = WifiCredentials::new("home", "secret").expect("short credentials fit");
    assert_eq!(credentials.ssid.as_str(), "home");
    assert_eq!(credentials.password.as_str(), "secret");

    let longest_ssid = "s".repeat(32);
    assert!(WifiCredentials::new(&longest_ssid, "").is_ok());
    assert!(matches!(
        WifiCredentials::new(&"s".repeat(33), ""),
        Err(Error::SsidTooLong)
    ));
    assert!(matches!(
        WifiCredentials::new("home", &"p".repeat(65)),
        Err(Error::PasswordTooLong)
    ));
}

#[test]
fn empty_password_joins_open_network() {
    let open = WifiCredentials::new("cafe", "").expect("open network credentials");
    assert!(open.is_open());

    let secured = WifiCredentials::new("home", "secret").expect("secured credentials");
    assert!(!secured.is_open());
}
