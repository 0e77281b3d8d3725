//! Scan session: the state machine governing the capture collaborator.
//!
//! The session is single-occupancy: one capture at a time, a second start
//! is rejected rather than queued. The capture device itself (camera API)
//! is out of scope; the session talks to it through the [`CaptureGate`]
//! permission collaborator and consumes decoded strings handed in by the
//! host, which is expected to hold exactly one session.

use std::sync::Arc;

use tracing::debug;

use cardvault_core::Card;

use crate::error::{Result, ShareError};
use crate::protocol::ShareProtocol;

/// Capture permission status, as reported by the OS layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePermission {
    /// Permission already granted; capture may start.
    Granted,
    /// Not yet determined; a request must be issued and the caller retries
    /// after the user responds.
    Undetermined,
    /// Denied or restricted; capture can never start this launch.
    Denied,
}

/// The permission collaborator for the capture device.
pub trait CaptureGate: Send + Sync {
    /// Current permission status.
    fn status(&self) -> CapturePermission;

    /// Issue an asynchronous permission request. The result arrives
    /// out-of-band via a later `status()` call.
    fn request(&self);
}

/// Session state. `Scanning` holds the single capture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
}

/// Outcome of a start attempt that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStart {
    /// Capture is running; the host should begin delivering decodes.
    Started,
    /// A permission request was issued; the session stayed idle and the
    /// caller must retry after the user responds.
    PermissionPending,
}

/// A scan session bound to one protocol instance and one capture gate.
///
/// The single-occupancy guarantee is per session: a host owning the
/// camera is expected to hold exactly one `ScanSession` and route every
/// start/stop through it. Creating several sessions over one protocol
/// gives each its own slot.
pub struct ScanSession {
    protocol: Arc<ShareProtocol>,
    gate: Box<dyn CaptureGate>,
    state: ScanState,
}

impl ScanSession {
    /// Create an idle session.
    pub fn new(protocol: Arc<ShareProtocol>, gate: Box<dyn CaptureGate>) -> Self {
        Self {
            protocol,
            gate,
            state: ScanState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Try to start scanning.
    ///
    /// Fails `AlreadyScanning` if the slot is taken; `PermissionDenied` if
    /// the gate reports denied/restricted (no transition). An undetermined
    /// permission issues a request and leaves the session idle.
    pub fn start(&mut self) -> Result<ScanStart> {
        if self.state == ScanState::Scanning {
            return Err(ShareError::AlreadyScanning);
        }

        match self.gate.status() {
            CapturePermission::Granted => {
                self.state = ScanState::Scanning;
                debug!("scan session started");
                Ok(ScanStart::Started)
            }
            CapturePermission::Undetermined => {
                self.gate.request();
                debug!("capture permission requested, session stays idle");
                Ok(ScanStart::PermissionPending)
            }
            CapturePermission::Denied => Err(ShareError::PermissionDenied),
        }
    }

    /// Consume exactly one decoded string.
    ///
    /// Runs the unpack path and returns the card or the failure; either
    /// way the session transitions back to idle and the capture slot is
    /// released. The session does not keep scanning after a decode.
    pub fn handle_decode(&mut self, decoded: &str) -> Result<Card> {
        if self.state != ScanState::Scanning {
            return Err(ShareError::NotScanning);
        }

        // Release the slot on every exit path before touching the payload.
        self.state = ScanState::Idle;

        let result = self.protocol.unpack(decoded);
        debug!(ok = result.is_ok(), "scan session consumed a decode");
        result
    }

    /// Stop scanning. Idempotent and safe from any state.
    pub fn stop(&mut self) {
        if self.state != ScanState::Idle {
            debug!("scan session stopped");
        }
        self.state = ScanState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::EnvelopeKey;
    use crate::protocol::ShareConfig;
    use cardvault_core::SharingLevel;
    use cardvault_store::MemoryStorage;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Gate with a scriptable status and a request counter.
    struct FakeGate {
        granted: AtomicBool,
        undetermined: AtomicBool,
        requests: AtomicUsize,
    }

    impl FakeGate {
        fn granted() -> Self {
            Self {
                granted: AtomicBool::new(true),
                undetermined: AtomicBool::new(false),
                requests: AtomicUsize::new(0),
            }
        }

        fn undetermined() -> Self {
            Self {
                granted: AtomicBool::new(false),
                undetermined: AtomicBool::new(true),
                requests: AtomicUsize::new(0),
            }
        }

        fn denied() -> Self {
            Self {
                granted: AtomicBool::new(false),
                undetermined: AtomicBool::new(false),
                requests: AtomicUsize::new(0),
            }
        }
    }

    impl CaptureGate for FakeGate {
        fn status(&self) -> CapturePermission {
            if self.granted.load(Ordering::SeqCst) {
                CapturePermission::Granted
            } else if self.undetermined.load(Ordering::SeqCst) {
                CapturePermission::Undetermined
            } else {
                CapturePermission::Denied
            }
        }

        fn request(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
            // The fake user grants on request.
            self.undetermined.store(false, Ordering::SeqCst);
            self.granted.store(true, Ordering::SeqCst);
        }
    }

    fn protocol() -> Arc<ShareProtocol> {
        Arc::new(ShareProtocol::new(
            EnvelopeKey::generate(),
            Arc::new(MemoryStorage::new()),
            ShareConfig::default(),
        ))
    }

    #[test]
    fn test_start_with_granted_permission() {
        let mut session = ScanSession::new(protocol(), Box::new(FakeGate::granted()));
        assert_eq!(session.start().unwrap(), ScanStart::Started);
        assert_eq!(session.state(), ScanState::Scanning);
    }

    #[test]
    fn test_second_start_rejected() {
        let mut session = ScanSession::new(protocol(), Box::new(FakeGate::granted()));
        session.start().unwrap();
        assert!(matches!(
            session.start().unwrap_err(),
            ShareError::AlreadyScanning
        ));
    }

    #[test]
    fn test_undetermined_requests_and_stays_idle() {
        let mut session = ScanSession::new(protocol(), Box::new(FakeGate::undetermined()));
        assert_eq!(session.start().unwrap(), ScanStart::PermissionPending);
        assert_eq!(session.state(), ScanState::Idle);

        // The fake gate granted on request; retry succeeds.
        assert_eq!(session.start().unwrap(), ScanStart::Started);
    }

    #[test]
    fn test_denied_is_an_error_with_no_transition() {
        let mut session = ScanSession::new(protocol(), Box::new(FakeGate::denied()));
        assert!(matches!(
            session.start().unwrap_err(),
            ShareError::PermissionDenied
        ));
        assert_eq!(session.state(), ScanState::Idle);
    }

    #[test]
    fn test_decode_consumes_once_and_returns_to_idle() {
        let protocol = protocol();
        let card = Card::new("Ada").with_email("ada@x.com");
        let text = protocol
            .build_qr(&card, SharingLevel::Public, None)
            .unwrap();

        let mut session = ScanSession::new(protocol, Box::new(FakeGate::granted()));
        session.start().unwrap();

        let received = session.handle_decode(&text).unwrap();
        assert_eq!(received.name, "Ada");
        assert_eq!(session.state(), ScanState::Idle);

        // A second decode without restarting is rejected.
        assert!(matches!(
            session.handle_decode(&text).unwrap_err(),
            ShareError::NotScanning
        ));
    }

    #[test]
    fn test_failed_decode_still_releases_the_slot() {
        let mut session = ScanSession::new(protocol(), Box::new(FakeGate::granted()));
        session.start().unwrap();

        assert!(session.handle_decode("garbage").is_err());
        assert_eq!(session.state(), ScanState::Idle);

        // The slot is free again.
        assert_eq!(session.start().unwrap(), ScanStart::Started);
    }

    #[test]
    fn test_stop_is_idempotent_from_any_state() {
        let mut session = ScanSession::new(protocol(), Box::new(FakeGate::granted()));
        session.stop();
        session.start().unwrap();
        session.stop();
        session.stop();
        assert_eq!(session.state(), ScanState::Idle);
    }
}
