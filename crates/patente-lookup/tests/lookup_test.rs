use async_trait::async_trait;
use patente_core::{OcrReading, PlateNumber, VehicleInfo, VehicleRecord};
use patente_lookup::cache::{Clock, ResultCache};
use patente_lookup::{
    LookupError, LookupService, ProviderError, SimulatedProvider, VehicleProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Provider scripted to succeed or fail, counting its invocations.
struct MockProvider {
    name: &'static str,
    fail: bool,
    calls: AtomicUsize,
}

impl MockProvider {
    fn succeeding(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VehicleProvider for MockProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn verification_method(&self) -> &str {
        "api"
    }

    async fn check(&self, plate: &PlateNumber) -> Result<VehicleRecord, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ProviderError::UpstreamStatus { status: 503 })
        } else {
            Ok(VehicleRecord::clean(
                plate.clone(),
                VehicleInfo::unavailable(),
                99.0,
                self.name,
            ))
        }
    }
}

/// Manually advanced clock for TTL tests.
struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    fn advance(&self, by: Duration) {
        *self.offset.lock().expect("clock lock") += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().expect("clock lock")
    }
}

fn cache() -> ResultCache {
    ResultCache::new(Duration::from_secs(3600))
}

#[tokio::test]
async fn test_fallback_ordering() {
    let a = MockProvider::failing("a");
    let b = MockProvider::failing("b");
    let c = MockProvider::succeeding("c");
    let service = LookupService::new(vec![a.clone(), b.clone(), c.clone()], cache());

    let report = service.lookup("AB1234").await.expect("chain succeeds");

    assert_eq!(report.record.source, "c");
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
    assert_eq!(c.calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_invokes_no_provider() {
    let provider = MockProvider::succeeding("only");
    let service = LookupService::new(vec![provider.clone()], cache());

    let first = service.lookup("ABCD12").await.expect("first lookup");
    let second = service.lookup("ABCD12").await.expect("second lookup");

    assert_eq!(provider.calls(), 1);
    assert_eq!(first.record, second.record);
    assert_eq!(first.verification_method, "api");
    assert_eq!(second.verification_method, "cache");
}

#[tokio::test]
async fn test_cache_expiry_reinvokes_provider() {
    let clock = Arc::new(ManualClock::new());
    let expiring_cache = ResultCache::with_clock(Duration::from_secs(60), clock.clone());
    let provider = MockProvider::succeeding("only");
    let service = LookupService::new(vec![provider.clone()], expiring_cache);

    service.lookup("ABCD12").await.expect("first lookup");
    clock.advance(Duration::from_secs(59));
    service.lookup("ABCD12").await.expect("within ttl");
    assert_eq!(provider.calls(), 1);

    clock.advance(Duration::from_secs(1));
    service.lookup("ABCD12").await.expect("after ttl");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_all_providers_failed_aggregate() {
    let a = MockProvider::failing("a");
    let b = MockProvider::failing("b");
    let service = LookupService::new(vec![a, b], cache());

    let err = service.lookup("AB1234").await.expect_err("chain fails");
    match err {
        LookupError::AllProvidersFailed { plate, attempts } => {
            assert_eq!(plate.as_str(), "AB1234");
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].provider, "a");
            assert_eq!(attempts[1].provider, "b");
        }
        other => panic!("expected AllProvidersFailed, got {other}"),
    }
}

#[tokio::test]
async fn test_invalid_plate_skips_chain() {
    let provider = MockProvider::succeeding("only");
    let service = LookupService::new(vec![provider.clone()], cache());

    let err = service.lookup("   ").await.expect_err("invalid input");
    assert!(err.is_caller_error());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_simulation_scenario_jvjv20() {
    let service = LookupService::new(
        vec![Arc::new(SimulatedProvider::with_delay(Duration::ZERO))],
        cache(),
    );

    let report = service.lookup("JVJV20").await.expect("simulated lookup");

    assert!(report.record.is_reported);
    assert_eq!(report.record.vehicle_info.make, "Kia");
    assert_eq!(report.record.vehicle_info.model, "Rio");
    assert_eq!(report.record.vehicle_info.year, Some(2021));
    assert_eq!(report.record.vehicle_info.color, "Negro");
    assert_eq!(report.record.confidence, 98.0);
    assert!(report.record.source.contains("Simulación"));
    assert_eq!(report.verification_method, "simulation");
}

#[tokio::test]
async fn test_record_invariant_holds_for_produced_records() {
    let service = LookupService::new(
        vec![Arc::new(SimulatedProvider::with_delay(Duration::ZERO))],
        cache(),
    );

    for raw in ["JVJV20", "AB1234", "HHKL55", "XYZW10"] {
        let report = service.lookup(raw).await.expect("simulated lookup");
        assert_eq!(
            report.record.is_reported,
            report.record.report_info.is_some(),
            "invariant violated for {raw}"
        );
    }
}

#[tokio::test]
async fn test_ocr_confidence_passes_through_unchanged() {
    let service = LookupService::new(
        vec![Arc::new(SimulatedProvider::with_delay(Duration::ZERO))],
        cache(),
    )
    .with_disclaimer("Solo informativo");

    let reading = OcrReading {
        text: "PATENTE: JVJV20 (frontal)".to_string(),
        confidence: 87.5,
    };
    let report = service.lookup_reading(&reading).await.expect("ocr lookup");

    assert_eq!(report.record.plate_number.as_str(), "JVJV20");
    assert_eq!(report.ocr_confidence, Some(87.5));
    assert_eq!(report.record.confidence, 98.0);
    assert_eq!(report.disclaimer.as_deref(), Some("Solo informativo"));
}

#[tokio::test]
async fn test_normalized_inputs_share_a_cache_entry() {
    let provider = MockProvider::succeeding("only");
    let service = LookupService::new(vec![provider.clone()], cache());

    service.lookup("ab-1234").await.expect("first form");
    service.lookup("AB 1234").await.expect("second form");

    // Both normalize to AB1234, so the second call is a cache hit
    assert_eq!(provider.calls(), 1);
}
