use biometrics::{Collector, Counter, Moments};

pub(crate) static BACKEND_REQUESTS: Counter = Counter::new("chharo.backend.requests");
pub(crate) static BACKEND_REQUEST_ERRORS: Counter = Counter::new("chharo.backend.request_errors");
pub(crate) static BACKEND_REQUEST_DURATION: Moments =
    Moments::new("chharo.backend.request_duration_seconds");

pub(crate) static CHAT_SUBMITS: Counter = Counter::new("chharo.chat.submits");
pub(crate) static CHAT_SUBMITS_DROPPED: Counter = Counter::new("chharo.chat.submits_dropped");
pub(crate) static CHAT_FAILURES: Counter = Counter::new("chharo.chat.failures");
pub(crate) static CHAT_CRISIS_REPLIES: Counter = Counter::new("chharo.chat.crisis_replies");
pub(crate) static CHAT_HEALTH_FAILURES: Counter = Counter::new("chharo.chat.health_failures");
pub(crate) static CHAT_SESSION_RESETS: Counter = Counter::new("chharo.chat.session_resets");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&BACKEND_REQUESTS);
    collector.register_counter(&BACKEND_REQUEST_ERRORS);
    collector.register_moments(&BACKEND_REQUEST_DURATION);

    collector.register_counter(&CHAT_SUBMITS);
    collector.register_counter(&CHAT_SUBMITS_DROPPED);
    collector.register_counter(&CHAT_FAILURES);
    collector.register_counter(&CHAT_CRISIS_REPLIES);
    collector.register_counter(&CHAT_HEALTH_FAILURES);
    collector.register_counter(&CHAT_SESSION_RESETS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use biometrics::Sensor;

    #[test]
    fn counters_register() {
        register_biometrics(Collector::new());
        CHAT_SUBMITS.click();
        assert!(CHAT_SUBMITS.read() >= 1);
    }
}
