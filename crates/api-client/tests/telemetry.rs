use api_service::telemetry::{init_subscriber, LoggingConfig};
use api_service::LogLevel;

#[test]
fn it_installs_the_subscriber_only_once() {
    let config = LoggingConfig::with_level(LogLevel::Debug);

    assert!(init_subscriber(&config).is_ok());
    assert!(tracing::dispatcher::has_been_set());
    assert!(init_subscriber(&config).is_err());
}
