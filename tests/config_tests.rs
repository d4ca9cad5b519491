//! 配置与组件装配测试

use blogstats::config::{StaticConfig, get_config, init_config};
use blogstats::counter::{CounterFactory, CounterStore};
use blogstats::logging::init_logging;

#[tokio::test]
async fn test_init_and_wire_from_defaults() {
    // 没有 config.toml 和 BLOGSTATS_* 环境变量时走默认值
    init_config();
    init_logging();
    // 重复调用无副作用
    init_config();
    init_logging();

    let config = get_config();
    assert_eq!(config.counter.backend, "memory");
    assert_eq!(config.reconcile.interval_secs, 300);

    let store = CounterFactory::create().await.unwrap();
    assert_eq!(store.backend_name(), "memory");
    assert_eq!(store.increment("post:impressions:smoke").await.unwrap(), 1);
}

#[test]
fn test_config_roundtrips_through_serde() {
    let config = StaticConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: StaticConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.counter.redis.url, config.counter.redis.url);
    assert_eq!(back.logging.format, "text");
}
