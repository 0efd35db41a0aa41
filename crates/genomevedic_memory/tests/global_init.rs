//! Integration test for installing a configured process-wide manager.

use genomevedic_memory::{global, init_global, MemoryConfig, MemoryError};

#[test]
fn test_init_before_first_use() {
    let invalid = MemoryConfig {
        buffer_size: 0,
        ..MemoryConfig::compact()
    };
    assert!(matches!(
        init_global(&invalid),
        Err(MemoryError::InvalidConfig(_))
    ));

    let installed = init_global(&MemoryConfig::compact()).expect("first init");
    assert!(std::ptr::eq(installed, global()));
    assert_eq!(global().config(), &MemoryConfig::compact());
    assert_eq!(global().buffer_pool().capacity(), 64 * 1024);

    assert_eq!(
        init_global(&MemoryConfig::default()).err(),
        Some(MemoryError::AlreadyInitialized)
    );
}
