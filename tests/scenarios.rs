//! End-to-end scenarios driven through the public API
//!
//! Walks the manager through scripted allocate/deallocate sequences and
//! checks the resulting maps, fragmentation numbers, and error outcomes.

use firstfit_rs::{
    BlockState, FirstFitManager, MemoryError, MergeSummary, Outcome,
};

fn map_triples(memory: &FirstFitManager) -> Vec<(u64, u64, Option<u32>)> {
    memory
        .memory_map()
        .iter()
        .map(|b| (b.start, b.size, b.owner))
        .collect()
}

#[test]
fn test_allocation_walkthrough() {
    let mut memory = FirstFitManager::new(1000).unwrap();

    // Two allocations pack from the bottom of the address space
    assert_eq!(memory.allocate(1, 200).unwrap(), 0);
    assert_eq!(
        map_triples(&memory),
        vec![(0, 200, Some(1)), (200, 800, None)]
    );

    assert_eq!(memory.allocate(2, 300).unwrap(), 200);
    assert_eq!(
        map_triples(&memory),
        vec![(0, 200, Some(1)), (200, 300, Some(2)), (500, 500, None)]
    );

    // Freeing process 1 leaves an isolated gap at the bottom
    assert_eq!(memory.deallocate(1).unwrap(), MergeSummary::None);
    assert_eq!(
        map_triples(&memory),
        vec![(0, 200, None), (200, 300, Some(2)), (500, 500, None)]
    );
    assert_eq!(memory.fragmentation().external_fragmentation, 1);

    // Freeing process 2 merges everything back into one free block
    assert_eq!(memory.deallocate(2).unwrap(), MergeSummary::Both);
    assert_eq!(map_triples(&memory), vec![(0, 1000, None)]);
    assert_eq!(memory.fragmentation().external_fragmentation, 0);
}

#[test]
fn test_rejected_requests() {
    let mut memory = FirstFitManager::new(1000).unwrap();

    assert_eq!(
        memory.allocate(3, 0).unwrap_err(),
        MemoryError::InvalidSize(0)
    );
    assert_eq!(
        memory.allocate(3, 1500).unwrap_err(),
        MemoryError::OutOfMemory {
            requested: 1500,
            largest_free: 1000
        }
    );

    memory.allocate(4, 100).unwrap();
    assert_eq!(
        memory.allocate(4, 100).unwrap_err(),
        MemoryError::DuplicateProcess(4)
    );

    assert_eq!(
        memory.deallocate(9).unwrap_err(),
        MemoryError::ProcessNotFound(9)
    );

    // Every rejection above was still recorded
    let rejected = memory
        .log()
        .iter()
        .filter(|e| matches!(e.outcome, Outcome::Rejected(_)))
        .count();
    assert_eq!(rejected, 4);
}

#[test]
fn test_fragmentation_blocks_large_request() {
    let mut memory = FirstFitManager::new(1000).unwrap();

    // Five back-to-back allocations, then free every other one
    for pid in 1..=5 {
        memory.allocate(pid, 100).unwrap();
    }
    memory.deallocate(2).unwrap();
    memory.deallocate(4).unwrap();

    // 700 units are free, but no single run is larger than 500
    let report = memory.fragmentation();
    assert_eq!(report.free_total, 700);
    assert_eq!(report.largest_free_block, 500);
    assert_eq!(report.external_fragmentation, 2);

    assert!(matches!(
        memory.allocate(6, 600).unwrap_err(),
        MemoryError::OutOfMemory { .. }
    ));

    // Smaller requests land in the first gap that fits
    assert_eq!(memory.allocate(7, 80).unwrap(), 100);
    assert_eq!(memory.allocate(8, 90).unwrap(), 300);
}

#[test]
fn test_exact_fill_and_drain() {
    let mut memory = FirstFitManager::new(100).unwrap();

    memory.allocate(1, 50).unwrap();
    memory.allocate(2, 50).unwrap();
    assert_eq!(memory.status().free_total, 0);
    assert_eq!(memory.status().free_block_count, 0);

    memory.deallocate(1).unwrap();
    memory.deallocate(2).unwrap();

    let map = memory.memory_map();
    assert_eq!(map.len(), 1);
    assert_eq!(map[0].size, 100);
    assert!(map[0].state.is_free());
}

#[test]
fn test_mixed_workload_keeps_partition_consistent() {
    let mut memory = FirstFitManager::new(1000).unwrap();

    let script: &[(&str, u32, u64)] = &[
        ("allocate", 1, 150),
        ("allocate", 2, 200),
        ("allocate", 3, 100),
        ("allocate", 4, 250),
        ("deallocate", 2, 0),
        ("allocate", 5, 80),
        ("deallocate", 1, 0),
        ("deallocate", 4, 0),
        ("allocate", 6, 300),
    ];

    for &(op, pid, size) in script {
        let _ = match op {
            "allocate" => memory.allocate(pid, size).map(|_| ()),
            _ => memory.deallocate(pid).map(|_| ()),
        };

        // The map must tile the whole space after every step
        let map = memory.memory_map();
        assert_eq!(map[0].start, 0);
        for pair in map.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start);
            assert!(!(pair[0].state.is_free() && pair[1].state.is_free()));
        }
        assert_eq!(map[map.len() - 1].end, 999);
    }

    // Totals reconcile with the map
    let status = memory.status();
    let allocated: u64 = memory
        .memory_map()
        .iter()
        .filter(|b| matches!(b.state, BlockState::Allocated(_)))
        .map(|b| b.size)
        .sum();
    assert_eq!(status.allocated_total, allocated);
    assert_eq!(status.free_total, 1000 - allocated);

    // Nine operations, nine log entries, in order
    assert_eq!(memory.log().len(), script.len());
    for (i, entry) in memory.log().iter().enumerate() {
        assert_eq!(entry.sequence, i as u64);
    }
}

#[test]
fn test_state_serializes_to_json() {
    let mut memory = FirstFitManager::new(1000).unwrap();
    memory.allocate(1, 200).unwrap();
    let _ = memory.allocate(1, 100);

    let map_json = serde_json::to_string(&memory.memory_map()).unwrap();
    assert!(map_json.contains("\"start\":0"));

    let log_json = serde_json::to_string(&memory.log()).unwrap();
    assert!(log_json.contains("Rejected"));
}
