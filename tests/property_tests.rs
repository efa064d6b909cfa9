use picpurge::domain::{pick_at_index, DeleteQueue, QueueEntry};
use picpurge::library::MemoryLibrary;
use picpurge::storage::MemoryStore;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn entry(id: u8) -> QueueEntry {
    QueueEntry::new(format!("id-{}", id), format!("file:///photos/{}.jpg", id))
}

async fn filled_queue(ids: &[u8]) -> DeleteQueue {
    let queue = DeleteQueue::new(Arc::new(MemoryStore::new()));
    for id in ids {
        queue.add(entry(*id)).await.unwrap();
    }
    queue
}

proptest! {
    #[test]
    fn test_add_never_duplicates(ids in prop::collection::vec(0u8..20, 0..40)) {
        let all = block_on(async { filled_queue(&ids).await.get_all().await.unwrap() });

        let distinct: HashSet<u8> = ids.iter().copied().collect();
        prop_assert_eq!(all.len(), distinct.len());

        let unique: HashSet<&str> = all.iter().map(|e| e.id.as_str()).collect();
        prop_assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_add_keeps_first_insertion_order(ids in prop::collection::vec(0u8..20, 0..40)) {
        let all = block_on(async { filled_queue(&ids).await.get_all().await.unwrap() });

        let mut expected = Vec::new();
        for id in &ids {
            let e = entry(*id);
            if !expected.contains(&e) {
                expected.push(e);
            }
        }
        prop_assert_eq!(all, expected);
    }

    #[test]
    fn test_remove_many_is_complete(
        ids in prop::collection::vec(0u8..20, 0..30),
        remove in prop::collection::vec(0u8..25, 0..10),
    ) {
        let (before, after) = block_on(async {
            let queue = filled_queue(&ids).await;
            let before = queue.get_all().await.unwrap();
            let remove_ids: Vec<String> = remove.iter().map(|id| entry(*id).id).collect();
            let after = queue.remove_many(&remove_ids).await.unwrap();
            (before, after)
        });

        let removed: HashSet<String> = remove.iter().map(|id| entry(*id).id).collect();
        prop_assert!(after.iter().all(|e| !removed.contains(&e.id)));

        let survivors: Vec<QueueEntry> = before
            .into_iter()
            .filter(|e| !removed.contains(&e.id))
            .collect();
        prop_assert_eq!(after, survivors);
    }

    #[test]
    fn test_restore_many_matches_remove_many(
        ids in prop::collection::vec(0u8..20, 0..30),
        remove in prop::collection::vec(0u8..25, 0..10),
    ) {
        let (removed, restored) = block_on(async {
            let remove_ids: Vec<String> = remove.iter().map(|id| entry(*id).id).collect();

            let a = filled_queue(&ids).await;
            let removed = a.remove_many(&remove_ids).await.unwrap();

            let b = filled_queue(&ids).await;
            b.restore_many(&remove_ids).await.unwrap();
            (removed, b.get_all().await.unwrap())
        });

        prop_assert_eq!(removed, restored);
    }

    #[test]
    fn test_pick_at_index_matches_position(
        count in 1usize..200,
        index_seed in any::<usize>(),
        page_size in 1usize..60,
    ) {
        let index = index_seed % count;
        let picked = block_on(async {
            let library = MemoryLibrary::with_photos(count);
            pick_at_index(&library, index, page_size).await.unwrap()
        });

        prop_assert_eq!(picked.map(|a| a.id), Some(format!("photo-{}", index)));
    }
}
