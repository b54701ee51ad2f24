//! Integration tests for complete sync run validation
//!
//! These tests drive the orchestrator end to end against a scripted mock
//! service, covering clean runs, rate limit recovery, checkpoint resume,
//! and the transport error policies.

use std::time::Duration;

use favsync_core::checkpoint::CheckpointStore;
use favsync_core::error::Error;
use favsync_core::orchestrator::{
    RunOutcome, SyncConfig, SyncOrchestrator, SyncSource, TransportErrorPolicy,
};
use favsync_core::playlist::PlaylistSource;
use favsync_core::service::{CollectionId, ServiceError, Visibility};
use favsync_core::track::VideoId;
use favsync_test_utils::builders::{candidate, clip, song, track, tracks};
use favsync_test_utils::{MockPlaylistSource, MockVideoService};
use tempfile::TempDir;

/// Config with the pauses zeroed out so tests run instantly.
fn quick_config() -> SyncConfig {
    SyncConfig {
        search_delay: Duration::ZERO,
        cooldown: Duration::ZERO,
        ..Default::default()
    }
}

fn store_in(dir: &TempDir) -> CheckpointStore {
    CheckpointStore::new(dir.path().join("checkpoint.json"))
}

fn orchestrator_in(
    dir: &TempDir,
    service: &MockVideoService,
    config: SyncConfig,
) -> SyncOrchestrator<MockVideoService> {
    SyncOrchestrator::new(service.clone(), store_in(dir), config)
}

#[cfg(test)]
mod complete_run_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_track_run_completes_and_clears_checkpoint() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![song(170001)]));

        let store = store_in(&dir);
        store.save(&tracks(&[("Stale", "Leftover")])).await.unwrap();

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(tracks(&[("Blue Bird", "Ikimonogakari")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, 0);
        assert_eq!(report.errored, 0);
        assert_eq!(report.cooldowns, 0);
        assert!(report.checkpoint.is_none());
        assert_eq!(report.collection, Some(CollectionId(1)));

        assert_eq!(
            service.search_queries(),
            vec![track("Blue Bird", "Ikimonogakari").query()]
        );
        assert_eq!(
            service.added_videos(),
            vec![(CollectionId(1), VideoId(170001))]
        );
        assert!(!store.has_pending().await);
    }

    #[tokio::test]
    async fn test_first_candidate_inside_duration_window_wins() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![
            clip(1),
            candidate(2, "full pv", 240),
            candidate(3, "another full upload", 300),
        ]));

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(tracks(&[("Lemon", "Kenshi Yonezu")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.matched, 1);
        assert_eq!(service.added_videos(), vec![(CollectionId(1), VideoId(2))]);
    }

    #[tokio::test]
    async fn test_empty_playlist_completes_without_creating_collection() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();

        let store = store_in(&dir);
        store.save(&tracks(&[("Owed", "Track")])).await.unwrap();

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator.run(SyncSource::Fresh(Vec::new())).await.unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 0);
        assert!(report.collection.is_none());
        assert!(service.created_collections().is_empty());
        assert!(service.search_queries().is_empty());

        // An unrelated pending checkpoint is left alone.
        assert!(store.has_pending().await);
    }

    #[tokio::test]
    async fn test_collection_name_and_visibility_are_passed_through() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![song(5)]));

        let config = SyncConfig {
            collection_name: Some("spring mix".to_string()),
            visibility: Visibility::Private,
            ..quick_config()
        };
        let orchestrator = orchestrator_in(&dir, &service, config);

        // Act
        orchestrator
            .run(SyncSource::Fresh(tracks(&[("Song", "Artist")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            service.created_collections(),
            vec![("spring mix".to_string(), Visibility::Private)]
        );
    }

    #[tokio::test]
    async fn test_report_total_time_covers_service_latency() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.set_search_delay(Duration::from_millis(30));
        service.expect_search(Ok(vec![song(1)]));

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(tracks(&[("Song", "Artist")])))
            .await
            .unwrap();

        // Assert
        assert!(report.total_time >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_fetched_playlist_feeds_a_run() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let source = MockPlaylistSource::new(tracks(&[("Song1", "Artist1"), ("Song2", "Artist2")]));
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![song(1)]));
        service.expect_search(Ok(vec![song(2)]));

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let fetched = source.fetch().await.unwrap();
        let report = orchestrator.run(SyncSource::Fresh(fetched)).await.unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 2);
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[tokio::test]
    async fn test_consecutive_misses_checkpoint_tail_and_resume() {
        // Three tracks; the first two searches miss, which at the default
        // threshold reads as disguised rate limiting. The cooldown resumes
        // from the triggering track, the buffered first failure stays owed.
        let dir = TempDir::new().unwrap();
        let list = tracks(&[("One", "A"), ("Two", "B"), ("Three", "C")]);
        let service = MockVideoService::new();
        service.expect_search(Ok(Vec::new()));
        service.expect_search(Ok(Vec::new()));
        service.expect_search(Ok(Vec::new()));
        service.expect_search(Ok(vec![song(9)]));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(list.clone()))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::PartialFailure);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, 2);
        assert_eq!(report.cooldowns, 1);
        assert!(report.checkpoint.is_some());

        // The second track was searched twice: once before the trigger,
        // once after resuming from the checkpointed tail.
        assert_eq!(
            service.search_queries(),
            vec![
                list[0].query(),
                list[1].query(),
                list[1].query(),
                list[2].query(),
            ]
        );

        // What remains owed is the first failure plus the re-failed trigger.
        assert_eq!(
            store.load().await.unwrap(),
            tracks(&[("One", "A"), ("Two", "B")])
        );
    }

    #[tokio::test]
    async fn test_blocked_response_drains_buffer_into_checkpoint() {
        // A hard block means nothing since the last checkpoint can be
        // trusted, so earlier buffered failures get retried too.
        let dir = TempDir::new().unwrap();
        let list = tracks(&[("One", "A"), ("Two", "B"), ("Three", "C")]);
        let service = MockVideoService::new();
        service.expect_search(Ok(Vec::new()));
        service.expect_search(Err(ServiceError::from_status(412)));
        service.expect_search(Ok(vec![song(1)]));
        service.expect_search(Ok(vec![song(2)]));
        service.expect_search(Ok(vec![song(3)]));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(list.clone()))
            .await
            .unwrap();

        // Assert: the first track missed once but matched after the
        // cooldown, so the report carries no failures.
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 3);
        assert_eq!(report.unmatched, 0);
        assert_eq!(report.errored, 0);
        assert_eq!(report.cooldowns, 1);

        // Pass two replays the drained buffer ahead of the tail.
        assert_eq!(
            service.search_queries(),
            vec![
                list[0].query(),
                list[1].query(),
                list[0].query(),
                list[1].query(),
                list[2].query(),
            ]
        );
        assert!(!store.has_pending().await);
    }

    #[tokio::test]
    async fn test_checkpoint_dedups_buffered_track_repeated_in_tail() {
        // The same track can sit in the failure buffer and again in the
        // unprocessed tail; the checkpoint keeps one copy, front position.
        let dir = TempDir::new().unwrap();
        let list = tracks(&[("One", "A"), ("Two", "B"), ("One", "A")]);
        let service = MockVideoService::new();
        service.expect_search(Ok(Vec::new()));
        service.expect_search(Err(ServiceError::from_status(412)));
        service.expect_search(Ok(vec![song(1)]));
        service.expect_search(Ok(vec![song(2)]));

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(list.clone()))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 2);
        assert_eq!(
            service.search_queries(),
            vec![
                list[0].query(),
                list[1].query(),
                list[0].query(),
                list[1].query(),
            ]
        );
    }

    #[tokio::test]
    async fn test_rate_limited_collection_creation_retries_after_cooldown() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_create_collection(Err(ServiceError::from_status(412)));
        service.expect_search(Ok(vec![song(5)]));

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(tracks(&[("Song", "Artist")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 1);
        assert_eq!(report.cooldowns, 1);
        assert_eq!(service.created_collections().len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limited_add_retries_whole_remainder() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let list = tracks(&[("One", "A"), ("Two", "B")]);
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![song(1)]));
        service.expect_add(Err(ServiceError::from_status(412)));
        service.expect_search(Ok(vec![song(1)]));
        service.expect_search(Ok(vec![song(2)]));

        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(list.clone()))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::Complete);
        assert_eq!(report.matched, 2);
        assert_eq!(report.cooldowns, 1);
        assert_eq!(
            service.search_queries(),
            vec![list[0].query(), list[0].query(), list[1].query()]
        );
    }
}

#[cfg(test)]
mod resume_tests {
    use super::*;

    #[tokio::test]
    async fn test_below_threshold_miss_lands_in_checkpoint_and_survives_resume() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act: a single miss stays under the threshold, so the run finishes
        // with the track checkpointed rather than pausing.
        let first = orchestrator
            .run(SyncSource::Fresh(tracks(&[("Ghost", "Nobody")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(first.outcome, RunOutcome::PartialFailure);
        assert_eq!(first.unmatched, 1);
        assert_eq!(first.cooldowns, 0);
        assert_eq!(store.load().await.unwrap(), tracks(&[("Ghost", "Nobody")]));

        // Act: resuming and missing again leaves an identical checkpoint.
        let second = orchestrator.run(SyncSource::Checkpoint).await.unwrap();

        // Assert
        assert_eq!(second.outcome, RunOutcome::PartialFailure);
        assert_eq!(second.cooldowns, 0);
        assert_eq!(store.load().await.unwrap(), tracks(&[("Ghost", "Nobody")]));
    }

    #[tokio::test]
    async fn test_resume_without_checkpoint_is_an_error() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let result = orchestrator.run(SyncSource::Checkpoint).await;

        // Assert
        assert!(matches!(result, Err(Error::Checkpoint(_))));
        assert!(service.created_collections().is_empty());
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_continue_keeps_failed_track_for_retry() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_search(Err(ServiceError::from_status(500)));
        service.expect_search(Ok(vec![song(2)]));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(tracks(&[("One", "A"), ("Two", "B")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::PartialFailure);
        assert_eq!(report.matched, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(report.unmatched, 0);
        assert_eq!(store.load().await.unwrap(), tracks(&[("One", "A")]));
    }

    #[tokio::test]
    async fn test_errored_track_retried_after_block_counts_once() {
        // A track that fails in two passes is one owed item in the final
        // report, not one entry per attempt.
        let dir = TempDir::new().unwrap();
        let list = tracks(&[("One", "A"), ("Two", "B")]);
        let service = MockVideoService::new();
        service.expect_search(Err(ServiceError::from_status(500)));
        service.expect_search(Err(ServiceError::from_status(412)));
        service.expect_search(Err(ServiceError::from_status(500)));
        service.expect_search(Ok(vec![song(2)]));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(list.clone()))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::PartialFailure);
        assert_eq!(report.matched, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(report.unmatched, 0);
        assert_eq!(report.cooldowns, 1);
        assert_eq!(store.load().await.unwrap(), tracks(&[("One", "A")]));
    }

    #[tokio::test]
    async fn test_fail_run_aborts_and_checkpoints_the_remainder() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![song(1)]));
        service.expect_search(Err(ServiceError::from_status(500)));

        let config = SyncConfig {
            transport_error_policy: TransportErrorPolicy::FailRun,
            ..quick_config()
        };
        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, config);

        // Act
        let result = orchestrator
            .run(SyncSource::Fresh(tracks(&[
                ("One", "A"),
                ("Two", "B"),
                ("Three", "C"),
            ])))
            .await;

        // Assert
        assert!(matches!(result, Err(Error::Service(_))));
        assert_eq!(service.added_videos().len(), 1);
        assert_eq!(
            store.load().await.unwrap(),
            tracks(&[("Two", "B"), ("Three", "C")])
        );
    }

    #[tokio::test]
    async fn test_failed_add_follows_transport_policy() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_search(Ok(vec![song(1)]));
        service.expect_add(Err(ServiceError::from_status(500)));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let report = orchestrator
            .run(SyncSource::Fresh(tracks(&[("One", "A")])))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, RunOutcome::PartialFailure);
        assert_eq!(report.errored, 1);
        assert_eq!(report.matched, 0);
        assert_eq!(store.load().await.unwrap(), tracks(&[("One", "A")]));
    }

    #[tokio::test]
    async fn test_rejected_credential_during_creation_is_fatal() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let service = MockVideoService::new();
        service.expect_create_collection(Err(ServiceError::invalid_credential("expired")));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let result = orchestrator
            .run(SyncSource::Fresh(tracks(&[("One", "A")])))
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(Error::Service(ServiceError::InvalidCredential { .. }))
        ));
        assert!(service.search_queries().is_empty());
        assert!(!store.has_pending().await);
    }

    #[tokio::test]
    async fn test_rejected_credential_mid_run_is_fatal() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let list = tracks(&[("One", "A"), ("Two", "B")]);
        let service = MockVideoService::new();
        service.expect_search(Err(ServiceError::invalid_credential(
            "account is not logged in",
        )));
        service.expect_search(Err(ServiceError::invalid_credential(
            "account is not logged in",
        )));

        let store = store_in(&dir);
        let orchestrator = orchestrator_in(&dir, &service, quick_config());

        // Act
        let result = orchestrator.run(SyncSource::Fresh(list.clone())).await;

        // Assert: the run stops at the first rejection instead of burning
        // through the rest of the list.
        assert!(matches!(
            result,
            Err(Error::Service(ServiceError::InvalidCredential { .. }))
        ));
        assert_eq!(service.search_queries(), vec![list[0].query()]);

        // Everything still owed is on disk for the next attempt.
        assert_eq!(
            store.load().await.unwrap(),
            tracks(&[("One", "A"), ("Two", "B")])
        );
    }
}
