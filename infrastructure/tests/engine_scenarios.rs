//! End-to-end engine scenarios: submit -> intake -> deliberate -> checkpoint
//!
//! Exercises the full stack over the in-memory adapters: idempotent
//! reprocessing, per-room serialization, timeout abstains, deadlock
//! escalation, dead-lettering, and restart recovery through the JSONL
//! checkpoint store.

use async_trait::async_trait;
use boardroom_application::{
    AgentPool, CheckpointManager, CheckpointParams, DeadLetter, GetRoomStateUseCase,
    IntakeConsumer, IntakeError, IntakeParams, LockParams, LogError, LogRecord, MessageLog,
    NoMetrics, PendingRecord, RecordPayload, RoomParams, RoomStateError, SubmitMessageInput,
    SubmitMessageUseCase,
    ports::checkpoint_store::CheckpointStore,
    ports::room_lock::RoomLockCoordinator,
    use_cases::run_deliberation::RunDeliberationUseCase,
};
use boardroom_domain::{
    AgentRole, DeliberationPhase, ProposalStatus, RecordId, ResolutionRule, RoomId, RoomStatus,
    Stance,
};
use boardroom_infrastructure::{
    InMemoryCheckpointStore, InMemoryMessageLog, InMemoryRoomLocks, JsonlCheckpointStore,
    ScriptedDeliberator, SlowDeliberator, specialist_pool,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Wires the full engine over injectable log and store adapters
struct Harness {
    log: Arc<dyn MessageLog>,
    store: Arc<dyn CheckpointStore>,
    locks: Arc<InMemoryRoomLocks>,
    consumer: IntakeConsumer,
    submit: SubmitMessageUseCase,
}

fn fast_intake() -> IntakeParams {
    IntakeParams::default()
        .with_pending_min_idle(Duration::ZERO)
        .with_ack_backoff(Duration::from_millis(1), 2)
}

fn build_harness(
    pool: AgentPool,
    log: Arc<dyn MessageLog>,
    store: Arc<dyn CheckpointStore>,
    intake: IntakeParams,
    rooms: RoomParams,
) -> Harness {
    let locks = Arc::new(InMemoryRoomLocks::new(LockParams::default().lease_ttl));
    let metrics = Arc::new(NoMetrics);
    let checkpoints = Arc::new(CheckpointManager::new(
        Arc::clone(&store),
        metrics.clone(),
        CheckpointParams::default().with_commit_backoff_base(Duration::from_millis(1)),
    ));
    let orchestrator = Arc::new(RunDeliberationUseCase::new(
        pool,
        Arc::clone(&checkpoints),
        metrics.clone(),
        ResolutionRule::default(),
        rooms.clone(),
    ));
    let consumer = IntakeConsumer::new(
        Arc::clone(&log),
        locks.clone(),
        checkpoints,
        orchestrator,
        metrics,
        intake,
        rooms,
        "worker-1",
    );
    Harness {
        submit: SubmitMessageUseCase::new(Arc::clone(&log)),
        log,
        store,
        locks,
        consumer,
    }
}

fn harness_with_pool(pool: AgentPool) -> Harness {
    build_harness(
        pool,
        Arc::new(InMemoryMessageLog::new()),
        Arc::new(InMemoryCheckpointStore::new()),
        fast_intake(),
        RoomParams::default(),
    )
}

fn balanced_pool() -> AgentPool {
    // Two entrenched camps and no moderator votes: a persistent near-tie
    AgentPool::new()
        .with_agent(Arc::new(ScriptedDeliberator::fixed(
            AgentRole::Finance,
            Stance::Support,
            0.5,
        )))
        .with_agent(Arc::new(ScriptedDeliberator::fixed(
            AgentRole::Legal,
            Stance::Oppose,
            0.5,
        )))
}

async fn room_state(store: &Arc<dyn CheckpointStore>, room: &RoomId) -> boardroom_domain::DeliberationState {
    GetRoomStateUseCase::new(Arc::clone(store))
        .execute(room)
        .await
        .unwrap()
}

#[tokio::test]
async fn happy_path_reaches_terminal_status_and_acks_once() {
    let harness = harness_with_pool(specialist_pool());
    let room = RoomId::new("demo");

    harness
        .submit
        .execute(SubmitMessageInput::new(
            "demo",
            "boss",
            "Approve Q3 budget increase",
        ))
        .await
        .unwrap();

    let summary = harness
        .consumer
        .drain_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.duplicates, 0);
    assert!(!summary.deferred);

    let state = room_state(&harness.store, &room).await;
    let proposal = state.proposal().unwrap();
    assert!(matches!(
        proposal.status(),
        ProposalStatus::Accepted | ProposalStatus::Rejected
    ));
    assert!(state.turn() <= ResolutionRule::default().max_turns);
    assert_eq!(state.phase(), DeliberationPhase::Idle);

    // Acked exactly once: nothing pending, nothing redelivered
    let pending = harness
        .log
        .pending(&room, "boardroom", Duration::ZERO)
        .await
        .unwrap();
    assert!(pending.is_empty());
    let again = harness
        .consumer
        .drain_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert!(!again.made_progress());
}

#[tokio::test]
async fn timed_out_agent_abstains_and_deliberation_advances() {
    let pool = specialist_pool().with_agent(Arc::new(SlowDeliberator::new(
        AgentRole::ResearchAndDevelopment,
        Duration::from_secs(60),
    )));
    let harness = build_harness(
        pool,
        Arc::new(InMemoryMessageLog::new()),
        Arc::new(InMemoryCheckpointStore::new()),
        fast_intake(),
        RoomParams::default().with_agent_timeout(Duration::from_millis(25)),
    );
    let room = RoomId::new("demo");

    harness
        .submit
        .execute(SubmitMessageInput::new(
            "demo",
            "boss",
            "Approve Q3 budget increase",
        ))
        .await
        .unwrap();
    harness
        .consumer
        .drain_room(&room, &CancellationToken::new())
        .await
        .unwrap();

    let state = room_state(&harness.store, &room).await;
    let proposal = state.proposal().unwrap();
    assert!(proposal.status().is_terminal());

    let rnd_positions: Vec<_> = proposal
        .positions()
        .iter()
        .filter(|p| p.role() == &AgentRole::ResearchAndDevelopment)
        .collect();
    assert!(!rnd_positions.is_empty());
    for position in rnd_positions {
        assert_eq!(position.stance(), Stance::Abstain);
        assert_eq!(position.confidence(), 0.0);
        assert_eq!(position.rationale(), "no response within deadline");
    }
}

#[tokio::test]
async fn persistent_near_tie_escalates_within_turn_budget() {
    let harness = harness_with_pool(balanced_pool());
    let room = RoomId::new("deadlock");

    harness
        .submit
        .execute(SubmitMessageInput::new(
            "deadlock",
            "boss",
            "Split the company in half",
        ))
        .await
        .unwrap();
    harness
        .consumer
        .drain_room(&room, &CancellationToken::new())
        .await
        .unwrap();

    let state = room_state(&harness.store, &room).await;
    let proposal = state.proposal().unwrap();
    assert_eq!(proposal.status(), ProposalStatus::Escalated);
    assert_eq!(state.turn(), ResolutionRule::default().max_turns);
}

/// Log wrapper that fails acks while the switch is on
struct AckFailingLog {
    inner: InMemoryMessageLog,
    fail_acks: AtomicBool,
}

impl AckFailingLog {
    fn new() -> Self {
        Self {
            inner: InMemoryMessageLog::new(),
            fail_acks: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MessageLog for AckFailingLog {
    async fn append(&self, room: &RoomId, payload: RecordPayload) -> Result<RecordId, LogError> {
        self.inner.append(room, payload).await
    }

    async fn read_group(
        &self,
        room: &RoomId,
        group: &str,
        consumer: &str,
        max_count: usize,
    ) -> Result<Vec<LogRecord>, LogError> {
        self.inner.read_group(room, group, consumer, max_count).await
    }

    async fn ack(&self, room: &RoomId, group: &str, record_id: RecordId) -> Result<(), LogError> {
        if self.fail_acks.load(Ordering::SeqCst) {
            return Err(LogError::Unavailable("ack path down".to_string()));
        }
        self.inner.ack(room, group, record_id).await
    }

    async fn pending(
        &self,
        room: &RoomId,
        group: &str,
        min_idle: Duration,
    ) -> Result<Vec<PendingRecord>, LogError> {
        self.inner.pending(room, group, min_idle).await
    }

    async fn dead_letter(
        &self,
        room: &RoomId,
        record: &LogRecord,
        reason: &str,
    ) -> Result<(), LogError> {
        self.inner.dead_letter(room, record, reason).await
    }

    async fn dead_letters(&self, room: &RoomId) -> Result<Vec<DeadLetter>, LogError> {
        self.inner.dead_letters(room).await
    }
}

#[tokio::test]
async fn redelivery_after_commit_but_before_ack_is_idempotent() {
    let log = Arc::new(AckFailingLog::new());
    let harness = build_harness(
        specialist_pool(),
        Arc::clone(&log) as Arc<dyn MessageLog>,
        Arc::new(InMemoryCheckpointStore::new()),
        fast_intake(),
        RoomParams::default(),
    );
    let room = RoomId::new("demo");

    harness
        .submit
        .execute(SubmitMessageInput::new(
            "demo",
            "boss",
            "Approve Q3 budget increase",
        ))
        .await
        .unwrap();

    // Crash window: deliberation commits its checkpoints, then the ack fails
    log.fail_acks.store(true, Ordering::SeqCst);
    let err = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Log(_)));

    let committed = room_state(&harness.store, &room).await;
    let positions_before = committed.proposal().unwrap().positions().len();
    let turn_before = committed.turn();

    // Recovery: the record is redelivered and recognized as processed
    log.fail_acks.store(false, Ordering::SeqCst);
    let summary = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.processed, 0);

    let after = room_state(&harness.store, &room).await;
    assert_eq!(after.proposal().unwrap().positions().len(), positions_before);
    assert_eq!(after.turn(), turn_before);

    // And the record is finally acked
    let pending = log.pending(&room, "boardroom", Duration::ZERO).await.unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn crashed_run_resumes_from_last_checkpoint_on_redelivery() {
    let log: Arc<dyn MessageLog> = Arc::new(InMemoryMessageLog::new());
    let store: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointStore::new());
    let harness = build_harness(
        specialist_pool(),
        Arc::clone(&log),
        Arc::clone(&store),
        fast_intake(),
        RoomParams::default(),
    );
    let room = RoomId::new("demo");

    // A previous worker read the record, committed the ProposalOpen
    // transition, then died without acking
    let record_id = harness
        .submit
        .execute(SubmitMessageInput::new(
            "demo",
            "boss",
            "Approve Q3 budget increase",
        ))
        .await
        .unwrap();
    let delivered = log.read_group(&room, "boardroom", "crashed-worker", 16).await.unwrap();
    assert_eq!(delivered[0].id, record_id);

    let interrupted = boardroom_domain::DeliberationState::new(
        boardroom_domain::Room::new(room.clone(), AgentRole::default_roster()).unwrap(),
    )
    .open_proposal(
        boardroom_domain::Proposal::new("prop-crashed", record_id, "Approve Q3 budget increase"),
        record_id,
    )
    .unwrap();
    store.commit(&interrupted).await.unwrap();

    // Redelivery resumes the committed run and finally acks
    let summary = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.duplicates, 0);

    let state = room_state(&harness.store, &room).await;
    let proposal = state.proposal().unwrap();
    assert_eq!(proposal.id(), "prop-crashed");
    assert!(proposal.status().is_terminal());

    let pending = log.pending(&room, "boardroom", Duration::ZERO).await.unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn busy_room_defers_and_backpressures_without_losing_records() {
    let harness = harness_with_pool(specialist_pool());
    let room = RoomId::new("demo");

    for content in ["Approve Q3 budget increase", "Approve Q4 budget increase"] {
        harness
            .submit
            .execute(SubmitMessageInput::new("demo", "boss", content))
            .await
            .unwrap();
    }

    // Another worker holds the room
    let foreign_lease = harness
        .locks
        .acquire(&room, "worker-2")
        .await
        .unwrap()
        .lease()
        .unwrap();

    let summary = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert!(summary.deferred);
    assert_eq!(summary.processed, 0);

    // Lease released: both records now process in log order
    harness.locks.release(foreign_lease).await.unwrap();
    let summary = harness
        .consumer
        .drain_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.processed, 2);

    let state = room_state(&harness.store, &room).await;
    assert!(state.has_processed(RecordId::new(2)));
}

#[tokio::test]
async fn distinct_rooms_deliberate_in_parallel() {
    let harness = Arc::new(harness_with_pool(specialist_pool()));

    for room in ["east", "west"] {
        harness
            .submit
            .execute(SubmitMessageInput::new(room, "boss", "Approve Q3 budget increase"))
            .await
            .unwrap();
    }

    let east = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move {
            harness
                .consumer
                .drain_room(&RoomId::new("east"), &CancellationToken::new())
                .await
        })
    };
    let west = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move {
            harness
                .consumer
                .drain_room(&RoomId::new("west"), &CancellationToken::new())
                .await
        })
    };

    let (east, west) = (east.await.unwrap().unwrap(), west.await.unwrap().unwrap());
    assert_eq!(east.processed, 1);
    assert_eq!(west.processed, 1);

    for room in ["east", "west"] {
        let state = room_state(&harness.store, &RoomId::new(room)).await;
        assert!(state.proposal().unwrap().status().is_terminal());
    }
}

/// Store that is permanently down
struct DownStore;

#[async_trait]
impl CheckpointStore for DownStore {
    async fn commit(
        &self,
        _state: &boardroom_domain::DeliberationState,
    ) -> Result<u64, boardroom_application::CheckpointError> {
        Err(boardroom_application::CheckpointError::Unavailable(
            "store down".to_string(),
        ))
    }

    async fn restore(
        &self,
        _room: &RoomId,
    ) -> Result<Option<boardroom_domain::Checkpoint>, boardroom_application::CheckpointError> {
        Ok(None)
    }

    async fn prune(
        &self,
        _room: &RoomId,
        _keep_last: usize,
    ) -> Result<usize, boardroom_application::CheckpointError> {
        Ok(0)
    }
}

#[tokio::test]
async fn repeated_persistence_failure_dead_letters_for_triage() {
    let harness = build_harness(
        specialist_pool(),
        Arc::new(InMemoryMessageLog::new()),
        Arc::new(DownStore),
        fast_intake().with_max_attempts(2),
        RoomParams::default(),
    );
    let room = RoomId::new("demo");

    harness
        .submit
        .execute(SubmitMessageInput::new(
            "demo",
            "boss",
            "Approve Q3 budget increase",
        ))
        .await
        .unwrap();

    // First delivery fails and stays unacked
    let err = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::RunFailed { .. }));

    // Second delivery exhausts the budget and routes to triage
    let summary = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.dead_lettered, 1);

    let dead = harness.log.dead_letters(&room).await.unwrap();
    assert_eq!(dead.len(), 1);
    assert!(dead[0].reason.contains("Persistence"));

    // The record is acked; nothing loops forever
    let again = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert!(!again.made_progress());
}

#[tokio::test]
async fn malformed_payload_goes_straight_to_triage() {
    let log: Arc<dyn MessageLog> = Arc::new(InMemoryMessageLog::new());
    let harness = build_harness(
        specialist_pool(),
        Arc::clone(&log),
        Arc::new(InMemoryCheckpointStore::new()),
        fast_intake(),
        RoomParams::default(),
    );
    let room = RoomId::new("demo");

    // Bypass submit validation, as a buggy producer would
    log.append(&room, RecordPayload::new(&room, "  ", "whatever"))
        .await
        .unwrap();

    let summary = harness
        .consumer
        .poll_room(&room, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.dead_lettered, 1);
    assert_eq!(summary.processed, 0);
}

#[tokio::test]
async fn snapshot_stays_under_bound_for_full_deliberation() {
    // Five agents, forced to the full three-turn budget
    let pool = AgentPool::new()
        .with_agent(Arc::new(ScriptedDeliberator::fixed(AgentRole::Finance, Stance::Support, 0.5)))
        .with_agent(Arc::new(ScriptedDeliberator::fixed(AgentRole::Legal, Stance::Oppose, 0.5)))
        .with_agent(Arc::new(ScriptedDeliberator::fixed(AgentRole::Strategy, Stance::Support, 0.5)))
        .with_agent(Arc::new(ScriptedDeliberator::fixed(
            AgentRole::ResearchAndDevelopment,
            Stance::Oppose,
            0.5,
        )))
        .with_agent(Arc::new(ScriptedDeliberator::fixed(
            AgentRole::Moderator,
            Stance::Abstain,
            0.0,
        )));
    let harness = harness_with_pool(pool);
    let room = RoomId::new("demo");

    harness
        .submit
        .execute(SubmitMessageInput::new(
            "demo",
            "boss",
            "Approve the Q3 budget increase for the platform team, including two \
             additional headcount and the accompanying cloud spend adjustment.",
        ))
        .await
        .unwrap();
    harness
        .consumer
        .drain_room(&room, &CancellationToken::new())
        .await
        .unwrap();

    let state = room_state(&harness.store, &room).await;
    assert_eq!(state.turn(), 3);
    assert_eq!(state.proposal().unwrap().positions().len(), 15);

    let snapshot = serde_json::to_vec(&state).unwrap();
    assert!(
        snapshot.len() < 10 * 1024,
        "snapshot was {} bytes",
        snapshot.len()
    );
}

#[tokio::test]
async fn jsonl_store_recovers_room_state_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let room = RoomId::new("persistent");

    {
        let store: Arc<dyn CheckpointStore> =
            Arc::new(JsonlCheckpointStore::new(dir.path()).unwrap());
        let harness = build_harness(
            specialist_pool(),
            Arc::new(InMemoryMessageLog::new()),
            store,
            fast_intake(),
            RoomParams::default(),
        );
        harness
            .submit
            .execute(SubmitMessageInput::new(
                "persistent",
                "boss",
                "Approve Q3 budget increase",
            ))
            .await
            .unwrap();
        harness
            .consumer
            .drain_room(&room, &CancellationToken::new())
            .await
            .unwrap();
    }

    // "Restart": a fresh store over the same directory sees the outcome
    let store: Arc<dyn CheckpointStore> = Arc::new(JsonlCheckpointStore::new(dir.path()).unwrap());
    let state = GetRoomStateUseCase::new(Arc::clone(&store))
        .execute(&room)
        .await
        .unwrap();
    assert!(state.proposal().unwrap().status().is_terminal());
    assert_eq!(state.room().status(), RoomStatus::Open);

    let missing = GetRoomStateUseCase::new(store)
        .execute(&RoomId::new("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(missing, RoomStateError::NotFound(_)));
}
