//! Session and job lifecycle tests against the fake runtime.
//!
//! The fake progresses job status on its own tasks; everything asserted here
//! is discovered through polling, exactly as a client of the real service
//! would.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, json};
use tokio::time::sleep;

use alsvid_api::{JobStatus, RuntimeClient};
use alsvid_client::{ClientError, Sampler, Session};
use alsvid_fake::{FakeRuntime, JobProfile};

const STEP: Duration = Duration::from_millis(10);
const POLL: Duration = Duration::from_millis(2);

fn fake() -> (Arc<FakeRuntime>, Arc<dyn RuntimeClient>) {
    let fake = Arc::new(FakeRuntime::new().with_step(STEP));
    let client: Arc<dyn RuntimeClient> = fake.clone();
    (fake, client)
}

fn session(client: Arc<dyn RuntimeClient>) -> Session {
    Session::new(client, "prog-test", Map::new(), Map::new())
        .with_backend("fake_lagos")
        .with_poll_interval(POLL)
}

/// Poll until the job reaches `target`, with a generous safety limit.
async fn wait_for_status(client: &Arc<dyn RuntimeClient>, session: &Session, target: JobStatus) {
    let job_id = session.current_job().expect("job submitted").job_id().clone();
    for _ in 0..500 {
        if client.job_status(&job_id).await.unwrap() == target {
            return;
        }
        sleep(POLL).await;
    }
    panic!("job never reached {target}");
}

#[tokio::test]
async fn test_default_profile_runs_to_completion() {
    let (_fake, client) = fake();
    let mut session = session(client.clone());
    session.write(Map::new()).await.unwrap();

    let job_id = session.current_job().unwrap().job_id().clone();

    // No result before the status is observed as COMPLETED.
    let mut saw_pending = false;
    loop {
        let status = client.job_status(&job_id).await.unwrap();
        if status.is_pending() {
            saw_pending = true;
            assert!(client.job_result(&job_id).await.unwrap().is_none());
            sleep(POLL).await;
        } else {
            assert_eq!(status, JobStatus::Completed);
            break;
        }
    }
    assert!(saw_pending);

    let payload = session.read().await.unwrap();
    assert_eq!(payload, json!("foo"));
}

#[tokio::test]
async fn test_writes_share_the_first_job_id_as_session_id() {
    let (_fake, client) = fake();
    let mut session = session(client.clone());

    let mut job_ids = Vec::new();
    for _ in 0..3 {
        session.write(Map::new()).await.unwrap();
        job_ids.push(session.current_job().unwrap().job_id().clone());
        session.read().await.unwrap();
    }

    let expected = session.session_id().unwrap().clone();
    assert_eq!(expected.as_str(), job_ids[0].as_str());
    for job_id in &job_ids {
        let record = client.job_get(job_id).await.unwrap();
        assert_eq!(record.session_id, expected);
    }
}

#[tokio::test]
async fn test_read_after_close_fails_even_with_completed_job() {
    let (_fake, client) = fake();
    let mut session = session(client);
    session.write(Map::new()).await.unwrap();

    let payload = session.read().await.unwrap();
    assert_eq!(payload, json!("foo"));

    session.close();
    assert!(!session.is_active());
    assert!(matches!(session.read().await, Err(ClientError::SessionClosed)));
    assert!(matches!(
        session.write(Map::new()).await,
        Err(ClientError::SessionClosed)
    ));
}

#[tokio::test]
async fn test_cancel_while_running_and_noop_after_completion() {
    let (fake, client) = fake();
    fake.push_profile(JobProfile::Cancelable);

    let mut session = session(client.clone());
    session.write(Map::new()).await.unwrap();
    wait_for_status(&client, &session, JobStatus::Running).await;

    let job = session.current_job().unwrap();
    job.cancel().await.unwrap();
    assert_eq!(job.status().await.unwrap(), JobStatus::Cancelled);
    assert!(matches!(session.read().await, Err(ClientError::JobCancelled)));

    // Default profile: completes, then cancel is a harmless no-op.
    let mut session = self::session(client.clone());
    session.write(Map::new()).await.unwrap();
    session.read().await.unwrap();
    let job = session.current_job().unwrap();
    job.cancel().await.unwrap();
    assert_eq!(job.status().await.unwrap(), JobStatus::Completed);
}

#[tokio::test]
async fn test_timeout_below_then_above_run_duration() {
    let (fake, client) = fake();
    fake.push_profile(JobProfile::Timed(Duration::from_millis(150)));

    let mut session = session(client);
    session.write(Map::new()).await.unwrap();

    let err = session
        .read_with(Some(Duration::from_millis(40)), POLL)
        .await
        .unwrap_err();
    match err {
        ClientError::JobTimeout { last_status, .. } => {
            assert_eq!(last_status, JobStatus::Running);
        }
        other => panic!("expected JobTimeout, got {other}"),
    }

    // A long enough wait on the same job yields the payload.
    let payload = session
        .read_with(Some(Duration::from_secs(5)), POLL)
        .await
        .unwrap();
    assert_eq!(payload, json!("foo"));
}

#[tokio::test]
async fn test_failed_and_ran_too_long_carry_payload() {
    let (fake, client) = fake();
    fake.push_profile(JobProfile::Failing);
    fake.push_profile(JobProfile::RanTooLong);

    let mut session = session(client.clone());
    session.write(Map::new()).await.unwrap();
    match session.read().await.unwrap_err() {
        ClientError::JobFailed(payload) => assert_eq!(payload, "Kaboom!"),
        other => panic!("expected JobFailed, got {other}"),
    }

    let mut session = self::session(client);
    session.write(Map::new()).await.unwrap();
    match session.read().await.unwrap_err() {
        ClientError::JobCancelledRanTooLong(payload) => assert_eq!(payload, "Kaboom!"),
        other => panic!("expected JobCancelledRanTooLong, got {other}"),
    }
}

#[tokio::test]
async fn test_info_reports_backend_and_job_status() {
    let (_fake, client) = fake();
    let mut session = session(client);

    let info = session.info().await.unwrap();
    assert_eq!(info.backend, "fake_lagos");
    assert!(info.job_id.is_none());
    assert!(info.job_status.is_none());

    session.write(Map::new()).await.unwrap();
    session.read().await.unwrap();
    let info = session.info().await.unwrap();
    assert!(info.job_id.is_some());
    assert_eq!(info.job_status, Some(JobStatus::Completed));
}

#[tokio::test]
async fn test_sampler_end_to_end() {
    let (fake, client) = fake();
    fake.push_profile(JobProfile::CustomResult(json!({
        "quasi_dists": [{"00": 0.51, "11": 0.49}],
    })));

    let sampler = Sampler::new(client)
        .with_backend("fake_lagos")
        .with_poll_interval(POLL);
    let mut session = sampler.run(vec![json!("OPENQASM 3.0; qubit[2] q;")], None, false);

    let result = session.execute(None).await.unwrap();
    assert_eq!(result.quasi_dists.len(), 1);
    assert_eq!(result.quasi_dists[0]["00"], 0.51);

    session.close();
}

#[tokio::test]
async fn test_sampler_decode_rejects_foreign_payload() {
    // The default profile's payload is a bare string, not a sampler result.
    let (_fake, client) = fake();
    let sampler = Sampler::new(client).with_poll_interval(POLL);
    let mut session = sampler.run(vec![json!("c1")], None, false);

    let err = session.execute(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_result_is_cached_after_first_read() {
    let (fake, client) = fake();
    let mut session = session(client.clone());
    session.write(Map::new()).await.unwrap();
    let first = session.read().await.unwrap();

    // Deleting the job server-side does not invalidate the returned result.
    let job_id = session.current_job().unwrap().job_id().clone();
    fake.job_delete(&job_id).await.unwrap();
    let second = session.read().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_estimator_end_to_end() {
    let (fake, client) = fake();
    fake.push_profile(JobProfile::CustomResult(json!({
        "values": [0.42],
        "variances": [0.003],
    })));

    let estimator = alsvid_client::Estimator::new(client)
        .with_backend("fake_lagos")
        .with_poll_interval(POLL);
    let mut session = estimator.run(
        vec![json!("c1")],
        vec![json!("ZZ")],
        None,
        None,
    );

    let result = session.execute(Some(json!([0.1, 0.2]))).await.unwrap();
    assert_eq!(result.values, vec![0.42]);
    assert_eq!(result.variances, vec![0.003]);
}
